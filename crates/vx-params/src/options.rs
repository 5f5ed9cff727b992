use crate::config::OptionsConfig;
use crate::dirs::{DataDirectories, DirStatus, DirectoryProbe};
use crate::parameters::ParameterSet;
use crate::qpath::{HighSymmetryPoint, MomentumPath};
use crate::ParamsResult;

/// Everything the orchestrator reads when it calls the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub parameters: ParameterSet,
    pub q_path: MomentumPath,
    pub dirs: DataDirectories,
}

impl Options {
    /// Build options from a start-up config. Directory checks are returned so
    /// the caller can surface them; a failed check is not an error.
    pub fn from_config(
        config: &OptionsConfig,
        probe: &dyn DirectoryProbe,
    ) -> ParamsResult<(Self, Vec<DirStatus>)> {
        let mut options = Options::default();
        let p = &mut options.parameters;

        let min = config.energy_min.unwrap_or(p.energy_min());
        let max = config.energy_max.unwrap_or(p.energy_max());
        let step = config.energy_step.unwrap_or(p.energy_step());
        p.set_energy_window(min, max, step);

        if let Some(n) = config.exciton_count {
            p.set_exciton_count(n);
        }
        if let Some(i) = config.min_bright_intensity {
            p.set_min_bright_intensity(i);
        }

        if let Some(path) = &config.q_path {
            let points = path
                .points
                .iter()
                .map(|pt| HighSymmetryPoint::new(pt.coords, pt.label.clone()))
                .collect();
            options.q_path = MomentumPath::new(points, path.intervals.clone())?;
        }

        let mut statuses = Vec::new();
        if let Some(dir) = &config.save_dir {
            statuses.push(options.dirs.set_save_dir(probe, dir));
        }
        if let Some(dir) = &config.diago_dir {
            statuses.push(options.dirs.set_diago_dir(probe, dir));
        }
        if let Some(dir) = &config.qp_dir {
            statuses.push(options.dirs.set_qp_dir(probe, dir));
        }

        Ok((options, statuses))
    }
}
