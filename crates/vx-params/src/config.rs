//! Start-up configuration.
//!
//! Every field is optional; missing fields keep the built-in defaults. Loaded
//! values go through the same clamping setters as interactive edits.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vx_core::Real;

use crate::{ParamsError, ParamsResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    pub energy_min: Option<Real>,
    pub energy_max: Option<Real>,
    pub energy_step: Option<Real>,
    pub exciton_count: Option<i64>,
    pub min_bright_intensity: Option<Real>,
    pub q_path: Option<QPathConfig>,
    pub save_dir: Option<PathBuf>,
    pub diago_dir: Option<PathBuf>,
    pub qp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QPathConfig {
    pub points: Vec<PathPointConfig>,
    #[serde(default)]
    pub intervals: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPointConfig {
    pub coords: [Real; 3],
    pub label: String,
}

impl OptionsConfig {
    pub fn from_yaml_str(content: &str) -> ParamsResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> ParamsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamsError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }
}
