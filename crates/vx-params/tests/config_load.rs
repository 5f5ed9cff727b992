use std::path::PathBuf;

use vx_params::{DirKind, FsProbe, Options, OptionsConfig};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("{prefix}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn config_file_sets_parameters_and_probes_directories() {
    let root = unique_temp_dir("vx_params_config");
    let save = root.join("SAVE");
    let diago = root.join("bse");
    std::fs::create_dir_all(&save).unwrap();
    std::fs::create_dir_all(&diago).unwrap();
    std::fs::write(save.join("ns.db1"), b"").unwrap();
    for q in 1..=4 {
        std::fs::write(diago.join(format!("ndb.BS_diago_Q{q}")), b"").unwrap();
    }

    let yaml = format!(
        "energy_min: 1.5\nenergy_max: 6.0\nenergy_step: 0.05\nmin_bright_intensity: 0.3\nsave_dir: {}\ndiago_dir: {}\nqp_dir: {}\n",
        save.display(),
        diago.display(),
        root.join("missing").display()
    );
    let cfg_path = root.join("visual-excitons.yaml");
    std::fs::write(&cfg_path, yaml).unwrap();

    let cfg = OptionsConfig::load(&cfg_path).unwrap();
    let (options, statuses) = Options::from_config(&cfg, &FsProbe).unwrap();

    assert_eq!(options.parameters.energy_min(), 1.5);
    assert_eq!(options.parameters.energy_max(), 6.0);
    assert_eq!(options.parameters.energy_step(), 0.05);
    assert_eq!(options.parameters.min_bright_intensity(), 0.3);
    assert_eq!(options.dirs.n_qpoints(), 4);
    assert_eq!(options.dirs.job_string(), Some("bse"));

    assert_eq!(statuses.len(), 3);
    assert!(statuses[0].valid && statuses[0].kind == DirKind::Save);
    assert!(statuses[1].valid);
    assert!(!statuses[2].valid);
    assert!(options.dirs.qp_dir().is_none());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn out_of_range_config_values_are_clamped() {
    let cfg = OptionsConfig::from_yaml_str("energy_step: -3.0\nexciton_count: 0\nmin_bright_intensity: 4.0\n").unwrap();
    let (options, statuses) = Options::from_config(&cfg, &FsProbe).unwrap();
    assert!(statuses.is_empty());
    assert_eq!(options.parameters.energy_step(), 0.001);
    assert_eq!(options.parameters.exciton_count(), 1);
    assert_eq!(options.parameters.min_bright_intensity(), 1.0);
    assert!(options.parameters.is_consistent());
}

#[test]
fn missing_config_file_reports_path() {
    let err = OptionsConfig::load(std::path::Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}
