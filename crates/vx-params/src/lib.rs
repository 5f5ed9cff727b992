//! vx-params: computation parameters, momentum path and input directories.
//!
//! The parameter store never fails on out-of-range input: every setter clamps
//! its argument so that the energy window stays consistent. Nothing here emits
//! notifications; callers decide when an edit counts as "parameters changed".

pub mod config;
pub mod dirs;
pub mod options;
pub mod parameters;
pub mod qpath;

pub use config::{OptionsConfig, PathPointConfig, QPathConfig};
pub use dirs::{DataDirectories, DirKind, DirStatus, DirectoryProbe, FsProbe};
pub use options::Options;
pub use parameters::ParameterSet;
pub use qpath::{HighSymmetryPoint, MomentumPath};

pub type ParamsResult<T> = Result<T, ParamsError>;

#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error("Invalid momentum path: {what}")]
    InvalidPath { what: String },

    #[error(transparent)]
    Core(#[from] vx_core::VxError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
