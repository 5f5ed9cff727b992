//! Error types for the vx-app layer.

/// Application error wrapping the errors of the lower crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No exciton dispersion has been computed")]
    NoDispersion,

    #[error("Invalid selection: {what}")]
    InvalidSelection { what: String },

    #[error("Parameter error: {0}")]
    Params(#[from] vx_params::ParamsError),

    #[error("Backend error: {0}")]
    Backend(#[from] vx_backend::BackendError),

    #[error("Style error: {0}")]
    Style(#[from] vx_style::StyleError),

    #[error(transparent)]
    Core(#[from] vx_core::VxError),
}

/// Result type for vx-app operations.
pub type AppResult<T> = Result<T, AppError>;
