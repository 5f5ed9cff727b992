use thiserror::Error;

pub type VxResult<T> = Result<T, VxError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VxError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

/// Bounds-check helper used wherever an external index addresses a slice.
pub fn check_index(what: &'static str, index: usize, len: usize) -> VxResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(VxError::IndexOob { what, index, len })
    }
}
