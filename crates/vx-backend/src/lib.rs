//! vx-backend: contracts for the external exciton computations.
//!
//! The physics (lattice loading, BSE diagonalization, spectra, band
//! interpolation) lives outside this workspace. This crate fixes the shape of
//! what those computations return and ships a deterministic synthetic model
//! implementing the same contract.

pub mod contract;
pub mod synthetic;

pub use contract::{
    AbsorptionSpectrum, BandStructure, DispersionData, ExcitonBackend, ExcitonLine,
    InterpolatedDispersion, SpectrumRequest,
};
pub use synthetic::SyntheticBackend;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The lattice type could not be determined from the SAVE database.
    #[error("Undetectable lattice type: {what}")]
    UndetectableLattice { what: String },

    #[error("Database not available: {name}")]
    MissingDatabase { name: String },

    #[error("Invalid request: {what}")]
    InvalidRequest { what: String },

    #[error("Computation failed: {message}")]
    Computation { message: String },
}
