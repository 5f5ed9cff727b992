//! Data returned by the external computations.

use nalgebra::{Matrix3, Vector3};
use vx_core::{QIndex, Real};
use vx_params::MomentumPath;

use crate::BackendResult;

/// Exciton energies at the momentum points that have a diagonalization
/// database.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionData {
    /// Cartesian coordinates of each momentum point.
    pub q_points_cartesian: Vec<Vector3<Real>>,
    /// `energies[point][exciton]`, lowest exciton first.
    pub energies: Vec<Vec<Real>>,
    /// Momentum-transfer index of each point.
    pub q_indices: Vec<QIndex>,
    /// Rows are the reciprocal lattice vectors.
    pub reciprocal_lattice: Matrix3<Real>,
}

impl DispersionData {
    pub fn n_points(&self) -> usize {
        self.q_indices.len()
    }

    /// Number of exciton bands (the shortest per-point energy list).
    pub fn n_bands(&self) -> usize {
        self.energies.iter().map(Vec::len).min().unwrap_or(0)
    }
}

/// Dispersion evaluated densely along the path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpolatedDispersion {
    /// Cumulative path distance of each sample.
    pub x: Vec<Real>,
    /// `bands[band][sample]`.
    pub bands: Vec<Vec<Real>>,
}

/// Parameters of one absorption-spectrum computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumRequest {
    pub q: QIndex,
    pub energy_min: Real,
    pub energy_max: Real,
    pub energy_step: Real,
    pub min_bright_intensity: Real,
}

/// One exciton state of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitonLine {
    pub energy: Real,
    /// Relative oscillator strength in `[0, 1]`.
    pub intensity: Real,
    /// 1-based exciton number.
    pub ordinal: usize,
}

/// Absorption (imaginary dielectric function) on an energy grid plus every
/// exciton up to the top of the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbsorptionSpectrum {
    pub energies: Vec<Real>,
    pub absorption: Vec<Real>,
    pub excitons: Vec<ExcitonLine>,
}

/// Exciton band structure, band-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandStructure {
    pub k_distances: Vec<Real>,
    pub bands: Vec<Vec<Real>>,
    pub weights: Vec<Vec<Real>>,
}

impl BandStructure {
    pub fn is_empty(&self) -> bool {
        self.k_distances.is_empty()
    }
}

/// The external computation collaborator.
///
/// Every call is synchronous; errors are returned to the orchestrator unchanged.
pub trait ExcitonBackend {
    fn compute_dispersion(
        &self,
        path: &MomentumPath,
        exciton_count: usize,
    ) -> BackendResult<DispersionData>;

    /// Only requested when more than one momentum point is available.
    fn interpolate_dispersion(
        &self,
        path: &MomentumPath,
        data: &DispersionData,
    ) -> BackendResult<InterpolatedDispersion>;

    fn absorption_spectrum(&self, request: &SpectrumRequest) -> BackendResult<AbsorptionSpectrum>;

    /// Defined at the zone centre only; the caller checks that.
    fn exciton_band_structure(
        &self,
        exciton_ordinals: &[usize],
        path: &MomentumPath,
    ) -> BackendResult<BandStructure>;
}

impl<B: ExcitonBackend + ?Sized> ExcitonBackend for &B {
    fn compute_dispersion(
        &self,
        path: &MomentumPath,
        exciton_count: usize,
    ) -> BackendResult<DispersionData> {
        (**self).compute_dispersion(path, exciton_count)
    }

    fn interpolate_dispersion(
        &self,
        path: &MomentumPath,
        data: &DispersionData,
    ) -> BackendResult<InterpolatedDispersion> {
        (**self).interpolate_dispersion(path, data)
    }

    fn absorption_spectrum(&self, request: &SpectrumRequest) -> BackendResult<AbsorptionSpectrum> {
        (**self).absorption_spectrum(request)
    }

    fn exciton_band_structure(
        &self,
        exciton_ordinals: &[usize],
        path: &MomentumPath,
    ) -> BackendResult<BandStructure> {
        (**self).exciton_band_structure(exciton_ordinals, path)
    }
}
