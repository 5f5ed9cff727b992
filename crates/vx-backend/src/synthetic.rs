//! Deterministic model backend.
//!
//! Parabolic exciton bands over a hexagonal lattice with Lorentzian
//! absorption lines. Results depend only on the inputs, so repeated calls are
//! bit-identical.
//!
//! The virtual databases cover a fixed set of momentum points chosen at
//! construction. The path passed to the dispersion only shapes the
//! interpolated curve and the band structure.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};
use vx_core::{QIndex, Real};
use vx_params::MomentumPath;
use vx_params::dirs::diago_file_name;
use vx_params::qpath::{cumulative_distances, reduced_to_cartesian};

use crate::contract::{
    AbsorptionSpectrum, BandStructure, DispersionData, ExcitonBackend, ExcitonLine,
    InterpolatedDispersion, SpectrumRequest,
};
use crate::{BackendError, BackendResult};

/// Excitons reported per spectrum before the energy cut.
const SPECTRUM_EXCITONS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBackend {
    /// Lowest exciton energy at Γ (eV).
    pub gap: Real,
    /// Spacing between consecutive exciton levels (eV).
    pub level_spacing: Real,
    /// Curvature of the exciton bands (eV · Å²).
    pub curvature: Real,
    /// Lorentzian half width of each absorption line (eV).
    pub broadening: Real,
    /// Simulate a SAVE database whose lattice cannot be classified.
    pub undetectable_lattice: bool,
    lattice: Matrix3<Real>,
    /// Reduced momentum of each virtual diagonalization database.
    q_points: Vec<Vector3<Real>>,
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self::new(12)
    }
}

impl SyntheticBackend {
    pub fn new(n_qpoints: usize) -> Self {
        Self {
            gap: 5.0,
            level_spacing: 0.35,
            curvature: 0.8,
            broadening: 0.1,
            undetectable_lattice: false,
            lattice: hexagonal_reciprocal_lattice(2.5, 6.0),
            q_points: sample_path(&MomentumPath::default(), n_qpoints),
        }
    }

    /// Momentum points with a (virtual) diagonalization database.
    pub fn n_qpoints(&self) -> usize {
        self.q_points.len()
    }

    pub fn with_undetectable_lattice(mut self) -> Self {
        self.undetectable_lattice = true;
        self
    }

    pub fn reciprocal_lattice(&self) -> Matrix3<Real> {
        self.lattice
    }

    fn band_energy(&self, ordinal: usize, q_car: &Vector3<Real>) -> Real {
        let n = ordinal.saturating_sub(1) as Real;
        let mass_scale = 1.0 / (1.0 + 0.25 * n);
        self.gap + self.level_spacing * n + self.curvature * mass_scale * q_car.norm_squared()
    }

    /// Relative oscillator strength: odd excitons are bright, even ones dark.
    fn intensity(ordinal: usize, q: QIndex) -> Real {
        let n = ordinal.saturating_sub(1) as Real;
        let damping = 1.0 / (1.0 + 0.15 * q.index() as Real);
        if ordinal % 2 == 1 {
            (-0.3 * n).exp() * damping
        } else {
            0.03 * (-0.1 * n).exp() * damping
        }
    }

    fn q_cartesian(&self, q: QIndex) -> BackendResult<Vector3<Real>> {
        self.q_points
            .get(q.as_usize())
            .map(|k| self.lattice.transpose() * k)
            .ok_or_else(|| BackendError::MissingDatabase {
                name: diago_file_name(q),
            })
    }
}

impl ExcitonBackend for SyntheticBackend {
    fn compute_dispersion(
        &self,
        _path: &MomentumPath,
        exciton_count: usize,
    ) -> BackendResult<DispersionData> {
        if self.undetectable_lattice {
            return Err(BackendError::UndetectableLattice {
                what: "lattice vectors match no Bravais type".to_string(),
            });
        }
        if self.q_points.is_empty() {
            return Err(BackendError::MissingDatabase {
                name: diago_file_name(QIndex::from_index(0)),
            });
        }

        let reduced = &self.q_points;
        let q_points_cartesian = reduced_to_cartesian(reduced, &self.lattice);
        let energies = q_points_cartesian
            .iter()
            .map(|q| {
                (1..=exciton_count)
                    .map(|n| self.band_energy(n, q))
                    .collect()
            })
            .collect();
        let q_indices = (0..reduced.len())
            .map(|i| QIndex::try_from_usize(i).ok_or_else(|| too_many_points(i)))
            .collect::<BackendResult<Vec<_>>>()?;

        tracing::debug!(points = reduced.len(), exciton_count, "synthetic dispersion");

        Ok(DispersionData {
            q_points_cartesian,
            energies,
            q_indices,
            reciprocal_lattice: self.lattice,
        })
    }

    fn interpolate_dispersion(
        &self,
        path: &MomentumPath,
        data: &DispersionData,
    ) -> BackendResult<InterpolatedDispersion> {
        let cartesian = reduced_to_cartesian(&path.k_list(), &self.lattice);
        let x = cumulative_distances(&cartesian);
        let bands = (1..=data.n_bands())
            .map(|n| cartesian.iter().map(|q| self.band_energy(n, q)).collect())
            .collect();
        Ok(InterpolatedDispersion { x, bands })
    }

    fn absorption_spectrum(&self, request: &SpectrumRequest) -> BackendResult<AbsorptionSpectrum> {
        if !(request.energy_step > 0.0) || request.energy_max <= request.energy_min {
            return Err(BackendError::InvalidRequest {
                what: format!(
                    "energy window [{}, {}] with step {}",
                    request.energy_min, request.energy_max, request.energy_step
                ),
            });
        }
        let q_car = self.q_cartesian(request.q)?;

        let excitons: Vec<ExcitonLine> = (1..=SPECTRUM_EXCITONS)
            .map(|ordinal| ExcitonLine {
                energy: self.band_energy(ordinal, &q_car),
                intensity: Self::intensity(ordinal, request.q),
                ordinal,
            })
            .filter(|line| line.energy <= request.energy_max)
            .collect();

        let n = ((request.energy_max - request.energy_min) / request.energy_step).floor() as usize + 1;
        let energies: Vec<Real> = (0..n)
            .map(|i| request.energy_min + i as Real * request.energy_step)
            .collect();
        let gamma2 = self.broadening * self.broadening;
        let absorption = energies
            .iter()
            .map(|e| {
                excitons
                    .iter()
                    .map(|x| x.intensity * gamma2 / ((e - x.energy).powi(2) + gamma2))
                    .sum()
            })
            .collect();

        Ok(AbsorptionSpectrum {
            energies,
            absorption,
            excitons,
        })
    }

    fn exciton_band_structure(
        &self,
        exciton_ordinals: &[usize],
        path: &MomentumPath,
    ) -> BackendResult<BandStructure> {
        let cartesian = reduced_to_cartesian(&path.k_list(), &self.lattice);
        let k_distances = cumulative_distances(&cartesian);
        let bands = exciton_ordinals
            .iter()
            .map(|&n| {
                cartesian
                    .iter()
                    .map(|k| self.gap + self.level_spacing * n.saturating_sub(1) as Real + 0.3 * k.norm())
                    .collect()
            })
            .collect();
        let weights = exciton_ordinals
            .iter()
            .map(|&n| {
                k_distances
                    .iter()
                    .map(|d| 0.05 * (1.0 + (d * n as Real).cos()) / 2.0)
                    .collect()
            })
            .collect();

        Ok(BandStructure {
            k_distances,
            bands,
            weights,
        })
    }
}

/// `n` points spread evenly over the sampled path, both ends included.
fn sample_path(path: &MomentumPath, n: usize) -> Vec<Vector3<Real>> {
    let k_list = path.k_list();
    if n <= 1 || k_list.len() <= 1 {
        return vec![Vector3::zeros(); n.min(1)];
    }
    let last = k_list.len() - 1;
    (0..n).map(|i| k_list[i * last / (n - 1)]).collect()
}

fn too_many_points(i: usize) -> BackendError {
    BackendError::InvalidRequest {
        what: format!("momentum point {i} exceeds index range"),
    }
}

/// Reciprocal vectors (rows) of a hexagonal lattice with in-plane constant `a`
/// and out-of-plane constant `c`.
pub fn hexagonal_reciprocal_lattice(a: Real, c: Real) -> Matrix3<Real> {
    let s3 = 3.0_f64.sqrt();
    let k = 2.0 * PI / a;
    Matrix3::new(
        k, k / s3, 0.0, //
        0.0, 2.0 * k / s3, 0.0, //
        0.0, 0.0, 2.0 * PI / c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(q: u32) -> SpectrumRequest {
        SpectrumRequest {
            q: QIndex::from_index(q),
            energy_min: 4.0,
            energy_max: 9.0,
            energy_step: 0.05,
            min_bright_intensity: 0.1,
        }
    }

    #[test]
    fn dispersion_has_one_entry_per_qpoint() {
        let backend = SyntheticBackend::new(5);
        let data = backend.compute_dispersion(&MomentumPath::default(), 3).unwrap();
        assert_eq!(data.n_points(), 5);
        assert_eq!(data.n_bands(), 3);
        assert_eq!(data.q_points_cartesian[0], Vector3::zeros());
        assert!(data.energies[0][0] < data.energies[0][1]);
    }

    #[test]
    fn spectrum_is_deterministic() {
        let backend = SyntheticBackend::default();
        let a = backend.absorption_spectrum(&request(2)).unwrap();
        let b = backend.absorption_spectrum(&request(2)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.energies.len(), a.absorption.len());
        assert_eq!(a.energies.len(), 101);
        assert!(a.excitons.iter().all(|x| x.energy <= 9.0));
    }

    #[test]
    fn missing_database_is_reported() {
        let backend = SyntheticBackend::new(2);
        let err = backend.absorption_spectrum(&request(5)).unwrap_err();
        assert_eq!(
            err,
            BackendError::MissingDatabase {
                name: "ndb.BS_diago_Q6".to_string()
            }
        );
    }

    #[test]
    fn undetectable_lattice_fails_dispersion() {
        let backend = SyntheticBackend::default().with_undetectable_lattice();
        let err = backend
            .compute_dispersion(&MomentumPath::default(), 2)
            .unwrap_err();
        assert!(matches!(err, BackendError::UndetectableLattice { .. }));
    }

    #[test]
    fn spectrum_follows_the_databases_not_the_path() {
        let backend = SyntheticBackend::new(6);
        let mut path = MomentumPath::default();
        path.update_point_value(1, 1, 0.25).unwrap();
        let data = backend.compute_dispersion(&path, 1).unwrap();

        for q in 0..6 {
            let spectrum = backend
                .absorption_spectrum(&SpectrumRequest {
                    energy_max: 20.0,
                    ..request(q)
                })
                .unwrap();
            assert_eq!(spectrum.excitons[0].energy, data.energies[q as usize][0]);
        }
    }

    #[test]
    fn band_structure_is_band_major() {
        let backend = SyntheticBackend::default();
        let path = MomentumPath::default();
        let bs = backend.exciton_band_structure(&[1, 3], &path).unwrap();
        assert_eq!(bs.bands.len(), 2);
        assert_eq!(bs.weights.len(), 2);
        assert_eq!(bs.bands[0].len(), bs.k_distances.len());
    }
}
