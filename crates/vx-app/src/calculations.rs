//! Orchestration of backend calls and the absorption curve cache.
//!
//! Every operation takes the current [`Options`], the backend and an `emit`
//! callback. Notifications are emitted synchronously in the order the
//! renderers expect. A failed backend call returns before any state changes.

use std::rc::Rc;

use vx_backend::{
    BackendError, BandStructure, DispersionData, ExcitonBackend, InterpolatedDispersion,
    SpectrumRequest,
};
use vx_core::{QIndex, Real, Tolerances, check_index, finite_range};
use vx_params::Options;
use vx_params::qpath::cumulative_distances;
use vx_style::GraphKind;

use crate::curves::{CurveCache, CurveRecord, PointTag};
use crate::error::{AppError, AppResult};
use crate::notify::Notification;

/// Largest weight factor accepted.
pub const MAX_WEIGHT_FACTOR: Real = 1000.0;

/// Plot-ready exciton dispersion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispersionPlot {
    /// `points[band][i] = (distance, energy)`.
    pub points: Vec<Vec<(Real, Real)>>,
    /// Tags parallel to `points`.
    pub tags: Vec<Vec<PointTag>>,
    /// Empty when only one momentum point is available.
    pub interpolated: InterpolatedDispersion,
}

#[derive(Debug, Clone)]
struct DispersionState {
    data: DispersionData,
    plot: Rc<DispersionPlot>,
}

#[derive(Debug, Clone)]
pub struct Calculations {
    dispersion: Option<DispersionState>,
    cache: CurveCache,
    show_labels: bool,
    band_structure: BandStructure,
    weight_factor: Real,
}

impl Default for Calculations {
    fn default() -> Self {
        Self {
            dispersion: None,
            cache: CurveCache::default(),
            show_labels: false,
            band_structure: BandStructure::default(),
            weight_factor: 1.0,
        }
    }
}

impl Calculations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curves(&self) -> &CurveCache {
        &self.cache
    }

    pub fn dispersion(&self) -> Option<&DispersionData> {
        self.dispersion.as_ref().map(|d| &d.data)
    }

    pub fn dispersion_plot(&self) -> Option<Rc<DispersionPlot>> {
        self.dispersion.as_ref().map(|d| Rc::clone(&d.plot))
    }

    pub fn band_structure(&self) -> &BandStructure {
        &self.band_structure
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn weight_factor(&self) -> Real {
        self.weight_factor
    }

    /// Position of the curve for `q` in the cache.
    pub fn curve_index(&self, q: QIndex) -> Option<usize> {
        self.cache.position(q)
    }

    /// Cached curve a plotted point refers to, with its position.
    pub fn resolve_tag(&self, tag: PointTag) -> Option<(usize, &CurveRecord)> {
        let q = *self.dispersion.as_ref()?.data.q_indices.get(tag.source_index)?;
        let position = self.cache.position(q)?;
        self.cache.get(position).map(|c| (position, c))
    }

    // ------------------------------------------------------------------
    // Dispersion
    // ------------------------------------------------------------------

    /// Compute the dispersion along the current path and reset every
    /// dependent view.
    pub fn compute_dispersion(
        &mut self,
        options: &Options,
        backend: &dyn ExcitonBackend,
        emit: &mut dyn FnMut(Notification),
    ) -> AppResult<()> {
        let exciton_count = options.parameters.exciton_count();
        let data = match backend.compute_dispersion(&options.q_path, exciton_count) {
            Ok(data) => data,
            Err(BackendError::UndetectableLattice { what }) => {
                tracing::warn!(%what, "lattice type undetectable, clearing selection");
                self.reset(emit);
                emit(Notification::Advisory(format!(
                    "Undetectable lattice type: {what}"
                )));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let interpolated = if data.n_points() > 1 {
            backend.interpolate_dispersion(&options.q_path, &data)?
        } else {
            InterpolatedDispersion::default()
        };

        let x = cumulative_distances(&data.q_points_cartesian);
        let n_bands = data.n_bands();
        let points: Vec<Vec<(Real, Real)>> = (0..n_bands)
            .map(|band| {
                x.iter()
                    .zip(&data.energies)
                    .map(|(xi, e)| (*xi, e[band]))
                    .collect()
            })
            .collect();
        let tags = (0..n_bands)
            .map(|band| (0..x.len()).map(|i| PointTag::new(i, band + 1)).collect())
            .collect();

        let x_range = finite_range(x.iter().copied()).unwrap_or((0.0, 0.0));
        let y_range = finite_range(
            data.energies
                .iter()
                .flat_map(|e| e.iter().take(n_bands).copied()),
        )
        .unwrap_or((0.0, 0.0));

        let (distances, labels) = options
            .q_path
            .ticks(&data.reciprocal_lattice)
            .into_iter()
            .unzip();

        tracing::info!(
            points = data.n_points(),
            bands = n_bands,
            interpolated = !interpolated.x.is_empty(),
            "exciton dispersion ready"
        );

        let plot = Rc::new(DispersionPlot {
            points,
            tags,
            interpolated,
        });
        self.dispersion = Some(DispersionState {
            data,
            plot: Rc::clone(&plot),
        });
        self.cache.clear();
        self.band_structure = BandStructure::default();

        emit(Notification::QPathReady { distances, labels });
        emit(Notification::DispersionRange {
            x: x_range,
            y: y_range,
        });
        emit(Notification::CurveCountChanged {
            graph: GraphKind::Dispersion,
            n: n_bands,
        });
        emit(Notification::DispersionInit);
        emit(Notification::DispersionReady(plot));
        emit(Notification::BandStructureClear);
        emit(Notification::AbsorptionClear);
        Ok(())
    }

    /// Back to "no selection": no dispersion, no curves, no band structure.
    fn reset(&mut self, emit: &mut dyn FnMut(Notification)) {
        self.dispersion = None;
        self.cache.clear();
        self.band_structure = BandStructure::default();

        emit(Notification::CurveCountChanged {
            graph: GraphKind::Dispersion,
            n: 0,
        });
        emit(Notification::BandStructureClear);
        emit(Notification::AbsorptionClear);
    }

    // ------------------------------------------------------------------
    // Absorption curves
    // ------------------------------------------------------------------

    fn compute_curve(
        options: &Options,
        backend: &dyn ExcitonBackend,
        q: QIndex,
        source_index: usize,
        fixed: bool,
    ) -> AppResult<CurveRecord> {
        let p = &options.parameters;
        let request = SpectrumRequest {
            q,
            energy_min: p.energy_min(),
            energy_max: p.energy_max(),
            energy_step: p.energy_step(),
            min_bright_intensity: p.min_bright_intensity(),
        };
        let spectrum = backend.absorption_spectrum(&request)?;
        Ok(CurveRecord::from_spectrum(
            q,
            source_index,
            spectrum,
            p.min_bright_intensity(),
            fixed,
        ))
    }

    /// Select the dispersion point at `index`.
    ///
    /// A new point gets a curve (fixed when `toggle`). With `toggle`, an
    /// existing unfixed curve becomes fixed and a fixed one is removed. Every
    /// other unfixed curve is then evicted.
    pub fn select_momentum_point(
        &mut self,
        options: &Options,
        backend: &dyn ExcitonBackend,
        index: usize,
        toggle: bool,
        emit: &mut dyn FnMut(Notification),
    ) -> AppResult<()> {
        let dispersion = self.dispersion.as_ref().ok_or(AppError::NoDispersion)?;
        let q_indices = &dispersion.data.q_indices;
        let q = q_indices[check_index("dispersion point", index, q_indices.len())?];

        match self.cache.position(q) {
            None => {
                let record = Self::compute_curve(options, backend, q, index, toggle)?;
                self.cache.push(record);
                tracing::debug!(%q, fixed = toggle, "absorption curve appended");
                emit(Notification::CurveAppended { q });
            }
            Some(position) if toggle => {
                let fixed = self.cache.get(position).is_some_and(|c| c.fixed);
                if fixed {
                    self.cache.remove(position);
                    tracing::debug!(%q, position, "fixed curve released");
                    emit(Notification::CurveRemoved { position });
                } else {
                    self.cache.set_fixed(position, true);
                    tracing::debug!(%q, position, "curve fixed");
                }
            }
            Some(_) => {}
        }

        for position in self.cache.evict_unfixed_except(q) {
            tracing::debug!(position, "unfixed curve evicted");
            emit(Notification::CurveRemoved { position });
        }

        self.emit_absorption(emit);
        Ok(())
    }

    /// Recompute every cached curve with the current parameters, keeping
    /// order and fixed flags. On failure nothing changes.
    pub fn recompute_all(
        &mut self,
        options: &Options,
        backend: &dyn ExcitonBackend,
        emit: &mut dyn FnMut(Notification),
    ) -> AppResult<()> {
        let fresh = self
            .cache
            .iter()
            .map(|c| Self::compute_curve(options, backend, c.q, c.source_index, c.fixed))
            .collect::<AppResult<Vec<_>>>()?;
        tracing::info!(curves = fresh.len(), "absorption curves recomputed");
        self.cache.replace_all(fresh);
        self.emit_absorption(emit);
        Ok(())
    }

    pub fn toggle_labels(&mut self, visible: bool, emit: &mut dyn FnMut(Notification)) {
        self.show_labels = visible;
        self.emit_absorption(emit);
    }

    fn emit_absorption(&self, emit: &mut dyn FnMut(Notification)) {
        emit(Notification::AbsorptionReady {
            curves: self.cache.as_slice().to_vec(),
            show_labels: self.show_labels,
        });
    }

    // ------------------------------------------------------------------
    // Band structure
    // ------------------------------------------------------------------

    /// Band structure of the excitons in `tags`. Only defined when the first
    /// tag's momentum point is the zone centre; elsewhere it is emptied.
    pub fn compute_band_structure(
        &mut self,
        options: &Options,
        backend: &dyn ExcitonBackend,
        tags: &[PointTag],
        emit: &mut dyn FnMut(Notification),
    ) -> AppResult<()> {
        let dispersion = self.dispersion.as_ref().ok_or(AppError::NoDispersion)?;
        let tol = Tolerances::default();
        let at_gamma = tags
            .first()
            .and_then(|t| dispersion.data.q_points_cartesian.get(t.source_index))
            .is_some_and(|q| q.norm() <= tol.abs);

        let band_structure = if at_gamma {
            let ordinals: Vec<usize> = tags.iter().map(|t| t.exciton_ordinal).collect();
            backend.exciton_band_structure(&ordinals, &options.q_path)?
        } else {
            BandStructure::default()
        };
        tracing::debug!(at_gamma, bands = band_structure.bands.len(), "band structure");
        self.band_structure = band_structure;

        emit(Notification::CurveCountChanged {
            graph: GraphKind::BandStructure,
            n: self.band_structure.bands.len(),
        });
        emit(Notification::BandStructureInit);
        self.emit_band_structure(emit);
        Ok(())
    }

    /// Scale the band weights. Non-finite factors are ignored; the factor is
    /// clamped to `[0, MAX_WEIGHT_FACTOR]`.
    pub fn set_weight_factor(&mut self, factor: Real, emit: &mut dyn FnMut(Notification)) {
        if !factor.is_finite() {
            return;
        }
        self.weight_factor = factor.clamp(0.0, MAX_WEIGHT_FACTOR);
        if !self.band_structure.is_empty() {
            self.emit_band_structure(emit);
        }
    }

    fn emit_band_structure(&self, emit: &mut dyn FnMut(Notification)) {
        let weights = self
            .band_structure
            .weights
            .iter()
            .map(|w| w.iter().map(|v| v * self.weight_factor).collect())
            .collect();
        emit(Notification::BandStructureReady {
            k: self.band_structure.k_distances.clone(),
            bands: self.band_structure.bands.clone(),
            weights,
        });
    }

    /// Re-emit the current data of `graph`, the redraw path after a style
    /// edit.
    pub fn emit_current(&self, graph: GraphKind, emit: &mut dyn FnMut(Notification)) {
        match graph {
            GraphKind::Dispersion => {
                if let Some(plot) = self.dispersion_plot() {
                    emit(Notification::DispersionReady(plot));
                }
            }
            GraphKind::Absorption => self.emit_absorption(emit),
            GraphKind::BandStructure => self.emit_band_structure(emit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vx_backend::SyntheticBackend;
    use vx_core::Topic;

    use crate::notify::NotificationKind as K;

    fn run<T>(f: impl FnOnce(&mut dyn FnMut(Notification)) -> T) -> (T, Vec<Notification>) {
        let mut out = Vec::new();
        let r = f(&mut |n: Notification| out.push(n));
        (r, out)
    }

    fn kinds(ns: &[Notification]) -> Vec<K> {
        ns.iter().map(Topic::kind).collect()
    }

    #[test]
    fn dispersion_emission_order() {
        let options = Options::default();
        let backend = SyntheticBackend::new(4);
        let mut calc = Calculations::new();

        let (r, out) = run(|e| calc.compute_dispersion(&options, &backend, e));
        r.unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                K::QPathReady,
                K::DispersionRange,
                K::CurveCountChanged,
                K::DispersionInit,
                K::DispersionReady,
                K::BandStructureClear,
                K::AbsorptionClear,
            ]
        );
        assert_eq!(
            out[2],
            Notification::CurveCountChanged {
                graph: GraphKind::Dispersion,
                n: 6
            }
        );
        let plot = calc.dispersion_plot().unwrap();
        assert_eq!(plot.points.len(), 6);
        assert_eq!(plot.points[0].len(), 4);
        assert_eq!(plot.tags[2][3], PointTag::new(3, 3));
        assert!(!plot.interpolated.x.is_empty());
    }

    #[test]
    fn single_qpoint_skips_interpolation() {
        let options = Options::default();
        let backend = SyntheticBackend::new(1);
        let mut calc = Calculations::new();
        run(|e| calc.compute_dispersion(&options, &backend, e))
            .0
            .unwrap();
        let plot = calc.dispersion_plot().unwrap();
        assert!(plot.interpolated.x.is_empty());
        assert_eq!(plot.points.len(), 6);
    }

    #[test]
    fn undetectable_lattice_resets_with_advisory() {
        let options = Options::default();
        let good = SyntheticBackend::new(4);
        let bad = SyntheticBackend::new(4).with_undetectable_lattice();
        let mut calc = Calculations::new();
        run(|e| calc.compute_dispersion(&options, &good, e)).0.unwrap();
        run(|e| calc.select_momentum_point(&options, &good, 1, false, e))
            .0
            .unwrap();

        let (r, out) = run(|e| calc.compute_dispersion(&options, &bad, e));
        assert!(r.is_ok());
        assert!(calc.dispersion().is_none());
        assert!(calc.curves().is_empty());
        assert!(matches!(out.last(), Some(Notification::Advisory(_))));
    }

    #[test]
    fn selection_requires_dispersion() {
        let options = Options::default();
        let backend = SyntheticBackend::default();
        let mut calc = Calculations::new();
        let (r, out) = run(|e| calc.select_momentum_point(&options, &backend, 0, false, e));
        assert!(matches!(r, Err(AppError::NoDispersion)));
        assert!(out.is_empty());
    }

    #[test]
    fn band_structure_only_at_gamma() {
        let options = Options::default();
        let backend = SyntheticBackend::new(4);
        let mut calc = Calculations::new();
        run(|e| calc.compute_dispersion(&options, &backend, e)).0.unwrap();

        let tags = [PointTag::new(0, 1), PointTag::new(0, 2)];
        let (r, out) = run(|e| calc.compute_band_structure(&options, &backend, &tags, e));
        r.unwrap();
        assert_eq!(calc.band_structure().bands.len(), 2);
        assert_eq!(
            kinds(&out),
            vec![K::CurveCountChanged, K::BandStructureInit, K::BandStructureReady]
        );

        let off = [PointTag::new(2, 1)];
        run(|e| calc.compute_band_structure(&options, &backend, &off, e))
            .0
            .unwrap();
        assert!(calc.band_structure().is_empty());
    }

    #[test]
    fn weight_factor_scales_weights() {
        let options = Options::default();
        let backend = SyntheticBackend::new(4);
        let mut calc = Calculations::new();
        run(|e| calc.compute_dispersion(&options, &backend, e)).0.unwrap();
        run(|e| calc.compute_band_structure(&options, &backend, &[PointTag::new(0, 1)], e))
            .0
            .unwrap();

        let (_, out) = run(|e| calc.set_weight_factor(2.0, e));
        let Some(Notification::BandStructureReady { weights, .. }) = out.first() else {
            panic!("expected band structure, got {out:?}");
        };
        assert_eq!(weights[0][3], calc.band_structure().weights[0][3] * 2.0);

        let (_, out) = run(|e| calc.set_weight_factor(Real::NAN, e));
        assert!(out.is_empty());
        assert_eq!(calc.weight_factor(), 2.0);
    }

    #[test]
    fn weight_factor_without_band_structure_is_silent() {
        let mut calc = Calculations::new();
        let (_, out) = run(|e| calc.set_weight_factor(3.0, e));
        assert!(out.is_empty());
        assert_eq!(calc.weight_factor(), 3.0);
    }
}
