//! Absorption curves for the selected momentum points.

use vx_backend::{AbsorptionSpectrum, ExcitonLine};
use vx_core::{QIndex, Real, interp_linear};

/// Back-reference from a plotted point to the curve and exciton it denotes.
///
/// On dispersion points `source_index` is the point's position along the
/// path and `exciton_ordinal` the 1-based band. On absorption points it is
/// the curve's source index and the exciton's ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointTag {
    pub source_index: usize,
    pub exciton_ordinal: usize,
}

impl PointTag {
    pub fn new(source_index: usize, exciton_ordinal: usize) -> Self {
        Self {
            source_index,
            exciton_ordinal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurveRecord {
    pub q: QIndex,
    /// Position of the momentum point along the dispersion path.
    pub source_index: usize,
    pub energies: Vec<Real>,
    pub absorption: Vec<Real>,
    pub bright_energies: Vec<Real>,
    /// Absorption interpolated at each bright exciton energy.
    pub bright_absorption: Vec<Real>,
    pub bright_intensities: Vec<Real>,
    pub bright_ordinals: Vec<usize>,
    pub dark_energies: Vec<Real>,
    pub point_tags: Vec<PointTag>,
    pub fixed: bool,
}

impl CurveRecord {
    /// Split the spectrum's excitons into bright (`intensity >= min_bright`)
    /// and dark ones.
    pub fn from_spectrum(
        q: QIndex,
        source_index: usize,
        spectrum: AbsorptionSpectrum,
        min_bright: Real,
        fixed: bool,
    ) -> Self {
        let (bright, dark): (Vec<&ExcitonLine>, Vec<&ExcitonLine>) = spectrum
            .excitons
            .iter()
            .partition(|x| x.intensity >= min_bright);

        let bright_absorption = bright
            .iter()
            .map(|x| interp_linear(x.energy, &spectrum.energies, &spectrum.absorption))
            .collect();

        Self {
            q,
            source_index,
            bright_energies: bright.iter().map(|x| x.energy).collect(),
            bright_absorption,
            bright_intensities: bright.iter().map(|x| x.intensity).collect(),
            bright_ordinals: bright.iter().map(|x| x.ordinal).collect(),
            dark_energies: dark.iter().map(|x| x.energy).collect(),
            point_tags: bright
                .iter()
                .map(|x| PointTag::new(source_index, x.ordinal))
                .collect(),
            energies: spectrum.energies,
            absorption: spectrum.absorption,
            fixed,
        }
    }

    /// Same curve data, ignoring the fixed flag.
    pub fn same_payload(&self, other: &CurveRecord) -> bool {
        CurveRecord {
            fixed: other.fixed,
            ..self.clone()
        } == *other
    }
}

/// Ordered active curves; `q` is unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveCache {
    curves: Vec<CurveRecord>,
}

impl CurveCache {
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn as_slice(&self) -> &[CurveRecord] {
        &self.curves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurveRecord> {
        self.curves.iter()
    }

    pub fn get(&self, position: usize) -> Option<&CurveRecord> {
        self.curves.get(position)
    }

    pub fn position(&self, q: QIndex) -> Option<usize> {
        self.curves.iter().position(|c| c.q == q)
    }

    pub(crate) fn push(&mut self, record: CurveRecord) {
        debug_assert!(self.position(record.q).is_none());
        self.curves.push(record);
    }

    pub(crate) fn remove(&mut self, position: usize) -> Option<CurveRecord> {
        (position < self.curves.len()).then(|| self.curves.remove(position))
    }

    pub(crate) fn set_fixed(&mut self, position: usize, fixed: bool) {
        if let Some(c) = self.curves.get_mut(position) {
            c.fixed = fixed;
        }
    }

    /// Remove every unfixed curve other than `keep`.
    ///
    /// Victims are chosen from a snapshot of the cache; each returned position
    /// is the victim's position at the moment it was removed.
    pub(crate) fn evict_unfixed_except(&mut self, keep: QIndex) -> Vec<usize> {
        let victims: Vec<QIndex> = self
            .curves
            .iter()
            .filter(|c| c.q != keep && !c.fixed)
            .map(|c| c.q)
            .collect();

        let mut removed = Vec::with_capacity(victims.len());
        for q in victims {
            if let Some(position) = self.position(q) {
                self.curves.remove(position);
                removed.push(position);
            }
        }
        removed
    }

    pub(crate) fn replace_all(&mut self, curves: Vec<CurveRecord>) {
        self.curves = curves;
    }

    pub(crate) fn clear(&mut self) {
        self.curves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spectrum() -> AbsorptionSpectrum {
        AbsorptionSpectrum {
            energies: vec![1.0, 2.0, 3.0],
            absorption: vec![0.0, 10.0, 20.0],
            excitons: vec![
                ExcitonLine {
                    energy: 1.5,
                    intensity: 1.0,
                    ordinal: 1,
                },
                ExcitonLine {
                    energy: 2.0,
                    intensity: 0.01,
                    ordinal: 2,
                },
                ExcitonLine {
                    energy: 4.0,
                    intensity: 0.5,
                    ordinal: 3,
                },
            ],
        }
    }

    fn record(q: u32, fixed: bool) -> CurveRecord {
        CurveRecord::from_spectrum(QIndex::from_index(q), q as usize, spectrum(), 0.1, fixed)
    }

    #[test]
    fn bright_dark_split() {
        let r = record(2, false);
        assert_eq!(r.bright_energies, vec![1.5, 4.0]);
        assert_eq!(r.bright_ordinals, vec![1, 3]);
        assert_eq!(r.dark_energies, vec![2.0]);
        // interpolated inside the grid, clamped past its end
        assert_eq!(r.bright_absorption, vec![5.0, 20.0]);
        assert_eq!(r.point_tags, vec![PointTag::new(2, 1), PointTag::new(2, 3)]);
    }

    #[test]
    fn no_bright_excitons() {
        let r = CurveRecord::from_spectrum(QIndex::from_index(0), 0, spectrum(), 1.1, false);
        assert!(r.bright_energies.is_empty());
        assert!(r.bright_absorption.is_empty());
        assert!(r.point_tags.is_empty());
        assert_eq!(r.dark_energies.len(), 3);
    }

    #[test]
    fn nan_exciton_energy_does_not_poison_the_split() {
        let spectrum = AbsorptionSpectrum {
            excitons: vec![ExcitonLine {
                energy: Real::NAN,
                intensity: 0.9,
                ordinal: 1,
            }],
            ..spectrum()
        };
        let r = CurveRecord::from_spectrum(QIndex::from_index(0), 0, spectrum, 0.1, false);
        assert_eq!(r.bright_ordinals, vec![1]);
        assert!(r.bright_absorption[0].is_nan());
    }

    #[test]
    fn eviction_keeps_fixed_and_selected() {
        let mut cache = CurveCache::default();
        cache.push(record(1, false));
        cache.push(record(2, true));
        cache.push(record(3, false));
        cache.push(record(4, false));

        let removed = cache.evict_unfixed_except(QIndex::from_index(4));
        assert_eq!(removed, vec![0, 1]);
        let qs: Vec<_> = cache.iter().map(|c| c.q.index()).collect();
        assert_eq!(qs, vec![2, 4]);
    }

    #[test]
    fn same_payload_ignores_fixed() {
        assert!(record(1, false).same_payload(&record(1, true)));
        assert!(!record(1, false).same_payload(&record(2, false)));
    }

    proptest! {
        // Replaying the returned positions on a parallel array must leave it
        // aligned with the cache.
        #[test]
        fn eviction_positions_replay_in_order(
            fixed in proptest::collection::vec(any::<bool>(), 0..12),
            keep in 0u32..12,
        ) {
            let mut cache = CurveCache::default();
            for (q, f) in fixed.iter().enumerate() {
                cache.push(record(q as u32, *f));
            }
            let mut shadow: Vec<u32> = cache.iter().map(|c| c.q.index()).collect();

            for position in cache.evict_unfixed_except(QIndex::from_index(keep)) {
                prop_assert!(position < shadow.len());
                shadow.remove(position);
            }

            let qs: Vec<u32> = cache.iter().map(|c| c.q.index()).collect();
            prop_assert_eq!(&qs, &shadow);
            prop_assert!(cache.iter().all(|c| c.fixed || c.q.index() == keep));
        }
    }
}
