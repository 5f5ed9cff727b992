//! Momentum path through high-symmetry points of the Brillouin zone.
//!
//! Coordinates are reduced (crystal) coordinates. Conversions to Cartesian
//! use a reciprocal lattice matrix whose *rows* are the reciprocal vectors.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use vx_core::{Real, check_index, ensure_finite};

use crate::{ParamsError, ParamsResult};

/// Interval appended when a point is inserted.
pub const DEFAULT_INTERVAL: usize = 10;

/// One labelled vertex of the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighSymmetryPoint {
    pub coords: [Real; 3],
    pub label: String,
}

impl HighSymmetryPoint {
    pub fn new(coords: [Real; 3], label: impl Into<String>) -> Self {
        Self {
            coords,
            label: label.into(),
        }
    }

    pub fn gamma() -> Self {
        Self::new([0.0, 0.0, 0.0], "Gamma")
    }

    pub fn reduced(&self) -> Vector3<Real> {
        Vector3::from(self.coords)
    }
}

/// Ordered path vertices and the number of samples on each segment.
///
/// `intervals[i]` is the sample count between vertex `i` and `i + 1`. After
/// point insertions the interval list may be longer than the segment list;
/// extra entries are unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumPath {
    points: Vec<HighSymmetryPoint>,
    intervals: Vec<usize>,
}

impl Default for MomentumPath {
    fn default() -> Self {
        Self {
            points: vec![
                HighSymmetryPoint::gamma(),
                HighSymmetryPoint::new([0.0, 0.5, 0.0], "M"),
                HighSymmetryPoint::new([0.3333333, 0.3333333, 0.0], "K"),
                HighSymmetryPoint::gamma(),
            ],
            intervals: vec![50, 10, 50],
        }
    }
}

impl MomentumPath {
    pub fn new(points: Vec<HighSymmetryPoint>, intervals: Vec<usize>) -> ParamsResult<Self> {
        if points.is_empty() {
            return Err(ParamsError::InvalidPath {
                what: "path needs at least one point".to_string(),
            });
        }
        for p in &points {
            for c in p.coords {
                ensure_finite(c, "path coordinate")?;
            }
        }
        Ok(Self { points, intervals })
    }

    pub fn points(&self) -> &[HighSymmetryPoint] {
        &self.points
    }

    pub fn intervals(&self) -> &[usize] {
        &self.intervals
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn update_point_value(
        &mut self,
        index: usize,
        component: usize,
        value: Real,
    ) -> ParamsResult<()> {
        let index = check_index("path point", index, self.points.len())?;
        let component = check_index("coordinate component", component, 3)?;
        self.points[index].coords[component] = ensure_finite(value, "path coordinate")?;
        Ok(())
    }

    pub fn update_point_label(&mut self, index: usize, label: impl Into<String>) -> ParamsResult<()> {
        let index = check_index("path point", index, self.points.len())?;
        self.points[index].label = label.into();
        Ok(())
    }

    /// Returns `false` (and changes nothing) past the last interval.
    pub fn update_interval(&mut self, index: usize, value: usize) -> bool {
        match self.intervals.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Insert a Γ point after `index` and append a default interval.
    pub fn insert_point(&mut self, index: usize) -> ParamsResult<()> {
        let index = check_index("path point", index, self.points.len())?;
        self.points.insert(index + 1, HighSymmetryPoint::gamma());
        self.intervals.push(DEFAULT_INTERVAL);
        Ok(())
    }

    /// Remove the point at `index` together with the interval at the same
    /// position, if any. The last remaining point cannot be removed.
    pub fn remove_point(&mut self, index: usize) -> ParamsResult<()> {
        let index = check_index("path point", index, self.points.len())?;
        if self.points.len() == 1 {
            return Err(ParamsError::InvalidPath {
                what: "cannot remove the last path point".to_string(),
            });
        }
        self.points.remove(index);
        if index < self.intervals.len() {
            self.intervals.remove(index);
        }
        Ok(())
    }

    /// Sampled reduced coordinates along the whole path, both ends included.
    pub fn k_list(&self) -> Vec<Vector3<Real>> {
        let mut out = Vec::new();
        for (i, pair) in self.points.windows(2).enumerate() {
            let start = pair[0].reduced();
            let end = pair[1].reduced();
            let n = self.intervals.get(i).copied().unwrap_or(1).max(1);
            for j in 0..n {
                let t = j as Real / n as Real;
                out.push(start + (end - start) * t);
            }
        }
        if let Some(last) = self.points.last() {
            out.push(last.reduced());
        }
        out
    }

    /// Path vertices in Cartesian coordinates.
    pub fn vertices_cartesian(&self, rlat: &Matrix3<Real>) -> Vec<Vector3<Real>> {
        let reduced: Vec<_> = self.points.iter().map(HighSymmetryPoint::reduced).collect();
        reduced_to_cartesian(&reduced, rlat)
    }

    /// Cumulative distance of each vertex along the Cartesian path, paired
    /// with its label. Used for x-axis ticks.
    pub fn ticks(&self, rlat: &Matrix3<Real>) -> Vec<(Real, String)> {
        cumulative_distances(&self.vertices_cartesian(rlat))
            .into_iter()
            .zip(self.labels())
            .collect()
    }
}

/// Convert reduced coordinates to Cartesian: `k_car = rlat^T * k_red`.
pub fn reduced_to_cartesian(points: &[Vector3<Real>], rlat: &Matrix3<Real>) -> Vec<Vector3<Real>> {
    let transform = rlat.transpose();
    points.iter().map(|p| transform * p).collect()
}

/// Path length from the first point to each point.
pub fn cumulative_distances(points: &[Vector3<Real>]) -> Vec<Real> {
    let mut out = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += (p - points[i - 1]).norm();
        }
        out.push(total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_samples() {
        let path = MomentumPath::default();
        assert_eq!(path.len(), 4);
        // 50 + 10 + 50 segment samples plus the closing point
        assert_eq!(path.k_list().len(), 111);
        assert_eq!(path.k_list()[0], Vector3::zeros());
    }

    #[test]
    fn insert_and_remove_points() {
        let mut path = MomentumPath::default();
        path.insert_point(0).unwrap();
        assert_eq!(path.points()[1].label, "Gamma");
        assert_eq!(path.intervals(), &[50, 10, 50, DEFAULT_INTERVAL]);

        path.remove_point(1).unwrap();
        assert_eq!(path.points()[1].label, "M");
        assert_eq!(path.intervals(), &[50, 50, DEFAULT_INTERVAL]);

        assert!(path.insert_point(99).is_err());
    }

    #[test]
    fn last_point_cannot_be_removed() {
        let mut path = MomentumPath::new(vec![HighSymmetryPoint::gamma()], vec![]).unwrap();
        assert!(path.remove_point(0).is_err());
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn update_interval_past_end_is_ignored() {
        let mut path = MomentumPath::default();
        assert!(path.update_interval(1, 20));
        assert!(!path.update_interval(5, 20));
        assert_eq!(path.intervals(), &[50, 20, 50]);
    }

    #[test]
    fn update_point_value_checks_bounds() {
        let mut path = MomentumPath::default();
        path.update_point_value(1, 2, 0.25).unwrap();
        assert_eq!(path.points()[1].coords, [0.0, 0.5, 0.25]);
        assert!(path.update_point_value(1, 3, 0.0).is_err());
        assert!(path.update_point_value(1, 0, Real::NAN).is_err());
    }

    #[test]
    fn ticks_accumulate_distance() {
        let path = MomentumPath::new(
            vec![
                HighSymmetryPoint::gamma(),
                HighSymmetryPoint::new([1.0, 0.0, 0.0], "X"),
                HighSymmetryPoint::new([1.0, 1.0, 0.0], "S"),
            ],
            vec![5, 5],
        )
        .unwrap();
        let rlat = Matrix3::identity() * 2.0;
        let ticks = path.ticks(&rlat);
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0], (0.0, "Gamma".to_string()));
        assert_eq!(ticks[1].0, 2.0);
        assert_eq!(ticks[2].0, 4.0);
    }
}
