//! Scalar computation parameters with clamping setters.
//!
//! Invariant after every setter: `energy_min + energy_step <= energy_max`,
//! `energy_step > 0`, `exciton_count >= 1` and
//! `min_bright_intensity` in `[0, 1]`.

use serde::{Deserialize, Serialize};
use vx_core::{Real, Tolerances, le_with_tol};

/// Smallest step a non-positive step request is raised to (eV).
pub const MIN_ENERGY_STEP: Real = 0.001;

/// Energy window, resolution and exciton selection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    energy_min: Real,
    energy_max: Real,
    energy_step: Real,
    exciton_count: usize,
    min_bright_intensity: Real,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            energy_min: 4.0,
            energy_max: 20.0,
            energy_step: 0.02,
            exciton_count: 6,
            min_bright_intensity: 0.1,
        }
    }
}

impl ParameterSet {
    pub fn energy_min(&self) -> Real {
        self.energy_min
    }

    pub fn energy_max(&self) -> Real {
        self.energy_max
    }

    pub fn energy_step(&self) -> Real {
        self.energy_step
    }

    pub fn exciton_count(&self) -> usize {
        self.exciton_count
    }

    pub fn min_bright_intensity(&self) -> Real {
        self.min_bright_intensity
    }

    fn window(&self) -> Real {
        self.energy_max - self.energy_min
    }

    /// Set the energy step, raising non-positive values to [`MIN_ENERGY_STEP`]
    /// and capping at the window width.
    pub fn set_energy_step(&mut self, step: Real) {
        if !step.is_finite() {
            return;
        }
        let step = if step <= 0.0 { MIN_ENERGY_STEP } else { step };
        self.commit_window(self.energy_min, self.energy_max, step.min(self.window()));
    }

    /// Set the lower window bound. A bound at or above `energy_max` is pulled
    /// down by one step; the step then shrinks if it no longer fits.
    pub fn set_energy_min(&mut self, energy: Real) {
        if !energy.is_finite() {
            return;
        }
        let mut energy = energy;
        let mut step = self.energy_step;
        if energy >= self.energy_max {
            energy = self.energy_max - step;
        }
        if energy + step > self.energy_max {
            step = self.energy_max - energy;
        }
        self.commit_window(energy, self.energy_max, step);
    }

    /// Set the upper window bound, never closer to `energy_min` than one step.
    pub fn set_energy_max(&mut self, energy: Real) {
        if !energy.is_finite() {
            return;
        }
        let floor = self.energy_min + self.energy_step;
        let max = if energy <= self.energy_min || energy < floor {
            floor
        } else {
            energy
        };
        self.commit_window(self.energy_min, max, self.energy_step);
    }

    /// Store a clamped window, or keep the current one when rounding at this
    /// magnitude collapses the clamped window.
    fn commit_window(&mut self, min: Real, max: Real, step: Real) {
        let tol = Tolerances::default();
        if step > 0.0 && min < max && le_with_tol(min + step, max, tol) {
            self.energy_min = min;
            self.energy_max = max;
            self.energy_step = step;
        } else {
            tracing::debug!(min, max, step, "energy window edit dropped");
        }
    }

    /// Set the number of excitons per momentum point (at least 1).
    pub fn set_exciton_count(&mut self, n: i64) {
        self.exciton_count = usize::try_from(n.max(1)).unwrap_or(usize::MAX);
    }

    /// Set the intensity threshold separating bright from dark excitons.
    pub fn set_min_bright_intensity(&mut self, intensity: Real) {
        if intensity.is_nan() {
            return;
        }
        self.min_bright_intensity = intensity.clamp(0.0, 1.0);
    }

    /// Apply a full energy window in an order that cannot be blocked by the
    /// current bounds.
    pub fn set_energy_window(&mut self, min: Real, max: Real, step: Real) {
        if min >= self.energy_max {
            self.set_energy_max(max);
            self.set_energy_min(min);
        } else {
            self.set_energy_min(min);
            self.set_energy_max(max);
        }
        self.set_energy_step(step);
    }

    /// True when the window invariant holds (up to rounding of the clamps).
    pub fn is_consistent(&self) -> bool {
        let tol = Tolerances::default();
        self.energy_step > 0.0
            && self.energy_min < self.energy_max
            && le_with_tol(self.energy_min + self.energy_step, self.energy_max, tol)
            && self.exciton_count >= 1
            && (0.0..=1.0).contains(&self.min_bright_intensity)
    }
}
