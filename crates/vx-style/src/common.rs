use vx_core::check_index;

use crate::StyleResult;

/// State shared by the curve and point styles of one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCommon {
    num_curves: usize,
    current_curve_index: Option<usize>,
    apply_to_all_curves: bool,
}

impl Default for StyleCommon {
    fn default() -> Self {
        Self {
            num_curves: 0,
            current_curve_index: None,
            apply_to_all_curves: true,
        }
    }
}

/// Which entries an attribute edit reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    All,
    One(usize),
    Nothing,
}

impl StyleCommon {
    pub fn num_curves(&self) -> usize {
        self.num_curves
    }

    pub fn current_curve_index(&self) -> Option<usize> {
        self.current_curve_index
    }

    pub fn apply_to_all_curves(&self) -> bool {
        self.apply_to_all_curves
    }

    pub fn set_apply_to_all_curves(&mut self, apply: bool) {
        self.apply_to_all_curves = apply;
    }

    pub fn set_current_curve_index(&mut self, index: Option<usize>) -> StyleResult<()> {
        if let Some(i) = index {
            check_index("curve", i, self.num_curves)?;
        }
        self.current_curve_index = index;
        Ok(())
    }

    pub fn edit_target(&self) -> EditTarget {
        match (self.apply_to_all_curves, self.current_curve_index) {
            (true, _) => EditTarget::All,
            (false, Some(i)) if i < self.num_curves => EditTarget::One(i),
            (false, _) => EditTarget::Nothing,
        }
    }

    pub(crate) fn increase_num_curves(&mut self) {
        self.num_curves += 1;
    }

    /// Drop one curve, pulling the current index back inside the new bound.
    pub(crate) fn decrease_num_curves(&mut self) {
        self.set_num_curves(self.num_curves.saturating_sub(1));
    }

    pub(crate) fn set_num_curves(&mut self, n: usize) {
        self.num_curves = n;
        if self.current_curve_index.is_some_and(|i| i >= n) {
            self.current_curve_index = n.checked_sub(1);
        }
    }
}
