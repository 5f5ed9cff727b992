//! Per-curve line pens.
//!
//! Every operation takes the graph's [`StyleCommon`] by reference; the curve
//! count lives there, not here.

use vx_core::{Real, Rgb};

use crate::common::{EditTarget, StyleCommon};
use crate::pen::{LineStyle, Pen};

pub const DEFAULT_START_HUE: u16 = 0;
pub const DEFAULT_END_HUE: u16 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct CurveStyle {
    pens: Vec<Pen>,
    common_pen: Pen,
    start_hue: u16,
    end_hue: u16,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            pens: Vec::new(),
            common_pen: Pen::default(),
            start_hue: DEFAULT_START_HUE,
            end_hue: DEFAULT_END_HUE,
        }
    }
}

impl CurveStyle {
    pub fn pens(&self) -> &[Pen] {
        &self.pens
    }

    pub fn common_pen(&self) -> Pen {
        self.common_pen
    }

    pub fn hue_range(&self) -> (u16, u16) {
        (self.start_hue, self.end_hue)
    }

    pub fn set_hue_range(&mut self, start: u16, end: u16) {
        self.start_hue = start.min(359);
        self.end_hue = end.min(359);
    }

    pub fn all_pens_equal(&self) -> bool {
        self.pens.windows(2).all(|w| w[0] == w[1])
    }

    /// Reset every pen to the shared pen.
    pub fn set_common_palette(&mut self, common: &StyleCommon) {
        self.pens = vec![self.common_pen; common.num_curves()];
    }

    /// Spread pen colours over the hue range. A single curve gets the lower
    /// hue.
    pub fn set_gradient_palette(&mut self, common: &StyleCommon) {
        let lo = self.start_hue.min(self.end_hue);
        let hi = self.start_hue.max(self.end_hue);
        let n = common.num_curves().min(self.pens.len());
        for (i, pen) in self.pens.iter_mut().take(n).enumerate() {
            let hue = if n <= 1 {
                lo
            } else {
                lo + ((f64::from(hi - lo) * i as f64) / (n - 1) as f64) as u16
            };
            pen.color = Rgb::from_hsv(hue, 255, 255);
        }
    }

    pub fn set_line_style(&mut self, common: &StyleCommon, style: LineStyle) {
        self.edit(common, |pen| pen.style = style);
    }

    pub fn set_line_color(&mut self, common: &StyleCommon, color: Rgb) {
        self.edit(common, |pen| pen.color = color);
    }

    pub fn set_line_width(&mut self, common: &StyleCommon, width: Real) {
        if !(width.is_finite() && width >= 0.0) {
            return;
        }
        self.edit(common, |pen| pen.width = width);
    }

    fn edit(&mut self, common: &StyleCommon, f: impl Fn(&mut Pen)) {
        match common.edit_target() {
            EditTarget::All => {
                f(&mut self.common_pen);
                self.pens.iter_mut().for_each(f);
            }
            EditTarget::One(i) => {
                if let Some(pen) = self.pens.get_mut(i) {
                    f(pen);
                }
            }
            EditTarget::Nothing => {}
        }
    }

    /// Pen to show in an editor: the current one in single-curve mode, the
    /// shared one when every pen agrees, otherwise nothing.
    pub fn current_pen(&self, common: &StyleCommon) -> Option<Pen> {
        let pens = &self.pens[..common.num_curves().min(self.pens.len())];
        match common.edit_target() {
            EditTarget::One(i) => pens.get(i).copied(),
            EditTarget::All => {
                let first = pens.first().copied()?;
                pens.iter().all(|p| *p == first).then_some(first)
            }
            EditTarget::Nothing => None,
        }
    }

    pub(crate) fn push(&mut self, pen: Pen) {
        self.pens.push(pen);
    }

    pub(crate) fn remove(&mut self, position: usize) {
        if position < self.pens.len() {
            self.pens.remove(position);
        }
    }

    pub(crate) fn resize(&mut self, n: usize) {
        self.pens.resize(n, self.common_pen);
    }
}
