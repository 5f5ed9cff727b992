use vx_core::{Real, Rgb};

use crate::pen::{LineStyle, Pen};

#[derive(Debug, Clone, PartialEq)]
pub enum LegendChange {
    TextColor(Rgb),
    TextSize(u32),
    BackgroundColor(Option<Rgb>),
    BorderStyle(LineStyle),
    BorderWidth(Real),
    BorderColor(Rgb),
    OffsetX(i32),
    OffsetY(i32),
}

/// Legend of the absorption graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub text_color: Rgb,
    pub text_size: u32,
    pub background_color: Option<Rgb>,
    pub border_pen: Pen,
    pub offset: (i32, i32),
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            text_color: Rgb::LIGHT_GRAY,
            text_size: 9,
            background_color: None,
            border_pen: Pen::solid(Rgb::BLACK, 0.0),
            offset: (30, 30),
        }
    }
}

impl LegendStyle {
    pub fn apply(&mut self, change: &LegendChange) {
        match *change {
            LegendChange::TextColor(c) => self.text_color = c,
            LegendChange::TextSize(s) => self.text_size = s,
            LegendChange::BackgroundColor(c) => self.background_color = c,
            LegendChange::BorderStyle(s) => self.border_pen.style = s,
            LegendChange::BorderWidth(w) => {
                if w.is_finite() && w >= 0.0 {
                    self.border_pen.width = w;
                }
            }
            LegendChange::BorderColor(c) => self.border_pen.color = c,
            LegendChange::OffsetX(x) => self.offset.0 = x,
            LegendChange::OffsetY(y) => self.offset.1 = y,
        }
    }
}
