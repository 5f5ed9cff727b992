use vx_core::{Real, Rgb};

use crate::{StyleError, StyleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxesElement {
    Title,
    Labels,
    Ticks,
    Axes,
    Background,
}

impl AxesElement {
    pub const ALL: [AxesElement; 5] = [
        AxesElement::Title,
        AxesElement::Labels,
        AxesElement::Ticks,
        AxesElement::Axes,
        AxesElement::Background,
    ];

    pub fn has_font(self) -> bool {
        matches!(
            self,
            AxesElement::Title | AxesElement::Labels | AxesElement::Ticks
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub point_size: Real,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Sans Serif".to_string(),
            point_size: 9.0,
            bold: false,
            italic: false,
        }
    }
}

/// One edit of a graph's axes appearance. Linked graphs receive the same
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum AxesChange {
    Color(AxesElement, Rgb),
    Font(AxesElement, Font),
    Width(Real),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxesStyle {
    pub title_color: Rgb,
    pub labels_color: Rgb,
    pub ticks_color: Rgb,
    pub axes_color: Rgb,
    pub background_color: Rgb,
    pub title_font: Font,
    pub labels_font: Font,
    pub ticks_font: Font,
    pub axes_width: Real,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            title_color: Rgb::LIGHT_GRAY,
            labels_color: Rgb::LIGHT_GRAY,
            ticks_color: Rgb::LIGHT_GRAY,
            axes_color: Rgb::LIGHT_GRAY,
            background_color: Rgb::BLACK,
            title_font: Font::default(),
            labels_font: Font::default(),
            ticks_font: Font::default(),
            axes_width: 1.0,
        }
    }
}

impl AxesStyle {
    pub fn color(&self, element: AxesElement) -> Rgb {
        match element {
            AxesElement::Title => self.title_color,
            AxesElement::Labels => self.labels_color,
            AxesElement::Ticks => self.ticks_color,
            AxesElement::Axes => self.axes_color,
            AxesElement::Background => self.background_color,
        }
    }

    pub fn font(&self, element: AxesElement) -> Option<&Font> {
        match element {
            AxesElement::Title => Some(&self.title_font),
            AxesElement::Labels => Some(&self.labels_font),
            AxesElement::Ticks => Some(&self.ticks_font),
            AxesElement::Axes | AxesElement::Background => None,
        }
    }

    /// Reject changes that no axes style can take.
    pub fn validate(change: &AxesChange) -> StyleResult<()> {
        match change {
            AxesChange::Font(element, _) if !element.has_font() => {
                Err(StyleError::NoFont { element: *element })
            }
            AxesChange::Width(w) if !(w.is_finite() && *w >= 0.0) => {
                Err(vx_core::VxError::InvalidArg {
                    what: "axes width must be finite and non-negative",
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    pub fn apply(&mut self, change: &AxesChange) -> StyleResult<()> {
        Self::validate(change)?;
        match change {
            AxesChange::Color(element, color) => {
                let slot = match element {
                    AxesElement::Title => &mut self.title_color,
                    AxesElement::Labels => &mut self.labels_color,
                    AxesElement::Ticks => &mut self.ticks_color,
                    AxesElement::Axes => &mut self.axes_color,
                    AxesElement::Background => &mut self.background_color,
                };
                *slot = *color;
            }
            AxesChange::Font(element, font) => {
                let slot = match element {
                    AxesElement::Title => &mut self.title_font,
                    AxesElement::Labels => &mut self.labels_font,
                    AxesElement::Ticks => &mut self.ticks_font,
                    AxesElement::Axes | AxesElement::Background => {
                        return Err(StyleError::NoFont { element: *element });
                    }
                };
                *slot = font.clone();
            }
            AxesChange::Width(w) => self.axes_width = *w,
        }
        Ok(())
    }
}
