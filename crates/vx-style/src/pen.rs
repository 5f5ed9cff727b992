use vx_core::{Real, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

impl LineStyle {
    pub const ALL: [LineStyle; 5] = [
        LineStyle::Solid,
        LineStyle::Dash,
        LineStyle::Dot,
        LineStyle::DashDot,
        LineStyle::DashDotDot,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub style: LineStyle,
    pub width: Real,
    pub color: Rgb,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            style: LineStyle::Solid,
            width: 1.0,
            color: Rgb::WHITE,
        }
    }
}

impl Pen {
    pub fn solid(color: Rgb, width: Real) -> Self {
        Self {
            style: LineStyle::Solid,
            width,
            color,
        }
    }

    /// Solid unit-width pen in colour `index` of the indexed palette.
    pub fn indexed(index: usize) -> Self {
        let slot = (index % vx_core::color::INDEXED_HUES as usize) as u32;
        Self::solid(Rgb::indexed(slot), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_pens_cycle() {
        assert_eq!(Pen::indexed(0), Pen::indexed(9));
        assert_ne!(Pen::indexed(0).color, Pen::indexed(1).color);
        assert_eq!(Pen::indexed(3).style, LineStyle::Solid);
    }

    #[test]
    fn line_style_indices() {
        for (i, s) in LineStyle::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }
}
