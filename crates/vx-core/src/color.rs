//! RGB colours and the HSV constructions used by the style palettes.

use core::fmt;

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Number of hues the indexed palette cycles through.
pub const INDEXED_HUES: u32 = 9;

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    pub const LIGHT_GRAY: Rgb = Rgb::new(211, 211, 211);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from hue in degrees (wrapped to `[0, 360)`), saturation
    /// and value in `[0, 255]`.
    pub fn from_hsv(hue: u16, saturation: u8, value: u8) -> Self {
        let h = f64::from(hue % 360) / 60.0;
        let s = f64::from(saturation) / 255.0;
        let v = f64::from(value) / 255.0;

        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Hue in degrees, or `None` for achromatic colours (greys).
    pub fn hue(self) -> Option<u16> {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta == 0.0 {
            return None;
        }

        let h = if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        Some((h.round() as u16) % 360)
    }

    /// Colour number `index` of the indexed palette: `INDEXED_HUES` fully
    /// saturated hues evenly spaced around the wheel.
    pub fn indexed(index: u32) -> Self {
        let slot = index % INDEXED_HUES;
        let hue = (slot * 360 / INDEXED_HUES) as u16;
        Self::from_hsv(hue, 255, 255)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
