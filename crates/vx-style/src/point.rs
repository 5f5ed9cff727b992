//! Per-curve point symbols and sizes.

use crate::common::{EditTarget, StyleCommon};

pub const DEFAULT_SYMBOL: Symbol = Symbol::Circle;
pub const DEFAULT_POINT_SIZE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    #[default]
    Circle,
    Square,
    Triangle,
    TriangleUp,
    TriangleRight,
    TriangleLeft,
    Diamond,
    Plus,
    Pentagon,
    Hexagon,
    Star,
    Cross,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    Crosshair,
}

impl Symbol {
    pub const ALL: [Symbol; 17] = [
        Symbol::Circle,
        Symbol::Square,
        Symbol::Triangle,
        Symbol::TriangleUp,
        Symbol::TriangleRight,
        Symbol::TriangleLeft,
        Symbol::Diamond,
        Symbol::Plus,
        Symbol::Pentagon,
        Symbol::Hexagon,
        Symbol::Star,
        Symbol::Cross,
        Symbol::ArrowUp,
        Symbol::ArrowRight,
        Symbol::ArrowDown,
        Symbol::ArrowLeft,
        Symbol::Crosshair,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Short code understood by the plotting surfaces.
    pub fn code(self) -> &'static str {
        match self {
            Symbol::Circle => "o",
            Symbol::Square => "s",
            Symbol::Triangle => "t",
            Symbol::TriangleUp => "t1",
            Symbol::TriangleRight => "t2",
            Symbol::TriangleLeft => "t3",
            Symbol::Diamond => "d",
            Symbol::Plus => "+",
            Symbol::Pentagon => "p",
            Symbol::Hexagon => "h",
            Symbol::Star => "star",
            Symbol::Cross => "x",
            Symbol::ArrowUp => "arrow_up",
            Symbol::ArrowRight => "arrow_right",
            Symbol::ArrowDown => "arrow_down",
            Symbol::ArrowLeft => "arrow_left",
            Symbol::Crosshair => "crosshair",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    symbols: Vec<Symbol>,
    sizes: Vec<u32>,
    common_symbol: Symbol,
    common_size: u32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            sizes: Vec::new(),
            common_symbol: DEFAULT_SYMBOL,
            common_size: DEFAULT_POINT_SIZE,
        }
    }
}

impl PointStyle {
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn common_symbol(&self) -> Symbol {
        self.common_symbol
    }

    pub fn common_size(&self) -> u32 {
        self.common_size
    }

    /// Reset every entry to the shared symbol and size.
    pub fn set_common_style(&mut self, common: &StyleCommon) {
        let n = common.num_curves();
        self.symbols = vec![self.common_symbol; n];
        self.sizes = vec![self.common_size; n];
    }

    /// Give each curve its own symbol, cycling through the palette.
    pub fn set_symbol_gradient(&mut self, common: &StyleCommon) {
        self.symbols = (0..common.num_curves())
            .map(|i| Symbol::ALL[i % Symbol::ALL.len()])
            .collect();
    }

    pub fn set_symbol(&mut self, common: &StyleCommon, symbol: Symbol) {
        match common.edit_target() {
            EditTarget::All => {
                self.common_symbol = symbol;
                self.symbols.fill(symbol);
            }
            EditTarget::One(i) => {
                if let Some(s) = self.symbols.get_mut(i) {
                    *s = symbol;
                }
            }
            EditTarget::Nothing => {}
        }
    }

    pub fn set_size(&mut self, common: &StyleCommon, size: u32) {
        match common.edit_target() {
            EditTarget::All => {
                self.common_size = size;
                self.sizes.fill(size);
            }
            EditTarget::One(i) => {
                if let Some(s) = self.sizes.get_mut(i) {
                    *s = size;
                }
            }
            EditTarget::Nothing => {}
        }
    }

    pub fn current_symbol(&self, common: &StyleCommon) -> Option<Symbol> {
        current(&self.symbols, common)
    }

    pub fn current_size(&self, common: &StyleCommon) -> Option<u32> {
        current(&self.sizes, common)
    }

    pub(crate) fn push(&mut self, symbol: Symbol, size: u32) {
        self.symbols.push(symbol);
        self.sizes.push(size);
    }

    pub(crate) fn remove(&mut self, position: usize) {
        if position < self.symbols.len() {
            self.symbols.remove(position);
        }
        if position < self.sizes.len() {
            self.sizes.remove(position);
        }
    }

    pub(crate) fn resize(&mut self, n: usize) {
        self.symbols.resize(n, self.common_symbol);
        self.sizes.resize(n, self.common_size);
    }
}

/// Value to show in an editor, looking only at the first `num_curves` entries.
fn current<T: Copy + PartialEq>(values: &[T], common: &StyleCommon) -> Option<T> {
    let values = &values[..common.num_curves().min(values.len())];
    match common.edit_target() {
        EditTarget::One(i) => values.get(i).copied(),
        EditTarget::All => {
            let first = values.first().copied()?;
            values.iter().all(|v| *v == first).then_some(first)
        }
        EditTarget::Nothing => None,
    }
}
