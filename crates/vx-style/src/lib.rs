//! vx-style: per-graph style state for the exciton plots.
//!
//! Contains:
//! - common (curve count, current curve, all-vs-one edit mode)
//! - pen (line pens and line styles)
//! - curve / point (per-curve pens, symbols and sizes)
//! - axes / legend (graph-scoped appearance)
//! - graph (one graph's complete style and its structural resizes)
//! - registry (the three graphs and cross-graph axes linking)

pub mod axes;
pub mod common;
pub mod curve;
pub mod graph;
pub mod legend;
pub mod pen;
pub mod point;
pub mod registry;

pub use axes::{AxesChange, AxesElement, AxesStyle, Font};
pub use common::StyleCommon;
pub use curve::CurveStyle;
pub use graph::{GraphKind, GraphStyle};
pub use legend::{LegendChange, LegendStyle};
pub use pen::{LineStyle, Pen};
pub use point::{PointStyle, Symbol};
pub use registry::{GraphStyles, LinkState, LinkToken};

pub type StyleResult<T> = Result<T, StyleError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Graph {graph:?} has no {what}")]
    Unsupported { graph: GraphKind, what: &'static str },

    #[error("Axes element {element:?} has no font")]
    NoFont { element: AxesElement },

    #[error("Axes of {broadcaster:?} are already linked")]
    LinkBusy { broadcaster: GraphKind },

    #[error(transparent)]
    Core(#[from] vx_core::VxError),
}
