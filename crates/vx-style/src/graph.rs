//! Complete style of one graph.
//!
//! Structural operations (`append_curve_style`, `remove_curve_style`,
//! `set_num_curves`, `clear_curves`) keep every per-curve array the same
//! length as `common.num_curves()`.

use vx_core::{Real, Rgb};

use crate::axes::{AxesChange, AxesStyle};
use crate::common::StyleCommon;
use crate::curve::CurveStyle;
use crate::legend::{LegendChange, LegendStyle};
use crate::pen::{LineStyle, Pen};
use crate::point::{DEFAULT_POINT_SIZE, DEFAULT_SYMBOL, PointStyle, Symbol};
use crate::{StyleError, StyleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    Dispersion,
    Absorption,
    BandStructure,
}

impl GraphKind {
    pub const ALL: [GraphKind; 3] = [
        GraphKind::Dispersion,
        GraphKind::Absorption,
        GraphKind::BandStructure,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GraphKind::Dispersion => "Exciton Dispersion",
            GraphKind::Absorption => "Absorption Spectrum",
            GraphKind::BandStructure => "Exciton Band Structure",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    kind: GraphKind,
    common: StyleCommon,
    axes: AxesStyle,
    curves: CurveStyle,
    points: Option<PointStyle>,
    legend: Option<LegendStyle>,
    brush: Option<Rgb>,
    linked: Vec<GraphKind>,
    connect_styles: bool,
}

impl GraphStyle {
    /// Style for `kind` with its fixed set of parts: points on the dispersion
    /// and absorption graphs, a legend on the absorption graph, a fill brush on
    /// the band structure.
    pub fn new(kind: GraphKind) -> Self {
        let (points, legend, brush) = match kind {
            GraphKind::Dispersion => (Some(PointStyle::default()), None, None),
            GraphKind::Absorption => (
                Some(PointStyle::default()),
                Some(LegendStyle::default()),
                None,
            ),
            GraphKind::BandStructure => (None, None, Some(Rgb::ORANGE)),
        };
        Self {
            kind,
            common: StyleCommon::default(),
            axes: AxesStyle::default(),
            curves: CurveStyle::default(),
            points,
            legend,
            brush,
            linked: Vec::new(),
            connect_styles: false,
        }
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn common(&self) -> &StyleCommon {
        &self.common
    }

    pub fn axes(&self) -> &AxesStyle {
        &self.axes
    }

    pub fn curves(&self) -> &CurveStyle {
        &self.curves
    }

    pub fn points(&self) -> Option<&PointStyle> {
        self.points.as_ref()
    }

    pub fn legend(&self) -> Option<&LegendStyle> {
        self.legend.as_ref()
    }

    pub fn brush(&self) -> Option<Rgb> {
        self.brush
    }

    pub fn linked(&self) -> &[GraphKind] {
        &self.linked
    }

    pub fn connect_styles(&self) -> bool {
        self.connect_styles
    }

    pub fn num_curves(&self) -> usize {
        self.common.num_curves()
    }

    /// True when every per-curve array matches the curve count.
    pub fn is_consistent(&self) -> bool {
        let n = self.common.num_curves();
        self.curves.pens().len() == n
            && self
                .points
                .as_ref()
                .is_none_or(|p| p.symbols().len() == n && p.sizes().len() == n)
    }

    pub(crate) fn set_linked(&mut self, linked: Vec<GraphKind>) {
        self.linked = linked;
    }

    pub(crate) fn set_connect_flag(&mut self, connect: bool) {
        self.connect_styles = connect;
    }

    pub(crate) fn apply_axes(&mut self, change: &AxesChange) -> StyleResult<()> {
        self.axes.apply(change)
    }

    // --- structure -------------------------------------------------------

    /// One more curve; its pen takes colour `index` of the indexed palette.
    pub fn append_curve_style(&mut self, index: usize) {
        self.curves.push(Pen::indexed(index));
        if let Some(points) = &mut self.points {
            points.push(DEFAULT_SYMBOL, DEFAULT_POINT_SIZE);
        }
        self.common.increase_num_curves();
        tracing::debug!(graph = ?self.kind, n = self.common.num_curves(), "curve style appended");
    }

    pub fn remove_curve_style(&mut self, position: usize) -> StyleResult<()> {
        vx_core::check_index("curve style", position, self.common.num_curves())?;
        self.curves.remove(position);
        if let Some(points) = &mut self.points {
            points.remove(position);
        }
        self.common.decrease_num_curves();
        tracing::debug!(graph = ?self.kind, position, n = self.common.num_curves(), "curve style removed");
        Ok(())
    }

    /// Resize every per-curve array to `n`; new entries take the shared style.
    pub fn set_num_curves(&mut self, n: usize) {
        self.common.set_num_curves(n);
        self.curves.resize(n);
        if let Some(points) = &mut self.points {
            points.resize(n);
        }
    }

    pub fn clear_curves(&mut self) {
        self.set_num_curves(0);
    }

    /// Reset every curve to the shared pen (and shared symbol/size).
    pub fn apply_default_style(&mut self) {
        self.curves.set_common_palette(&self.common);
        if let Some(points) = &mut self.points {
            points.set_common_style(&self.common);
        }
    }

    // --- common ----------------------------------------------------------

    pub fn set_current_curve_index(&mut self, index: Option<usize>) -> StyleResult<()> {
        self.common.set_current_curve_index(index)
    }

    pub fn set_apply_to_all_curves(&mut self, apply: bool) {
        self.common.set_apply_to_all_curves(apply);
    }

    // --- lines -----------------------------------------------------------

    pub fn set_common_palette(&mut self) {
        self.curves.set_common_palette(&self.common);
    }

    pub fn set_gradient_palette(&mut self) {
        self.curves.set_gradient_palette(&self.common);
    }

    pub fn set_hue_range(&mut self, start: u16, end: u16) {
        self.curves.set_hue_range(start, end);
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.curves.set_line_style(&self.common, style);
    }

    pub fn set_line_color(&mut self, color: Rgb) {
        self.curves.set_line_color(&self.common, color);
    }

    pub fn set_line_width(&mut self, width: Real) {
        self.curves.set_line_width(&self.common, width);
    }

    pub fn current_pen(&self) -> Option<Pen> {
        self.curves.current_pen(&self.common)
    }

    // --- points ----------------------------------------------------------

    fn points_mut(&mut self) -> StyleResult<(&mut PointStyle, &StyleCommon)> {
        match &mut self.points {
            Some(points) => Ok((points, &self.common)),
            None => Err(StyleError::Unsupported {
                graph: self.kind,
                what: "point style",
            }),
        }
    }

    pub fn set_common_point_style(&mut self) -> StyleResult<()> {
        let (points, common) = self.points_mut()?;
        points.set_common_style(common);
        Ok(())
    }

    pub fn set_symbol_gradient(&mut self) -> StyleResult<()> {
        let (points, common) = self.points_mut()?;
        points.set_symbol_gradient(common);
        Ok(())
    }

    pub fn set_point_symbol(&mut self, symbol: Symbol) -> StyleResult<()> {
        let (points, common) = self.points_mut()?;
        points.set_symbol(common, symbol);
        Ok(())
    }

    pub fn set_point_size(&mut self, size: u32) -> StyleResult<()> {
        let (points, common) = self.points_mut()?;
        points.set_size(common, size);
        Ok(())
    }

    pub fn current_point_symbol(&self) -> Option<Symbol> {
        self.points.as_ref()?.current_symbol(&self.common)
    }

    pub fn current_point_size(&self) -> Option<u32> {
        self.points.as_ref()?.current_size(&self.common)
    }

    // --- legend / brush --------------------------------------------------

    pub fn apply_legend_change(&mut self, change: &LegendChange) -> StyleResult<()> {
        match &mut self.legend {
            Some(legend) => {
                legend.apply(change);
                Ok(())
            }
            None => Err(StyleError::Unsupported {
                graph: self.kind,
                what: "legend",
            }),
        }
    }

    pub fn set_brush_color(&mut self, color: Rgb) -> StyleResult<()> {
        match &mut self.brush {
            Some(brush) => {
                *brush = color;
                Ok(())
            }
            None => Err(StyleError::Unsupported {
                graph: self.kind,
                what: "fill brush",
            }),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Append(usize),
        Remove(usize),
        Resize(usize),
        Current(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..30).prop_map(Op::Append),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Resize),
            (0usize..8).prop_map(Op::Current),
        ]
    }

    proptest! {
        #[test]
        fn per_curve_arrays_track_curve_count(ops in prop::collection::vec(op(), 1..60)) {
            let mut g = GraphStyle::new(GraphKind::Absorption);
            for op in ops {
                match op {
                    Op::Append(i) => g.append_curve_style(i),
                    Op::Remove(p) => { let _ = g.remove_curve_style(p); }
                    Op::Resize(n) => g.set_num_curves(n),
                    Op::Current(i) => { let _ = g.set_current_curve_index(Some(i)); }
                }
                prop_assert!(g.is_consistent());
                prop_assert!(g.common().current_curve_index().is_none_or(|i| i < g.num_curves()));
            }
        }
    }
}
