//! One interactive session: options, backend, curve cache, styles and the
//! notification bus, wired together.
//!
//! Orchestrator notifications pass through [`Session`] on their way to the
//! bus. Those that change the number of curves resize the style arrays first,
//! so subscribers always see styles whose lengths match the data.

use std::path::Path;

use vx_backend::ExcitonBackend;
use vx_core::{Bus, Real, Rgb, Subscription};
use vx_params::{
    DirStatus, DirectoryProbe, FsProbe, MomentumPath, Options, OptionsConfig, ParameterSet,
    ParamsResult,
};
use vx_style::{
    AxesChange, AxesElement, Font, GraphKind, GraphStyle, GraphStyles, LegendChange, StyleResult,
};

use crate::calculations::Calculations;
use crate::curves::PointTag;
use crate::error::{AppError, AppResult};
use crate::notify::{Notification, NotificationKind};
use crate::style_editor::StyleEditor;

pub struct Session<B: ExcitonBackend> {
    options: Options,
    backend: B,
    probe: Box<dyn DirectoryProbe>,
    calculations: Calculations,
    styles: GraphStyles,
    editor: StyleEditor,
    bus: Bus<Notification>,
}

impl<B: ExcitonBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_probe(backend, Box::new(FsProbe))
    }

    pub fn with_probe(backend: B, probe: Box<dyn DirectoryProbe>) -> Self {
        Self {
            options: Options::default(),
            backend,
            probe,
            calculations: Calculations::new(),
            styles: GraphStyles::default(),
            editor: StyleEditor::default(),
            bus: Bus::new(),
        }
    }

    /// Start from a YAML start-up config. Directory checks are returned for
    /// display; invalid directories are not an error.
    pub fn from_config(
        config: &OptionsConfig,
        backend: B,
        probe: Box<dyn DirectoryProbe>,
    ) -> AppResult<(Self, Vec<DirStatus>)> {
        let (options, statuses) = Options::from_config(config, probe.as_ref())?;
        let mut session = Self::with_probe(backend, probe);
        session.options = options;
        Ok((session, statuses))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn calculations(&self) -> &Calculations {
        &self.calculations
    }

    pub fn styles(&self) -> &GraphStyles {
        &self.styles
    }

    pub fn style(&self, graph: GraphKind) -> &GraphStyle {
        self.styles.get(graph)
    }

    pub fn editor(&self) -> &StyleEditor {
        &self.editor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Bus
    // ------------------------------------------------------------------

    pub fn subscribe(
        &mut self,
        kind: NotificationKind,
        handler: impl FnMut(&Notification) + 'static,
    ) -> Subscription {
        self.bus.subscribe(kind, handler)
    }

    pub fn subscribe_all(&mut self, handler: impl FnMut(&Notification) + 'static) -> Subscription {
        self.bus.subscribe_all(handler)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.bus.unsubscribe(subscription)
    }

    fn publish(&mut self, n: Notification) {
        route(&mut self.styles, &mut self.bus, n);
    }

    /// Run an orchestrator operation with notifications routed through the
    /// style model to the bus.
    fn dispatch<R>(
        &mut self,
        f: impl FnOnce(&mut Calculations, &Options, &dyn ExcitonBackend, &mut dyn FnMut(Notification)) -> R,
    ) -> R {
        let Self {
            options,
            backend,
            calculations,
            styles,
            bus,
            ..
        } = self;
        let mut emit = |n: Notification| route(styles, bus, n);
        f(calculations, options, &*backend, &mut emit)
    }

    // ------------------------------------------------------------------
    // Computations
    // ------------------------------------------------------------------

    pub fn compute_dispersion(&mut self) -> AppResult<()> {
        self.dispatch(|calc, options, backend, emit| calc.compute_dispersion(options, backend, emit))
    }

    /// Points picked on `graph`. On the dispersion graph the first point
    /// selects its absorption curve; on both dispersion and absorption graphs
    /// the points request a band structure.
    pub fn handle_selection(
        &mut self,
        graph: GraphKind,
        tags: Vec<PointTag>,
        toggle: bool,
    ) -> AppResult<()> {
        let Some(first) = tags.first().copied() else {
            return Err(AppError::InvalidSelection {
                what: "no points selected".to_string(),
            });
        };
        if graph == GraphKind::BandStructure {
            return Err(AppError::InvalidSelection {
                what: "band structure points are not selectable".to_string(),
            });
        }

        self.publish(Notification::Selection {
            graph,
            tags: tags.clone(),
            toggle,
        });

        if graph == GraphKind::Dispersion {
            self.dispatch(|calc, options, backend, emit| {
                calc.select_momentum_point(options, backend, first.source_index, toggle, emit)
            })?;
        }
        self.dispatch(|calc, options, backend, emit| {
            calc.compute_band_structure(options, backend, &tags, emit)
        })
    }

    pub fn toggle_labels(&mut self, visible: bool) {
        self.dispatch(|calc, _, _, emit| calc.toggle_labels(visible, emit));
    }

    pub fn set_weight_factor(&mut self, factor: Real) {
        self.dispatch(|calc, _, _, emit| calc.set_weight_factor(factor, emit));
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Edit the parameters, then recompute every active curve.
    pub fn edit_parameters(&mut self, edit: impl FnOnce(&mut ParameterSet)) -> AppResult<()> {
        edit(&mut self.options.parameters);
        self.parameters_changed()
    }

    pub fn set_energy_min(&mut self, v: Real) -> AppResult<()> {
        self.edit_parameters(|p| p.set_energy_min(v))
    }

    pub fn set_energy_max(&mut self, v: Real) -> AppResult<()> {
        self.edit_parameters(|p| p.set_energy_max(v))
    }

    pub fn set_energy_step(&mut self, v: Real) -> AppResult<()> {
        self.edit_parameters(|p| p.set_energy_step(v))
    }

    pub fn set_exciton_count(&mut self, n: i64) -> AppResult<()> {
        self.edit_parameters(|p| p.set_exciton_count(n))
    }

    pub fn set_min_bright_intensity(&mut self, v: Real) -> AppResult<()> {
        self.edit_parameters(|p| p.set_min_bright_intensity(v))
    }

    pub fn parameters_changed(&mut self) -> AppResult<()> {
        self.publish(Notification::ParametersChanged);
        self.dispatch(|calc, options, backend, emit| calc.recompute_all(options, backend, emit))
    }

    /// Edit the momentum path. Takes effect at the next dispersion.
    pub fn edit_q_path<T>(
        &mut self,
        edit: impl FnOnce(&mut MomentumPath) -> ParamsResult<T>,
    ) -> AppResult<T> {
        Ok(edit(&mut self.options.q_path)?)
    }

    // ------------------------------------------------------------------
    // Directories
    // ------------------------------------------------------------------

    pub fn set_save_dir(&mut self, dir: impl AsRef<Path>) -> DirStatus {
        let status = self.options.dirs.set_save_dir(self.probe.as_ref(), dir);
        self.publish(Notification::DirectoryStatus(status.clone()));
        status
    }

    pub fn set_diago_dir(&mut self, dir: impl AsRef<Path>) -> DirStatus {
        let status = self.options.dirs.set_diago_dir(self.probe.as_ref(), dir);
        self.publish(Notification::DirectoryStatus(status.clone()));
        if status.valid {
            let n = self.options.dirs.n_qpoints();
            self.publish(Notification::QPointCountChanged(n));
        }
        status
    }

    pub fn set_qp_dir(&mut self, dir: impl AsRef<Path>) -> DirStatus {
        let status = self.options.dirs.set_qp_dir(self.probe.as_ref(), dir);
        self.publish(Notification::DirectoryStatus(status.clone()));
        status
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Apply a style edit to `graph`, announce it and redraw its data.
    pub fn edit_style(
        &mut self,
        graph: GraphKind,
        edit: impl FnOnce(&mut GraphStyle) -> StyleResult<()>,
    ) -> AppResult<()> {
        edit(self.styles.get_mut(graph))?;
        self.publish(Notification::StyleChanged(graph));
        self.redraw(graph);
        Ok(())
    }

    fn redraw(&mut self, graph: GraphKind) {
        let Self {
            calculations,
            styles,
            bus,
            ..
        } = self;
        calculations.emit_current(graph, &mut |n: Notification| route(styles, bus, n));
    }

    /// Pick the curve single-curve edits apply to (a click on a curve).
    pub fn set_current_curve(&mut self, graph: GraphKind, index: Option<usize>) -> AppResult<()> {
        self.styles.get_mut(graph).set_current_curve_index(index)?;
        self.publish(Notification::CurrentCurveChanged(graph));
        Ok(())
    }

    pub fn set_apply_to_all_curves(&mut self, graph: GraphKind, apply: bool) {
        self.styles.get_mut(graph).set_apply_to_all_curves(apply);
        self.publish(Notification::CurrentCurveChanged(graph));
    }

    /// Apply an axes edit to the graph in the editor and, while it
    /// broadcasts, to its linked graphs.
    pub fn apply_axes_change(&mut self, change: AxesChange) -> AppResult<Vec<GraphKind>> {
        let graphs = self
            .styles
            .apply_axes_change(self.editor.active(), &change)?;
        for graph in &graphs {
            self.publish(Notification::AxesChanged {
                graph: *graph,
                change: change.clone(),
            });
        }
        Ok(graphs)
    }

    pub fn set_axes_color(&mut self, color: Rgb) -> AppResult<Vec<GraphKind>> {
        self.apply_axes_change(self.editor.color_change(color))
    }

    pub fn set_axes_font(&mut self, font: Font) -> AppResult<Vec<GraphKind>> {
        self.apply_axes_change(self.editor.font_change(font))
    }

    pub fn set_axes_width(&mut self, width: Real) -> AppResult<Vec<GraphKind>> {
        self.apply_axes_change(self.editor.width_change(width))
    }

    pub fn select_axes_element(&mut self, element: AxesElement) {
        self.editor.select_element(element);
    }

    pub fn apply_legend_change(&mut self, change: LegendChange) -> AppResult<()> {
        self.styles
            .get_mut(GraphKind::Absorption)
            .apply_legend_change(&change)?;
        self.publish(Notification::LegendChanged(change));
        Ok(())
    }

    pub fn switch_style_graph(&mut self, next: GraphKind) -> AppResult<()> {
        self.editor.switch_graph(&mut self.styles, next)
    }

    pub fn set_style_all_graphs(&mut self, all: bool) -> AppResult<()> {
        self.editor.set_all_graphs(&mut self.styles, all)
    }
}

/// Resize the style arrays a notification calls for, then publish it. A
/// resize is followed by a style-changed notice for the graph.
fn route(styles: &mut GraphStyles, bus: &mut Bus<Notification>, n: Notification) {
    let resized = apply_structure(styles, &n);
    bus.publish(&n);
    if let Some(graph) = resized {
        bus.publish(&Notification::StyleChanged(graph));
    }
}

fn apply_structure(styles: &mut GraphStyles, n: &Notification) -> Option<GraphKind> {
    let graph = n.resizes()?;
    let style = styles.get_mut(graph);
    match n {
        Notification::CurveCountChanged { n, .. } => style.set_num_curves(*n),
        Notification::DispersionInit | Notification::BandStructureInit => {
            style.apply_default_style()
        }
        Notification::CurveAppended { q } => style.append_curve_style(q.as_usize()),
        Notification::CurveRemoved { position } => {
            if let Err(e) = style.remove_curve_style(*position) {
                tracing::warn!(error = %e, "curve style out of step with curve cache");
            }
        }
        Notification::AbsorptionClear | Notification::BandStructureClear => style.clear_curves(),
        _ => {}
    }
    Some(graph)
}
