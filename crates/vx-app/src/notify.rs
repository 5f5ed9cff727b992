//! Change notifications published on the session bus.

use std::rc::Rc;

use vx_core::{QIndex, Real, Topic};
use vx_params::DirStatus;
use vx_style::{AxesChange, GraphKind, LegendChange};

use crate::calculations::DispersionPlot;
use crate::curves::{CurveRecord, PointTag};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Tick positions and labels of the path vertices.
    QPathReady {
        distances: Vec<Real>,
        labels: Vec<String>,
    },
    DispersionRange {
        x: (Real, Real),
        y: (Real, Real),
    },
    CurveCountChanged {
        graph: GraphKind,
        n: usize,
    },
    DispersionInit,
    DispersionReady(Rc<DispersionPlot>),
    CurveAppended {
        q: QIndex,
    },
    CurveRemoved {
        position: usize,
    },
    /// The full set of active absorption curves.
    AbsorptionReady {
        curves: Vec<CurveRecord>,
        show_labels: bool,
    },
    AbsorptionClear,
    BandStructureInit,
    BandStructureReady {
        k: Vec<Real>,
        bands: Vec<Vec<Real>>,
        weights: Vec<Vec<Real>>,
    },
    BandStructureClear,
    /// A point selection on `graph`; `toggle` pins or unpins the curve.
    Selection {
        graph: GraphKind,
        tags: Vec<PointTag>,
        toggle: bool,
    },
    ParametersChanged,
    StyleChanged(GraphKind),
    AxesChanged {
        graph: GraphKind,
        change: AxesChange,
    },
    LegendChanged(LegendChange),
    CurrentCurveChanged(GraphKind),
    DirectoryStatus(DirStatus),
    QPointCountChanged(usize),
    Advisory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    QPathReady,
    DispersionRange,
    CurveCountChanged,
    DispersionInit,
    DispersionReady,
    CurveAppended,
    CurveRemoved,
    AbsorptionReady,
    AbsorptionClear,
    BandStructureInit,
    BandStructureReady,
    BandStructureClear,
    Selection,
    ParametersChanged,
    StyleChanged,
    AxesChanged,
    LegendChanged,
    CurrentCurveChanged,
    DirectoryStatus,
    QPointCountChanged,
    Advisory,
}

impl Topic for Notification {
    type Kind = NotificationKind;

    fn kind(&self) -> NotificationKind {
        use Notification as N;
        use NotificationKind as K;
        match self {
            N::QPathReady { .. } => K::QPathReady,
            N::DispersionRange { .. } => K::DispersionRange,
            N::CurveCountChanged { .. } => K::CurveCountChanged,
            N::DispersionInit => K::DispersionInit,
            N::DispersionReady(_) => K::DispersionReady,
            N::CurveAppended { .. } => K::CurveAppended,
            N::CurveRemoved { .. } => K::CurveRemoved,
            N::AbsorptionReady { .. } => K::AbsorptionReady,
            N::AbsorptionClear => K::AbsorptionClear,
            N::BandStructureInit => K::BandStructureInit,
            N::BandStructureReady { .. } => K::BandStructureReady,
            N::BandStructureClear => K::BandStructureClear,
            N::Selection { .. } => K::Selection,
            N::ParametersChanged => K::ParametersChanged,
            N::StyleChanged(_) => K::StyleChanged,
            N::AxesChanged { .. } => K::AxesChanged,
            N::LegendChanged(_) => K::LegendChanged,
            N::CurrentCurveChanged(_) => K::CurrentCurveChanged,
            N::DirectoryStatus(_) => K::DirectoryStatus,
            N::QPointCountChanged(_) => K::QPointCountChanged,
            N::Advisory(_) => K::Advisory,
        }
    }
}

impl Notification {
    /// The graph whose per-curve style arrays this notification resizes, if
    /// any.
    pub fn resizes(&self) -> Option<GraphKind> {
        match self {
            Notification::CurveCountChanged { graph, .. } => Some(*graph),
            Notification::DispersionInit => Some(GraphKind::Dispersion),
            Notification::CurveAppended { .. }
            | Notification::CurveRemoved { .. }
            | Notification::AbsorptionClear => Some(GraphKind::Absorption),
            Notification::BandStructureInit | Notification::BandStructureClear => {
                Some(GraphKind::BandStructure)
            }
            _ => None,
        }
    }
}
