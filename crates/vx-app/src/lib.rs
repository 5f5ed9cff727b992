//! Shared application layer for visual-excitons.
//!
//! Owns the absorption curve cache and the orchestration of backend calls, and
//! wires the resulting notifications to the style model and to any rendering
//! surface subscribed on the bus.

pub mod calculations;
pub mod curves;
pub mod error;
pub mod notify;
pub mod session;
pub mod style_editor;

pub use calculations::{Calculations, DispersionPlot};
pub use curves::{CurveCache, CurveRecord, PointTag};
pub use error::{AppError, AppResult};
pub use notify::{Notification, NotificationKind};
pub use session::Session;
pub use style_editor::StyleEditor;
