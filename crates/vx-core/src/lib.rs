//! vx-core: stable foundation for visual-excitons.
//!
//! Contains:
//! - error (shared error types)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact ids for momentum points and subscriptions)
//! - color (RGB colours, HSV construction, indexed palette)
//! - bus (synchronous typed notification bus)

pub mod bus;
pub mod color;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use bus::{Bus, Subscription, Topic};
pub use color::Rgb;
pub use error::{VxError, VxResult, check_index};
pub use ids::*;
pub use numeric::*;
