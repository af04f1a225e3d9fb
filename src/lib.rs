//! powscale-rs: power scales for chart axes.
//!
//! The `core` layer holds the pure numeric mapping (signed power transform,
//! piecewise-linear knots, round tick steps). The `api` layer adds what hosts
//! need around it: tick label formatting and serializable configuration.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{PowerScaleConfig, TickFormatter};
pub use crate::core::{Knots, PowerScale, Rgb, ScaleValue};
pub use error::{ScaleError, ScaleResult};
