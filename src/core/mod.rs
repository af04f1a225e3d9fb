pub mod color;
mod interpolate;
pub mod knots;
pub mod power_scale;
pub mod ticks;

pub use color::Rgb;
pub use knots::{Knots, ScaleValue};
pub use power_scale::{PowerScale, SQRT_EXPONENT, signed_pow};
pub use ticks::{DEFAULT_TICK_COUNT, NiceStep, TickRange, nice_step, tick_range};
