use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// 8-bit RGB color used by color ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Component-wise interpolation; `t` outside `[0, 1]` extrapolates and
    /// saturates at the channel bounds.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
        }
    }

    /// Parses a CSS color: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
    /// `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()` or a keyword.
    ///
    /// Alpha is discarded. Bare hex digits without `#` are not colors, so
    /// text such as `"100"` or `"bad"` stays text.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let text = input.trim().to_ascii_lowercase();
        if !looks_like_color(&text) {
            return None;
        }
        let [r, g, b, _alpha] = csscolorparser::parse(&text).ok()?.to_rgba8();
        Some(Self::new(r, g, b))
    }
}

fn looks_like_color(text: &str) -> bool {
    const FUNCTIONS: [&str; 5] = ["rgb(", "rgba(", "hsl(", "hsla(", "hwb("];
    if text.starts_with('#') || FUNCTIONS.iter().any(|prefix| text.starts_with(prefix)) {
        return true;
    }
    text.chars().all(|ch| ch.is_ascii_alphabetic())
        && !text.chars().all(|ch| ch.is_ascii_hexdigit())
}

impl FromStr for Rgb {
    type Err = ScaleError;

    fn from_str(s: &str) -> ScaleResult<Self> {
        Self::parse(s).ok_or_else(|| ScaleError::InvalidData(format!("not a color: {s:?}")))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    value.round().clamp(0.0, 255.0) as u8
}
