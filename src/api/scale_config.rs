use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Knots, PowerScale};
use crate::error::ScaleResult;

/// Serializable power-scale setup.
///
/// Hosts persist and reload scales through this type; missing fields fall
/// back to the `PowerScale::new()` defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerScaleConfig {
    #[serde(default = "default_exponent")]
    pub exponent: f64,
    #[serde(default)]
    pub domain: Knots,
    #[serde(default)]
    pub range: Knots,
    #[serde(default)]
    pub clamp: bool,
    #[serde(default)]
    pub round: bool,
}

impl Default for PowerScaleConfig {
    fn default() -> Self {
        Self {
            exponent: default_exponent(),
            domain: Knots::default(),
            range: Knots::default(),
            clamp: false,
            round: false,
        }
    }
}

impl PowerScaleConfig {
    /// Sets the exponent.
    #[must_use]
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Sets domain and range knots.
    #[must_use]
    pub fn with_knots(mut self, domain: Knots, range: Knots) -> Self {
        self.domain = domain;
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }
}

impl PowerScale {
    /// Builds a scale from a config, applying the same validation as the setters.
    pub fn from_config(config: &PowerScaleConfig) -> ScaleResult<Self> {
        let mut scale = Self::with_exponent(config.exponent)?;
        scale.set_knots(config.domain.to_values(), config.range.to_values())?;
        if config.round {
            scale.set_range_round(config.range.to_values())?;
        }
        scale.set_clamp(config.clamp);
        debug!(
            exponent = config.exponent,
            knots = config.domain.len(),
            clamp = config.clamp,
            round = config.round,
            "power scale from config"
        );
        Ok(scale)
    }

    #[must_use]
    pub fn to_config(&self) -> PowerScaleConfig {
        PowerScaleConfig {
            exponent: self.exponent(),
            domain: self.domain().clone(),
            range: self.range().clone(),
            clamp: self.clamp(),
            round: self.is_round(),
        }
    }
}

fn default_exponent() -> f64 {
    1.0
}
