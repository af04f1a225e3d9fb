use serde::{Deserialize, Serialize};

use crate::core::PowerScale;
use crate::error::{ScaleError, ScaleResult};

use super::PowerScaleConfig;

pub const POWER_SCALE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerScaleConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: PowerScaleConfig,
}

impl PowerScaleConfig {
    pub fn to_json_pretty(&self) -> ScaleResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ScaleError::InvalidData(format!("failed to serialize scale config json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ScaleResult<String> {
        let payload = PowerScaleConfigJsonContractV1 {
            schema_version: POWER_SCALE_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ScaleError::InvalidData(format!("failed to serialize scale config contract v1: {e}"))
        })
    }

    /// Parses either a bare config or a versioned v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ScaleResult<Self> {
        if let Ok(payload) = serde_json::from_str::<PowerScaleConfigJsonContractV1>(input) {
            if payload.schema_version != POWER_SCALE_CONFIG_JSON_SCHEMA_V1 {
                return Err(ScaleError::InvalidData(format!(
                    "unsupported scale config schema version: {}",
                    payload.schema_version
                )));
            }
            return Ok(payload.config);
        }
        serde_json::from_str::<Self>(input).map_err(|e| {
            ScaleError::InvalidData(format!("failed to parse scale config json payload: {e}"))
        })
    }
}

impl PowerScale {
    pub fn to_json_contract_v1_pretty(&self) -> ScaleResult<String> {
        self.to_config().to_json_contract_v1_pretty()
    }

    /// Restores a scale from JSON accepted by [`PowerScaleConfig::from_json_compat_str`].
    pub fn from_json_compat_str(input: &str) -> ScaleResult<Self> {
        let config = PowerScaleConfig::from_json_compat_str(input)?;
        Self::from_config(&config)
    }
}
