mod json_contract;
mod number_format;
mod scale_config;
mod tick_format;

pub use json_contract::{POWER_SCALE_CONFIG_JSON_SCHEMA_V1, PowerScaleConfigJsonContractV1};
pub use number_format::{FormatKind, NumberFormat, SiPrefix, SignMode};
pub use scale_config::PowerScaleConfig;
pub use tick_format::TickFormatter;
