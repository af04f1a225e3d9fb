use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::color::Rgb;
use crate::error::{ScaleError, ScaleResult};

/// A single domain or range breakpoint, or a value produced by a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleValue {
    Number(f64),
    Text(String),
    Color(Rgb),
}

impl ScaleValue {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Color(_) => "color",
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) | Self::Color(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) | Self::Color(_) => None,
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<Rgb> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Number(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ScaleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Color(color) => write!(f, "{color}"),
        }
    }
}

impl From<f64> for ScaleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for ScaleValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for ScaleValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ScaleValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for ScaleValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for ScaleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ScaleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Rgb> for ScaleValue {
    fn from(value: Rgb) -> Self {
        Self::Color(value)
    }
}

/// Homogeneous knot sequence backing a scale domain or range.
///
/// Every sequence carries one value type; mixed input is rejected when the
/// knots are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Knots {
    Number(Vec<f64>),
    Text(Vec<String>),
    Color(Vec<Rgb>),
}

impl Default for Knots {
    fn default() -> Self {
        Self::Number(vec![0.0, 1.0])
    }
}

impl Knots {
    /// Resolves arbitrary values into a single-typed sequence of at least two knots.
    pub fn from_values<I, V>(values: I) -> ScaleResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScaleValue>,
    {
        let values: Vec<ScaleValue> = values.into_iter().map(Into::into).collect();
        if values.len() < 2 {
            return Err(ScaleError::TooFewKnots { len: values.len() });
        }

        let expected = values[0].kind();
        if let Some((index, found)) = values
            .iter()
            .enumerate()
            .find(|(_, value)| value.kind() != expected)
        {
            return Err(ScaleError::MixedKnotTypes {
                expected,
                found: found.kind(),
                index,
            });
        }

        let knots = match values[0] {
            ScaleValue::Number(_) => {
                Self::Number(values.iter().filter_map(ScaleValue::as_number).collect())
            }
            ScaleValue::Text(_) => Self::Text(
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        ScaleValue::Text(text) => Some(text),
                        ScaleValue::Number(_) | ScaleValue::Color(_) => None,
                    })
                    .collect(),
            ),
            ScaleValue::Color(_) => {
                Self::Color(values.iter().filter_map(ScaleValue::as_color).collect())
            }
        };
        knots.validate()?;
        Ok(knots)
    }

    pub(crate) fn validate(&self) -> ScaleResult<()> {
        if self.len() < 2 {
            return Err(ScaleError::TooFewKnots { len: self.len() });
        }
        if let Self::Number(values) = self {
            if let Some(index) = values.iter().position(|value| !value.is_finite()) {
                return Err(ScaleError::InvalidData(format!(
                    "knot {index} must be finite"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Number(values) => values.len(),
            Self::Text(values) => values.len(),
            Self::Color(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Color(_) => "color",
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<ScaleValue> {
        match self {
            Self::Number(values) => values.get(index).copied().map(ScaleValue::Number),
            Self::Text(values) => values.get(index).cloned().map(ScaleValue::Text),
            Self::Color(values) => values.get(index).copied().map(ScaleValue::Color),
        }
    }

    #[must_use]
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Self::Number(values) => Some(values),
            Self::Text(_) | Self::Color(_) => None,
        }
    }

    #[must_use]
    pub fn to_values(&self) -> Vec<ScaleValue> {
        (0..self.len()).filter_map(|index| self.get(index)).collect()
    }
}
