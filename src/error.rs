use thiserror::Error;

pub type ScaleResult<T> = Result<T, ScaleError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScaleError {
    #[error("invalid exponent: {0} (must be finite and > 0)")]
    InvalidExponent(f64),

    #[error("scale needs at least 2 knots, got {len}")]
    TooFewKnots { len: usize },

    #[error("domain/range knot count mismatch: domain={domain}, range={range}")]
    KnotCountMismatch { domain: usize, range: usize },

    #[error("mixed knot types: expected {expected}, found {found} at index {index}")]
    MixedKnotTypes {
        expected: &'static str,
        found: &'static str,
        index: usize,
    },

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("range is not numeric ({kind}); operation needs number knots")]
    NonNumericRange { kind: &'static str },

    #[error("invalid format specifier: {0:?}")]
    InvalidFormatSpecifier(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
