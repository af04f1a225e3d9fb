use std::fmt;
use std::str::FromStr;

use crate::error::{ScaleError, ScaleResult};

const DEFAULT_TYPED_PRECISION: usize = 6;

/// How the sign of non-negative values is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMode {
    /// Only negative values carry a sign.
    #[default]
    Minus,
    /// Non-negative values get `+`.
    Plus,
    /// Non-negative values get a leading space.
    Space,
}

/// Presentation type of a [`NumberFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatKind {
    /// Shortest representation; with a precision, significant digits without trailing zeros.
    #[default]
    Shortest,
    /// `f`: fixed decimals.
    Fixed,
    /// `e`: exponent notation.
    Exponent,
    /// `g`: significant digits, exponent notation for very large/small values.
    General,
    /// `r`: significant digits, always fixed notation.
    Rounded,
    /// `%`: multiply by 100, fixed decimals, `%` suffix.
    Percent,
    /// `p`: multiply by 100, significant digits, `%` suffix.
    PercentRounded,
    /// `d`: rounded integer.
    Integer,
    /// `s`: significant digits with an SI prefix symbol.
    SiPrefix,
}

impl FormatKind {
    fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            'f' => Self::Fixed,
            'e' => Self::Exponent,
            'g' => Self::General,
            'r' => Self::Rounded,
            '%' => Self::Percent,
            'p' => Self::PercentRounded,
            'd' => Self::Integer,
            's' => Self::SiPrefix,
            _ => return None,
        })
    }

    fn as_char(self) -> Option<char> {
        match self {
            Self::Shortest => None,
            Self::Fixed => Some('f'),
            Self::Exponent => Some('e'),
            Self::General => Some('g'),
            Self::Rounded => Some('r'),
            Self::Percent => Some('%'),
            Self::PercentRounded => Some('p'),
            Self::Integer => Some('d'),
            Self::SiPrefix => Some('s'),
        }
    }

    /// Kinds whose precision counts significant digits rather than decimals.
    #[must_use]
    pub fn is_significant(self) -> bool {
        matches!(
            self,
            Self::Exponent | Self::General | Self::Rounded | Self::PercentRounded | Self::SiPrefix
        )
    }
}

/// Numeric formatter parsed from a d3-style specifier
/// `[sign][$][0][width][,][.precision][type]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberFormat {
    pub sign: SignMode,
    pub currency: bool,
    pub zero_pad: bool,
    pub width: usize,
    pub grouping: bool,
    pub precision: Option<usize>,
    pub kind: FormatKind,
}

impl NumberFormat {
    pub fn parse(specifier: &str) -> ScaleResult<Self> {
        let invalid = || ScaleError::InvalidFormatSpecifier(specifier.to_owned());
        let mut format = Self::default();
        let mut chars = specifier.chars().peekable();

        match chars.peek().copied() {
            Some('-') => {
                chars.next();
            }
            Some('+') => {
                format.sign = SignMode::Plus;
                chars.next();
            }
            Some(' ') => {
                format.sign = SignMode::Space;
                chars.next();
            }
            _ => {}
        }
        if chars.peek() == Some(&'$') {
            format.currency = true;
            chars.next();
        }
        if chars.peek() == Some(&'0') {
            format.zero_pad = true;
            chars.next();
        }
        let mut width = String::new();
        while let Some(ch) = chars.peek().copied().filter(char::is_ascii_digit) {
            width.push(ch);
            chars.next();
        }
        if !width.is_empty() {
            format.width = width.parse().map_err(|_| invalid())?;
        }
        if chars.peek() == Some(&',') {
            format.grouping = true;
            chars.next();
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut digits = String::new();
            while let Some(ch) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(ch);
                chars.next();
            }
            if digits.is_empty() {
                return Err(invalid());
            }
            format.precision = Some(digits.parse().map_err(|_| invalid())?);
        }
        if let Some(ch) = chars.next() {
            format.kind = FormatKind::from_char(ch).ok_or_else(invalid)?;
        }
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(format)
    }

    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: FormatKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        self.format_with_suffix(value, "")
    }

    /// Formats `value` and appends `suffix` before width padding is applied.
    #[must_use]
    pub fn format_with_suffix(&self, value: f64, suffix: &str) -> String {
        if value.is_nan() {
            return "NaN".to_owned();
        }

        let negative = value.is_sign_negative();
        let magnitude = value.abs();
        let (mut body, kind_suffix) = self.format_magnitude(magnitude);
        if self.grouping {
            body = group_thousands(&body);
        }
        let negative = negative
            && (magnitude.is_infinite() || body.bytes().any(|byte| matches!(byte, b'1'..=b'9')));

        let mut prefix = String::new();
        match (negative, self.sign) {
            (true, _) => prefix.push('-'),
            (false, SignMode::Plus) => prefix.push('+'),
            (false, SignMode::Space) => prefix.push(' '),
            (false, SignMode::Minus) => {}
        }
        if self.currency {
            prefix.push('$');
        }

        let tail = format!("{body}{kind_suffix}{suffix}");
        let length = prefix.chars().count() + tail.chars().count();
        let padding = self.width.saturating_sub(length);
        if self.zero_pad {
            format!("{prefix}{}{tail}", "0".repeat(padding))
        } else {
            format!("{}{prefix}{tail}", " ".repeat(padding))
        }
    }

    fn format_magnitude(&self, magnitude: f64) -> (String, String) {
        if magnitude.is_infinite() {
            return ("Infinity".to_owned(), String::new());
        }
        let typed_precision = self.precision.unwrap_or(DEFAULT_TYPED_PRECISION);
        match self.kind {
            FormatKind::Shortest => match self.precision {
                Some(precision) => (trim_fraction(&to_precision(magnitude, precision)), String::new()),
                None => (to_shortest(magnitude), String::new()),
            },
            FormatKind::Fixed => (to_fixed(magnitude, typed_precision), String::new()),
            FormatKind::Exponent => (to_exponential(magnitude, typed_precision), String::new()),
            FormatKind::General => (to_precision(magnitude, typed_precision), String::new()),
            FormatKind::Rounded => (to_rounded(magnitude, typed_precision), String::new()),
            FormatKind::Percent => (to_fixed(magnitude * 100.0, typed_precision), "%".to_owned()),
            FormatKind::PercentRounded => {
                (to_rounded(magnitude * 100.0, typed_precision), "%".to_owned())
            }
            FormatKind::Integer => (to_fixed(magnitude.round(), 0), String::new()),
            FormatKind::SiPrefix => {
                let prefix = SiPrefix::for_value(magnitude);
                (
                    to_rounded(prefix.scale(magnitude), typed_precision),
                    prefix.symbol().to_owned(),
                )
            }
        }
    }
}

impl FromStr for NumberFormat {
    type Err = ScaleError;

    fn from_str(s: &str) -> ScaleResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            SignMode::Minus => {}
            SignMode::Plus => f.write_str("+")?,
            SignMode::Space => f.write_str(" ")?,
        }
        if self.currency {
            f.write_str("$")?;
        }
        if self.zero_pad {
            f.write_str("0")?;
        }
        if self.width > 0 {
            write!(f, "{}", self.width)?;
        }
        if self.grouping {
            f.write_str(",")?;
        }
        if let Some(precision) = self.precision {
            write!(f, ".{precision}")?;
        }
        if let Some(ch) = self.kind.as_char() {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// SI prefix (`k`, `M`, `µ`, ...) selected from a value's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiPrefix {
    exponent: i32,
}

const SI_SYMBOLS: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

impl SiPrefix {
    #[must_use]
    pub fn for_value(value: f64) -> Self {
        let value = value.abs();
        if value == 0.0 || !value.is_finite() {
            return Self { exponent: 0 };
        }
        let digits = 1 + (1e-12 + value.log10()).floor() as i32;
        let exponent = ((digits - 1).div_euclid(3) * 3).clamp(-24, 24);
        Self { exponent }
    }

    #[must_use]
    pub fn exponent(self) -> i32 {
        self.exponent
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        let index = usize::try_from((self.exponent + 24) / 3).unwrap_or(8);
        SI_SYMBOLS.get(index).copied().unwrap_or("")
    }

    #[must_use]
    pub fn scale(self, value: f64) -> f64 {
        if self.exponent >= 0 {
            value / 10_f64.powi(self.exponent)
        } else {
            value * 10_f64.powi(-self.exponent)
        }
    }
}

/// Shortest round-trip digits, switching to exponent notation outside
/// `1e-7 <= value < 1e21` the way JavaScript prints numbers.
fn to_shortest(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let text = format!("{value:e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-7..21).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{}", exponent.unsigned_abs())
    }
}

fn to_fixed(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Exponent of `value` after rounding to `significant` digits.
fn decimal_exponent(value: f64, significant: usize) -> i32 {
    let digits = significant.max(1) - 1;
    let text = format!("{value:.digits$e}");
    text.split_once('e')
        .and_then(|(_, exponent)| exponent.parse().ok())
        .unwrap_or(0)
}

fn to_exponential(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{}", exponent.unsigned_abs())
        }
        None => text,
    }
}

fn to_precision(value: f64, significant: usize) -> String {
    let significant = significant.max(1);
    if value == 0.0 {
        return to_fixed(0.0, significant - 1);
    }
    let exponent = decimal_exponent(value, significant);
    if exponent < -6 || exponent >= significant as i32 {
        to_exponential(value, significant - 1)
    } else {
        let decimals = usize::try_from(significant as i32 - 1 - exponent).unwrap_or(0);
        to_fixed(value, decimals)
    }
}

fn to_rounded(value: f64, significant: usize) -> String {
    let significant = significant.max(1);
    if value == 0.0 {
        return "0".to_owned();
    }
    let exponent = decimal_exponent(value, significant);
    let drop = exponent - (significant as i32 - 1);
    if drop > 0 {
        let factor = 10_f64.powi(drop);
        to_fixed((value / factor).round() * factor, 0)
    } else {
        to_fixed(value, drop.unsigned_abs() as usize)
    }
}

fn trim_fraction(text: &str) -> String {
    let (number, exponent) = match text.find('e') {
        Some(index) => text.split_at(index),
        None => (text, ""),
    };
    let number = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    format!("{number}{exponent}")
}

fn group_thousands(body: &str) -> String {
    let split = body
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(body.len());
    let (integer, rest) = body.split_at(split);
    if integer.len() <= 3 {
        return body.to_owned();
    }

    let mut grouped = String::with_capacity(body.len() + integer.len() / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(rest);
    grouped
}
