use smallvec::SmallVec;

use crate::api::NumberFormat;
use crate::core::color::Rgb;
use crate::core::knots::{Knots, ScaleValue};

/// Range interpolation resolved once when the range is set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RangeInterpolator {
    Number(SmallVec<[f64; 4]>),
    Color(SmallVec<[Rgb; 4]>),
    Text(Vec<TextTemplate>),
}

impl RangeInterpolator {
    pub(crate) fn resolve(range: &Knots) -> Self {
        match range {
            Knots::Number(values) => Self::Number(values.iter().copied().collect()),
            Knots::Color(values) => Self::Color(values.iter().copied().collect()),
            Knots::Text(values) => {
                let colors: Option<SmallVec<[Rgb; 4]>> =
                    values.iter().map(|text| Rgb::parse(text)).collect();
                match colors {
                    Some(colors) => Self::Color(colors),
                    None => Self::Text(values.iter().map(|text| TextTemplate::parse(text)).collect()),
                }
            }
        }
    }

    /// Interpolates inside segment `segment` (knots `segment` and `segment + 1`).
    pub(crate) fn interpolate(&self, segment: usize, t: f64, round: bool) -> ScaleValue {
        match self {
            Self::Number(values) => {
                let value = lerp(values[segment], values[segment + 1], t);
                ScaleValue::Number(if round { value.round() } else { value })
            }
            Self::Color(values) => ScaleValue::Color(values[segment].lerp(values[segment + 1], t)),
            Self::Text(templates) => {
                ScaleValue::Text(templates[segment].interpolate(&templates[segment + 1], t, round))
            }
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Color(_) => "color",
            Self::Text(_) => "text",
        }
    }
}

/// Exact at both ends: `t = 0` yields `a`, `t = 1` yields `b`.
#[must_use]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Returns the position of `x` relative to `[a, b]`; zero-width segments map to `0`.
#[must_use]
pub(crate) fn unlerp(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 { 0.0 } else { (x - a) / span }
}

/// Text split into literal pieces and embedded numbers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextTemplate {
    source: String,
    pieces: Vec<TemplatePiece>,
}

#[derive(Debug, Clone, PartialEq)]
enum TemplatePiece {
    Literal(String),
    Number(f64),
}

impl TextTemplate {
    pub(crate) fn parse(text: &str) -> Self {
        let mut pieces = Vec::new();
        let mut literal_start = 0;
        let mut cursor = 0;
        let bytes = text.as_bytes();
        while cursor < bytes.len() {
            match scan_number(bytes, cursor) {
                Some(end) => {
                    let parsed = text[cursor..end].parse::<f64>().ok();
                    if let Some(value) = parsed {
                        if literal_start < cursor {
                            pieces.push(TemplatePiece::Literal(
                                text[literal_start..cursor].to_owned(),
                            ));
                        }
                        pieces.push(TemplatePiece::Number(value));
                        literal_start = end;
                    }
                    cursor = end;
                }
                None => cursor += 1,
            }
        }
        if literal_start < text.len() {
            pieces.push(TemplatePiece::Literal(text[literal_start..].to_owned()));
        }
        Self {
            source: text.to_owned(),
            pieces,
        }
    }

    fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.pieces.iter().filter_map(|piece| match piece {
            TemplatePiece::Number(value) => Some(*value),
            TemplatePiece::Literal(_) => None,
        })
    }

    /// Interpolates towards `end`: literals come from `end`, numbers are
    /// paired by position with the numbers of `self`.
    pub(crate) fn interpolate(&self, end: &Self, t: f64, round: bool) -> String {
        if end.numbers().next().is_none() {
            return if t <= 0.0 {
                self.source.clone()
            } else {
                end.source.clone()
            };
        }

        let number_text = NumberFormat::default();
        let mut starts = self.numbers();
        let mut out = String::with_capacity(end.source.len());
        for piece in &end.pieces {
            match piece {
                TemplatePiece::Literal(text) => out.push_str(text),
                TemplatePiece::Number(target) => {
                    let value = match starts.next() {
                        Some(start) => lerp(start, *target, t),
                        None => *target,
                    };
                    let value = if round { value.round() } else { value };
                    out.push_str(&number_text.format(value));
                }
            }
        }
        out
    }
}

/// Scans a decimal number (optional sign, fraction and exponent) starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut index = start;
    if matches!(bytes.get(index), Some(b'-' | b'+')) {
        index += 1;
    }
    let int_start = index;
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    let mut digits = index - int_start;
    if bytes.get(index) == Some(&b'.') {
        let frac_start = index + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            index = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        let mut exp_index = index + 1;
        if matches!(bytes.get(exp_index), Some(b'-' | b'+')) {
            exp_index += 1;
        }
        let exp_digits_start = exp_index;
        while bytes.get(exp_index).is_some_and(u8::is_ascii_digit) {
            exp_index += 1;
        }
        if exp_index > exp_digits_start {
            index = exp_index;
        }
    }
    Some(index)
}
