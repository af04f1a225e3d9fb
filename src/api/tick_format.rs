use tracing::trace;

use crate::core::PowerScale;
use crate::core::ticks::{TickRange, tick_range};
use crate::error::ScaleResult;

use super::number_format::{FormatKind, NumberFormat, SiPrefix};

/// Formats tick values with just enough precision to tell adjacent ticks apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickFormatter {
    format: NumberFormat,
    prefix: Option<SiPrefix>,
}

impl TickFormatter {
    /// Builds the formatter for ticks spanning `a..b` split into about `count` steps.
    ///
    /// Without a specifier the output is comma-grouped fixed decimals. A
    /// specifier that omits the precision gets one derived from the step.
    pub fn for_extent(a: f64, b: f64, count: usize, specifier: Option<&str>) -> ScaleResult<Self> {
        let range = tick_range(a, b, count);
        let formatter = match specifier {
            None => Self::default_for(range),
            Some(specifier) => Self::from_specifier(NumberFormat::parse(specifier)?, range),
        };
        trace!(
            count,
            specifier = specifier.unwrap_or(""),
            format = %formatter.format,
            "resolve tick formatter"
        );
        Ok(formatter)
    }

    fn default_for(range: Option<TickRange>) -> Self {
        let format = NumberFormat {
            grouping: true,
            ..NumberFormat::default()
        };
        let format = match range {
            Some(range) => format
                .with_kind(FormatKind::Fixed)
                .with_precision(step_precision(range.step.value())),
            None => format,
        };
        Self {
            format,
            prefix: None,
        }
    }

    fn from_specifier(format: NumberFormat, range: Option<TickRange>) -> Self {
        let Some(range) = range else {
            return Self {
                format,
                prefix: None,
            };
        };
        let step = range.step.value();
        let magnitude = range.start.abs().max(range.stop.abs());

        if format.kind == FormatKind::SiPrefix {
            let prefix = SiPrefix::for_value(magnitude);
            let precision = format
                .precision
                .unwrap_or_else(|| step_precision(prefix.scale(step)));
            return Self {
                format: format.with_kind(FormatKind::Fixed).with_precision(precision),
                prefix: Some(prefix),
            };
        }

        let format = if format.precision.is_some() {
            format
        } else {
            let kind = match format.kind {
                FormatKind::Shortest => FormatKind::Fixed,
                other => other,
            };
            format
                .with_kind(kind)
                .with_precision(kind_precision(kind, step, magnitude))
        };
        Self {
            format,
            prefix: None,
        }
    }

    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        self.format
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self.prefix {
            Some(prefix) => self
                .format
                .format_with_suffix(prefix.scale(value), prefix.symbol()),
            None => self.format.format(value),
        }
    }
}

impl PowerScale {
    /// Tick label formatter matched to [`PowerScale::ticks`] for the same `count`.
    pub fn tick_format(&self, count: usize, specifier: Option<&str>) -> ScaleResult<TickFormatter> {
        let (start, end) = self.domain_extent();
        TickFormatter::for_extent(start, end, count, specifier)
    }
}

/// Decimals needed to show multiples of `step`.
fn step_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let digits = -(step.log10() + 0.01).floor();
    if digits <= 0.0 { 0 } else { digits as usize }
}

fn kind_precision(kind: FormatKind, step: f64, magnitude: f64) -> usize {
    let step_digits = signed_step_precision(step);
    if kind.is_significant() {
        let magnitude_digits = signed_step_precision(magnitude);
        let significant = (step_digits - magnitude_digits).unsigned_abs() as usize;
        if kind == FormatKind::Exponent {
            significant
        } else {
            significant + 1
        }
    } else {
        let digits = if kind == FormatKind::Percent {
            step_digits - 2
        } else {
            step_digits
        };
        usize::try_from(digits).unwrap_or(0)
    }
}

fn signed_step_precision(value: f64) -> i64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    -((value.log10() + 0.01).floor() as i64)
}
