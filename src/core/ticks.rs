//! Human-round step selection shared by tick generation and domain nicing.
//!
//! Steps are always `{1, 2, 5} x 10^k`. Tick values and niced bounds are
//! produced as exact decimal multiples of the step so a `0.1` step lands on
//! `0.3` rather than `0.30000000000000004`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::trace;

/// Tick count used when callers do not specify one.
pub const DEFAULT_TICK_COUNT: usize = 10;

// Relative slack applied before floor/ceil so bounds that sit on a step
// multiple survive floating-point division noise.
const STEP_INDEX_EPSILON: f64 = 1e-10;

/// A `multiplier x 10^exponent` step with `multiplier` in `{1, 2, 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NiceStep {
    multiplier: i64,
    exponent: i32,
}

impl NiceStep {
    /// Picks the round step closest to `span / count`.
    #[must_use]
    pub fn select(span: f64, count: usize) -> Option<Self> {
        if count == 0 || !span.is_finite() || span <= 0.0 {
            return None;
        }

        let count = count as f64;
        let raw = span / count;
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }
        let mut exponent = raw.log10().floor() as i32;
        let base = 10_f64.powi(exponent);
        let err = count / span * base;
        let multiplier = if err <= 0.15 {
            exponent += 1;
            1
        } else if err <= 0.35 {
            5
        } else if err <= 0.75 {
            2
        } else {
            1
        };

        Some(Self {
            multiplier,
            exponent,
        })
    }

    #[must_use]
    pub fn value(self) -> f64 {
        (self.multiplier as f64) * 10_f64.powi(self.exponent)
    }

    #[must_use]
    pub fn multiplier(self) -> i64 {
        self.multiplier
    }

    #[must_use]
    pub fn exponent(self) -> i32 {
        self.exponent
    }

    fn to_decimal(self) -> Option<Decimal> {
        if self.exponent >= 0 {
            let exponent = u32::try_from(self.exponent).ok()?;
            let power = 10_i64.checked_pow(exponent)?;
            Decimal::from(self.multiplier).checked_mul(Decimal::from(power))
        } else {
            let scale = self.exponent.unsigned_abs();
            if scale > 28 {
                return None;
            }
            Some(Decimal::new(self.multiplier, scale))
        }
    }

    /// Returns `index * step`, exact whenever the decimal representation fits.
    #[must_use]
    pub fn multiple(self, index: i64) -> f64 {
        self.to_decimal()
            .and_then(|step| Decimal::from(index).checked_mul(step))
            .and_then(|value| value.to_f64())
            .unwrap_or_else(|| (index as f64) * self.value())
    }

    fn floor_index(self, value: f64) -> i64 {
        let ratio = value / self.value();
        (ratio + ratio.abs().max(1.0) * STEP_INDEX_EPSILON).floor() as i64
    }

    fn ceil_index(self, value: f64) -> i64 {
        let ratio = value / self.value();
        (ratio - ratio.abs().max(1.0) * STEP_INDEX_EPSILON).ceil() as i64
    }

    #[must_use]
    pub fn floor(self, value: f64) -> f64 {
        self.multiple(self.floor_index(value))
    }

    #[must_use]
    pub fn ceil(self, value: f64) -> f64 {
        self.multiple(self.ceil_index(value))
    }
}

/// Round step for splitting `span` into roughly `count` intervals.
///
/// Returns `None` when `span` is not finite and positive or `count` is zero.
#[must_use]
pub fn nice_step(span: f64, count: usize) -> Option<f64> {
    NiceStep::select(span, count).map(NiceStep::value)
}

/// First tick, last tick and step covering an extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRange {
    pub start: f64,
    pub stop: f64,
    pub step: NiceStep,
}

/// Resolves the tick range for the extent spanned by `a` and `b` (any order).
#[must_use]
pub fn tick_range(a: f64, b: f64, count: usize) -> Option<TickRange> {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    let step = NiceStep::select(max - min, count)?;
    Some(TickRange {
        start: step.ceil(min),
        stop: step.floor(max),
        step,
    })
}

/// Round ticks inside `[min(a, b), max(a, b)]`, ordered from `a` towards `b`.
#[must_use]
pub fn ticks(a: f64, b: f64, count: usize) -> Vec<f64> {
    if count == 0 || !a.is_finite() || !b.is_finite() {
        return Vec::new();
    }
    if a == b {
        return vec![a];
    }
    let Some(range) = tick_range(a, b, count) else {
        return Vec::new();
    };

    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    let first = range.step.ceil_index(min);
    let last = range.step.floor_index(max);
    let mut out: Vec<f64> = (first..=last).map(|index| range.step.multiple(index)).collect();
    if a > b {
        out.reverse();
    }
    trace!(
        count,
        produced = out.len(),
        step = range.step.value(),
        "generate ticks"
    );
    out
}

/// Extends the first and last knots to the enclosing step multiples.
///
/// Runs the adjustment twice: widening the extent can change the selected
/// step, and the second pass settles on it.
pub fn nice_domain(knots: &mut [f64], count: usize) {
    let Some(last) = knots.len().checked_sub(1) else {
        return;
    };
    if last == 0 {
        return;
    }

    for _ in 0..2 {
        let (start, end) = (knots[0], knots[last]);
        let Some(step) = NiceStep::select((end - start).abs(), count) else {
            return;
        };
        if start <= end {
            knots[0] = step.floor(start);
            knots[last] = step.ceil(end);
        } else {
            knots[0] = step.ceil(start);
            knots[last] = step.floor(end);
        }
        trace!(
            start = knots[0],
            end = knots[last],
            step = step.value(),
            "nice domain pass"
        );
    }
}
