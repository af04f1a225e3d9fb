use smallvec::SmallVec;
use tracing::{debug, warn};

#[cfg(feature = "parallel-apply")]
use rayon::prelude::*;

use crate::core::interpolate::{RangeInterpolator, lerp, unlerp};
use crate::core::knots::{Knots, ScaleValue};
use crate::core::ticks::{self, DEFAULT_TICK_COUNT};
use crate::error::{ScaleError, ScaleResult};

/// Exponent used by [`PowerScale::sqrt`].
pub const SQRT_EXPONENT: f64 = 0.5;

type Positions = SmallVec<[f64; 4]>;

/// Continuous scale mapping `sign(x) * |x|^exponent` through piecewise-linear
/// domain/range knots.
///
/// Domain and range always hold the same number of knots (at least two).
/// Every setter validates its input completely before touching state, so a
/// rejected call leaves the scale unchanged. Values on an interior knot
/// resolve to the segment whose numerically lower bound is that knot.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerScale {
    exponent: f64,
    domain: Knots,
    range: Knots,
    clamp: bool,
    round: bool,
    positions: Positions,
    powered: bool,
    transformed: Positions,
    interpolator: RangeInterpolator,
}

impl Default for PowerScale {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerScale {
    /// Creates a linear (`exponent = 1`) scale over domain `[0, 1]` and range `[0, 1]`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_exponent_unchecked(1.0)
    }

    /// Creates a square-root scale (`exponent = 0.5`).
    #[must_use]
    pub fn sqrt() -> Self {
        Self::with_exponent_unchecked(SQRT_EXPONENT)
    }

    /// Creates a default-domain scale with a custom exponent.
    pub fn with_exponent(exponent: f64) -> ScaleResult<Self> {
        validate_exponent(exponent)?;
        Ok(Self::with_exponent_unchecked(exponent))
    }

    fn with_exponent_unchecked(exponent: f64) -> Self {
        let domain = Knots::default();
        let range = Knots::default();
        let positions: Positions = SmallVec::from_slice(&[0.0, 1.0]);
        let transformed = transform_positions(&positions, exponent, true);
        let interpolator = RangeInterpolator::resolve(&range);
        Self {
            exponent,
            domain,
            range,
            clamp: false,
            round: false,
            positions,
            powered: true,
            transformed,
            interpolator,
        }
    }

    #[must_use]
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    #[must_use]
    pub fn domain(&self) -> &Knots {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> &Knots {
        &self.range
    }

    #[must_use]
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    /// Whether numeric outputs are rounded (set by [`PowerScale::set_range_round`]).
    #[must_use]
    pub fn is_round(&self) -> bool {
        self.round
    }

    /// First and last domain knots as numbers.
    #[must_use]
    pub fn domain_extent(&self) -> (f64, f64) {
        let last = self.positions.len() - 1;
        (self.positions[0], self.positions[last])
    }

    /// Independent copy of this scale; later mutation of either side is not shared.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Replaces the exponent; rejected when a domain knot would overflow under it.
    pub fn set_exponent(&mut self, exponent: f64) -> ScaleResult<&mut Self> {
        let transformed = validate_exponent(exponent)
            .and_then(|()| checked_transform(&self.positions, exponent, self.powered));
        let transformed = match transformed {
            Ok(transformed) => transformed,
            Err(err) => {
                warn!(error = %err, "rejected exponent");
                return Err(err);
            }
        };
        self.exponent = exponent;
        self.transformed = transformed;
        debug!(exponent, "set exponent");
        Ok(self)
    }

    pub fn set_clamp(&mut self, clamp: bool) -> &mut Self {
        self.clamp = clamp;
        self
    }

    /// Replaces the domain knots; the knot count must match the current range.
    pub fn set_domain<I, V>(&mut self, values: I) -> ScaleResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScaleValue>,
    {
        let result = Knots::from_values(values)
            .and_then(|knots| ResolvedDomain::resolve(knots, self.exponent))
            .and_then(|domain| {
                ensure_same_len(domain.knots.len(), self.range.len())?;
                Ok(domain)
            });
        match result {
            Ok(domain) => {
                self.commit_domain(domain);
                Ok(self)
            }
            Err(err) => {
                warn!(error = %err, "rejected domain");
                Err(err)
            }
        }
    }

    /// Replaces the range knots and turns output rounding off.
    pub fn set_range<I, V>(&mut self, values: I) -> ScaleResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScaleValue>,
    {
        self.replace_range(values, false)
    }

    /// Replaces the range knots and rounds numeric outputs to the nearest integer.
    pub fn set_range_round<I, V>(&mut self, values: I) -> ScaleResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScaleValue>,
    {
        self.replace_range(values, true)
    }

    /// Replaces domain and range together, which is the only way to change the knot count.
    pub fn set_knots<D, DV, R, RV>(&mut self, domain: D, range: R) -> ScaleResult<&mut Self>
    where
        D: IntoIterator<Item = DV>,
        DV: Into<ScaleValue>,
        R: IntoIterator<Item = RV>,
        RV: Into<ScaleValue>,
    {
        let result = Knots::from_values(domain)
            .and_then(|knots| ResolvedDomain::resolve(knots, self.exponent))
            .and_then(|domain| {
                let range = Knots::from_values(range)?;
                ensure_same_len(domain.knots.len(), range.len())?;
                Ok((domain, range))
            });
        match result {
            Ok((domain, range)) => {
                self.commit_domain(domain);
                self.commit_range(range, self.round);
                Ok(self)
            }
            Err(err) => {
                warn!(error = %err, "rejected knots");
                Err(err)
            }
        }
    }

    fn replace_range<I, V>(&mut self, values: I, round: bool) -> ScaleResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScaleValue>,
    {
        let result = Knots::from_values(values).and_then(|range| {
            ensure_same_len(self.domain.len(), range.len())?;
            Ok(range)
        });
        match result {
            Ok(range) => {
                self.commit_range(range, round);
                Ok(self)
            }
            Err(err) => {
                warn!(error = %err, round, "rejected range");
                Err(err)
            }
        }
    }

    fn commit_domain(&mut self, domain: ResolvedDomain) {
        self.transformed = domain.transformed;
        self.powered = domain.powered;
        self.positions = domain.positions;
        self.domain = domain.knots;
        debug!(
            knots = self.domain.len(),
            kind = self.domain.kind(),
            powered = self.powered,
            "set domain"
        );
    }

    fn commit_range(&mut self, range: Knots, round: bool) {
        self.interpolator = RangeInterpolator::resolve(&range);
        self.range = range;
        self.round = round;
        debug!(
            knots = self.range.len(),
            kind = self.range.kind(),
            interpolation = self.interpolator.kind(),
            round,
            "set range"
        );
    }

    /// Maps a domain value to the range.
    pub fn apply(&self, x: f64) -> ScaleResult<ScaleValue> {
        if !x.is_finite() {
            return Err(ScaleError::InvalidData("input must be finite".to_owned()));
        }
        let x = self.forward(x);
        if !x.is_finite() {
            return Err(ScaleError::InvalidData(
                "input overflows under the exponent".to_owned(),
            ));
        }
        let segment = locate_segment(&self.transformed, x);
        let t = self.segment_ratio(&self.transformed, segment, x);
        Ok(self.interpolator.interpolate(segment, t, self.round))
    }

    /// Maps a domain value to a numeric range.
    pub fn apply_number(&self, x: f64) -> ScaleResult<f64> {
        self.numeric_range()?;
        match self.apply(x)? {
            ScaleValue::Number(value) => Ok(value),
            other => Err(ScaleError::NonNumericRange { kind: other.kind() }),
        }
    }

    /// Maps many domain values to a numeric range, failing on the first bad input.
    pub fn apply_batch(&self, values: &[f64]) -> ScaleResult<Vec<f64>> {
        self.numeric_range()?;

        #[cfg(feature = "parallel-apply")]
        {
            values
                .par_iter()
                .map(|value| self.apply_number(*value))
                .collect()
        }

        #[cfg(not(feature = "parallel-apply"))]
        {
            values
                .iter()
                .map(|value| self.apply_number(*value))
                .collect()
        }
    }

    /// Maps a numeric range value back to the domain.
    pub fn invert(&self, y: f64) -> ScaleResult<f64> {
        let range = self.numeric_range()?;
        if !y.is_finite() {
            return Err(ScaleError::InvalidData("input must be finite".to_owned()));
        }
        if !is_monotonic(range) {
            return Err(ScaleError::InvalidRange(
                "invert needs a monotonic numeric range".to_owned(),
            ));
        }
        let segment = locate_segment(range, y);
        let t = self.segment_ratio(range, segment, y);
        let transformed = lerp(
            self.transformed[segment],
            self.transformed[segment + 1],
            t,
        );
        let x = self.backward(transformed);
        if !x.is_finite() {
            return Err(ScaleError::InvalidData(
                "inverted value overflows under the exponent".to_owned(),
            ));
        }
        Ok(x)
    }

    /// Round tick values across the domain extent, in domain direction.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, end) = self.domain_extent();
        ticks::ticks(start, end, count)
    }

    /// Extends the first and last domain knots to round values.
    ///
    /// A text domain becomes a number domain. `None` uses the default tick count.
    /// The domain stays unchanged when the widened knots overflow under the exponent.
    pub fn nice(&mut self, count: Option<usize>) -> &mut Self {
        let count = count.unwrap_or(DEFAULT_TICK_COUNT);
        let mut positions = self.positions.clone();
        ticks::nice_domain(&mut positions, count);
        let before = self.domain_extent();
        match ResolvedDomain::resolve(Knots::Number(positions.to_vec()), self.exponent) {
            Ok(domain) => self.commit_domain(domain),
            Err(err) => {
                warn!(error = %err, count, "rejected nice domain");
                return self;
            }
        }
        debug!(
            count,
            from_start = before.0,
            from_end = before.1,
            to_start = self.positions[0],
            to_end = self.positions[self.positions.len() - 1],
            "nice domain"
        );
        self
    }

    fn numeric_range(&self) -> ScaleResult<&[f64]> {
        self.range.as_numbers().ok_or(ScaleError::NonNumericRange {
            kind: self.range.kind(),
        })
    }

    fn segment_ratio(&self, knots: &[f64], segment: usize, value: f64) -> f64 {
        let t = unlerp(knots[segment], knots[segment + 1], value);
        if self.clamp { t.clamp(0.0, 1.0) } else { t }
    }

    fn forward(&self, x: f64) -> f64 {
        if self.powered {
            signed_pow(x, self.exponent)
        } else {
            x
        }
    }

    fn backward(&self, x: f64) -> f64 {
        if self.powered {
            signed_pow(x, 1.0 / self.exponent)
        } else {
            x
        }
    }
}

/// Domain knots plus the numeric positions derived from them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedDomain {
    pub(crate) knots: Knots,
    pub(crate) positions: Positions,
    pub(crate) powered: bool,
    pub(crate) transformed: Positions,
}

impl ResolvedDomain {
    /// Number knots are powered; text knots are parsed and passed through unpowered.
    pub(crate) fn resolve(knots: Knots, exponent: f64) -> ScaleResult<Self> {
        let (positions, powered): (Positions, bool) = match &knots {
            Knots::Number(values) => (values.iter().copied().collect(), true),
            Knots::Text(values) => {
                let mut positions = Positions::with_capacity(values.len());
                for text in values {
                    let value = text.trim().parse::<f64>().map_err(|_| {
                        ScaleError::InvalidDomain(format!("text knot {text:?} is not numeric"))
                    })?;
                    if !value.is_finite() {
                        return Err(ScaleError::InvalidDomain(format!(
                            "text knot {text:?} must be finite"
                        )));
                    }
                    positions.push(value);
                }
                (positions, false)
            }
            Knots::Color(_) => {
                return Err(ScaleError::InvalidDomain(
                    "color knots cannot form a domain".to_owned(),
                ));
            }
        };
        if !is_monotonic(&positions) {
            return Err(ScaleError::InvalidDomain(
                "domain knots must be monotonic".to_owned(),
            ));
        }
        let transformed = checked_transform(&positions, exponent, powered)?;
        Ok(Self {
            knots,
            positions,
            powered,
            transformed,
        })
    }
}

fn validate_exponent(exponent: f64) -> ScaleResult<()> {
    if !exponent.is_finite() || exponent <= 0.0 {
        return Err(ScaleError::InvalidExponent(exponent));
    }
    Ok(())
}

fn ensure_same_len(domain: usize, range: usize) -> ScaleResult<()> {
    if domain != range {
        return Err(ScaleError::KnotCountMismatch { domain, range });
    }
    Ok(())
}

/// `sign(x) * |x|^exponent`.
#[must_use]
pub fn signed_pow(x: f64, exponent: f64) -> f64 {
    if x < 0.0 {
        -(-x).powf(exponent)
    } else {
        x.powf(exponent)
    }
}

fn transform_positions(positions: &[f64], exponent: f64, powered: bool) -> Positions {
    if powered {
        positions
            .iter()
            .map(|value| signed_pow(*value, exponent))
            .collect()
    } else {
        SmallVec::from_slice(positions)
    }
}

fn checked_transform(positions: &[f64], exponent: f64, powered: bool) -> ScaleResult<Positions> {
    let transformed = transform_positions(positions, exponent, powered);
    if let Some(index) = transformed.iter().position(|value| !value.is_finite()) {
        return Err(ScaleError::InvalidDomain(format!(
            "domain knot {} overflows under exponent {exponent}",
            positions[index]
        )));
    }
    Ok(transformed)
}

fn is_monotonic(knots: &[f64]) -> bool {
    let ascending = knots.windows(2).all(|pair| pair[0] <= pair[1]);
    ascending || knots.windows(2).all(|pair| pair[0] >= pair[1])
}

/// Index of the segment `[knots[i], knots[i + 1]]` containing `value`.
///
/// Values outside the knots select the first or last segment. `knots` must be
/// monotonic with at least two entries.
fn locate_segment(knots: &[f64], value: f64) -> usize {
    let last = knots.len() - 1;
    let interior = &knots[1..last];
    if knots[last] < knots[0] {
        interior.partition_point(|knot| *knot > value)
    } else {
        interior.partition_point(|knot| *knot <= value)
    }
}
