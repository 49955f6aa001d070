//! Column-at-a-time value generators
//!
//! Each generator returns exactly `n` values or fails before drawing any.

use chrono::{Duration, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::{validate_weights, ExhaustionPolicy, IntRange, MoneyRange};
use crate::error::{ClaimsError, ClaimsResult};

/// A prefixed numeric code space such as `D100`..`D999`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeDomain {
    pub prefix: &'static str,
    pub range: IntRange,
    /// Zero-pad the numeric part to this many digits
    pub width: Option<usize>,
}

impl CodeDomain {
    pub const CLAIM: CodeDomain = CodeDomain::prefixed("C", 1_000_000, 9_999_999);
    pub const DIAGNOSIS: CodeDomain = CodeDomain::prefixed("D", 100, 999);
    pub const PROCEDURE: CodeDomain = CodeDomain::prefixed("P", 1000, 9999);

    pub const fn prefixed(prefix: &'static str, min: i64, max: i64) -> Self {
        Self {
            prefix,
            range: IntRange::new(min, max),
            width: None,
        }
    }

    /// Unprefixed zero-padded identifiers over `[0, 10^width)`
    pub fn padded(width: u32) -> ClaimsResult<Self> {
        let max = 10_i64
            .checked_pow(width)
            .filter(|_| width > 0)
            .ok_or_else(|| ClaimsError::configuration(format!("unsupported id width {width}")))?;
        Ok(Self {
            prefix: "",
            range: IntRange::new(0, max - 1),
            width: usize::try_from(width).ok(),
        })
    }

    pub fn capacity(&self) -> u64 {
        self.range.capacity()
    }

    pub fn render(&self, value: i64) -> String {
        match self.width {
            Some(width) => format!("{}{:0width$}", self.prefix, value, width = width),
            None => format!("{}{}", self.prefix, value),
        }
    }
}

/// Direction of a derived date offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Uniform integers over an inclusive range
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] for an inverted range.
pub fn integers<R: Rng + ?Sized>(rng: &mut R, n: usize, range: IntRange) -> ClaimsResult<Vec<i64>> {
    range.validate("integer field")?;
    Ok((0..n).map(|_| rng.gen_range(range.min..=range.max)).collect())
}

/// Uniform draws from a code domain, rendered with its prefix and padding
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] for an inverted range.
pub fn codes<R: Rng + ?Sized>(rng: &mut R, n: usize, domain: CodeDomain) -> ClaimsResult<Vec<String>> {
    Ok(integers(rng, n, domain.range)?
        .into_iter()
        .map(|value| domain.render(value))
        .collect())
}

/// A single zero-padded identifier
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] for an unsupported width.
pub fn padded_id<R: Rng + ?Sized>(rng: &mut R, width: u32) -> ClaimsResult<String> {
    let domain = CodeDomain::padded(width)?;
    Ok(domain.render(rng.gen_range(domain.range.min..=domain.range.max)))
}

/// Finite choice set, drawn uniformly or by weight
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    choices: Vec<T>,
    weights: Option<WeightedIndex<f64>>,
}

impl<T: Clone> Categorical<T> {
    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] for an empty choice set.
    pub fn uniform(choices: Vec<T>) -> ClaimsResult<Self> {
        if choices.is_empty() {
            return Err(ClaimsError::configuration("categorical field needs at least one choice"));
        }
        Ok(Self { choices, weights: None })
    }

    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] when the weights do not match
    /// the choices, are negative, or do not sum to 1.
    pub fn weighted(choices: Vec<T>, weights: &[f64]) -> ClaimsResult<Self> {
        if choices.is_empty() {
            return Err(ClaimsError::configuration("categorical field needs at least one choice"));
        }
        if choices.len() != weights.len() {
            return Err(ClaimsError::configuration(format!(
                "{} weights given for {} choices",
                weights.len(),
                choices.len()
            )));
        }
        validate_weights(weights)?;
        let index = WeightedIndex::new(weights)
            .map_err(|e| ClaimsError::configuration(format!("invalid weights: {e}")))?;

        Ok(Self {
            choices,
            weights: Some(index),
        })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        match &self.weights {
            Some(index) => self.choices.get(index.sample(rng)).cloned(),
            None => self.choices.choose(rng).cloned(),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<T> {
        (0..n).filter_map(|_| self.draw(rng)).collect()
    }
}

/// Uniform dates over the closed interval `[start, end]`
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] when `start` is after `end`.
pub fn dates_between<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    start: NaiveDate,
    end: NaiveDate,
) -> ClaimsResult<Vec<NaiveDate>> {
    let span = (end - start).num_days();
    if span < 0 {
        return Err(ClaimsError::configuration(format!(
            "empty date interval: {start} is after {end}"
        )));
    }
    Ok((0..n)
        .map(|_| start + Duration::days(rng.gen_range(0..=span)))
        .collect())
}

/// Shift every base date by its own uniform day offset
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] for an inverted offset range or
/// a date pushed outside the calendar.
pub fn offset_dates<R: Rng + ?Sized>(
    rng: &mut R,
    base: &[NaiveDate],
    offsets: IntRange,
    direction: Direction,
) -> ClaimsResult<Vec<NaiveDate>> {
    offsets.validate("date offset")?;
    base.iter()
        .map(|date| {
            let delta = Duration::days(rng.gen_range(offsets.min..=offsets.max));
            let shifted = match direction {
                Direction::Forward => date.checked_add_signed(delta),
                Direction::Backward => date.checked_sub_signed(delta),
            };
            shifted.ok_or_else(|| ClaimsError::configuration(format!("date offset from {date} leaves the calendar")))
        })
        .collect()
}

/// Monetary amounts uniform over whole cents in `[low, high]`
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] for negative or inverted ranges.
pub fn money<R: Rng + ?Sized>(rng: &mut R, n: usize, range: MoneyRange) -> ClaimsResult<Vec<Decimal>> {
    range.validate("money field")?;
    let low = to_cents(range.low)?;
    let high = to_cents(range.high)?;
    Ok((0..n)
        .map(|_| Decimal::new(rng.gen_range(low..=high), 2))
        .collect())
}

fn to_cents(amount: Decimal) -> ClaimsResult<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| ClaimsError::configuration(format!("amount {amount} is out of range")))
}

/// `size` distinct values from `range`
///
/// When the range holds fewer than `size` values the policy decides:
/// `Fail` errors, `Pad` continues past the top of the range so every value
/// stays unique but recognisably synthetic, and `AllowDuplicates` reuses
/// genuine values.
///
/// # Errors
///
/// Returns [`ClaimsError::CatalogExhaustion`] under `Fail` when the range is
/// too small.
pub fn unique_pool<R: Rng + ?Sized>(
    rng: &mut R,
    size: usize,
    range: IntRange,
    policy: ExhaustionPolicy,
) -> ClaimsResult<Vec<i64>> {
    range.validate("code pool")?;
    let capacity = range.capacity();
    let available = usize::try_from(capacity).unwrap_or(usize::MAX);

    if size > available && policy == ExhaustionPolicy::Fail {
        return Err(ClaimsError::CatalogExhaustion {
            requested: size,
            available: capacity,
        });
    }

    let mut pool: Vec<i64> = index::sample(rng, available, size.min(available))
        .into_iter()
        .filter_map(|offset| i64::try_from(offset).ok())
        .map(|offset| range.min + offset)
        .collect();

    let shortfall = size.saturating_sub(pool.len());
    if shortfall > 0 {
        warn!(requested = size, available = capacity, ?policy, "Code pool exceeds its code space");
        match policy {
            ExhaustionPolicy::Pad => {
                let top = range.max;
                pool.extend((1..).map(|step: i64| top.saturating_add(step)).take(shortfall));
            }
            ExhaustionPolicy::AllowDuplicates => {
                let genuine = pool.clone();
                pool.extend(draw_from_pool(rng, shortfall, &genuine)?);
            }
            ExhaustionPolicy::Fail => {}
        }
    }

    Ok(pool)
}

/// Fill `n` rows by drawing from a shared pool
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] for an empty pool.
pub fn draw_from_pool<R: Rng + ?Sized, T: Clone>(rng: &mut R, n: usize, pool: &[T]) -> ClaimsResult<Vec<T>> {
    if pool.is_empty() {
        return Err(ClaimsError::configuration("cannot draw from an empty pool"));
    }
    Ok((0..n).filter_map(|_| pool.choose(rng).cloned()).collect())
}
