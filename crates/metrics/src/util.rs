use classification::{interpret, ThresholdTable};
use core_types::{MetricCategory, MetricResult};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Division that can never produce `NaN` or `Infinity`.
///
/// An absent numerator, an absent denominator, or a zero denominator all mean
/// "cannot compute" and yield `None`.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    safe_div_or(numerator, denominator, None)
}

/// `safe_div` with a configurable default for the cannot-compute case.
pub fn safe_div_or(
    numerator: Option<f64>,
    denominator: Option<f64>,
    default: Option<f64>,
) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => default,
    }
}

/// Half-up rounding at `dp` decimal places, done on the scaled decimal rather
/// than in binary floating point so .5 cases land where a human expects.
pub fn round_to(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Builds a classified result from an optionally-computed raw value: rounds
/// at `dp`, interprets against `table`, and tags category/subcategory. An
/// absent value becomes the standard insufficient-data result.
pub(crate) fn classified(
    value: Option<f64>,
    dp: u32,
    table: &ThresholdTable,
    category: MetricCategory,
    subcategory: &str,
) -> MetricResult {
    match value {
        Some(raw) => {
            let rounded = round_to(raw, dp);
            MetricResult::computed(rounded, interpret(Some(rounded), table), category, subcategory)
        }
        None => MetricResult::insufficient(category, subcategory),
    }
}

/// Ratio expressed as a percentage of the denominator.
pub(crate) fn pct(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    safe_div(numerator, denominator).map(|v| v * 100.0)
}
