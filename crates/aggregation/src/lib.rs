//! # Finsight Aggregation & Summary
//!
//! Rolls a `CalculationBatch` up into per-category summaries, compares
//! computed values against sector percentile benchmarks, and derives
//! chart-ready series. Pure functions over dispatcher output; the "unbiased
//! judge" between calculation and recommendation.

pub mod benchmark;
pub mod charts;

pub use benchmark::{compare, compare_with_tolerance, BENCHMARK_LOWER, BENCHMARK_UPPER};
pub use charts::build_series;

use core_types::{CategoryMetric, CategorySummary, MetricCategory, MetricResult};
use std::collections::BTreeMap;

/// Groups results by category and derives each category's representative
/// interpretation.
///
/// Counting walks the results in map iteration order (metric-name order, so
/// the outcome is deterministic and serialization-stable). The most frequent
/// interpretation wins; a tie keeps the interpretation encountered first.
pub fn summarize(
    results: &BTreeMap<String, MetricResult>,
) -> BTreeMap<MetricCategory, CategorySummary> {
    let mut buckets: BTreeMap<MetricCategory, Vec<CategoryMetric>> = BTreeMap::new();

    for (name, result) in results {
        buckets
            .entry(result.category)
            .or_default()
            .push(CategoryMetric {
                name: name.clone(),
                value: result.value,
                interpretation: result.interpretation.clone(),
            });
    }

    buckets
        .into_iter()
        .map(|(category, metrics)| {
            let representative = most_common_interpretation(&metrics);
            tracing::debug!(
                category = %category,
                members = metrics.len(),
                representative = %representative,
                "category summarized"
            );
            (
                category,
                CategorySummary {
                    metrics,
                    representative,
                },
            )
        })
        .collect()
}

/// Most frequent interpretation over an ordered member list. Counts are kept
/// as an ordered sequence of `(label, count)` pairs so the tie-break is
/// explicit: first-encountered wins.
fn most_common_interpretation(metrics: &[CategoryMetric]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for metric in metrics {
        match counts
            .iter_mut()
            .find(|(label, _)| *label == metric.interpretation)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((&metric.interpretation, 1)),
        }
    }

    counts
        .iter()
        // max_by_key returns the last maximum; strict comparison keeps the
        // first-encountered label on ties.
        .fold(None::<(&str, usize)>, |best, &(label, count)| match best {
            Some((_, best_count)) if count <= best_count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label.to_string())
        .unwrap_or_else(|| core_types::metric::INSUFFICIENT_DATA.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MetricResult;

    fn result(category: MetricCategory, value: Option<f64>, interpretation: &str) -> MetricResult {
        match value {
            Some(v) => MetricResult::computed(v, interpretation, category, "test"),
            None => MetricResult::insufficient(category, "test"),
        }
    }

    #[test]
    fn groups_by_category() {
        let mut results = BTreeMap::new();
        results.insert(
            "Current Ratio".to_string(),
            result(MetricCategory::Liquidity, Some(2.0), "good"),
        );
        results.insert(
            "Quick Ratio".to_string(),
            result(MetricCategory::Liquidity, Some(1.1), "good"),
        );
        results.insert(
            "Return on Equity".to_string(),
            result(MetricCategory::Profitability, Some(20.0), "excellent"),
        );

        let summary = summarize(&results);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[&MetricCategory::Liquidity].metrics.len(), 2);
        assert_eq!(summary[&MetricCategory::Liquidity].representative, "good");
        assert_eq!(
            summary[&MetricCategory::Profitability].representative,
            "excellent"
        );
    }

    #[test]
    fn tie_break_keeps_first_encountered() {
        let mut results = BTreeMap::new();
        // BTreeMap iterates by name: "A Ratio" before "B Ratio".
        results.insert(
            "A Ratio".to_string(),
            result(MetricCategory::Leverage, Some(0.5), "moderate"),
        );
        results.insert(
            "B Ratio".to_string(),
            result(MetricCategory::Leverage, Some(2.1), "high"),
        );

        let summary = summarize(&results);
        assert_eq!(summary[&MetricCategory::Leverage].representative, "moderate");
    }

    #[test]
    fn insufficient_members_can_dominate() {
        let mut results = BTreeMap::new();
        results.insert(
            "A".to_string(),
            result(MetricCategory::Market, None, "insufficient_data"),
        );
        results.insert(
            "B".to_string(),
            result(MetricCategory::Market, None, "insufficient_data"),
        );
        results.insert(
            "C".to_string(),
            result(MetricCategory::Market, Some(12.0), "fair"),
        );

        let summary = summarize(&results);
        assert_eq!(summary[&MetricCategory::Market].representative, "insufficient_data");
    }
}
