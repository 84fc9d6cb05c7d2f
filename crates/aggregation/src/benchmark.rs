use core_types::{BenchmarkComparison, BenchmarkEntry, MetricResult, PercentileBenchmark};
use std::collections::BTreeMap;

/// Above this ratio of value to sector median, a metric is "above_average".
pub const BENCHMARK_UPPER: f64 = 1.1;
/// Below this ratio, "below_average".
pub const BENCHMARK_LOWER: f64 = 0.9;

/// Joins computed metric values against sector percentile benchmarks using
/// the default tolerance band.
pub fn compare(
    results: &BTreeMap<String, MetricResult>,
    benchmarks: &BTreeMap<String, PercentileBenchmark>,
) -> BenchmarkComparison {
    compare_with_tolerance(results, benchmarks, BENCHMARK_UPPER, BENCHMARK_LOWER)
}

/// Joins computed values against `{p25, p50, p75}` benchmarks keyed by metric
/// name. The performance tag comes from the ratio of value to median:
/// `> upper` is "above_average", `< lower` is "below_average", in between is
/// "average". Missing either side of the join (or a zero median) yields
/// "unknown".
pub fn compare_with_tolerance(
    results: &BTreeMap<String, MetricResult>,
    benchmarks: &BTreeMap<String, PercentileBenchmark>,
    upper: f64,
    lower: f64,
) -> BenchmarkComparison {
    results
        .iter()
        .map(|(name, result)| {
            let benchmark = benchmarks.get(name).copied();
            let performance = match (result.value, benchmark) {
                (Some(value), Some(bench)) if bench.p50 != 0.0 => {
                    let ratio = value / bench.p50;
                    if ratio > upper {
                        "above_average"
                    } else if ratio < lower {
                        "below_average"
                    } else {
                        "average"
                    }
                }
                _ => "unknown",
            };
            (
                name.clone(),
                BenchmarkEntry {
                    value: result.value,
                    benchmark,
                    performance: performance.to_string(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MetricCategory;

    fn results_with(name: &str, value: Option<f64>) -> BTreeMap<String, MetricResult> {
        let mut results = BTreeMap::new();
        let result = match value {
            Some(v) => MetricResult::computed(v, "good", MetricCategory::Liquidity, "test"),
            None => MetricResult::insufficient(MetricCategory::Liquidity, "test"),
        };
        results.insert(name.to_string(), result);
        results
    }

    fn benchmark(p50: f64) -> PercentileBenchmark {
        PercentileBenchmark {
            p25: p50 * 0.8,
            p50,
            p75: p50 * 1.2,
        }
    }

    #[test]
    fn ratio_bands_tag_performance() {
        let mut benchmarks = BTreeMap::new();
        benchmarks.insert("Current Ratio".to_string(), benchmark(2.0));

        let above = compare(&results_with("Current Ratio", Some(2.5)), &benchmarks);
        assert_eq!(above["Current Ratio"].performance, "above_average");

        let below = compare(&results_with("Current Ratio", Some(1.5)), &benchmarks);
        assert_eq!(below["Current Ratio"].performance, "below_average");

        let average = compare(&results_with("Current Ratio", Some(2.1)), &benchmarks);
        assert_eq!(average["Current Ratio"].performance, "average");
    }

    #[test]
    fn missing_either_side_is_unknown() {
        let no_benchmarks = BTreeMap::new();
        let tagged = compare(&results_with("Current Ratio", Some(2.0)), &no_benchmarks);
        assert_eq!(tagged["Current Ratio"].performance, "unknown");

        let mut benchmarks = BTreeMap::new();
        benchmarks.insert("Current Ratio".to_string(), benchmark(2.0));
        let tagged = compare(&results_with("Current Ratio", None), &benchmarks);
        assert_eq!(tagged["Current Ratio"].performance, "unknown");
    }

    #[test]
    fn zero_median_is_unknown_not_infinite() {
        let mut benchmarks = BTreeMap::new();
        benchmarks.insert("Current Ratio".to_string(), benchmark(0.0));
        let tagged = compare(&results_with("Current Ratio", Some(2.0)), &benchmarks);
        assert_eq!(tagged["Current Ratio"].performance, "unknown");
    }
}
