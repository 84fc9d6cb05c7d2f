use core_types::{CategorySummary, ChartSeries, MetricCategory};
use std::collections::BTreeMap;

/// Builds one chart-ready bar series per category from the summary, skipping
/// members without a computed value. Categories whose every member was
/// insufficient produce no series.
pub fn build_series(
    summary: &BTreeMap<MetricCategory, CategorySummary>,
) -> Vec<ChartSeries> {
    summary
        .iter()
        .filter_map(|(category, category_summary)| {
            let mut labels = Vec::new();
            let mut values = Vec::new();
            for metric in &category_summary.metrics {
                if let Some(value) = metric.value {
                    labels.push(metric.name.clone());
                    values.push(value);
                }
            }
            if values.is_empty() {
                return None;
            }
            Some(ChartSeries {
                title: category.to_string(),
                labels,
                values,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CategoryMetric;

    #[test]
    fn skips_insufficient_members_and_empty_categories() {
        let mut summary = BTreeMap::new();
        summary.insert(
            MetricCategory::Liquidity,
            CategorySummary {
                metrics: vec![
                    CategoryMetric {
                        name: "Current Ratio".to_string(),
                        value: Some(2.0),
                        interpretation: "good".to_string(),
                    },
                    CategoryMetric {
                        name: "Quick Ratio".to_string(),
                        value: None,
                        interpretation: "insufficient_data".to_string(),
                    },
                ],
                representative: "good".to_string(),
            },
        );
        summary.insert(
            MetricCategory::Market,
            CategorySummary {
                metrics: vec![CategoryMetric {
                    name: "PEG Ratio".to_string(),
                    value: None,
                    interpretation: "insufficient_data".to_string(),
                }],
                representative: "insufficient_data".to_string(),
            },
        );

        let series = build_series(&summary);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].title, "liquidity");
        assert_eq!(series[0].labels, vec!["Current Ratio"]);
        assert_eq!(series[0].values, vec![2.0]);
    }
}
