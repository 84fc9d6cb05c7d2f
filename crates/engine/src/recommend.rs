use core_types::{AnalysisRun, Recommendations};

/// Interpretations that flag a category as needing attention.
const WEAK_INTERPRETATIONS: &[&str] = &[
    "poor",
    "concerning",
    "weak",
    "very_high",
    "loss_making",
    "distress",
];

/// Synthesizes recommendations from the run's summary, benchmark comparison
/// and AI output. Pure and deterministic: the same run state always yields
/// the same list, in category/metric name order.
pub fn build(run: &AnalysisRun) -> Recommendations {
    let mut recommendations = Recommendations::default();

    if let Some(summary) = &run.summary {
        for (category, category_summary) in summary {
            if WEAK_INTERPRETATIONS.contains(&category_summary.representative.as_str()) {
                recommendations.priority_areas.push(format!(
                    "{} ({})",
                    category, category_summary.representative
                ));
            }
        }
    }

    if let Some(benchmark) = &run.benchmark {
        for (name, entry) in benchmark {
            if entry.performance == "below_average" {
                recommendations
                    .action_items
                    .push(format!("{} is below the sector benchmark", name));
            }
        }
    }

    if let Some(ai) = &run.ai {
        recommendations
            .ai_recommendations
            .extend(ai.recommendations.iter().cloned());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{
        AiEnrichment, BenchmarkEntry, CategoryMetric, CategorySummary, MetricCategory,
    };
    use std::collections::BTreeMap;
    use uuid::Uuid;

    #[test]
    fn weak_categories_and_lagging_metrics_surface() {
        let mut run = AnalysisRun::new(Uuid::new_v4());

        let mut summary = BTreeMap::new();
        summary.insert(
            MetricCategory::Liquidity,
            CategorySummary {
                metrics: vec![CategoryMetric {
                    name: "Current Ratio".to_string(),
                    value: Some(0.8),
                    interpretation: "poor".to_string(),
                }],
                representative: "poor".to_string(),
            },
        );
        summary.insert(
            MetricCategory::Profitability,
            CategorySummary {
                metrics: Vec::new(),
                representative: "excellent".to_string(),
            },
        );
        run.summary = Some(summary);

        let mut benchmark = BTreeMap::new();
        benchmark.insert(
            "Net Profit Margin".to_string(),
            BenchmarkEntry {
                value: Some(2.0),
                benchmark: None,
                performance: "below_average".to_string(),
            },
        );
        run.benchmark = Some(benchmark);

        run.ai = Some(AiEnrichment {
            recommendations: vec!["Reduce short-term debt".to_string()],
            ..AiEnrichment::default()
        });

        let recs = build(&run);
        assert_eq!(recs.priority_areas, vec!["liquidity (poor)"]);
        assert_eq!(
            recs.action_items,
            vec!["Net Profit Margin is below the sector benchmark"]
        );
        assert_eq!(recs.ai_recommendations, vec!["Reduce short-term debt"]);
    }

    #[test]
    fn empty_run_yields_empty_recommendations() {
        let run = AnalysisRun::new(Uuid::new_v4());
        let recs = build(&run);
        assert!(recs.priority_areas.is_empty());
        assert!(recs.action_items.is_empty());
        assert!(recs.ai_recommendations.is_empty());
    }
}
