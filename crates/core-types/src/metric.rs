use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Interpretation assigned when a metric could not be computed because its
/// required inputs were absent. This is an expected outcome, not an error.
pub const INSUFFICIENT_DATA: &str = "insufficient_data";

/// Interpretation assigned when a computed value falls outside every band of
/// the metric's threshold table.
pub const UNCLASSIFIED: &str = "unclassified";

/// The fixed category a metric reports under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Liquidity,
    Leverage,
    Profitability,
    Activity,
    Market,
    Banking,
    Insurance,
    Risk,
    Advanced,
    Intermediate,
    CashFlow,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 11] = [
        MetricCategory::Liquidity,
        MetricCategory::Leverage,
        MetricCategory::Profitability,
        MetricCategory::Activity,
        MetricCategory::Market,
        MetricCategory::Banking,
        MetricCategory::Insurance,
        MetricCategory::Risk,
        MetricCategory::Advanced,
        MetricCategory::Intermediate,
        MetricCategory::CashFlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Liquidity => "liquidity",
            MetricCategory::Leverage => "leverage",
            MetricCategory::Profitability => "profitability",
            MetricCategory::Activity => "activity",
            MetricCategory::Market => "market",
            MetricCategory::Banking => "banking",
            MetricCategory::Insurance => "insurance",
            MetricCategory::Risk => "risk",
            MetricCategory::Advanced => "advanced",
            MetricCategory::Intermediate => "intermediate",
            MetricCategory::CashFlow => "cash_flow",
        }
    }

    /// Case-insensitive lookup used when grouping results into summaries.
    pub fn parse(label: &str) -> Option<Self> {
        let lowered = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The output of one metric function for one run.
///
/// `value == None` signals insufficient input data and always pairs with the
/// `insufficient_data` interpretation; a populated value carries an
/// interpretation drawn from the metric's declared threshold vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub value: Option<f64>,
    pub interpretation: String,
    pub category: MetricCategory,
    pub subcategory: String,
    /// Intermediate components for composite models (e.g. DuPont factors,
    /// Black-Scholes d1/d2). Absent for simple ratios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<BTreeMap<String, f64>>,
    // Caller-supplied localized labels, attached by the dispatcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MetricResult {
    /// A result for a metric whose required inputs were absent.
    pub fn insufficient(category: MetricCategory, subcategory: impl Into<String>) -> Self {
        Self {
            value: None,
            interpretation: INSUFFICIENT_DATA.to_string(),
            category,
            subcategory: subcategory.into(),
            components: None,
            label_en: None,
            label_ar: None,
            description: None,
        }
    }

    pub fn computed(
        value: f64,
        interpretation: impl Into<String>,
        category: MetricCategory,
        subcategory: impl Into<String>,
    ) -> Self {
        Self {
            value: Some(value),
            interpretation: interpretation.into(),
            category,
            subcategory: subcategory.into(),
            components: None,
            label_en: None,
            label_ar: None,
            description: None,
        }
    }

    pub fn with_components(mut self, components: BTreeMap<String, f64>) -> Self {
        self.components = Some(components);
        self
    }
}

/// The aggregate of all metric results for one run.
///
/// `results` is a BTreeMap so the serialized snapshot is byte-stable across
/// identical reruns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationBatch {
    pub results: BTreeMap<String, MetricResult>,
    pub errors: Vec<String>,
    pub total_calculated: usize,
    pub total_errors: usize,
    pub timestamp: DateTime<Utc>,
}

impl CalculationBatch {
    pub fn new(results: BTreeMap<String, MetricResult>, errors: Vec<String>) -> Self {
        Self {
            total_calculated: results.len(),
            total_errors: errors.len(),
            results,
            errors,
            timestamp: Utc::now(),
        }
    }
}

/// One metric's contribution to a category summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetric {
    pub name: String,
    pub value: Option<f64>,
    pub interpretation: String,
}

/// Per-category rollup of computed metrics.
///
/// `representative` is the most frequent interpretation among the category's
/// members; ties keep the label encountered first in result iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub metrics: Vec<CategoryMetric>,
    pub representative: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(MetricCategory::parse("Liquidity"), Some(MetricCategory::Liquidity));
        assert_eq!(MetricCategory::parse("CASH_FLOW"), Some(MetricCategory::CashFlow));
        assert_eq!(MetricCategory::parse("unknown"), None);
    }

    #[test]
    fn batch_counts_match_contents() {
        let mut results = BTreeMap::new();
        results.insert(
            "Current Ratio".to_string(),
            MetricResult::computed(2.0, "good", MetricCategory::Liquidity, "short_term"),
        );
        let batch = CalculationBatch::new(results, vec!["boom".to_string()]);

        assert_eq!(batch.total_calculated, 1);
        assert_eq!(batch.total_errors, 1);
    }
}
