//! # Finsight Metric Dispatcher
//!
//! Resolves requested analysis types to registered metric functions and runs
//! them against a `FinancialDataRecord`, collecting successes and per-metric
//! failures without ever aborting the batch.
//!
//! The registry is a closed enum (`MetricId`) validated once at startup, so
//! an unresolvable name is caller input error, reported per-selection; it can
//! never silently skip a wired metric.

use core_types::{AnalysisTypeSelection, CalculationBatch, FinancialDataRecord};
use std::collections::BTreeMap;

pub mod error;
pub mod registry;

pub use error::DispatchError;
pub use registry::{MetricFn, MetricId};

/// The validated metric registry. Construction checks every threshold table
/// and every display-name round trip, so dispatch itself cannot hit a wiring
/// failure.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    _validated: (),
}

impl Registry {
    pub fn new() -> Result<Self, DispatchError> {
        metrics::validate_tables()?;

        for id in MetricId::ALL {
            match MetricId::from_name(id.name()) {
                Some(resolved) if resolved == id => {}
                _ => return Err(DispatchError::AmbiguousName(id.name())),
            }
        }

        Ok(Self { _validated: () })
    }

    /// Runs every selection against the record.
    ///
    /// Partial-failure contract: one metric's failure (unresolvable name or
    /// malformed inputs) never prevents sibling metrics from running. Each
    /// failure becomes one entry in `errors`; each success lands in
    /// `results` enriched with the selection's localized labels.
    pub fn dispatch(
        &self,
        record: &FinancialDataRecord,
        selections: &[AnalysisTypeSelection],
    ) -> CalculationBatch {
        let mut results = BTreeMap::new();
        let mut errors = Vec::new();

        for selection in selections {
            let Some(id) = MetricId::from_name(&selection.name) else {
                tracing::warn!(name = %selection.name, "no registered metric for selection");
                errors.push(format!(
                    "Calculation method not implemented for: {}",
                    selection.name
                ));
                continue;
            };

            match (id.function())(record) {
                Ok(mut result) => {
                    result.label_en = selection.label_en.clone();
                    result.label_ar = selection.label_ar.clone();
                    result.description = selection.description.clone();
                    tracing::debug!(
                        metric = id.name(),
                        value = ?result.value,
                        interpretation = %result.interpretation,
                        "metric computed"
                    );
                    results.insert(id.name().to_string(), result);
                }
                Err(err) => {
                    tracing::warn!(metric = id.name(), error = %err, "metric failed");
                    errors.push(format!("{}: {}", selection.name, err));
                }
            }
        }

        CalculationBatch::new(results, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MetricCategory;

    fn selections(names: &[&str]) -> Vec<AnalysisTypeSelection> {
        names
            .iter()
            .map(|n| AnalysisTypeSelection::named(*n))
            .collect()
    }

    #[test]
    fn registry_startup_validation_passes() {
        Registry::new().unwrap();
    }

    #[test]
    fn unresolvable_selection_isolates_its_failure() {
        let registry = Registry::new().unwrap();
        let record = FinancialDataRecord::from([
            ("current_assets", 100_000.0),
            ("current_liabilities", 50_000.0),
            ("total_debt", 50_000.0),
            ("total_equity", 100_000.0),
            ("net_income", 20_000.0),
            ("revenue", 150_000.0),
        ]);
        let batch = registry.dispatch(
            &record,
            &selections(&[
                "Current Ratio",
                "Debt-to-Equity Ratio",
                "Mystery Metric",
                "Return on Equity",
                "Net Profit Margin",
            ]),
        );

        assert_eq!(batch.total_calculated, 4);
        assert_eq!(batch.total_errors, 1);
        assert_eq!(batch.results.len(), 4);
        assert_eq!(
            batch.errors,
            vec!["Calculation method not implemented for: Mystery Metric".to_string()]
        );
    }

    #[test]
    fn malformed_inputs_are_reported_not_propagated() {
        let registry = Registry::new().unwrap();
        let record = FinancialDataRecord::from([
            ("spot_price", 100.0),
            ("strike_price", 100.0),
            ("time_to_expiry", -1.0),
            ("risk_free_rate", 0.05),
            ("volatility", 0.2),
            ("current_assets", 80_000.0),
            ("current_liabilities", 40_000.0),
        ]);
        let batch = registry.dispatch(
            &record,
            &selections(&["Black-Scholes Call Price", "Current Ratio"]),
        );

        assert_eq!(batch.total_calculated, 1);
        assert_eq!(batch.total_errors, 1);
        assert!(batch.errors[0].starts_with("Black-Scholes Call Price:"));
        assert!(batch.results.contains_key("Current Ratio"));
    }

    #[test]
    fn labels_are_attached_to_results() {
        let registry = Registry::new().unwrap();
        let record = FinancialDataRecord::from([
            ("current_assets", 100_000.0),
            ("current_liabilities", 50_000.0),
        ]);
        let selection = AnalysisTypeSelection {
            name: "Current Ratio".to_string(),
            label_en: Some("Current Ratio".to_string()),
            label_ar: Some("نسبة التداول".to_string()),
            description: Some("Short-term liquidity".to_string()),
        };
        let batch = registry.dispatch(&record, &[selection]);
        let result = &batch.results["Current Ratio"];

        assert_eq!(result.label_ar.as_deref(), Some("نسبة التداول"));
        assert_eq!(result.category, MetricCategory::Liquidity);
    }

    #[test]
    fn dispatch_is_idempotent() {
        let registry = Registry::new().unwrap();
        let record = FinancialDataRecord::from([
            ("portfolio_value", 1_000_000.0),
            ("expected_return", 0.06),
            ("volatility", 0.18),
            ("current_assets", 100_000.0),
            ("current_liabilities", 50_000.0),
        ]);
        let picks = selections(&["Monte Carlo VaR", "Current Ratio"]);

        let first = registry.dispatch(&record, &picks);
        let second = registry.dispatch(&record, &picks);
        assert_eq!(first.results, second.results);
        assert_eq!(first.errors, second.errors);
    }
}
