//! Cash-flow quality metrics.

use crate::error::MetricError;
use crate::util::{classified, pct, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::CashFlow;

pub const OCF_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 20.0),
    ThresholdBand::between("good", 10.0, 20.0),
    ThresholdBand::between("average", 5.0, 10.0),
    ThresholdBand::at_most("poor", 5.0),
]);

pub const FREE_CASH_FLOW: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const FCF_YIELD: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("attractive", 8.0),
    ThresholdBand::between("fair", 4.0, 8.0),
    ThresholdBand::at_most("low", 4.0),
]);

pub const CAPEX_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("heavy", 50.0),
    ThresholdBand::between("moderate", 25.0, 50.0),
    ThresholdBand::at_most("light", 25.0),
]);

pub const CASH_FLOW_COVERAGE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 1.5),
    ThresholdBand::between("good", 1.0, 1.5),
    ThresholdBand::between("average", 0.5, 1.0),
    ThresholdBand::at_most("poor", 0.5),
]);

pub const CASH_RETURN_ON_ASSETS: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 12.0),
    ThresholdBand::between("good", 7.0, 12.0),
    ThresholdBand::between("average", 3.0, 7.0),
    ThresholdBand::at_most("poor", 3.0),
]);

/// Operating cash flow as a percentage of revenue.
pub fn operating_cash_flow_margin(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("operating_cash_flow"), record.get("revenue"));
    Ok(classified(value, 1, &OCF_MARGIN, CATEGORY, "quality"))
}

/// Operating cash flow minus capital expenditures, in currency units. Uses
/// the reported figure when the normalizer already derived it.
pub fn free_cash_flow(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = record.get("free_cash_flow").or_else(|| {
        match (
            record.get("operating_cash_flow"),
            record.get("capital_expenditures"),
        ) {
            (Some(ocf), Some(capex)) => Some(ocf - capex),
            _ => None,
        }
    });
    Ok(classified(value, 0, &FREE_CASH_FLOW, CATEGORY, "absolute"))
}

/// Free cash flow as a percentage of market capitalization.
pub fn fcf_yield(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let fcf = record.get("free_cash_flow").or_else(|| {
        match (
            record.get("operating_cash_flow"),
            record.get("capital_expenditures"),
        ) {
            (Some(ocf), Some(capex)) => Some(ocf - capex),
            _ => None,
        }
    });
    let value = pct(fcf, crate::market::market_cap(record));
    Ok(classified(value, 1, &FCF_YIELD, CATEGORY, "yield"))
}

/// Capital expenditures as a percentage of operating cash flow.
pub fn capex_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(
        record.get("capital_expenditures"),
        record.get("operating_cash_flow"),
    );
    Ok(classified(value, 1, &CAPEX_RATIO, CATEGORY, "reinvestment"))
}

/// Operating cash flow over total liabilities.
pub fn cash_flow_coverage(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(
        record.get("operating_cash_flow"),
        record.get("total_liabilities"),
    );
    Ok(classified(value, 2, &CASH_FLOW_COVERAGE, CATEGORY, "coverage"))
}

/// Operating cash flow as a percentage of total assets.
pub fn cash_return_on_assets(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("operating_cash_flow"), record.get("total_assets"));
    Ok(classified(value, 1, &CASH_RETURN_ON_ASSETS, CATEGORY, "returns"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fcf_prefers_the_derived_field_when_present() {
        let record = FinancialDataRecord::from([
            ("free_cash_flow", 42_000.0),
            ("operating_cash_flow", 100_000.0),
            ("capital_expenditures", 30_000.0),
        ]);
        let result = free_cash_flow(&record).unwrap();
        assert_eq!(result.value, Some(42_000.0));
    }

    #[test]
    fn fcf_falls_back_to_ocf_minus_capex() {
        let record = FinancialDataRecord::from([
            ("operating_cash_flow", 100_000.0),
            ("capital_expenditures", 30_000.0),
        ]);
        let result = free_cash_flow(&record).unwrap();
        assert_eq!(result.value, Some(70_000.0));
        assert_eq!(result.interpretation, "positive");
    }
}
