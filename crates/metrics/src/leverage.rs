//! Leverage and solvency metrics.

use crate::error::MetricError;
use crate::util::{classified, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Leverage;

pub const DEBT_TO_EQUITY: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("low", 0.3),
    ThresholdBand::between("moderate", 0.3, 1.0),
    ThresholdBand::between("high", 1.0, 2.0),
    ThresholdBand::at_least("very_high", 2.0),
]);

pub const DEBT_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("low", 0.3),
    ThresholdBand::between("moderate", 0.3, 0.6),
    ThresholdBand::at_least("high", 0.6),
]);

pub const EQUITY_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("strong", 0.5),
    ThresholdBand::between("adequate", 0.3, 0.5),
    ThresholdBand::at_most("weak", 0.3),
]);

pub const EQUITY_MULTIPLIER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("conservative", 2.0),
    ThresholdBand::between("moderate", 2.0, 3.0),
    ThresholdBand::at_least("aggressive", 3.0),
]);

pub const INTEREST_COVERAGE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 5.0),
    ThresholdBand::between("good", 2.5, 5.0),
    ThresholdBand::between("average", 1.5, 2.5),
    ThresholdBand::at_most("poor", 1.5),
]);

pub const DEBT_SERVICE_COVERAGE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 2.0),
    ThresholdBand::between("good", 1.25, 2.0),
    ThresholdBand::between("average", 1.0, 1.25),
    ThresholdBand::at_most("poor", 1.0),
]);

pub const LTD_TO_CAPITALIZATION: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("low", 0.25),
    ThresholdBand::between("moderate", 0.25, 0.5),
    ThresholdBand::at_least("high", 0.5),
]);

pub const CASH_FLOW_TO_DEBT: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 0.4),
    ThresholdBand::between("good", 0.25, 0.4),
    ThresholdBand::between("average", 0.1, 0.25),
    ThresholdBand::at_most("poor", 0.1),
]);

/// Total debt over total equity.
pub fn debt_to_equity(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("total_debt"), record.get("total_equity"));
    Ok(classified(value, 2, &DEBT_TO_EQUITY, CATEGORY, "solvency"))
}

/// Total debt over total assets.
pub fn debt_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("total_debt"), record.get("total_assets"));
    Ok(classified(value, 2, &DEBT_RATIO, CATEGORY, "solvency"))
}

/// Total equity over total assets.
pub fn equity_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("total_equity"), record.get("total_assets"));
    Ok(classified(value, 2, &EQUITY_RATIO, CATEGORY, "solvency"))
}

/// Total assets over total equity.
pub fn equity_multiplier(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("total_assets"), record.get("total_equity"));
    Ok(classified(value, 2, &EQUITY_MULTIPLIER, CATEGORY, "structure"))
}

/// EBIT over interest expense (times interest earned).
pub fn interest_coverage(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("ebit"), record.get("interest_expense"));
    Ok(classified(value, 2, &INTEREST_COVERAGE, CATEGORY, "coverage"))
}

/// Operating income over total debt service (interest + principal due).
pub fn debt_service_coverage(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let service = match (record.get("interest_expense"), record.get("principal_repayments")) {
        (Some(interest), principal) => Some(interest + principal.unwrap_or(0.0)),
        _ => None,
    };
    let value = safe_div(record.get("operating_income"), service);
    Ok(classified(value, 2, &DEBT_SERVICE_COVERAGE, CATEGORY, "coverage"))
}

/// Long-term debt over long-term debt plus equity.
pub fn long_term_debt_to_capitalization(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let capitalization = match (record.get("long_term_debt"), record.get("total_equity")) {
        (Some(ltd), Some(equity)) => Some(ltd + equity),
        _ => None,
    };
    let value = safe_div(record.get("long_term_debt"), capitalization);
    Ok(classified(value, 2, &LTD_TO_CAPITALIZATION, CATEGORY, "structure"))
}

/// Operating cash flow over total debt.
pub fn cash_flow_to_debt(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("operating_cash_flow"), record.get("total_debt"));
    Ok(classified(value, 2, &CASH_FLOW_TO_DEBT, CATEGORY, "coverage"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_to_equity_half_is_moderate() {
        let record =
            FinancialDataRecord::from([("total_debt", 50_000.0), ("total_equity", 100_000.0)]);
        let result = debt_to_equity(&record).unwrap();
        assert_eq!(result.value, Some(0.5));
        assert_eq!(result.interpretation, "moderate");
    }

    #[test]
    fn interest_coverage_boundary_goes_to_excellent() {
        let record = FinancialDataRecord::from([("ebit", 50_000.0), ("interest_expense", 10_000.0)]);
        let result = interest_coverage(&record).unwrap();
        assert_eq!(result.value, Some(5.0));
        assert_eq!(result.interpretation, "excellent");
    }

    #[test]
    fn debt_service_coverage_defaults_missing_principal_to_zero() {
        let record =
            FinancialDataRecord::from([("operating_income", 30_000.0), ("interest_expense", 15_000.0)]);
        let result = debt_service_coverage(&record).unwrap();
        assert_eq!(result.value, Some(2.0));
        assert_eq!(result.interpretation, "excellent");
    }
}
