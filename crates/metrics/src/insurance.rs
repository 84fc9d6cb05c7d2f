//! Insurance-sector metrics.

use crate::error::MetricError;
use crate::util::{classified, pct};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Insurance;

pub const LOSS_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 50.0),
    ThresholdBand::between("good", 50.0, 65.0),
    ThresholdBand::between("average", 65.0, 80.0),
    ThresholdBand::at_least("poor", 80.0),
]);

pub const EXPENSE_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 25.0),
    ThresholdBand::between("good", 25.0, 32.0),
    ThresholdBand::between("average", 32.0, 40.0),
    ThresholdBand::at_least("poor", 40.0),
]);

pub const COMBINED_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("profitable", 100.0),
    ThresholdBand::between("marginal", 100.0, 105.0),
    ThresholdBand::at_least("unprofitable", 105.0),
]);

pub const RETENTION_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("high", 85.0),
    ThresholdBand::between("moderate", 60.0, 85.0),
    ThresholdBand::at_most("low", 60.0),
]);

pub const SOLVENCY_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("strong", 2.0),
    ThresholdBand::between("adequate", 1.5, 2.0),
    ThresholdBand::at_most("weak", 1.5),
]);

/// Claims incurred as a percentage of premiums earned.
pub fn loss_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("claims_incurred"), record.get("premiums_earned"));
    Ok(classified(value, 1, &LOSS_RATIO, CATEGORY, "underwriting"))
}

/// Underwriting expenses as a percentage of premiums earned.
pub fn expense_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(
        record.get("underwriting_expenses"),
        record.get("premiums_earned"),
    );
    Ok(classified(value, 1, &EXPENSE_RATIO, CATEGORY, "underwriting"))
}

/// Loss ratio + expense ratio. Below 100% means underwriting profit.
pub fn combined_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let loss = pct(record.get("claims_incurred"), record.get("premiums_earned"));
    let expense = pct(
        record.get("underwriting_expenses"),
        record.get("premiums_earned"),
    );
    let value = match (loss, expense) {
        (Some(l), Some(e)) => Some(l + e),
        _ => None,
    };
    Ok(classified(value, 1, &COMBINED_RATIO, CATEGORY, "underwriting"))
}

/// Net premiums written as a percentage of gross premiums written.
pub fn retention_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(
        record.get("net_premiums_written"),
        record.get("gross_premiums_written"),
    );
    Ok(classified(value, 1, &RETENTION_RATIO, CATEGORY, "reinsurance"))
}

/// Available capital over net premiums written.
pub fn solvency_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = crate::util::safe_div(
        record.get("total_equity"),
        record.get("net_premiums_written"),
    );
    Ok(classified(value, 2, &SOLVENCY_RATIO, CATEGORY, "capital"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_ratio_adds_both_legs() {
        let record = FinancialDataRecord::from([
            ("claims_incurred", 60_000.0),
            ("underwriting_expenses", 30_000.0),
            ("premiums_earned", 100_000.0),
        ]);
        let result = combined_ratio(&record).unwrap();
        assert_eq!(result.value, Some(90.0));
        assert_eq!(result.interpretation, "profitable");
    }

    #[test]
    fn combined_ratio_needs_both_legs() {
        let record = FinancialDataRecord::from([
            ("claims_incurred", 60_000.0),
            ("premiums_earned", 100_000.0),
        ]);
        let result = combined_ratio(&record).unwrap();
        assert_eq!(result.value, None);
    }
}
