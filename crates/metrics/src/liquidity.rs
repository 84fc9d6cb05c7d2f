//! Short-term liquidity metrics.

use crate::error::MetricError;
use crate::util::{classified, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Liquidity;

pub const CURRENT_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 2.5),
    ThresholdBand::between("good", 1.5, 2.5),
    ThresholdBand::between("average", 1.0, 1.5),
    ThresholdBand::at_most("poor", 1.0),
]);

pub const QUICK_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 1.5),
    ThresholdBand::between("good", 1.0, 1.5),
    ThresholdBand::between("average", 0.7, 1.0),
    ThresholdBand::at_most("poor", 0.7),
]);

pub const CASH_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 1.0),
    ThresholdBand::between("good", 0.5, 1.0),
    ThresholdBand::between("average", 0.2, 0.5),
    ThresholdBand::at_most("poor", 0.2),
]);

pub const OCF_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 1.0),
    ThresholdBand::between("good", 0.6, 1.0),
    ThresholdBand::between("average", 0.4, 0.6),
    ThresholdBand::at_most("poor", 0.4),
]);

pub const WORKING_CAPITAL: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const NWC_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 0.3),
    ThresholdBand::between("good", 0.15, 0.3),
    ThresholdBand::between("average", 0.0, 0.15),
    ThresholdBand::at_most("poor", 0.0),
]);

pub const DEFENSIVE_INTERVAL: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 180.0),
    ThresholdBand::between("good", 90.0, 180.0),
    ThresholdBand::between("average", 30.0, 90.0),
    ThresholdBand::at_most("poor", 30.0),
]);

/// Current assets over current liabilities.
pub fn current_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("current_assets"), record.get("current_liabilities"));
    Ok(classified(value, 2, &CURRENT_RATIO, CATEGORY, "short_term"))
}

/// (Current assets - inventory) over current liabilities.
pub fn quick_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let numerator = match (record.get("current_assets"), record.get("inventory")) {
        (Some(ca), Some(inv)) => Some(ca - inv),
        _ => None,
    };
    let value = safe_div(numerator, record.get("current_liabilities"));
    Ok(classified(value, 2, &QUICK_RATIO, CATEGORY, "short_term"))
}

/// Cash and equivalents over current liabilities.
pub fn cash_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("cash"), record.get("current_liabilities"));
    Ok(classified(value, 2, &CASH_RATIO, CATEGORY, "short_term"))
}

/// Operating cash flow over current liabilities.
pub fn operating_cash_flow_ratio(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let value = safe_div(
        record.get("operating_cash_flow"),
        record.get("current_liabilities"),
    );
    Ok(classified(value, 2, &OCF_RATIO, CATEGORY, "short_term"))
}

/// Current assets minus current liabilities, in currency units.
pub fn working_capital(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = match (record.get("current_assets"), record.get("current_liabilities")) {
        (Some(ca), Some(cl)) => Some(ca - cl),
        _ => None,
    };
    Ok(classified(value, 0, &WORKING_CAPITAL, CATEGORY, "absolute"))
}

/// Working capital relative to total assets.
pub fn net_working_capital_ratio(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let wc = match (record.get("current_assets"), record.get("current_liabilities")) {
        (Some(ca), Some(cl)) => Some(ca - cl),
        _ => None,
    };
    let value = safe_div(wc, record.get("total_assets"));
    Ok(classified(value, 2, &NWC_RATIO, CATEGORY, "structure"))
}

/// Days of daily operating expenses covered by defensive (liquid) assets.
pub fn defensive_interval(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let defensive_assets = match (
        record.get("cash"),
        record.get("marketable_securities"),
        record.get("accounts_receivable"),
    ) {
        (Some(cash), securities, Some(ar)) => Some(cash + securities.unwrap_or(0.0) + ar),
        _ => None,
    };
    let daily_expenses = safe_div(record.get("operating_expenses"), Some(365.0));
    let value = safe_div(defensive_assets, daily_expenses);
    Ok(classified(value, 1, &DEFENSIVE_INTERVAL, CATEGORY, "coverage"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_ratio_round_trip() {
        let record =
            FinancialDataRecord::from([("current_assets", 100_000.0), ("current_liabilities", 50_000.0)]);
        let result = current_ratio(&record).unwrap();
        assert_eq!(result.value, Some(2.0));
        assert_eq!(result.interpretation, "good");
        assert_eq!(result.category, MetricCategory::Liquidity);
    }

    #[test]
    fn missing_liabilities_is_insufficient_not_zero() {
        let record = FinancialDataRecord::from([("current_assets", 100_000.0)]);
        let result = current_ratio(&record).unwrap();
        assert_eq!(result.value, None);
        assert_eq!(result.interpretation, "insufficient_data");
    }

    #[test]
    fn zero_denominator_is_insufficient() {
        let record =
            FinancialDataRecord::from([("current_assets", 100_000.0), ("current_liabilities", 0.0)]);
        let result = current_ratio(&record).unwrap();
        assert_eq!(result.value, None);
    }

    #[test]
    fn quick_ratio_excludes_inventory() {
        let record = FinancialDataRecord::from([
            ("current_assets", 120_000.0),
            ("inventory", 40_000.0),
            ("current_liabilities", 80_000.0),
        ]);
        let result = quick_ratio(&record).unwrap();
        assert_eq!(result.value, Some(1.0));
        assert_eq!(result.interpretation, "good");
    }

    #[test]
    fn negative_working_capital_classifies_negative() {
        let record =
            FinancialDataRecord::from([("current_assets", 30_000.0), ("current_liabilities", 50_000.0)]);
        let result = working_capital(&record).unwrap();
        assert_eq!(result.value, Some(-20_000.0));
        assert_eq!(result.interpretation, "negative");
    }
}
