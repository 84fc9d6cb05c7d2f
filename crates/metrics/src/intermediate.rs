//! Cost-volume-profit and leverage-degree metrics.

use crate::error::MetricError;
use crate::util::{classified, pct, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Intermediate;

pub const CONTRIBUTION_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 40.0),
    ThresholdBand::between("good", 25.0, 40.0),
    ThresholdBand::between("average", 10.0, 25.0),
    ThresholdBand::at_most("poor", 10.0),
]);

pub const BREAK_EVEN_POINT: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const MARGIN_OF_SAFETY: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("comfortable", 30.0),
    ThresholdBand::between("adequate", 10.0, 30.0),
    ThresholdBand::between("tight", 0.0, 10.0),
    ThresholdBand::at_most("loss_making", 0.0),
]);

pub const OPERATING_LEVERAGE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("high", 2.5),
    ThresholdBand::between("moderate", 1.5, 2.5),
    ThresholdBand::at_most("low", 1.5),
]);

pub const FINANCIAL_LEVERAGE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("high", 2.0),
    ThresholdBand::between("moderate", 1.3, 2.0),
    ThresholdBand::at_most("low", 1.3),
]);

/// (Revenue - variable costs) as a percentage of revenue.
pub fn contribution_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let contribution = match (record.get("revenue"), record.get("variable_costs")) {
        (Some(rev), Some(vc)) => Some(rev - vc),
        _ => None,
    };
    let value = pct(contribution, record.get("revenue"));
    Ok(classified(value, 1, &CONTRIBUTION_MARGIN, CATEGORY, "cvp"))
}

/// Fixed costs over contribution margin ratio: the revenue level at which
/// profit is zero.
pub fn break_even_point(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let contribution_ratio = match (record.get("revenue"), record.get("variable_costs")) {
        (Some(rev), Some(vc)) if rev != 0.0 => Some((rev - vc) / rev),
        _ => None,
    };
    let value = safe_div(record.get("fixed_costs"), contribution_ratio);
    Ok(classified(value, 0, &BREAK_EVEN_POINT, CATEGORY, "cvp"))
}

/// How far current revenue sits above break-even, as a percentage of revenue.
pub fn margin_of_safety(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let contribution_ratio = match (record.get("revenue"), record.get("variable_costs")) {
        (Some(rev), Some(vc)) if rev != 0.0 => Some((rev - vc) / rev),
        _ => None,
    };
    let break_even = safe_div(record.get("fixed_costs"), contribution_ratio);
    let value = match (record.get("revenue"), break_even) {
        (Some(rev), Some(be)) if rev != 0.0 => Some((rev - be) / rev * 100.0),
        _ => None,
    };
    Ok(classified(value, 1, &MARGIN_OF_SAFETY, CATEGORY, "cvp"))
}

/// Degree of operating leverage: contribution over EBIT.
pub fn degree_of_operating_leverage(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let contribution = match (record.get("revenue"), record.get("variable_costs")) {
        (Some(rev), Some(vc)) => Some(rev - vc),
        _ => None,
    };
    let value = safe_div(contribution, record.get("ebit"));
    Ok(classified(value, 2, &OPERATING_LEVERAGE, CATEGORY, "leverage_degree"))
}

/// Degree of financial leverage: EBIT over (EBIT - interest).
pub fn degree_of_financial_leverage(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let denominator = match (record.get("ebit"), record.get("interest_expense")) {
        (Some(ebit), Some(interest)) => Some(ebit - interest),
        _ => None,
    };
    let value = safe_div(record.get("ebit"), denominator);
    Ok(classified(value, 2, &FINANCIAL_LEVERAGE, CATEGORY, "leverage_degree"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_even_from_cvp_inputs() {
        let record = FinancialDataRecord::from([
            ("revenue", 200_000.0),
            ("variable_costs", 120_000.0),
            ("fixed_costs", 60_000.0),
        ]);
        // Contribution ratio 0.4 -> break-even 150 000.
        let result = break_even_point(&record).unwrap();
        assert_eq!(result.value, Some(150_000.0));

        let safety = margin_of_safety(&record).unwrap();
        assert_eq!(safety.value, Some(25.0));
        assert_eq!(safety.interpretation, "adequate");
    }

    #[test]
    fn dfl_guards_the_interest_wipeout_case() {
        let record =
            FinancialDataRecord::from([("ebit", 10_000.0), ("interest_expense", 10_000.0)]);
        let result = degree_of_financial_leverage(&record).unwrap();
        // EBIT - interest is zero; safe division reports insufficiency.
        assert_eq!(result.value, None);
    }
}
