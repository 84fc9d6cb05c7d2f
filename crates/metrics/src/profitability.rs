//! Margin and return metrics. All values are percentages at one decimal
//! place except where noted.

use crate::error::MetricError;
use crate::util::{classified, pct};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Profitability;

pub const GROSS_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 50.0),
    ThresholdBand::between("good", 30.0, 50.0),
    ThresholdBand::between("average", 15.0, 30.0),
    ThresholdBand::at_most("poor", 15.0),
]);

pub const OPERATING_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 20.0),
    ThresholdBand::between("good", 10.0, 20.0),
    ThresholdBand::between("average", 5.0, 10.0),
    ThresholdBand::at_most("poor", 5.0),
]);

pub const NET_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 15.0),
    ThresholdBand::between("good", 8.0, 15.0),
    ThresholdBand::between("average", 3.0, 8.0),
    ThresholdBand::at_most("poor", 3.0),
]);

pub const EBITDA_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 25.0),
    ThresholdBand::between("good", 15.0, 25.0),
    ThresholdBand::between("average", 8.0, 15.0),
    ThresholdBand::at_most("poor", 8.0),
]);

pub const PRETAX_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 18.0),
    ThresholdBand::between("good", 10.0, 18.0),
    ThresholdBand::between("average", 4.0, 10.0),
    ThresholdBand::at_most("poor", 4.0),
]);

pub const RETURN_ON_ASSETS: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 10.0),
    ThresholdBand::between("good", 5.0, 10.0),
    ThresholdBand::between("average", 2.0, 5.0),
    ThresholdBand::at_most("poor", 2.0),
]);

pub const RETURN_ON_EQUITY: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 20.0),
    ThresholdBand::between("good", 12.0, 20.0),
    ThresholdBand::between("average", 6.0, 12.0),
    ThresholdBand::at_most("poor", 6.0),
]);

pub const RETURN_ON_SALES: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 15.0),
    ThresholdBand::between("good", 8.0, 15.0),
    ThresholdBand::between("average", 4.0, 8.0),
    ThresholdBand::at_most("poor", 4.0),
]);

pub const ROCE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 15.0),
    ThresholdBand::between("good", 10.0, 15.0),
    ThresholdBand::between("average", 5.0, 10.0),
    ThresholdBand::at_most("poor", 5.0),
]);

pub const ROIC: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 15.0),
    ThresholdBand::between("good", 9.0, 15.0),
    ThresholdBand::between("average", 5.0, 9.0),
    ThresholdBand::at_most("poor", 5.0),
]);

/// Gross profit as a percentage of revenue. Falls back to `revenue - cogs`
/// when `gross_profit` was not reported directly.
pub fn gross_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let gross = record.get("gross_profit").or_else(|| {
        match (record.get("revenue"), record.get("cogs")) {
            (Some(rev), Some(cogs)) => Some(rev - cogs),
            _ => None,
        }
    });
    let value = pct(gross, record.get("revenue"));
    Ok(classified(value, 1, &GROSS_MARGIN, CATEGORY, "margins"))
}

/// Operating income as a percentage of revenue.
pub fn operating_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("operating_income"), record.get("revenue"));
    Ok(classified(value, 1, &OPERATING_MARGIN, CATEGORY, "margins"))
}

/// Net income as a percentage of revenue.
pub fn net_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("net_income"), record.get("revenue"));
    Ok(classified(value, 1, &NET_MARGIN, CATEGORY, "margins"))
}

/// EBITDA as a percentage of revenue.
pub fn ebitda_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("ebitda"), record.get("revenue"));
    Ok(classified(value, 1, &EBITDA_MARGIN, CATEGORY, "margins"))
}

/// Pre-tax income as a percentage of revenue.
pub fn pretax_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("pretax_income"), record.get("revenue"));
    Ok(classified(value, 1, &PRETAX_MARGIN, CATEGORY, "margins"))
}

/// Net income as a percentage of total assets.
pub fn return_on_assets(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("net_income"), record.get("total_assets"));
    Ok(classified(value, 1, &RETURN_ON_ASSETS, CATEGORY, "returns"))
}

/// Net income as a percentage of total equity.
pub fn return_on_equity(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("net_income"), record.get("total_equity"));
    Ok(classified(value, 1, &RETURN_ON_EQUITY, CATEGORY, "returns"))
}

/// Operating income as a percentage of revenue (pre-interest, pre-tax sales
/// efficiency).
pub fn return_on_sales(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("ebit"), record.get("revenue"));
    Ok(classified(value, 1, &RETURN_ON_SALES, CATEGORY, "returns"))
}

/// EBIT over capital employed (total assets - current liabilities).
pub fn return_on_capital_employed(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let capital_employed = match (record.get("total_assets"), record.get("current_liabilities")) {
        (Some(ta), Some(cl)) => Some(ta - cl),
        _ => None,
    };
    let value = pct(record.get("ebit"), capital_employed);
    Ok(classified(value, 1, &ROCE, CATEGORY, "returns"))
}

/// NOPAT over invested capital. NOPAT falls back to `ebit * (1 - tax_rate)`
/// when not reported; invested capital falls back to debt + equity.
pub fn return_on_invested_capital(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let nopat = nopat(record);
    let invested = invested_capital(record);
    let value = pct(nopat, invested);
    Ok(classified(value, 1, &ROIC, CATEGORY, "returns"))
}

/// Net operating profit after tax, reported or derived.
pub(crate) fn nopat(record: &FinancialDataRecord) -> Option<f64> {
    record.get("nopat").or_else(|| {
        match (record.get("ebit"), record.get("tax_rate")) {
            (Some(ebit), Some(tax_rate)) => Some(ebit * (1.0 - tax_rate)),
            _ => None,
        }
    })
}

/// Invested capital, reported or derived from debt + equity.
pub(crate) fn invested_capital(record: &FinancialDataRecord) -> Option<f64> {
    record.get("invested_capital").or_else(|| {
        match (record.get("total_debt"), record.get("total_equity")) {
            (Some(debt), Some(equity)) => Some(debt + equity),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roe_twenty_percent_is_excellent() {
        let record =
            FinancialDataRecord::from([("net_income", 20_000.0), ("total_equity", 100_000.0)]);
        let result = return_on_equity(&record).unwrap();
        assert_eq!(result.value, Some(20.0));
        assert_eq!(result.interpretation, "excellent");
    }

    #[test]
    fn gross_margin_derives_gross_profit_when_absent() {
        let record = FinancialDataRecord::from([("revenue", 150_000.0), ("cogs", 90_000.0)]);
        let result = gross_margin(&record).unwrap();
        assert_eq!(result.value, Some(40.0));
        assert_eq!(result.interpretation, "good");
    }

    #[test]
    fn roic_derives_nopat_and_invested_capital() {
        let record = FinancialDataRecord::from([
            ("ebit", 40_000.0),
            ("tax_rate", 0.25),
            ("total_debt", 100_000.0),
            ("total_equity", 100_000.0),
        ]);
        let result = return_on_invested_capital(&record).unwrap();
        assert_eq!(result.value, Some(15.0));
        assert_eq!(result.interpretation, "excellent");
    }

    #[test]
    fn zero_revenue_is_insufficient() {
        let record = FinancialDataRecord::from([("net_income", 5_000.0), ("revenue", 0.0)]);
        let result = net_margin(&record).unwrap();
        assert_eq!(result.value, None);
        assert_eq!(result.interpretation, "insufficient_data");
    }
}
