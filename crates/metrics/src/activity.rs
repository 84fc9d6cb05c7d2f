//! Activity and efficiency metrics: turnovers and the cash conversion cycle.

use crate::error::MetricError;
use crate::util::{classified, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Activity;

pub const INVENTORY_TURNOVER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 8.0),
    ThresholdBand::between("good", 5.0, 8.0),
    ThresholdBand::between("average", 3.0, 5.0),
    ThresholdBand::at_most("poor", 3.0),
]);

pub const RECEIVABLES_TURNOVER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 12.0),
    ThresholdBand::between("good", 8.0, 12.0),
    ThresholdBand::between("average", 4.0, 8.0),
    ThresholdBand::at_most("poor", 4.0),
]);

pub const PAYABLES_TURNOVER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("fast", 12.0),
    ThresholdBand::between("balanced", 6.0, 12.0),
    ThresholdBand::at_most("slow", 6.0),
]);

pub const ASSET_TURNOVER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 2.0),
    ThresholdBand::between("good", 1.0, 2.0),
    ThresholdBand::between("average", 0.5, 1.0),
    ThresholdBand::at_most("poor", 0.5),
]);

pub const FIXED_ASSET_TURNOVER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 4.0),
    ThresholdBand::between("good", 2.5, 4.0),
    ThresholdBand::between("average", 1.0, 2.5),
    ThresholdBand::at_most("poor", 1.0),
]);

pub const WORKING_CAPITAL_TURNOVER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 6.0),
    ThresholdBand::between("good", 3.0, 6.0),
    ThresholdBand::between("average", 1.5, 3.0),
    ThresholdBand::at_most("poor", 1.5),
]);

pub const DSO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 30.0),
    ThresholdBand::between("good", 30.0, 45.0),
    ThresholdBand::between("average", 45.0, 60.0),
    ThresholdBand::at_least("poor", 60.0),
]);

pub const DIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 45.0),
    ThresholdBand::between("good", 45.0, 75.0),
    ThresholdBand::between("average", 75.0, 120.0),
    ThresholdBand::at_least("poor", 120.0),
]);

pub const DPO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("extended", 60.0),
    ThresholdBand::between("balanced", 30.0, 60.0),
    ThresholdBand::at_most("short", 30.0),
]);

pub const OPERATING_CYCLE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 60.0),
    ThresholdBand::between("good", 60.0, 100.0),
    ThresholdBand::between("average", 100.0, 150.0),
    ThresholdBand::at_least("poor", 150.0),
]);

pub const CASH_CONVERSION_CYCLE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 30.0),
    ThresholdBand::between("good", 30.0, 60.0),
    ThresholdBand::between("average", 60.0, 90.0),
    ThresholdBand::at_least("poor", 90.0),
]);

/// COGS over inventory.
pub fn inventory_turnover(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("cogs"), record.get("inventory"));
    Ok(classified(value, 2, &INVENTORY_TURNOVER, CATEGORY, "turnover"))
}

/// Revenue over accounts receivable.
pub fn receivables_turnover(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("revenue"), record.get("accounts_receivable"));
    Ok(classified(value, 2, &RECEIVABLES_TURNOVER, CATEGORY, "turnover"))
}

/// COGS over accounts payable.
pub fn payables_turnover(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("cogs"), record.get("accounts_payable"));
    Ok(classified(value, 2, &PAYABLES_TURNOVER, CATEGORY, "turnover"))
}

/// Revenue over total assets.
pub fn asset_turnover(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("revenue"), record.get("total_assets"));
    Ok(classified(value, 2, &ASSET_TURNOVER, CATEGORY, "turnover"))
}

/// Revenue over net fixed assets.
pub fn fixed_asset_turnover(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("revenue"), record.get("fixed_assets"));
    Ok(classified(value, 2, &FIXED_ASSET_TURNOVER, CATEGORY, "turnover"))
}

/// Revenue over working capital.
pub fn working_capital_turnover(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let wc = match (record.get("current_assets"), record.get("current_liabilities")) {
        (Some(ca), Some(cl)) => Some(ca - cl),
        _ => None,
    };
    let value = safe_div(record.get("revenue"), wc);
    Ok(classified(value, 2, &WORKING_CAPITAL_TURNOVER, CATEGORY, "turnover"))
}

/// Days sales outstanding: receivables over daily revenue.
pub fn days_sales_outstanding(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("accounts_receivable"), record.get("revenue"))
        .map(|ratio| ratio * 365.0);
    Ok(classified(value, 1, &DSO, CATEGORY, "days"))
}

/// Days inventory outstanding: inventory over daily COGS.
pub fn days_inventory_outstanding(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("inventory"), record.get("cogs")).map(|ratio| ratio * 365.0);
    Ok(classified(value, 1, &DIO, CATEGORY, "days"))
}

/// Days payables outstanding: payables over daily COGS.
pub fn days_payables_outstanding(
    record: &FinancialDataRecord,
) -> Result<MetricResult, MetricError> {
    let value =
        safe_div(record.get("accounts_payable"), record.get("cogs")).map(|ratio| ratio * 365.0);
    Ok(classified(value, 1, &DPO, CATEGORY, "days"))
}

/// DSO + DIO.
pub fn operating_cycle(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let dso = safe_div(record.get("accounts_receivable"), record.get("revenue"))
        .map(|r| r * 365.0);
    let dio = safe_div(record.get("inventory"), record.get("cogs")).map(|r| r * 365.0);
    let value = match (dso, dio) {
        (Some(dso), Some(dio)) => Some(dso + dio),
        _ => None,
    };
    Ok(classified(value, 1, &OPERATING_CYCLE, CATEGORY, "days"))
}

/// DSO + DIO - DPO. The full cycle from cash out to cash in.
pub fn cash_conversion_cycle(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let dso = safe_div(record.get("accounts_receivable"), record.get("revenue"))
        .map(|r| r * 365.0);
    let dio = safe_div(record.get("inventory"), record.get("cogs")).map(|r| r * 365.0);
    let dpo =
        safe_div(record.get("accounts_payable"), record.get("cogs")).map(|r| r * 365.0);
    let value = match (dso, dio, dpo) {
        (Some(dso), Some(dio), Some(dpo)) => Some(dso + dio - dpo),
        _ => None,
    };
    let mut result = classified(value, 1, &CASH_CONVERSION_CYCLE, CATEGORY, "days");
    if let (Some(dso), Some(dio), Some(dpo)) = (dso, dio, dpo) {
        result = result.with_components(
            [
                ("dso".to_string(), crate::util::round_to(dso, 1)),
                ("dio".to_string(), crate::util::round_to(dio, 1)),
                ("dpo".to_string(), crate::util::round_to(dpo, 1)),
            ]
            .into_iter()
            .collect(),
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_conversion_cycle_combines_all_three_legs() {
        let record = FinancialDataRecord::from([
            ("accounts_receivable", 20_000.0),
            ("inventory", 30_000.0),
            ("accounts_payable", 15_000.0),
            ("revenue", 365_000.0),
            ("cogs", 182_500.0),
        ]);
        let result = cash_conversion_cycle(&record).unwrap();
        // DSO = 20, DIO = 60, DPO = 30 -> CCC = 50.
        assert_eq!(result.value, Some(50.0));
        assert_eq!(result.interpretation, "good");
        let components = result.components.unwrap();
        assert_eq!(components["dso"], 20.0);
        assert_eq!(components["dio"], 60.0);
        assert_eq!(components["dpo"], 30.0);
    }

    #[test]
    fn cycle_without_payables_is_insufficient() {
        let record = FinancialDataRecord::from([
            ("accounts_receivable", 20_000.0),
            ("inventory", 30_000.0),
            ("revenue", 365_000.0),
            ("cogs", 182_500.0),
        ]);
        let result = cash_conversion_cycle(&record).unwrap();
        assert_eq!(result.value, None);
        assert_eq!(result.interpretation, "insufficient_data");
    }

    #[test]
    fn lower_days_classify_better() {
        let record =
            FinancialDataRecord::from([("accounts_receivable", 10_000.0), ("revenue", 365_000.0)]);
        let result = days_sales_outstanding(&record).unwrap();
        assert_eq!(result.value, Some(10.0));
        assert_eq!(result.interpretation, "excellent");
    }
}
