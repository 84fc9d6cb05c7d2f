//! Banking-sector metrics.

use crate::error::MetricError;
use crate::util::{classified, pct, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Banking;

pub const NET_INTEREST_MARGIN: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 4.0),
    ThresholdBand::between("good", 3.0, 4.0),
    ThresholdBand::between("average", 2.0, 3.0),
    ThresholdBand::at_most("poor", 2.0),
]);

pub const LOAN_TO_DEPOSIT: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("aggressive", 1.0),
    ThresholdBand::between("balanced", 0.7, 1.0),
    ThresholdBand::at_most("conservative", 0.7),
]);

pub const CAPITAL_ADEQUACY: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("strong", 14.0),
    ThresholdBand::between("adequate", 10.5, 14.0),
    ThresholdBand::at_most("undercapitalized", 10.5),
]);

pub const NPL_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 1.0),
    ThresholdBand::between("good", 1.0, 3.0),
    ThresholdBand::between("concerning", 3.0, 6.0),
    ThresholdBand::at_least("poor", 6.0),
]);

pub const COST_TO_INCOME: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("excellent", 45.0),
    ThresholdBand::between("good", 45.0, 55.0),
    ThresholdBand::between("average", 55.0, 65.0),
    ThresholdBand::at_least("poor", 65.0),
]);

pub const PROVISION_COVERAGE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("strong", 100.0),
    ThresholdBand::between("adequate", 70.0, 100.0),
    ThresholdBand::at_most("thin", 70.0),
]);

/// Net interest income as a percentage of earning assets.
pub fn net_interest_margin(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("net_interest_income"), record.get("earning_assets"));
    Ok(classified(value, 2, &NET_INTEREST_MARGIN, CATEGORY, "earnings"))
}

/// Total loans over total deposits.
pub fn loan_to_deposit(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("total_loans"), record.get("total_deposits"));
    Ok(classified(value, 2, &LOAN_TO_DEPOSIT, CATEGORY, "funding"))
}

/// (Tier 1 + Tier 2 capital) as a percentage of risk-weighted assets.
pub fn capital_adequacy(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let capital = match (record.get("tier1_capital"), record.get("tier2_capital")) {
        (Some(t1), t2) => Some(t1 + t2.unwrap_or(0.0)),
        _ => None,
    };
    let value = pct(capital, record.get("risk_weighted_assets"));
    Ok(classified(value, 2, &CAPITAL_ADEQUACY, CATEGORY, "capital"))
}

/// Non-performing loans as a percentage of total loans.
pub fn npl_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("non_performing_loans"), record.get("total_loans"));
    Ok(classified(value, 2, &NPL_RATIO, CATEGORY, "asset_quality"))
}

/// Operating expenses as a percentage of operating income (NII + fees).
pub fn cost_to_income(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let income = match (
        record.get("net_interest_income"),
        record.get("non_interest_income"),
    ) {
        (Some(nii), fees) => Some(nii + fees.unwrap_or(0.0)),
        _ => None,
    };
    let value = pct(record.get("operating_expenses"), income);
    Ok(classified(value, 1, &COST_TO_INCOME, CATEGORY, "efficiency"))
}

/// Loan loss provisions as a percentage of non-performing loans.
pub fn provision_coverage(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(
        record.get("loan_loss_provisions"),
        record.get("non_performing_loans"),
    );
    Ok(classified(value, 1, &PROVISION_COVERAGE, CATEGORY, "asset_quality"))
}
