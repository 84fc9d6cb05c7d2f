//! Market valuation metrics (per-share and price multiples).

use crate::error::MetricError;
use crate::util::{classified, pct, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Market;

pub const EPS: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const PRICE_TO_EARNINGS: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("undervalued", 12.0),
    ThresholdBand::between("fair", 12.0, 22.0),
    ThresholdBand::between("expensive", 22.0, 35.0),
    ThresholdBand::at_least("overvalued", 35.0),
]);

pub const PRICE_TO_BOOK: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("undervalued", 1.0),
    ThresholdBand::between("fair", 1.0, 3.0),
    ThresholdBand::at_least("expensive", 3.0),
]);

pub const PRICE_TO_SALES: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("undervalued", 1.0),
    ThresholdBand::between("fair", 1.0, 4.0),
    ThresholdBand::at_least("expensive", 4.0),
]);

pub const EARNINGS_YIELD: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("attractive", 8.0),
    ThresholdBand::between("fair", 4.0, 8.0),
    ThresholdBand::at_most("low", 4.0),
]);

pub const DIVIDEND_YIELD: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("high", 5.0),
    ThresholdBand::between("moderate", 2.0, 5.0),
    ThresholdBand::between("low", 0.0, 2.0),
    ThresholdBand::at_most("none", 0.0),
]);

pub const DIVIDEND_PAYOUT: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("aggressive", 80.0),
    ThresholdBand::between("generous", 50.0, 80.0),
    ThresholdBand::between("balanced", 25.0, 50.0),
    ThresholdBand::at_most("conservative", 25.0),
]);

pub const BOOK_VALUE_PER_SHARE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const MARKET_TO_BOOK: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("undervalued", 1.0),
    ThresholdBand::between("fair", 1.0, 3.0),
    ThresholdBand::at_least("premium", 3.0),
]);

pub const PEG_RATIO: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("undervalued", 1.0),
    ThresholdBand::between("fair", 1.0, 2.0),
    ThresholdBand::at_least("overvalued", 2.0),
]);

/// Net income over shares outstanding.
pub fn earnings_per_share(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("net_income"), record.get("shares_outstanding"));
    Ok(classified(value, 2, &EPS, CATEGORY, "per_share"))
}

/// Share price over EPS.
pub fn price_to_earnings(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let eps = safe_div(record.get("net_income"), record.get("shares_outstanding"));
    let value = safe_div(record.get("share_price"), eps);
    Ok(classified(value, 2, &PRICE_TO_EARNINGS, CATEGORY, "multiples"))
}

/// Share price over book value per share.
pub fn price_to_book(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let bvps = safe_div(record.get("total_equity"), record.get("shares_outstanding"));
    let value = safe_div(record.get("share_price"), bvps);
    Ok(classified(value, 2, &PRICE_TO_BOOK, CATEGORY, "multiples"))
}

/// Market capitalization over revenue.
pub fn price_to_sales(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(market_cap(record), record.get("revenue"));
    Ok(classified(value, 2, &PRICE_TO_SALES, CATEGORY, "multiples"))
}

/// EPS over share price, as a percentage. The inverse of P/E.
pub fn earnings_yield(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let eps = safe_div(record.get("net_income"), record.get("shares_outstanding"));
    let value = pct(eps, record.get("share_price"));
    Ok(classified(value, 1, &EARNINGS_YIELD, CATEGORY, "yield"))
}

/// Dividends per share over share price, as a percentage.
pub fn dividend_yield(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let dps = safe_div(record.get("dividends_paid"), record.get("shares_outstanding"));
    let value = pct(dps, record.get("share_price"));
    Ok(classified(value, 1, &DIVIDEND_YIELD, CATEGORY, "yield"))
}

/// Dividends paid as a percentage of net income.
pub fn dividend_payout(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = pct(record.get("dividends_paid"), record.get("net_income"));
    Ok(classified(value, 1, &DIVIDEND_PAYOUT, CATEGORY, "distribution"))
}

/// Total equity over shares outstanding, in currency units per share.
pub fn book_value_per_share(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(record.get("total_equity"), record.get("shares_outstanding"));
    Ok(classified(value, 2, &BOOK_VALUE_PER_SHARE, CATEGORY, "per_share"))
}

/// Market capitalization over book equity.
pub fn market_to_book(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = safe_div(market_cap(record), record.get("total_equity"));
    Ok(classified(value, 2, &MARKET_TO_BOOK, CATEGORY, "multiples"))
}

/// P/E over expected earnings growth (growth given as a percentage).
pub fn peg_ratio(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let eps = safe_div(record.get("net_income"), record.get("shares_outstanding"));
    let pe = safe_div(record.get("share_price"), eps);
    let value = safe_div(pe, record.get("earnings_growth_rate").map(|g| g * 100.0));
    Ok(classified(value, 2, &PEG_RATIO, CATEGORY, "multiples"))
}

/// Market capitalization, reported or derived from price x shares.
pub(crate) fn market_cap(record: &FinancialDataRecord) -> Option<f64> {
    record.get("market_cap").or_else(|| {
        match (record.get("share_price"), record.get("shares_outstanding")) {
            (Some(price), Some(shares)) => Some(price * shares),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pe_derives_eps_first() {
        let record = FinancialDataRecord::from([
            ("share_price", 30.0),
            ("net_income", 2_000_000.0),
            ("shares_outstanding", 1_000_000.0),
        ]);
        let result = price_to_earnings(&record).unwrap();
        assert_eq!(result.value, Some(15.0));
        assert_eq!(result.interpretation, "fair");
    }

    #[test]
    fn market_cap_falls_back_to_price_times_shares() {
        let record = FinancialDataRecord::from([
            ("share_price", 10.0),
            ("shares_outstanding", 500_000.0),
            ("total_equity", 2_500_000.0),
        ]);
        let result = market_to_book(&record).unwrap();
        assert_eq!(result.value, Some(2.0));
        assert_eq!(result.interpretation, "fair");
    }

    #[test]
    fn zero_dividend_yield_classifies_none() {
        let record = FinancialDataRecord::from([
            ("dividends_paid", 0.0),
            ("shares_outstanding", 1_000_000.0),
            ("share_price", 20.0),
        ]);
        let result = dividend_yield(&record).unwrap();
        assert_eq!(result.value, Some(0.0));
        // 0.0 sits on the low/none boundary; the earlier band wins.
        assert_eq!(result.interpretation, "low");
    }
}
