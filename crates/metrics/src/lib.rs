//! # Finsight Metric Library
//!
//! Pure financial-metric functions over a `FinancialDataRecord`. Each
//! function reads only the fields it declares, divides safely (a zero or
//! absent denominator yields "cannot compute", never `NaN`/`Infinity`),
//! rounds half-up at a metric-specific precision, and classifies the result
//! through the shared Classification Engine.
//!
//! ## Contract
//!
//! - Expected missing data is **not** an error: the function returns
//!   `value = None` with the `insufficient_data` interpretation.
//! - Malformed or impossible inputs (negative time-to-expiry, non-positive
//!   volatility, confidence outside (0, 1)) return `Err(MetricError)` and are
//!   reported by the dispatcher as metric-local errors.
//! - Functions are deterministic: re-running against an unchanged record
//!   yields identical results (Monte-Carlo simulation uses a fixed seed).

pub mod activity;
pub mod advanced;
pub mod banking;
pub mod cashflow;
pub mod error;
pub mod insurance;
pub mod intermediate;
pub mod leverage;
pub mod liquidity;
pub mod market;
pub mod profitability;
pub mod riskmodels;
pub mod util;

pub use error::MetricError;
pub use util::{round_to, safe_div, safe_div_or};

use classification::ClassificationError;

/// Validates every threshold table in the library. Run once at registry
/// startup so a malformed table surfaces as a configuration error instead of
/// a silent misclassification at dispatch time.
pub fn validate_tables() -> Result<(), ClassificationError> {
    for table in [
        liquidity::CURRENT_RATIO,
        liquidity::QUICK_RATIO,
        liquidity::CASH_RATIO,
        liquidity::OCF_RATIO,
        liquidity::WORKING_CAPITAL,
        liquidity::NWC_RATIO,
        liquidity::DEFENSIVE_INTERVAL,
        leverage::DEBT_TO_EQUITY,
        leverage::DEBT_RATIO,
        leverage::EQUITY_RATIO,
        leverage::EQUITY_MULTIPLIER,
        leverage::INTEREST_COVERAGE,
        leverage::DEBT_SERVICE_COVERAGE,
        leverage::LTD_TO_CAPITALIZATION,
        leverage::CASH_FLOW_TO_DEBT,
        profitability::GROSS_MARGIN,
        profitability::OPERATING_MARGIN,
        profitability::NET_MARGIN,
        profitability::EBITDA_MARGIN,
        profitability::PRETAX_MARGIN,
        profitability::RETURN_ON_ASSETS,
        profitability::RETURN_ON_EQUITY,
        profitability::RETURN_ON_SALES,
        profitability::ROCE,
        profitability::ROIC,
        activity::INVENTORY_TURNOVER,
        activity::RECEIVABLES_TURNOVER,
        activity::PAYABLES_TURNOVER,
        activity::ASSET_TURNOVER,
        activity::FIXED_ASSET_TURNOVER,
        activity::WORKING_CAPITAL_TURNOVER,
        activity::DSO,
        activity::DIO,
        activity::DPO,
        activity::OPERATING_CYCLE,
        activity::CASH_CONVERSION_CYCLE,
        market::EPS,
        market::PRICE_TO_EARNINGS,
        market::PRICE_TO_BOOK,
        market::PRICE_TO_SALES,
        market::EARNINGS_YIELD,
        market::DIVIDEND_YIELD,
        market::DIVIDEND_PAYOUT,
        market::BOOK_VALUE_PER_SHARE,
        market::MARKET_TO_BOOK,
        market::PEG_RATIO,
        banking::NET_INTEREST_MARGIN,
        banking::LOAN_TO_DEPOSIT,
        banking::CAPITAL_ADEQUACY,
        banking::NPL_RATIO,
        banking::COST_TO_INCOME,
        banking::PROVISION_COVERAGE,
        insurance::LOSS_RATIO,
        insurance::EXPENSE_RATIO,
        insurance::COMBINED_RATIO,
        insurance::RETENTION_RATIO,
        insurance::SOLVENCY_RATIO,
        cashflow::OCF_MARGIN,
        cashflow::FREE_CASH_FLOW,
        cashflow::FCF_YIELD,
        cashflow::CAPEX_RATIO,
        cashflow::CASH_FLOW_COVERAGE,
        cashflow::CASH_RETURN_ON_ASSETS,
        intermediate::CONTRIBUTION_MARGIN,
        intermediate::BREAK_EVEN_POINT,
        intermediate::MARGIN_OF_SAFETY,
        intermediate::OPERATING_LEVERAGE,
        intermediate::FINANCIAL_LEVERAGE,
        riskmodels::ALTMAN_Z,
        riskmodels::CAPM,
        riskmodels::MONTE_CARLO_VAR,
        riskmodels::MODIFIED_DURATION,
        riskmodels::CONVEXITY,
        advanced::DUPONT_ROE,
        advanced::DCF,
        advanced::GORDON_GROWTH,
        advanced::EVA,
        advanced::MVA,
        advanced::FCFE,
        advanced::FCFF,
        advanced::BLACK_SCHOLES,
        advanced::BINOMIAL_OPTION,
        advanced::SUSTAINABLE_GROWTH,
        advanced::GRAHAM_NUMBER,
    ] {
        table.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn all_tables_are_well_formed() {
        super::validate_tables().unwrap();
    }
}
