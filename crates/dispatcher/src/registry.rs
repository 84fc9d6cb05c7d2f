use core_types::{FinancialDataRecord, MetricCategory, MetricResult};
use metrics::{
    activity, advanced, banking, cashflow, insurance, intermediate, leverage, liquidity, market,
    profitability, riskmodels, MetricError,
};
use serde::{Deserialize, Serialize};

/// The signature every registered metric function shares.
pub type MetricFn = fn(&FinancialDataRecord) -> Result<MetricResult, MetricError>;

/// The closed set of metrics the engine can compute. Adding a variant without
/// wiring its name and function is a compile error, so an unresolvable
/// selection can only come from caller input, never from a wiring gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricId {
    // Liquidity
    CurrentRatio,
    QuickRatio,
    CashRatio,
    OperatingCashFlowRatio,
    WorkingCapital,
    NetWorkingCapitalRatio,
    DefensiveInterval,
    // Leverage
    DebtToEquity,
    DebtRatio,
    EquityRatio,
    EquityMultiplier,
    InterestCoverage,
    DebtServiceCoverage,
    LongTermDebtToCapitalization,
    CashFlowToDebt,
    // Profitability
    GrossMargin,
    OperatingMargin,
    NetMargin,
    EbitdaMargin,
    PretaxMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    ReturnOnSales,
    ReturnOnCapitalEmployed,
    ReturnOnInvestedCapital,
    // Activity
    InventoryTurnover,
    ReceivablesTurnover,
    PayablesTurnover,
    AssetTurnover,
    FixedAssetTurnover,
    WorkingCapitalTurnover,
    DaysSalesOutstanding,
    DaysInventoryOutstanding,
    DaysPayablesOutstanding,
    OperatingCycle,
    CashConversionCycle,
    // Market
    EarningsPerShare,
    PriceToEarnings,
    PriceToBook,
    PriceToSales,
    EarningsYield,
    DividendYield,
    DividendPayout,
    BookValuePerShare,
    MarketToBook,
    PegRatio,
    // Banking
    NetInterestMargin,
    LoanToDeposit,
    CapitalAdequacy,
    NplRatio,
    CostToIncome,
    ProvisionCoverage,
    // Insurance
    LossRatio,
    ExpenseRatio,
    CombinedRatio,
    RetentionRatio,
    SolvencyRatio,
    // Cash flow
    OperatingCashFlowMargin,
    FreeCashFlow,
    FcfYield,
    CapexRatio,
    CashFlowCoverage,
    CashReturnOnAssets,
    // Intermediate
    ContributionMargin,
    BreakEvenPoint,
    MarginOfSafety,
    DegreeOfOperatingLeverage,
    DegreeOfFinancialLeverage,
    // Risk models
    AltmanZScore,
    CapmExpectedReturn,
    MonteCarloVar,
    ModifiedDuration,
    Convexity,
    // Advanced valuation
    DuPontRoe,
    DiscountedCashFlow,
    GordonGrowthValue,
    EconomicValueAdded,
    MarketValueAdded,
    FreeCashFlowToEquity,
    FreeCashFlowToFirm,
    BlackScholesCall,
    BlackScholesPut,
    BinomialOptionPrice,
    SustainableGrowthRate,
    GrahamNumber,
}

impl MetricId {
    pub const ALL: [MetricId; 85] = [
        MetricId::CurrentRatio,
        MetricId::QuickRatio,
        MetricId::CashRatio,
        MetricId::OperatingCashFlowRatio,
        MetricId::WorkingCapital,
        MetricId::NetWorkingCapitalRatio,
        MetricId::DefensiveInterval,
        MetricId::DebtToEquity,
        MetricId::DebtRatio,
        MetricId::EquityRatio,
        MetricId::EquityMultiplier,
        MetricId::InterestCoverage,
        MetricId::DebtServiceCoverage,
        MetricId::LongTermDebtToCapitalization,
        MetricId::CashFlowToDebt,
        MetricId::GrossMargin,
        MetricId::OperatingMargin,
        MetricId::NetMargin,
        MetricId::EbitdaMargin,
        MetricId::PretaxMargin,
        MetricId::ReturnOnAssets,
        MetricId::ReturnOnEquity,
        MetricId::ReturnOnSales,
        MetricId::ReturnOnCapitalEmployed,
        MetricId::ReturnOnInvestedCapital,
        MetricId::InventoryTurnover,
        MetricId::ReceivablesTurnover,
        MetricId::PayablesTurnover,
        MetricId::AssetTurnover,
        MetricId::FixedAssetTurnover,
        MetricId::WorkingCapitalTurnover,
        MetricId::DaysSalesOutstanding,
        MetricId::DaysInventoryOutstanding,
        MetricId::DaysPayablesOutstanding,
        MetricId::OperatingCycle,
        MetricId::CashConversionCycle,
        MetricId::EarningsPerShare,
        MetricId::PriceToEarnings,
        MetricId::PriceToBook,
        MetricId::PriceToSales,
        MetricId::EarningsYield,
        MetricId::DividendYield,
        MetricId::DividendPayout,
        MetricId::BookValuePerShare,
        MetricId::MarketToBook,
        MetricId::PegRatio,
        MetricId::NetInterestMargin,
        MetricId::LoanToDeposit,
        MetricId::CapitalAdequacy,
        MetricId::NplRatio,
        MetricId::CostToIncome,
        MetricId::ProvisionCoverage,
        MetricId::LossRatio,
        MetricId::ExpenseRatio,
        MetricId::CombinedRatio,
        MetricId::RetentionRatio,
        MetricId::SolvencyRatio,
        MetricId::OperatingCashFlowMargin,
        MetricId::FreeCashFlow,
        MetricId::FcfYield,
        MetricId::CapexRatio,
        MetricId::CashFlowCoverage,
        MetricId::CashReturnOnAssets,
        MetricId::ContributionMargin,
        MetricId::BreakEvenPoint,
        MetricId::MarginOfSafety,
        MetricId::DegreeOfOperatingLeverage,
        MetricId::DegreeOfFinancialLeverage,
        MetricId::AltmanZScore,
        MetricId::CapmExpectedReturn,
        MetricId::MonteCarloVar,
        MetricId::ModifiedDuration,
        MetricId::Convexity,
        MetricId::DuPontRoe,
        MetricId::DiscountedCashFlow,
        MetricId::GordonGrowthValue,
        MetricId::EconomicValueAdded,
        MetricId::MarketValueAdded,
        MetricId::FreeCashFlowToEquity,
        MetricId::FreeCashFlowToFirm,
        MetricId::BlackScholesCall,
        MetricId::BlackScholesPut,
        MetricId::BinomialOptionPrice,
        MetricId::SustainableGrowthRate,
        MetricId::GrahamNumber,
    ];

    /// The display name callers select the metric by.
    pub fn name(&self) -> &'static str {
        match self {
            MetricId::CurrentRatio => "Current Ratio",
            MetricId::QuickRatio => "Quick Ratio",
            MetricId::CashRatio => "Cash Ratio",
            MetricId::OperatingCashFlowRatio => "Operating Cash Flow Ratio",
            MetricId::WorkingCapital => "Working Capital",
            MetricId::NetWorkingCapitalRatio => "Net Working Capital Ratio",
            MetricId::DefensiveInterval => "Defensive Interval Ratio",
            MetricId::DebtToEquity => "Debt-to-Equity Ratio",
            MetricId::DebtRatio => "Debt Ratio",
            MetricId::EquityRatio => "Equity Ratio",
            MetricId::EquityMultiplier => "Equity Multiplier",
            MetricId::InterestCoverage => "Interest Coverage Ratio",
            MetricId::DebtServiceCoverage => "Debt Service Coverage Ratio",
            MetricId::LongTermDebtToCapitalization => "Long-Term Debt to Capitalization",
            MetricId::CashFlowToDebt => "Cash Flow to Debt Ratio",
            MetricId::GrossMargin => "Gross Profit Margin",
            MetricId::OperatingMargin => "Operating Profit Margin",
            MetricId::NetMargin => "Net Profit Margin",
            MetricId::EbitdaMargin => "EBITDA Margin",
            MetricId::PretaxMargin => "Pretax Profit Margin",
            MetricId::ReturnOnAssets => "Return on Assets",
            MetricId::ReturnOnEquity => "Return on Equity",
            MetricId::ReturnOnSales => "Return on Sales",
            MetricId::ReturnOnCapitalEmployed => "Return on Capital Employed",
            MetricId::ReturnOnInvestedCapital => "Return on Invested Capital",
            MetricId::InventoryTurnover => "Inventory Turnover",
            MetricId::ReceivablesTurnover => "Receivables Turnover",
            MetricId::PayablesTurnover => "Payables Turnover",
            MetricId::AssetTurnover => "Asset Turnover",
            MetricId::FixedAssetTurnover => "Fixed Asset Turnover",
            MetricId::WorkingCapitalTurnover => "Working Capital Turnover",
            MetricId::DaysSalesOutstanding => "Days Sales Outstanding",
            MetricId::DaysInventoryOutstanding => "Days Inventory Outstanding",
            MetricId::DaysPayablesOutstanding => "Days Payables Outstanding",
            MetricId::OperatingCycle => "Operating Cycle",
            MetricId::CashConversionCycle => "Cash Conversion Cycle",
            MetricId::EarningsPerShare => "Earnings per Share",
            MetricId::PriceToEarnings => "Price-to-Earnings Ratio",
            MetricId::PriceToBook => "Price-to-Book Ratio",
            MetricId::PriceToSales => "Price-to-Sales Ratio",
            MetricId::EarningsYield => "Earnings Yield",
            MetricId::DividendYield => "Dividend Yield",
            MetricId::DividendPayout => "Dividend Payout Ratio",
            MetricId::BookValuePerShare => "Book Value per Share",
            MetricId::MarketToBook => "Market-to-Book Ratio",
            MetricId::PegRatio => "PEG Ratio",
            MetricId::NetInterestMargin => "Net Interest Margin",
            MetricId::LoanToDeposit => "Loan-to-Deposit Ratio",
            MetricId::CapitalAdequacy => "Capital Adequacy Ratio",
            MetricId::NplRatio => "Non-Performing Loans Ratio",
            MetricId::CostToIncome => "Cost-to-Income Ratio",
            MetricId::ProvisionCoverage => "Provision Coverage Ratio",
            MetricId::LossRatio => "Loss Ratio",
            MetricId::ExpenseRatio => "Expense Ratio",
            MetricId::CombinedRatio => "Combined Ratio",
            MetricId::RetentionRatio => "Retention Ratio",
            MetricId::SolvencyRatio => "Solvency Ratio",
            MetricId::OperatingCashFlowMargin => "Operating Cash Flow Margin",
            MetricId::FreeCashFlow => "Free Cash Flow",
            MetricId::FcfYield => "Free Cash Flow Yield",
            MetricId::CapexRatio => "Capital Expenditure Ratio",
            MetricId::CashFlowCoverage => "Cash Flow Coverage Ratio",
            MetricId::CashReturnOnAssets => "Cash Return on Assets",
            MetricId::ContributionMargin => "Contribution Margin",
            MetricId::BreakEvenPoint => "Break-Even Point",
            MetricId::MarginOfSafety => "Margin of Safety",
            MetricId::DegreeOfOperatingLeverage => "Degree of Operating Leverage",
            MetricId::DegreeOfFinancialLeverage => "Degree of Financial Leverage",
            MetricId::AltmanZScore => "Altman Z-Score",
            MetricId::CapmExpectedReturn => "CAPM Expected Return",
            MetricId::MonteCarloVar => "Monte Carlo VaR",
            MetricId::ModifiedDuration => "Modified Duration",
            MetricId::Convexity => "Convexity",
            MetricId::DuPontRoe => "DuPont ROE",
            MetricId::DiscountedCashFlow => "Discounted Cash Flow",
            MetricId::GordonGrowthValue => "Gordon Growth Model",
            MetricId::EconomicValueAdded => "Economic Value Added",
            MetricId::MarketValueAdded => "Market Value Added",
            MetricId::FreeCashFlowToEquity => "Free Cash Flow to Equity",
            MetricId::FreeCashFlowToFirm => "Free Cash Flow to Firm",
            MetricId::BlackScholesCall => "Black-Scholes Call Price",
            MetricId::BlackScholesPut => "Black-Scholes Put Price",
            MetricId::BinomialOptionPrice => "Binomial Option Price",
            MetricId::SustainableGrowthRate => "Sustainable Growth Rate",
            MetricId::GrahamNumber => "Graham Number",
        }
    }

    /// The category the metric reports under.
    pub fn category(&self) -> MetricCategory {
        match self {
            MetricId::CurrentRatio
            | MetricId::QuickRatio
            | MetricId::CashRatio
            | MetricId::OperatingCashFlowRatio
            | MetricId::WorkingCapital
            | MetricId::NetWorkingCapitalRatio
            | MetricId::DefensiveInterval => MetricCategory::Liquidity,
            MetricId::DebtToEquity
            | MetricId::DebtRatio
            | MetricId::EquityRatio
            | MetricId::EquityMultiplier
            | MetricId::InterestCoverage
            | MetricId::DebtServiceCoverage
            | MetricId::LongTermDebtToCapitalization
            | MetricId::CashFlowToDebt => MetricCategory::Leverage,
            MetricId::GrossMargin
            | MetricId::OperatingMargin
            | MetricId::NetMargin
            | MetricId::EbitdaMargin
            | MetricId::PretaxMargin
            | MetricId::ReturnOnAssets
            | MetricId::ReturnOnEquity
            | MetricId::ReturnOnSales
            | MetricId::ReturnOnCapitalEmployed
            | MetricId::ReturnOnInvestedCapital => MetricCategory::Profitability,
            MetricId::InventoryTurnover
            | MetricId::ReceivablesTurnover
            | MetricId::PayablesTurnover
            | MetricId::AssetTurnover
            | MetricId::FixedAssetTurnover
            | MetricId::WorkingCapitalTurnover
            | MetricId::DaysSalesOutstanding
            | MetricId::DaysInventoryOutstanding
            | MetricId::DaysPayablesOutstanding
            | MetricId::OperatingCycle
            | MetricId::CashConversionCycle => MetricCategory::Activity,
            MetricId::EarningsPerShare
            | MetricId::PriceToEarnings
            | MetricId::PriceToBook
            | MetricId::PriceToSales
            | MetricId::EarningsYield
            | MetricId::DividendYield
            | MetricId::DividendPayout
            | MetricId::BookValuePerShare
            | MetricId::MarketToBook
            | MetricId::PegRatio => MetricCategory::Market,
            MetricId::NetInterestMargin
            | MetricId::LoanToDeposit
            | MetricId::CapitalAdequacy
            | MetricId::NplRatio
            | MetricId::CostToIncome
            | MetricId::ProvisionCoverage => MetricCategory::Banking,
            MetricId::LossRatio
            | MetricId::ExpenseRatio
            | MetricId::CombinedRatio
            | MetricId::RetentionRatio
            | MetricId::SolvencyRatio => MetricCategory::Insurance,
            MetricId::OperatingCashFlowMargin
            | MetricId::FreeCashFlow
            | MetricId::FcfYield
            | MetricId::CapexRatio
            | MetricId::CashFlowCoverage
            | MetricId::CashReturnOnAssets => MetricCategory::CashFlow,
            MetricId::ContributionMargin
            | MetricId::BreakEvenPoint
            | MetricId::MarginOfSafety
            | MetricId::DegreeOfOperatingLeverage
            | MetricId::DegreeOfFinancialLeverage => MetricCategory::Intermediate,
            MetricId::AltmanZScore
            | MetricId::CapmExpectedReturn
            | MetricId::MonteCarloVar
            | MetricId::ModifiedDuration
            | MetricId::Convexity => MetricCategory::Risk,
            MetricId::DuPontRoe
            | MetricId::DiscountedCashFlow
            | MetricId::GordonGrowthValue
            | MetricId::EconomicValueAdded
            | MetricId::MarketValueAdded
            | MetricId::FreeCashFlowToEquity
            | MetricId::FreeCashFlowToFirm
            | MetricId::BlackScholesCall
            | MetricId::BlackScholesPut
            | MetricId::BinomialOptionPrice
            | MetricId::SustainableGrowthRate
            | MetricId::GrahamNumber => MetricCategory::Advanced,
        }
    }

    /// Resolves a caller-supplied display name, ignoring case and padding.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(wanted))
    }

    /// The metric function this identifier dispatches to.
    pub fn function(&self) -> MetricFn {
        match self {
            MetricId::CurrentRatio => liquidity::current_ratio,
            MetricId::QuickRatio => liquidity::quick_ratio,
            MetricId::CashRatio => liquidity::cash_ratio,
            MetricId::OperatingCashFlowRatio => liquidity::operating_cash_flow_ratio,
            MetricId::WorkingCapital => liquidity::working_capital,
            MetricId::NetWorkingCapitalRatio => liquidity::net_working_capital_ratio,
            MetricId::DefensiveInterval => liquidity::defensive_interval,
            MetricId::DebtToEquity => leverage::debt_to_equity,
            MetricId::DebtRatio => leverage::debt_ratio,
            MetricId::EquityRatio => leverage::equity_ratio,
            MetricId::EquityMultiplier => leverage::equity_multiplier,
            MetricId::InterestCoverage => leverage::interest_coverage,
            MetricId::DebtServiceCoverage => leverage::debt_service_coverage,
            MetricId::LongTermDebtToCapitalization => leverage::long_term_debt_to_capitalization,
            MetricId::CashFlowToDebt => leverage::cash_flow_to_debt,
            MetricId::GrossMargin => profitability::gross_margin,
            MetricId::OperatingMargin => profitability::operating_margin,
            MetricId::NetMargin => profitability::net_margin,
            MetricId::EbitdaMargin => profitability::ebitda_margin,
            MetricId::PretaxMargin => profitability::pretax_margin,
            MetricId::ReturnOnAssets => profitability::return_on_assets,
            MetricId::ReturnOnEquity => profitability::return_on_equity,
            MetricId::ReturnOnSales => profitability::return_on_sales,
            MetricId::ReturnOnCapitalEmployed => profitability::return_on_capital_employed,
            MetricId::ReturnOnInvestedCapital => profitability::return_on_invested_capital,
            MetricId::InventoryTurnover => activity::inventory_turnover,
            MetricId::ReceivablesTurnover => activity::receivables_turnover,
            MetricId::PayablesTurnover => activity::payables_turnover,
            MetricId::AssetTurnover => activity::asset_turnover,
            MetricId::FixedAssetTurnover => activity::fixed_asset_turnover,
            MetricId::WorkingCapitalTurnover => activity::working_capital_turnover,
            MetricId::DaysSalesOutstanding => activity::days_sales_outstanding,
            MetricId::DaysInventoryOutstanding => activity::days_inventory_outstanding,
            MetricId::DaysPayablesOutstanding => activity::days_payables_outstanding,
            MetricId::OperatingCycle => activity::operating_cycle,
            MetricId::CashConversionCycle => activity::cash_conversion_cycle,
            MetricId::EarningsPerShare => market::earnings_per_share,
            MetricId::PriceToEarnings => market::price_to_earnings,
            MetricId::PriceToBook => market::price_to_book,
            MetricId::PriceToSales => market::price_to_sales,
            MetricId::EarningsYield => market::earnings_yield,
            MetricId::DividendYield => market::dividend_yield,
            MetricId::DividendPayout => market::dividend_payout,
            MetricId::BookValuePerShare => market::book_value_per_share,
            MetricId::MarketToBook => market::market_to_book,
            MetricId::PegRatio => market::peg_ratio,
            MetricId::NetInterestMargin => banking::net_interest_margin,
            MetricId::LoanToDeposit => banking::loan_to_deposit,
            MetricId::CapitalAdequacy => banking::capital_adequacy,
            MetricId::NplRatio => banking::npl_ratio,
            MetricId::CostToIncome => banking::cost_to_income,
            MetricId::ProvisionCoverage => banking::provision_coverage,
            MetricId::LossRatio => insurance::loss_ratio,
            MetricId::ExpenseRatio => insurance::expense_ratio,
            MetricId::CombinedRatio => insurance::combined_ratio,
            MetricId::RetentionRatio => insurance::retention_ratio,
            MetricId::SolvencyRatio => insurance::solvency_ratio,
            MetricId::OperatingCashFlowMargin => cashflow::operating_cash_flow_margin,
            MetricId::FreeCashFlow => cashflow::free_cash_flow,
            MetricId::FcfYield => cashflow::fcf_yield,
            MetricId::CapexRatio => cashflow::capex_ratio,
            MetricId::CashFlowCoverage => cashflow::cash_flow_coverage,
            MetricId::CashReturnOnAssets => cashflow::cash_return_on_assets,
            MetricId::ContributionMargin => intermediate::contribution_margin,
            MetricId::BreakEvenPoint => intermediate::break_even_point,
            MetricId::MarginOfSafety => intermediate::margin_of_safety,
            MetricId::DegreeOfOperatingLeverage => intermediate::degree_of_operating_leverage,
            MetricId::DegreeOfFinancialLeverage => intermediate::degree_of_financial_leverage,
            MetricId::AltmanZScore => riskmodels::altman_z_score,
            MetricId::CapmExpectedReturn => riskmodels::capm_expected_return,
            MetricId::MonteCarloVar => riskmodels::monte_carlo_var,
            MetricId::ModifiedDuration => riskmodels::modified_duration,
            MetricId::Convexity => riskmodels::convexity,
            MetricId::DuPontRoe => advanced::dupont_roe,
            MetricId::DiscountedCashFlow => advanced::discounted_cash_flow,
            MetricId::GordonGrowthValue => advanced::gordon_growth_value,
            MetricId::EconomicValueAdded => advanced::economic_value_added,
            MetricId::MarketValueAdded => advanced::market_value_added,
            MetricId::FreeCashFlowToEquity => advanced::fcfe,
            MetricId::FreeCashFlowToFirm => advanced::fcff,
            MetricId::BlackScholesCall => advanced::black_scholes_call,
            MetricId::BlackScholesPut => advanced::black_scholes_put,
            MetricId::BinomialOptionPrice => advanced::binomial_option_price,
            MetricId::SustainableGrowthRate => advanced::sustainable_growth_rate,
            MetricId::GrahamNumber => advanced::graham_number,
        }
    }
}
