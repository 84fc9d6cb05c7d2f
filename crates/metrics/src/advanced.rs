//! Composite valuation models: DuPont decomposition, DCF, option pricing,
//! and value-creation measures.

use crate::error::MetricError;
use crate::profitability::{invested_capital, nopat};
use crate::util::{classified, round_to, safe_div};
use classification::{interpret, ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};

const CATEGORY: MetricCategory = MetricCategory::Advanced;

const DEFAULT_FORECAST_YEARS: usize = 5;
const DEFAULT_BINOMIAL_STEPS: usize = 100;

pub const DUPONT_ROE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("excellent", 20.0),
    ThresholdBand::between("good", 12.0, 20.0),
    ThresholdBand::between("average", 6.0, 12.0),
    ThresholdBand::at_most("poor", 6.0),
]);

pub const DCF: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const GORDON_GROWTH: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const EVA: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("value_creating", 0.0),
    ThresholdBand::at_most("value_destroying", 0.0),
]);

pub const MVA: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("value_creating", 0.0),
    ThresholdBand::at_most("value_destroying", 0.0),
]);

pub const FCFE: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

pub const FCFF: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

/// Classifies the option premium as a percentage of spot.
pub const BLACK_SCHOLES: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("expensive", 15.0),
    ThresholdBand::between("moderate", 5.0, 15.0),
    ThresholdBand::at_most("cheap", 5.0),
]);

pub const BINOMIAL_OPTION: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("expensive", 15.0),
    ThresholdBand::between("moderate", 5.0, 15.0),
    ThresholdBand::at_most("cheap", 5.0),
]);

pub const SUSTAINABLE_GROWTH: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("high", 15.0),
    ThresholdBand::between("moderate", 7.0, 15.0),
    ThresholdBand::at_most("low", 7.0),
]);

pub const GRAHAM_NUMBER: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("positive", 0.0),
    ThresholdBand::at_most("negative", 0.0),
]);

/// DuPont decomposition of ROE: net margin x asset turnover x equity
/// multiplier, reported as a percentage with the three factors attached.
pub fn dupont_roe(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let net_margin = safe_div(record.get("net_income"), record.get("revenue"));
    let asset_turnover = safe_div(record.get("revenue"), record.get("total_assets"));
    let equity_multiplier = safe_div(record.get("total_assets"), record.get("total_equity"));

    let value = match (net_margin, asset_turnover, equity_multiplier) {
        (Some(margin), Some(turnover), Some(multiplier)) => {
            Some(margin * turnover * multiplier * 100.0)
        }
        _ => None,
    };

    let mut result = classified(value, 1, &DUPONT_ROE, CATEGORY, "decomposition");
    if let (Some(margin), Some(turnover), Some(multiplier)) =
        (net_margin, asset_turnover, equity_multiplier)
    {
        result = result.with_components(
            [
                ("net_margin".to_string(), round_to(margin, 4)),
                ("asset_turnover".to_string(), round_to(turnover, 4)),
                ("equity_multiplier".to_string(), round_to(multiplier, 4)),
            ]
            .into_iter()
            .collect(),
        );
    }
    Ok(result)
}

/// Discounted cash flow enterprise value: a growing forecast of free cash
/// flow plus a Gordon terminal value, both discounted at `discount_rate`.
pub fn discounted_cash_flow(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let base_fcf = record.get("free_cash_flow").or_else(|| {
        match (
            record.get("operating_cash_flow"),
            record.get("capital_expenditures"),
        ) {
            (Some(ocf), Some(capex)) => Some(ocf - capex),
            _ => None,
        }
    });
    let (Some(base_fcf), Some(growth), Some(discount)) = (
        base_fcf,
        record.get("growth_rate"),
        record.get("discount_rate"),
    ) else {
        return Ok(MetricResult::insufficient(CATEGORY, "valuation"));
    };
    let terminal_growth = record.get("terminal_growth_rate").unwrap_or(0.02);
    if discount <= terminal_growth {
        return Err(MetricError::GrowthExceedsReturn {
            required_return: discount,
            growth_rate: terminal_growth,
        });
    }
    let years = match record.get("forecast_years") {
        Some(n) if n < 1.0 => {
            return Err(MetricError::NonPositiveInput {
                field: "forecast_years",
                value: n,
            })
        }
        Some(n) => n as usize,
        None => DEFAULT_FORECAST_YEARS,
    };

    let mut pv_forecast = 0.0;
    let mut cash_flow = base_fcf;
    for year in 1..=years {
        cash_flow *= 1.0 + growth;
        pv_forecast += cash_flow / (1.0 + discount).powi(year as i32);
    }

    let terminal_value =
        cash_flow * (1.0 + terminal_growth) / (discount - terminal_growth);
    let pv_terminal = terminal_value / (1.0 + discount).powi(years as i32);
    let value = pv_forecast + pv_terminal;

    let result = classified(Some(value), 0, &DCF, CATEGORY, "valuation").with_components(
        [
            ("pv_forecast".to_string(), round_to(pv_forecast, 0)),
            ("pv_terminal".to_string(), round_to(pv_terminal, 0)),
            ("forecast_years".to_string(), years as f64),
        ]
        .into_iter()
        .collect(),
    );
    Ok(result)
}

/// Gordon growth dividend discount value per share:
/// `D1 / (r - g)` with `D1 = dividends_per_share · (1 + g)`.
pub fn gordon_growth_value(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let dps = record.get("dividends_per_share").or_else(|| {
        safe_div(record.get("dividends_paid"), record.get("shares_outstanding"))
    });
    let (Some(dps), Some(required), Some(growth)) = (
        dps,
        record.get("required_return"),
        record.get("dividend_growth_rate"),
    ) else {
        return Ok(MetricResult::insufficient(CATEGORY, "valuation"));
    };
    if required <= growth {
        return Err(MetricError::GrowthExceedsReturn {
            required_return: required,
            growth_rate: growth,
        });
    }

    let value = dps * (1.0 + growth) / (required - growth);
    Ok(classified(Some(value), 2, &GORDON_GROWTH, CATEGORY, "valuation"))
}

/// Economic value added: NOPAT minus the capital charge.
pub fn economic_value_added(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = match (nopat(record), invested_capital(record), record.get("wacc")) {
        (Some(nopat), Some(capital), Some(wacc)) => Some(nopat - wacc * capital),
        _ => None,
    };
    Ok(classified(value, 0, &EVA, CATEGORY, "value_creation"))
}

/// Market value added: market capitalization minus book equity.
pub fn market_value_added(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = match (crate::market::market_cap(record), record.get("total_equity")) {
        (Some(mcap), Some(equity)) => Some(mcap - equity),
        _ => None,
    };
    Ok(classified(value, 0, &MVA, CATEGORY, "value_creation"))
}

/// Free cash flow to equity:
/// `NI + D&A - capex - ΔWC + net borrowing`.
pub fn fcfe(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = match (
        record.get("net_income"),
        record.get("depreciation_amortization"),
        record.get("capital_expenditures"),
    ) {
        (Some(ni), Some(da), Some(capex)) => {
            let delta_wc = record.get("change_in_working_capital").unwrap_or(0.0);
            let net_borrowing = record.get("net_borrowing").unwrap_or(0.0);
            Some(ni + da - capex - delta_wc + net_borrowing)
        }
        _ => None,
    };
    Ok(classified(value, 0, &FCFE, CATEGORY, "cash_flow"))
}

/// Free cash flow to the firm:
/// `EBIT · (1 - tax) + D&A - capex - ΔWC`.
pub fn fcff(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = match (
        record.get("ebit"),
        record.get("tax_rate"),
        record.get("depreciation_amortization"),
        record.get("capital_expenditures"),
    ) {
        (Some(ebit), Some(tax_rate), Some(da), Some(capex)) => {
            let delta_wc = record.get("change_in_working_capital").unwrap_or(0.0);
            Some(ebit * (1.0 - tax_rate) + da - capex - delta_wc)
        }
        _ => None,
    };
    Ok(classified(value, 0, &FCFF, CATEGORY, "cash_flow"))
}

/// Black-Scholes European call price. Components carry d1/d2 and the put
/// price from put-call parity.
pub fn black_scholes_call(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let Some(inputs) = OptionInputs::read(record)? else {
        return Ok(MetricResult::insufficient(CATEGORY, "options"));
    };

    let (d1, d2) = inputs.d1_d2();
    let discounted_strike = inputs.strike * (-inputs.rate * inputs.time).exp();
    let call = inputs.spot * normal_cdf(d1) - discounted_strike * normal_cdf(d2);
    let put = call + discounted_strike - inputs.spot;

    let premium_pct = round_to(call / inputs.spot * 100.0, 2);
    let interpretation = interpret(Some(premium_pct), &BLACK_SCHOLES);
    let result = MetricResult::computed(round_to(call, 2), interpretation, CATEGORY, "options")
        .with_components(
            [
                ("d1".to_string(), round_to(d1, 4)),
                ("d2".to_string(), round_to(d2, 4)),
                ("put_price".to_string(), round_to(put, 2)),
                ("premium_pct".to_string(), premium_pct),
            ]
            .into_iter()
            .collect(),
        );
    Ok(result)
}

/// Black-Scholes European put price via put-call parity.
pub fn black_scholes_put(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let Some(inputs) = OptionInputs::read(record)? else {
        return Ok(MetricResult::insufficient(CATEGORY, "options"));
    };

    let (d1, d2) = inputs.d1_d2();
    let discounted_strike = inputs.strike * (-inputs.rate * inputs.time).exp();
    let put = discounted_strike * normal_cdf(-d2) - inputs.spot * normal_cdf(-d1);

    let premium_pct = round_to(put / inputs.spot * 100.0, 2);
    let interpretation = interpret(Some(premium_pct), &BLACK_SCHOLES);
    let result = MetricResult::computed(round_to(put, 2), interpretation, CATEGORY, "options")
        .with_components(
            [
                ("d1".to_string(), round_to(d1, 4)),
                ("d2".to_string(), round_to(d2, 4)),
                ("premium_pct".to_string(), premium_pct),
            ]
            .into_iter()
            .collect(),
        );
    Ok(result)
}

/// Cox-Ross-Rubinstein binomial price for a European call: builds the full
/// terminal lattice, then backward-inducts discounted expectations.
pub fn binomial_option_price(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let Some(inputs) = OptionInputs::read(record)? else {
        return Ok(MetricResult::insufficient(CATEGORY, "options"));
    };
    let steps = match record.get("binomial_steps") {
        Some(n) if n < 1.0 => {
            return Err(MetricError::NonPositiveInput {
                field: "binomial_steps",
                value: n,
            })
        }
        Some(n) => n as usize,
        None => DEFAULT_BINOMIAL_STEPS,
    };

    let dt = inputs.time / steps as f64;
    let up = (inputs.volatility * dt.sqrt()).exp();
    let down = 1.0 / up;
    let growth = (inputs.rate * dt).exp();
    let p_up = (growth - down) / (up - down);
    let discount = (-inputs.rate * dt).exp();

    // Terminal payoffs across the whole lattice.
    let mut values: Vec<f64> = (0..=steps)
        .map(|i| {
            let terminal =
                inputs.spot * up.powi(i as i32) * down.powi((steps - i) as i32);
            (terminal - inputs.strike).max(0.0)
        })
        .collect();

    // Backward induction to the root.
    for step in (0..steps).rev() {
        for i in 0..=step {
            values[i] = discount * (p_up * values[i + 1] + (1.0 - p_up) * values[i]);
        }
    }
    let price = values[0];

    let premium_pct = round_to(price / inputs.spot * 100.0, 2);
    let interpretation = interpret(Some(premium_pct), &BINOMIAL_OPTION);
    let result = MetricResult::computed(round_to(price, 2), interpretation, CATEGORY, "options")
        .with_components(
            [
                ("steps".to_string(), steps as f64),
                ("up_factor".to_string(), round_to(up, 6)),
                ("risk_neutral_p".to_string(), round_to(p_up, 6)),
            ]
            .into_iter()
            .collect(),
        );
    Ok(result)
}

/// ROE x retention rate, as a percentage.
pub fn sustainable_growth_rate(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let roe = safe_div(record.get("net_income"), record.get("total_equity"));
    let payout = safe_div(record.get("dividends_paid"), record.get("net_income"));
    let value = match (roe, payout) {
        (Some(roe), Some(payout)) => Some(roe * (1.0 - payout) * 100.0),
        _ => None,
    };
    Ok(classified(value, 1, &SUSTAINABLE_GROWTH, CATEGORY, "growth"))
}

/// Graham number: `sqrt(22.5 · EPS · BVPS)`. A loss-making or
/// negative-equity company has no Graham number: insufficient, not an error.
pub fn graham_number(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let eps = safe_div(record.get("net_income"), record.get("shares_outstanding"));
    let bvps = safe_div(record.get("total_equity"), record.get("shares_outstanding"));
    let value = match (eps, bvps) {
        (Some(eps), Some(bvps)) if eps > 0.0 && bvps > 0.0 => {
            Some((22.5 * eps * bvps).sqrt())
        }
        _ => None,
    };
    Ok(classified(value, 2, &GRAHAM_NUMBER, CATEGORY, "valuation"))
}

struct OptionInputs {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    volatility: f64,
}

impl OptionInputs {
    /// `Ok(None)` when fields are absent; `Err` when they are present but
    /// impossible (negative time-to-expiry, non-positive volatility).
    fn read(record: &FinancialDataRecord) -> Result<Option<Self>, MetricError> {
        let (Some(spot), Some(strike), Some(time), Some(rate), Some(volatility)) = (
            record.get("spot_price"),
            record.get("strike_price"),
            record.get("time_to_expiry"),
            record.get("risk_free_rate"),
            record.get("volatility"),
        ) else {
            return Ok(None);
        };

        if time <= 0.0 {
            return Err(MetricError::NonPositiveInput {
                field: "time_to_expiry",
                value: time,
            });
        }
        if volatility <= 0.0 {
            return Err(MetricError::NonPositiveInput {
                field: "volatility",
                value: volatility,
            });
        }
        if spot <= 0.0 {
            return Err(MetricError::NonPositiveInput {
                field: "spot_price",
                value: spot,
            });
        }
        if strike <= 0.0 {
            return Err(MetricError::NonPositiveInput {
                field: "strike_price",
                value: strike,
            });
        }

        Ok(Some(Self {
            spot,
            strike,
            time,
            rate,
            volatility,
        }))
    }

    fn d1_d2(&self) -> (f64, f64) {
        let sigma_sqrt_t = self.volatility * self.time.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.rate + self.volatility * self.volatility / 2.0) * self.time)
            / sigma_sqrt_t;
        (d1, d1 - sigma_sqrt_t)
    }
}

/// Standard normal CDF via the Abramowitz & Stegun 7.1.26 erf approximation
/// (absolute error under 1.5e-7).
fn normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let poly = t
        * (0.319381530
            + t * (-0.356563782 + t * (1.781477937 + t * (-1.821255978 + t * 1.330274429))));
    let tail = (-x * x / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt() * poly;
    if x >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_cdf_matches_known_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0) - 0.8413447).abs() < 1e-6);
        assert!((normal_cdf(-1.96) - 0.0249979).abs() < 1e-6);
    }

    #[test]
    fn black_scholes_reference_price() {
        // Classic textbook case: S=100, K=100, T=1, r=5%, sigma=20%.
        let record = FinancialDataRecord::from([
            ("spot_price", 100.0),
            ("strike_price", 100.0),
            ("time_to_expiry", 1.0),
            ("risk_free_rate", 0.05),
            ("volatility", 0.2),
        ]);
        let call = black_scholes_call(&record).unwrap();
        assert_eq!(call.value, Some(10.45));

        let put = black_scholes_put(&record).unwrap();
        assert_eq!(put.value, Some(5.57));
    }

    #[test]
    fn binomial_converges_to_black_scholes() {
        let record = FinancialDataRecord::from([
            ("spot_price", 100.0),
            ("strike_price", 100.0),
            ("time_to_expiry", 1.0),
            ("risk_free_rate", 0.05),
            ("volatility", 0.2),
            ("binomial_steps", 500.0),
        ]);
        let price = binomial_option_price(&record).unwrap().value.unwrap();
        assert!((price - 10.45).abs() < 0.05, "price was {price}");
    }

    #[test]
    fn negative_expiry_is_a_metric_error() {
        let record = FinancialDataRecord::from([
            ("spot_price", 100.0),
            ("strike_price", 100.0),
            ("time_to_expiry", -0.5),
            ("risk_free_rate", 0.05),
            ("volatility", 0.2),
        ]);
        assert!(black_scholes_call(&record).is_err());
    }

    #[test]
    fn missing_option_inputs_are_insufficient_not_errors() {
        let record = FinancialDataRecord::from([("spot_price", 100.0)]);
        let result = black_scholes_call(&record).unwrap();
        assert_eq!(result.value, None);
        assert_eq!(result.interpretation, "insufficient_data");
    }

    #[test]
    fn dupont_factors_multiply_back_to_roe() {
        let record = FinancialDataRecord::from([
            ("net_income", 20_000.0),
            ("revenue", 150_000.0),
            ("total_assets", 250_000.0),
            ("total_equity", 100_000.0),
        ]);
        let result = dupont_roe(&record).unwrap();
        assert_eq!(result.value, Some(20.0));
        assert_eq!(result.interpretation, "excellent");
        let c = result.components.unwrap();
        assert!((c["net_margin"] * c["asset_turnover"] * c["equity_multiplier"] - 0.2).abs() < 1e-3);
    }

    #[test]
    fn dcf_rejects_discount_below_terminal_growth() {
        let record = FinancialDataRecord::from([
            ("free_cash_flow", 100_000.0),
            ("growth_rate", 0.05),
            ("discount_rate", 0.01),
            ("terminal_growth_rate", 0.02),
        ]);
        assert!(discounted_cash_flow(&record).is_err());
    }

    #[test]
    fn gordon_growth_textbook_value() {
        let record = FinancialDataRecord::from([
            ("dividends_per_share", 2.0),
            ("required_return", 0.08),
            ("dividend_growth_rate", 0.03),
        ]);
        let result = gordon_growth_value(&record).unwrap();
        // 2 · 1.03 / 0.05 = 41.2
        assert_eq!(result.value, Some(41.2));
    }
}
