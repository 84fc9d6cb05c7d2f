//! Risk models: Altman Z-Score, CAPM, Monte-Carlo VaR, and bond
//! interest-rate sensitivity.

use crate::error::MetricError;
use crate::util::{classified, round_to, safe_div};
use classification::{ThresholdBand, ThresholdTable};
use core_types::{FinancialDataRecord, MetricCategory, MetricResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CATEGORY: MetricCategory = MetricCategory::Risk;

/// Fixed seed so a batch re-run against an unchanged record is byte-identical.
const VAR_SEED: u64 = 0x00C0_FFEE;
const DEFAULT_VAR_ITERATIONS: usize = 10_000;
const DEFAULT_CONFIDENCE: f64 = 0.95;

pub const ALTMAN_Z: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("safe", 2.99),
    ThresholdBand::between("grey_zone", 1.81, 2.99),
    ThresholdBand::at_most("distress", 1.81),
]);

pub const CAPM: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_least("high", 15.0),
    ThresholdBand::between("moderate", 8.0, 15.0),
    ThresholdBand::at_most("low", 8.0),
]);

pub const MONTE_CARLO_VAR: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("low", 5.0),
    ThresholdBand::between("moderate", 5.0, 10.0),
    ThresholdBand::between("high", 10.0, 20.0),
    ThresholdBand::at_least("severe", 20.0),
]);

pub const MODIFIED_DURATION: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("low", 3.0),
    ThresholdBand::between("moderate", 3.0, 7.0),
    ThresholdBand::at_least("high", 7.0),
]);

pub const CONVEXITY: ThresholdTable = ThresholdTable::new(&[
    ThresholdBand::at_most("low", 30.0),
    ThresholdBand::between("moderate", 30.0, 100.0),
    ThresholdBand::at_least("high", 100.0),
]);

/// Altman Z-Score for manufacturing firms:
/// `1.2·X1 + 1.4·X2 + 3.3·X3 + 0.6·X4 + 1.0·X5`.
pub fn altman_z_score(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let total_assets = record.get("total_assets");
    let working_capital = match (record.get("current_assets"), record.get("current_liabilities"))
    {
        (Some(ca), Some(cl)) => Some(ca - cl),
        _ => record.get("working_capital"),
    };

    let x1 = safe_div(working_capital, total_assets);
    let x2 = safe_div(record.get("retained_earnings"), total_assets);
    let x3 = safe_div(record.get("ebit"), total_assets);
    let x4 = safe_div(crate::market::market_cap(record), record.get("total_liabilities"));
    let x5 = safe_div(record.get("revenue"), total_assets);

    let value = match (x1, x2, x3, x4, x5) {
        (Some(x1), Some(x2), Some(x3), Some(x4), Some(x5)) => {
            Some(1.2 * x1 + 1.4 * x2 + 3.3 * x3 + 0.6 * x4 + 1.0 * x5)
        }
        _ => None,
    };

    let mut result = classified(value, 2, &ALTMAN_Z, CATEGORY, "bankruptcy");
    if let (Some(x1), Some(x2), Some(x3), Some(x4), Some(x5)) = (x1, x2, x3, x4, x5) {
        result = result.with_components(
            [
                ("x1_working_capital".to_string(), round_to(x1, 4)),
                ("x2_retained_earnings".to_string(), round_to(x2, 4)),
                ("x3_ebit".to_string(), round_to(x3, 4)),
                ("x4_market_equity".to_string(), round_to(x4, 4)),
                ("x5_sales".to_string(), round_to(x5, 4)),
            ]
            .into_iter()
            .collect(),
        );
    }
    Ok(result)
}

/// CAPM expected return, as a percentage:
/// `rf + beta · (rm - rf)` with rates supplied as decimals.
pub fn capm_expected_return(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let value = match (
        record.get("risk_free_rate"),
        record.get("beta"),
        record.get("market_return"),
    ) {
        (Some(rf), Some(beta), Some(rm)) => Some((rf + beta * (rm - rf)) * 100.0),
        _ => None,
    };
    Ok(classified(value, 2, &CAPM, CATEGORY, "expected_return"))
}

/// Value at Risk from an explicit scenario set: sorts the simulated returns
/// and indexes the `(1 - confidence) · N` quantile. A loss quantile comes
/// back as a positive fraction; a profitable quantile floors at zero.
pub fn var_from_scenarios(returns: &[f64], confidence: f64) -> Result<f64, MetricError> {
    if !(0.0..1.0).contains(&confidence) || confidence == 0.0 {
        return Err(MetricError::InvalidConfidence(confidence));
    }
    if returns.is_empty() || returns.iter().any(|r| !r.is_finite()) {
        return Err(MetricError::MalformedScenarios);
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let index = (((1.0 - confidence) * sorted.len() as f64) as usize).min(sorted.len() - 1);
    Ok((-sorted[index]).max(0.0))
}

/// Monte-Carlo Value at Risk as a percentage of portfolio value.
///
/// Simulates normally distributed returns (Box-Muller over a fixed-seed
/// `StdRng`), then takes the scenario quantile. Inputs: `portfolio_value`,
/// `expected_return`, `volatility`, optional `confidence_level` and
/// `var_iterations`.
pub fn monte_carlo_var(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let (Some(portfolio_value), Some(volatility)) =
        (record.get("portfolio_value"), record.get("volatility"))
    else {
        return Ok(MetricResult::insufficient(CATEGORY, "value_at_risk"));
    };
    if volatility <= 0.0 {
        return Err(MetricError::NonPositiveInput {
            field: "volatility",
            value: volatility,
        });
    }
    let mean = record.get("expected_return").unwrap_or(0.0);
    let confidence = record.get("confidence_level").unwrap_or(DEFAULT_CONFIDENCE);
    let iterations = match record.get("var_iterations") {
        Some(n) if n < 1.0 => {
            return Err(MetricError::NonPositiveInput {
                field: "var_iterations",
                value: n,
            })
        }
        Some(n) => n as usize,
        None => DEFAULT_VAR_ITERATIONS,
    };

    let mut rng = StdRng::seed_from_u64(VAR_SEED);
    let mut returns = Vec::with_capacity(iterations);
    while returns.len() < iterations {
        // Box-Muller transform; u1 is kept away from zero for the log.
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        returns.push(mean + volatility * z);
    }

    let var_fraction = var_from_scenarios(&returns, confidence)?;
    let value = Some(var_fraction * 100.0);

    let result = classified(value, 2, &MONTE_CARLO_VAR, CATEGORY, "value_at_risk")
        .with_components(
            [
                (
                    "var_amount".to_string(),
                    round_to(var_fraction * portfolio_value, 0),
                ),
                ("confidence".to_string(), confidence),
                ("simulations".to_string(), iterations as f64),
            ]
            .into_iter()
            .collect(),
        );
    Ok(result)
}

/// Modified duration of an annual-coupon bond, in years.
pub fn modified_duration(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let Some(bond) = BondInputs::read(record)? else {
        return Ok(MetricResult::insufficient(CATEGORY, "interest_rate"));
    };

    let (price, macaulay, _) = bond.price_duration_convexity();
    let modified = macaulay / (1.0 + bond.ytm);

    let result = classified(Some(modified), 2, &MODIFIED_DURATION, CATEGORY, "interest_rate")
        .with_components(
            [
                ("macaulay_duration".to_string(), round_to(macaulay, 4)),
                ("bond_price".to_string(), round_to(price, 2)),
            ]
            .into_iter()
            .collect(),
        );
    Ok(result)
}

/// Convexity of an annual-coupon bond.
pub fn convexity(record: &FinancialDataRecord) -> Result<MetricResult, MetricError> {
    let Some(bond) = BondInputs::read(record)? else {
        return Ok(MetricResult::insufficient(CATEGORY, "interest_rate"));
    };

    let (price, _, convexity) = bond.price_duration_convexity();

    let result = classified(Some(convexity), 2, &CONVEXITY, CATEGORY, "interest_rate")
        .with_components(
            [("bond_price".to_string(), round_to(price, 2))]
                .into_iter()
                .collect(),
        );
    Ok(result)
}

struct BondInputs {
    face_value: f64,
    coupon_rate: f64,
    ytm: f64,
    periods: usize,
}

impl BondInputs {
    /// Reads and validates bond fields. `Ok(None)` means inputs are absent
    /// (insufficient data); `Err` means they are present but impossible.
    fn read(record: &FinancialDataRecord) -> Result<Option<Self>, MetricError> {
        let (Some(face_value), Some(coupon_rate), Some(ytm), Some(years)) = (
            record.get("face_value"),
            record.get("coupon_rate"),
            record.get("yield_to_maturity"),
            record.get("years_to_maturity"),
        ) else {
            return Ok(None);
        };

        if years <= 0.0 {
            return Err(MetricError::NonPositiveInput {
                field: "years_to_maturity",
                value: years,
            });
        }
        if coupon_rate < 0.0 {
            return Err(MetricError::NegativeInput {
                field: "coupon_rate",
                value: coupon_rate,
            });
        }
        if ytm <= -1.0 {
            return Err(MetricError::NonPositiveInput {
                field: "yield_to_maturity",
                value: ytm,
            });
        }

        Ok(Some(Self {
            face_value,
            coupon_rate,
            ytm,
            periods: years.round().max(1.0) as usize,
        }))
    }

    /// Discounts every cash flow once and derives price, Macaulay duration,
    /// and convexity together.
    fn price_duration_convexity(&self) -> (f64, f64, f64) {
        let coupon = self.face_value * self.coupon_rate;
        let mut price = 0.0;
        let mut weighted_time = 0.0;
        let mut convexity_sum = 0.0;

        for t in 1..=self.periods {
            let mut cash_flow = coupon;
            if t == self.periods {
                cash_flow += self.face_value;
            }
            let discounted = cash_flow / (1.0 + self.ytm).powi(t as i32);
            price += discounted;
            weighted_time += t as f64 * discounted;
            convexity_sum += (t as f64) * (t as f64 + 1.0) * discounted;
        }

        let macaulay = weighted_time / price;
        let convexity = convexity_sum / (price * (1.0 + self.ytm).powi(2));
        (price, macaulay, convexity)
    }
}
