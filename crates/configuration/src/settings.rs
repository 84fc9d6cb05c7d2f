use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub benchmarking: Benchmarking,
    #[serde(default)]
    pub risk_models: RiskModels,
    #[serde(default)]
    pub enrichment: Enrichment,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    /// Sanity checks that cannot be expressed through serde defaults alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmarking.upper_tolerance <= self.benchmarking.lower_tolerance {
            return Err(ConfigError::ValidationError(format!(
                "benchmarking.upper_tolerance ({}) must exceed lower_tolerance ({})",
                self.benchmarking.upper_tolerance, self.benchmarking.lower_tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.risk_models.var_confidence) {
            return Err(ConfigError::ValidationError(format!(
                "risk_models.var_confidence ({}) must lie in (0, 1)",
                self.risk_models.var_confidence
            )));
        }
        if self.risk_models.var_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "risk_models.var_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tolerance band applied when comparing metric values to sector medians.
#[derive(Debug, Clone, Deserialize)]
pub struct Benchmarking {
    /// Ratio of value to median above which performance is "above_average".
    #[serde(default = "default_upper_tolerance")]
    pub upper_tolerance: f64,
    /// Ratio of value to median below which performance is "below_average".
    #[serde(default = "default_lower_tolerance")]
    pub lower_tolerance: f64,
}

/// Parameters for the simulation-based risk metrics.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskModels {
    /// Scenario count for the Monte-Carlo Value-at-Risk simulation.
    #[serde(default = "default_var_iterations")]
    pub var_iterations: u32,
    /// Confidence level for Value-at-Risk, e.g. 0.95 for 95%.
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,
}

/// Guards around the paid AI enrichment stage.
#[derive(Debug, Clone, Deserialize)]
pub struct Enrichment {
    /// Per-run spend ceiling in USD. The enrichment stage is skipped (and the
    /// run annotated) once accumulated cost would cross this line.
    #[serde(default = "default_cost_ceiling_usd")]
    pub cost_ceiling_usd: Decimal,
}

/// Log output controls.
#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// Default tracing filter directive, overridable via RUST_LOG.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_upper_tolerance() -> f64 {
    1.1
}

fn default_lower_tolerance() -> f64 {
    0.9
}

fn default_var_iterations() -> u32 {
    10_000
}

fn default_var_confidence() -> f64 {
    0.95
}

fn default_cost_ceiling_usd() -> Decimal {
    dec!(5.00)
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Benchmarking {
    fn default() -> Self {
        Self {
            upper_tolerance: default_upper_tolerance(),
            lower_tolerance: default_lower_tolerance(),
        }
    }
}

impl Default for RiskModels {
    fn default() -> Self {
        Self {
            var_iterations: default_var_iterations(),
            var_confidence: default_var_confidence(),
        }
    }
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            cost_ceiling_usd: default_cost_ceiling_usd(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
