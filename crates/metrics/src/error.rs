use thiserror::Error;

/// Errors for malformed or impossible inputs only. Expected missing data is
/// signaled through `MetricResult::insufficient`, never through this type.
#[derive(Error, Debug)]
pub enum MetricError {
    #[error("'{field}' must be positive, got {value}")]
    NonPositiveInput { field: &'static str, value: f64 },

    #[error("'{field}' must not be negative, got {value}")]
    NegativeInput { field: &'static str, value: f64 },

    #[error("Confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("Scenario set is empty or contains non-finite returns")]
    MalformedScenarios,

    #[error("Required return ({required_return}) must exceed growth rate ({growth_rate})")]
    GrowthExceedsReturn {
        required_return: f64,
        growth_rate: f64,
    },
}
