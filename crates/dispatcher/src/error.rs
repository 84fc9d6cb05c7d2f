use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Threshold table validation failed: {0}")]
    Table(#[from] classification::ClassificationError),

    #[error("Metric name '{0}' does not round-trip through the registry")]
    AmbiguousName(&'static str),
}
