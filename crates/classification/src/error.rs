use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("Threshold band '{label}' has min {min} greater than max {max}")]
    InvalidBand {
        label: &'static str,
        min: f64,
        max: f64,
    },
}
