use crate::run::RunStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid run status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: RunStatus, to: RunStatus },

    #[error("Serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
