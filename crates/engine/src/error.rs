use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No analysis configuration found for run {0}")]
    ConfigNotFound(Uuid),

    #[error("Run repository error: {0}")]
    Repository(#[source] crate::collaborators::CollaboratorError),

    #[error("Run state error: {0}")]
    State(#[from] core_types::CoreError),

    #[error("Metric registry error: {0}")]
    Registry(#[from] dispatcher::DispatchError),
}
