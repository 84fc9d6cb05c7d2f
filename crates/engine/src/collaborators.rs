//! Abstract interfaces for the engine's external collaborators.
//!
//! These traits are the contract the pipeline runs against, allowing the
//! underlying implementations (live services or in-memory test doubles) to be
//! swapped out.

use async_trait::async_trait;
use core_types::{AnalysisConfig, AnalysisRun, AiEnrichment, PercentileBenchmark, ProcessedDocument};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Failure reported by any external collaborator. The pipeline treats these
/// as degradations, not fatal errors, except where documented on the trait.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("{0}")]
    Unavailable(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Turns an uploaded financial document into structured fields.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, document_ref: &str) -> Result<ProcessedDocument, CollaboratorError>;
}

/// Fetches market, sector and macro context for a run.
#[async_trait]
pub trait ExternalDataService: Send + Sync {
    async fn market_data(&self, symbol: &str) -> Result<serde_json::Value, CollaboratorError>;

    async fn sector_benchmarks(
        &self,
        sector: &str,
        activity: Option<&str>,
    ) -> Result<BTreeMap<String, PercentileBenchmark>, CollaboratorError>;

    async fn macro_indicators(&self) -> Result<serde_json::Value, CollaboratorError>;
}

/// Produces paid AI narrative content from the state of a run. Implementations
/// report the monetary cost of the calls they made.
#[async_trait]
pub trait AiAgents: Send + Sync {
    async fn enrich(&self, run: &AnalysisRun) -> Result<AiEnrichment, CollaboratorError>;
}

/// Loads run configurations and persists run snapshots.
#[async_trait]
pub trait RunRepository: Send + Sync {
    async fn load_config(&self, run_id: Uuid) -> Result<Option<AnalysisConfig>, CollaboratorError>;

    async fn save(&self, run: &AnalysisRun) -> Result<(), CollaboratorError>;
}
