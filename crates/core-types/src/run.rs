use crate::error::CoreError;
use crate::metric::{CalculationBatch, CategorySummary, MetricCategory};
use crate::record::{AnalysisTypeSelection, FinancialDataRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifecycle of one analysis run.
///
/// `Pending → Processing → {Completed | Error | Cancelled}`. The three end
/// states are terminal; `Cancelled` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Processing,
    Completed,
    Error,
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Error | RunStatus::Cancelled
        )
    }
}

/// The configuration a run is started from: which metrics to compute, which
/// document to ingest, and the sector/activity context for benchmarking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub run_id: Uuid,
    pub selections: Vec<AnalysisTypeSelection>,
    pub document_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

/// Output of the external Document Processor collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub extracted_fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub tables: Vec<serde_json::Value>,
    pub confidence: f64,
}

/// Percentile distribution for one metric within a sector/activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBenchmark {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Market/sector/macro context fetched from the External Data collaborator.
/// Every part is optional: enrichment failures degrade to absence, never to a
/// failed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalEnrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_benchmarks: Option<BTreeMap<String, PercentileBenchmark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_indicators: Option<serde_json::Value>,
}

impl ExternalEnrichment {
    pub fn is_empty(&self) -> bool {
        self.market_data.is_none()
            && self.sector_benchmarks.is_none()
            && self.macro_indicators.is_none()
    }
}

/// Opaque AI-produced enrichment content plus what it cost to produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiEnrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_text: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Monetary cost incurred across the AI calls that produced this content.
    #[serde(default)]
    pub cost: Decimal,
}

/// One metric's standing against its sector percentile benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<PercentileBenchmark>,
    /// "above_average" / "average" / "below_average" / "unknown".
    pub performance: String,
}

/// Benchmark comparison for a whole batch, keyed by metric name.
pub type BenchmarkComparison = BTreeMap<String, BenchmarkEntry>;

/// A chart-ready series derived from computed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Synthesized recommendations for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Categories whose summary interpretation flagged them as weak.
    pub priority_areas: Vec<String>,
    /// Metrics standing below their sector benchmark.
    pub action_items: Vec<String>,
    /// AI-provided recommendations, merged verbatim.
    pub ai_recommendations: Vec<String>,
}

/// The top-level, stateful record of one end-to-end pipeline execution.
///
/// Created at run start, mutated by each pipeline stage, finalized once. The
/// `errors` list accumulates every degraded/skipped component, even when the
/// overall status still reaches `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub run_id: Uuid,
    pub status: RunStatus,

    // Per-stage outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<ProcessedDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<FinancialDataRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data: Option<ExternalEnrichment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculations: Option<CalculationBatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<BTreeMap<MetricCategory, CategorySummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiEnrichment>,
    #[serde(default)]
    pub charts: Vec<ChartSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkComparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,

    /// Non-fatal, stage-scoped error entries.
    pub errors: Vec<String>,
    /// Accumulated monetary cost of the run (AI calls).
    pub cost: Decimal,
    /// Total wall-clock time, recorded at finalization.
    pub processing_time_ms: i64,

    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl AnalysisRun {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            status: RunStatus::Pending,
            document: None,
            financial_data: None,
            external_data: None,
            calculations: None,
            summary: None,
            ai: None,
            charts: Vec::new(),
            benchmark: None,
            recommendations: None,
            errors: Vec::new(),
            cost: Decimal::ZERO,
            processing_time_ms: 0,
            created_at: Utc::now(),
            processing_started_at: None,
            processing_completed_at: None,
            error_at: None,
            error_message: None,
            cancelled_at: None,
            cancel_reason: None,
        }
    }

    /// Records a non-fatal, stage-scoped error and keeps going.
    pub fn record_error(&mut self, stage: &str, message: impl AsRef<str>) {
        self.errors.push(format!("{}: {}", stage, message.as_ref()));
    }

    /// Enters the `Processing` state. Only valid from `Pending`.
    pub fn start_processing(&mut self) -> Result<(), CoreError> {
        match self.status {
            RunStatus::Pending => {
                self.status = RunStatus::Processing;
                self.processing_started_at = Some(Utc::now());
                Ok(())
            }
            other => Err(CoreError::InvalidTransition {
                from: other,
                to: RunStatus::Processing,
            }),
        }
    }

    /// Finalizes a successful run, recording total wall-clock time.
    pub fn complete(&mut self) -> Result<(), CoreError> {
        match self.status {
            RunStatus::Processing => {
                let now = Utc::now();
                self.status = RunStatus::Completed;
                self.processing_completed_at = Some(now);
                if let Some(started) = self.processing_started_at {
                    self.processing_time_ms = (now - started).num_milliseconds();
                }
                Ok(())
            }
            other => Err(CoreError::InvalidTransition {
                from: other,
                to: RunStatus::Completed,
            }),
        }
    }

    /// Transitions to the terminal `Error` state with the fatal message.
    pub fn fail(&mut self, message: impl Into<String>) {
        let now = Utc::now();
        self.status = RunStatus::Error;
        self.error_at = Some(now);
        self.error_message = Some(message.into());
        if let Some(started) = self.processing_started_at {
            self.processing_time_ms = (now - started).num_milliseconds();
        }
    }

    /// Cancels the run. Only meaningful while `Pending` or `Processing`;
    /// idempotent once `Cancelled`; rejected on `Completed`/`Error`.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), CoreError> {
        match self.status {
            RunStatus::Pending | RunStatus::Processing => {
                self.status = RunStatus::Cancelled;
                self.cancelled_at = Some(Utc::now());
                self.cancel_reason = Some(reason.into());
                Ok(())
            }
            RunStatus::Cancelled => Ok(()),
            other => Err(CoreError::InvalidTransition {
                from: other,
                to: RunStatus::Cancelled,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_machine_happy_path() {
        let mut run = AnalysisRun::new(Uuid::new_v4());
        assert_eq!(run.status, RunStatus::Pending);

        run.start_processing().unwrap();
        assert_eq!(run.status, RunStatus::Processing);
        assert!(run.processing_started_at.is_some());

        run.complete().unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.processing_completed_at.is_some());
    }

    #[test]
    fn cancel_is_rejected_on_completed_and_idempotent_on_cancelled() {
        let mut run = AnalysisRun::new(Uuid::new_v4());
        run.start_processing().unwrap();
        run.complete().unwrap();
        assert!(run.cancel("too late").is_err());

        let mut run = AnalysisRun::new(Uuid::new_v4());
        run.start_processing().unwrap();
        run.cancel("user request").unwrap();
        assert_eq!(run.status, RunStatus::Cancelled);
        // Repeat cancel keeps the original reason and succeeds.
        run.cancel("again").unwrap();
        assert_eq!(run.cancel_reason.as_deref(), Some("user request"));
    }

    #[test]
    fn fail_records_message_and_timestamp() {
        let mut run = AnalysisRun::new(Uuid::new_v4());
        run.start_processing().unwrap();
        run.fail("configuration not found");
        assert_eq!(run.status, RunStatus::Error);
        assert_eq!(run.error_message.as_deref(), Some("configuration not found"));
        assert!(run.error_at.is_some());
    }
}
