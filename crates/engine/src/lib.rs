//! # Finsight Analysis Engine
//!
//! The master orchestrator: runs the nine-stage analysis pipeline over one
//! `AnalysisRun`, degrading gracefully when external collaborators fail and
//! checking for cooperative cancellation between stages.

use std::sync::Arc;

use configuration::Config;
use core_types::{AnalysisConfig, AnalysisRun, ExternalEnrichment, FinancialDataRecord};
use dispatcher::Registry;
use tracing::{info, warn};
use uuid::Uuid;

pub mod cancel;
pub mod collaborators;
pub mod error;
pub mod normalize;
pub mod recommend;

pub use cancel::CancelHandle;
pub use collaborators::{
    AiAgents, CollaboratorError, DocumentProcessor, ExternalDataService, RunRepository,
};
pub use error::PipelineError;

/// The sequential analysis pipeline.
///
/// Stages: load configuration, process document, normalize fields, fetch
/// external enrichment, calculate metrics, summarize, AI enrichment,
/// benchmark and charts, recommendations and persistence. Only a missing run
/// configuration is fatal; every other stage failure is recorded on the run
/// and execution continues with whatever is available.
pub struct AnalysisPipeline {
    config: Config,
    registry: Registry,
    documents: Arc<dyn DocumentProcessor>,
    external: Arc<dyn ExternalDataService>,
    ai: Arc<dyn AiAgents>,
    repository: Arc<dyn RunRepository>,
}

impl AnalysisPipeline {
    pub fn new(
        config: Config,
        documents: Arc<dyn DocumentProcessor>,
        external: Arc<dyn ExternalDataService>,
        ai: Arc<dyn AiAgents>,
        repository: Arc<dyn RunRepository>,
    ) -> Result<Self, PipelineError> {
        // Registry construction validates every threshold table up front.
        let registry = Registry::new()?;
        Ok(Self {
            config,
            registry,
            documents,
            external,
            ai,
            repository,
        })
    }

    /// Executes the pipeline for one run. Returns the finalized run record;
    /// `Err` is reserved for infrastructure failures (missing configuration,
    /// snapshot persistence, illegal state transitions).
    pub async fn run(
        &self,
        run_id: Uuid,
        cancel: &CancelHandle,
    ) -> Result<AnalysisRun, PipelineError> {
        let run_config = match self
            .repository
            .load_config(run_id)
            .await
            .map_err(PipelineError::Repository)?
        {
            Some(config) => config,
            None => {
                // Missing configuration is fatal: the run goes straight to the
                // terminal error state and the snapshot is persisted
                // best-effort before the error propagates.
                let error = PipelineError::ConfigNotFound(run_id);
                let mut run = AnalysisRun::new(run_id);
                run.fail(error.to_string());
                if let Err(e) = self.persist(&run).await {
                    warn!(run_id = %run_id, error = %e, "failed to persist error snapshot");
                }
                return Err(error);
            }
        };

        let mut run = AnalysisRun::new(run_id);
        run.start_processing()?;
        self.persist(&run).await?;
        info!(run_id = %run_id, selections = run_config.selections.len(), "analysis run started");

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: document processing.
        match self.documents.process(&run_config.document_ref).await {
            Ok(document) => run.document = Some(document),
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "document processing failed");
                run.record_error("document_processing", e.to_string());
            }
        }

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: field normalization and derived fields.
        let mut record = run
            .document
            .as_ref()
            .map(normalize::normalize)
            .unwrap_or_default();
        normalize::derive_fields(&mut record);
        self.seed_simulation_parameters(&mut record);
        run.financial_data = Some(record.clone());

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: external enrichment. The three fetches run concurrently and
        // degrade independently.
        let enrichment = self.fetch_external(&run_config, &mut run).await;
        run.external_data = Some(enrichment);

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: metric calculation.
        let batch = self.registry.dispatch(&record, &run_config.selections);
        info!(
            run_id = %run_id,
            calculated = batch.total_calculated,
            failed = batch.total_errors,
            "metrics dispatched"
        );
        run.summary = Some(aggregation::summarize(&batch.results));
        run.calculations = Some(batch);

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: AI enrichment, guarded by the per-run cost ceiling.
        let ceiling = self.config.enrichment.cost_ceiling_usd;
        if run.cost >= ceiling {
            run.record_error(
                "ai_enrichment",
                format!("skipped: cost ceiling {} reached", ceiling),
            );
        } else {
            match self.ai.enrich(&run).await {
                Ok(enrichment) => {
                    run.cost += enrichment.cost;
                    if run.cost > ceiling {
                        run.record_error(
                            "ai_enrichment",
                            format!("cost {} exceeded ceiling {}", run.cost, ceiling),
                        );
                    }
                    run.ai = Some(enrichment);
                }
                Err(e) => {
                    warn!(run_id = %run_id, error = %e, "AI enrichment failed");
                    run.record_error("ai_enrichment", e.to_string());
                }
            }
        }

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: benchmark comparison and chart series.
        if let (Some(calculations), Some(benchmarks)) = (
            run.calculations.as_ref(),
            run.external_data
                .as_ref()
                .and_then(|e| e.sector_benchmarks.as_ref()),
        ) {
            run.benchmark = Some(aggregation::compare_with_tolerance(
                &calculations.results,
                benchmarks,
                self.config.benchmarking.upper_tolerance,
                self.config.benchmarking.lower_tolerance,
            ));
        }
        if let Some(summary) = &run.summary {
            run.charts = aggregation::build_series(summary);
        }

        if self.cancelled(&mut run, cancel).await? {
            return Ok(run);
        }

        // Stage: recommendations, finalization, persistence.
        run.recommendations = Some(recommend::build(&run));
        run.complete()?;
        self.persist(&run).await?;
        info!(
            run_id = %run_id,
            status = ?run.status,
            errors = run.errors.len(),
            elapsed_ms = run.processing_time_ms,
            "analysis run finished"
        );

        Ok(run)
    }

    /// Checks the cancellation flag; on cancellation finalizes and persists
    /// the run and reports `true` so the caller can return early.
    async fn cancelled(
        &self,
        run: &mut AnalysisRun,
        cancel: &CancelHandle,
    ) -> Result<bool, PipelineError> {
        if !cancel.is_cancelled() {
            return Ok(false);
        }
        run.cancel("cancellation requested")?;
        self.persist(run).await?;
        info!(run_id = %run.run_id, "analysis run cancelled");
        Ok(true)
    }

    async fn persist(&self, run: &AnalysisRun) -> Result<(), PipelineError> {
        self.repository
            .save(run)
            .await
            .map_err(PipelineError::Repository)
    }

    /// Seeds simulation parameters from configuration when the document did
    /// not provide them. `insert_derived` never overwrites extracted values.
    fn seed_simulation_parameters(&self, record: &mut FinancialDataRecord) {
        record.insert_derived("confidence_level", self.config.risk_models.var_confidence);
        record.insert_derived(
            "var_iterations",
            f64::from(self.config.risk_models.var_iterations),
        );
    }

    /// Runs the three enrichment fetches concurrently. A missing symbol or
    /// sector skips that fetch silently; a failed fetch records an error and
    /// leaves its slot `None`.
    async fn fetch_external(
        &self,
        run_config: &AnalysisConfig,
        run: &mut AnalysisRun,
    ) -> ExternalEnrichment {
        let market = async {
            match run_config.symbol.as_deref() {
                Some(symbol) => Some(self.external.market_data(symbol).await),
                None => None,
            }
        };
        let benchmarks = async {
            match run_config.sector.as_deref() {
                Some(sector) => Some(
                    self.external
                        .sector_benchmarks(sector, run_config.activity.as_deref())
                        .await,
                ),
                None => None,
            }
        };
        let (market, benchmarks, macros) =
            tokio::join!(market, benchmarks, self.external.macro_indicators());

        let mut enrichment = ExternalEnrichment::default();
        match market {
            Some(Ok(data)) => enrichment.market_data = Some(data),
            Some(Err(e)) => run.record_error("market_data", e.to_string()),
            None => {}
        }
        match benchmarks {
            Some(Ok(data)) => enrichment.sector_benchmarks = Some(data),
            Some(Err(e)) => run.record_error("sector_benchmarks", e.to_string()),
            None => {}
        }
        match macros {
            Ok(data) => enrichment.macro_indicators = Some(data),
            Err(e) => run.record_error("macro_indicators", e.to_string()),
        }
        enrichment
    }
}
