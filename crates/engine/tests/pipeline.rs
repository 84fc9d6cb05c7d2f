//! End-to-end pipeline tests against in-memory collaborators.

use async_trait::async_trait;
use configuration::Config;
use core_types::{
    AiEnrichment, AnalysisConfig, AnalysisRun, AnalysisTypeSelection, PercentileBenchmark,
    ProcessedDocument, RunStatus,
};
use engine::{
    AiAgents, AnalysisPipeline, CancelHandle, CollaboratorError, DocumentProcessor,
    ExternalDataService, PipelineError, RunRepository,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

struct StaticDocs(ProcessedDocument);

#[async_trait]
impl DocumentProcessor for StaticDocs {
    async fn process(&self, _document_ref: &str) -> Result<ProcessedDocument, CollaboratorError> {
        Ok(self.0.clone())
    }
}

struct FailingDocs;

#[async_trait]
impl DocumentProcessor for FailingDocs {
    async fn process(&self, document_ref: &str) -> Result<ProcessedDocument, CollaboratorError> {
        Err(CollaboratorError::Unavailable(format!(
            "OCR service timed out for {}",
            document_ref
        )))
    }
}

#[derive(Default)]
struct StaticExternal {
    benchmarks: BTreeMap<String, PercentileBenchmark>,
}

#[async_trait]
impl ExternalDataService for StaticExternal {
    async fn market_data(&self, _symbol: &str) -> Result<serde_json::Value, CollaboratorError> {
        Ok(json!({"price": 12.5}))
    }

    async fn sector_benchmarks(
        &self,
        _sector: &str,
        _activity: Option<&str>,
    ) -> Result<BTreeMap<String, PercentileBenchmark>, CollaboratorError> {
        Ok(self.benchmarks.clone())
    }

    async fn macro_indicators(&self) -> Result<serde_json::Value, CollaboratorError> {
        Ok(json!({"cpi": 3.1}))
    }
}

struct StaticAi {
    cost: Decimal,
    recommendations: Vec<String>,
}

#[async_trait]
impl AiAgents for StaticAi {
    async fn enrich(&self, _run: &AnalysisRun) -> Result<AiEnrichment, CollaboratorError> {
        Ok(AiEnrichment {
            insights: Some("Liquidity is comfortable.".to_string()),
            recommendations: self.recommendations.clone(),
            cost: self.cost,
            ..AiEnrichment::default()
        })
    }
}

#[derive(Default)]
struct MemoryRepo {
    config: Option<AnalysisConfig>,
    saves: Mutex<Vec<AnalysisRun>>,
}

#[async_trait]
impl RunRepository for MemoryRepo {
    async fn load_config(
        &self,
        _run_id: Uuid,
    ) -> Result<Option<AnalysisConfig>, CollaboratorError> {
        Ok(self.config.clone())
    }

    async fn save(&self, run: &AnalysisRun) -> Result<(), CollaboratorError> {
        self.saves.lock().unwrap().push(run.clone());
        Ok(())
    }
}

fn run_config(run_id: Uuid, names: &[&str]) -> AnalysisConfig {
    AnalysisConfig {
        run_id,
        selections: names
            .iter()
            .map(|n| AnalysisTypeSelection::named(*n))
            .collect(),
        document_ref: "statements-2025.pdf".to_string(),
        symbol: Some("ACME".to_string()),
        sector: Some("manufacturing".to_string()),
        activity: None,
    }
}

fn sample_document() -> ProcessedDocument {
    ProcessedDocument {
        extracted_fields: [
            ("current assets", json!(100000.0)),
            ("current liabilities", json!(50000.0)),
            ("total debt", json!(50000.0)),
            ("total equity", json!(100000.0)),
            ("revenue", json!(150000.0)),
            ("net income", json!(20000.0)),
            ("cost of goods sold", json!(90000.0)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
        tables: Vec::new(),
        confidence: 0.95,
    }
}

fn pipeline(
    config: Config,
    docs: Arc<dyn DocumentProcessor>,
    external: Arc<dyn ExternalDataService>,
    ai: Arc<dyn AiAgents>,
    repo: Arc<MemoryRepo>,
) -> AnalysisPipeline {
    AnalysisPipeline::new(config, docs, external, ai, repo).unwrap()
}

#[tokio::test]
async fn full_run_computes_classifies_and_benchmarks() {
    let run_id = Uuid::new_v4();
    let repo = Arc::new(MemoryRepo {
        config: Some(run_config(
            run_id,
            &["Current Ratio", "Debt-to-Equity Ratio", "Return on Equity"],
        )),
        saves: Mutex::new(Vec::new()),
    });
    let external = Arc::new(StaticExternal {
        benchmarks: [(
            "Current Ratio".to_string(),
            PercentileBenchmark {
                p25: 1.2,
                p50: 2.0,
                p75: 2.8,
            },
        )]
        .into_iter()
        .collect(),
    });
    let ai = Arc::new(StaticAi {
        cost: dec!(0.42),
        recommendations: vec!["Maintain the current debt mix".to_string()],
    });
    let pipeline = pipeline(
        Config::default(),
        Arc::new(StaticDocs(sample_document())),
        external,
        ai,
        Arc::clone(&repo),
    );

    let run = pipeline.run(run_id, &CancelHandle::new()).await.unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert!(run.errors.is_empty());

    let batch = run.calculations.as_ref().unwrap();
    let current = &batch.results["Current Ratio"];
    assert_eq!(current.value, Some(2.0));
    assert_eq!(current.interpretation, "good");
    let leverage = &batch.results["Debt-to-Equity Ratio"];
    assert_eq!(leverage.value, Some(0.5));
    assert_eq!(leverage.interpretation, "moderate");
    let roe = &batch.results["Return on Equity"];
    assert_eq!(roe.value, Some(20.0));
    assert_eq!(roe.interpretation, "excellent");

    // Derived field flows from normalization into the persisted record.
    let record = run.financial_data.as_ref().unwrap();
    assert_eq!(record.get("working_capital"), Some(50000.0));
    assert_eq!(record.get("gross_profit"), Some(60000.0));

    // 2.0 against a 2.0 median sits inside the tolerance band.
    let benchmark = run.benchmark.as_ref().unwrap();
    assert_eq!(benchmark["Current Ratio"].performance, "average");

    assert_eq!(run.cost, dec!(0.42));
    let recs = run.recommendations.as_ref().unwrap();
    assert_eq!(recs.ai_recommendations, vec!["Maintain the current debt mix"]);

    // Initial Processing snapshot plus the final Completed snapshot.
    let saves = repo.saves.lock().unwrap();
    assert_eq!(saves.first().unwrap().status, RunStatus::Processing);
    assert_eq!(saves.last().unwrap().status, RunStatus::Completed);
}

#[tokio::test]
async fn document_failure_degrades_but_run_completes() {
    let run_id = Uuid::new_v4();
    let repo = Arc::new(MemoryRepo {
        config: Some(run_config(run_id, &["Current Ratio"])),
        saves: Mutex::new(Vec::new()),
    });
    let pipeline = pipeline(
        Config::default(),
        Arc::new(FailingDocs),
        Arc::new(StaticExternal::default()),
        Arc::new(StaticAi {
            cost: Decimal::ZERO,
            recommendations: Vec::new(),
        }),
        repo,
    );

    let run = pipeline.run(run_id, &CancelHandle::new()).await.unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert!(run
        .errors
        .iter()
        .any(|e| e.starts_with("document_processing: ")));

    // No data means insufficient results, not missing ones.
    let batch = run.calculations.as_ref().unwrap();
    let current = &batch.results["Current Ratio"];
    assert_eq!(current.value, None);
    assert_eq!(current.interpretation, "insufficient_data");
}

#[tokio::test]
async fn cancellation_short_circuits_between_stages() {
    let run_id = Uuid::new_v4();
    let repo = Arc::new(MemoryRepo {
        config: Some(run_config(run_id, &["Current Ratio"])),
        saves: Mutex::new(Vec::new()),
    });
    let pipeline = pipeline(
        Config::default(),
        Arc::new(StaticDocs(sample_document())),
        Arc::new(StaticExternal::default()),
        Arc::new(StaticAi {
            cost: Decimal::ZERO,
            recommendations: Vec::new(),
        }),
        Arc::clone(&repo),
    );

    let cancel = CancelHandle::new();
    cancel.cancel();
    let run = pipeline.run(run_id, &cancel).await.unwrap();

    assert_eq!(run.status, RunStatus::Cancelled);
    assert_eq!(run.cancel_reason.as_deref(), Some("cancellation requested"));
    // Nothing past the first guard ran.
    assert!(run.document.is_none());
    assert!(run.calculations.is_none());
    assert_eq!(
        repo.saves.lock().unwrap().last().unwrap().status,
        RunStatus::Cancelled
    );
}

#[tokio::test]
async fn cost_ceiling_breach_is_recorded() {
    let run_id = Uuid::new_v4();
    let repo = Arc::new(MemoryRepo {
        config: Some(run_config(run_id, &["Current Ratio"])),
        saves: Mutex::new(Vec::new()),
    });
    let mut config = Config::default();
    config.enrichment.cost_ceiling_usd = dec!(0.10);
    let pipeline = pipeline(
        config,
        Arc::new(StaticDocs(sample_document())),
        Arc::new(StaticExternal::default()),
        Arc::new(StaticAi {
            cost: dec!(0.25),
            recommendations: Vec::new(),
        }),
        repo,
    );

    let run = pipeline.run(run_id, &CancelHandle::new()).await.unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.cost, dec!(0.25));
    assert!(run.errors.iter().any(|e| e.starts_with("ai_enrichment: ")));
    // The produced enrichment is still kept; only the overage is flagged.
    assert!(run.ai.is_some());
}

#[tokio::test]
async fn missing_configuration_is_fatal() {
    let repo = Arc::new(MemoryRepo::default());
    let pipeline = pipeline(
        Config::default(),
        Arc::new(FailingDocs),
        Arc::new(StaticExternal::default()),
        Arc::new(StaticAi {
            cost: Decimal::ZERO,
            recommendations: Vec::new(),
        }),
        Arc::clone(&repo),
    );

    let err = pipeline
        .run(Uuid::new_v4(), &CancelHandle::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::ConfigNotFound(_)));

    // The failure is not just returned; an Error snapshot is persisted so the
    // run is observable in its terminal state.
    let saves = repo.saves.lock().unwrap();
    let snapshot = saves.last().unwrap();
    assert_eq!(snapshot.status, RunStatus::Error);
    assert!(snapshot
        .error_message
        .as_deref()
        .unwrap()
        .contains("No analysis configuration found"));
    assert!(snapshot.error_at.is_some());
}
