use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use core_types::{
    AiEnrichment, AnalysisConfig, AnalysisRun, AnalysisTypeSelection, PercentileBenchmark,
    ProcessedDocument,
};
use dispatcher::MetricId;
use engine::{
    AiAgents, AnalysisPipeline, CancelHandle, CollaboratorError, DocumentProcessor,
    ExternalDataService, RunRepository,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The main entry point for the Finsight analysis application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let config = configuration::load_config().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, config).await,
        Commands::Metrics => handle_metrics(),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Financial statement analysis: metric calculation, classification,
/// benchmarking and recommendations.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis pipeline over an extracted-fields JSON document.
    Analyze(AnalyzeArgs),
    /// List every metric the registry can calculate.
    Metrics,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to a JSON object of extracted statement fields.
    #[arg(long)]
    input: PathBuf,

    /// Metric names to calculate (repeatable). Defaults to the full registry.
    #[arg(long = "select")]
    selections: Vec<String>,

    /// Optional path to a JSON map of sector benchmarks
    /// (metric name to {"p25": .., "p50": .., "p75": ..}).
    #[arg(long)]
    benchmarks: Option<PathBuf>,

    /// Ticker symbol for market-data enrichment.
    #[arg(long)]
    symbol: Option<String>,

    /// Sector used for benchmark lookups.
    #[arg(long)]
    sector: Option<String>,

    /// Activity within the sector.
    #[arg(long)]
    activity: Option<String>,

    /// Where to write the full run snapshot as JSON.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Offline collaborator implementations
// ==============================================================================

/// Reads the "document" from a local JSON file of extracted fields.
struct FileDocumentProcessor;

#[async_trait]
impl DocumentProcessor for FileDocumentProcessor {
    async fn process(&self, document_ref: &str) -> Result<ProcessedDocument, CollaboratorError> {
        let text = tokio::fs::read_to_string(document_ref)
            .await
            .map_err(|e| CollaboratorError::Unavailable(format!("{}: {}", document_ref, e)))?;
        let extracted_fields: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&text).map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
        Ok(ProcessedDocument {
            extracted_fields,
            tables: Vec::new(),
            confidence: 1.0,
        })
    }
}

/// File-backed stand-in for the external data service. Benchmarks come from a
/// local JSON file when one was given; market and macro data are not
/// available offline and degrade to recorded errors.
struct OfflineDataService {
    benchmarks: Option<BTreeMap<String, PercentileBenchmark>>,
}

#[async_trait]
impl ExternalDataService for OfflineDataService {
    async fn market_data(&self, symbol: &str) -> Result<serde_json::Value, CollaboratorError> {
        Err(CollaboratorError::Unavailable(format!(
            "no market data source configured for {}",
            symbol
        )))
    }

    async fn sector_benchmarks(
        &self,
        sector: &str,
        _activity: Option<&str>,
    ) -> Result<BTreeMap<String, PercentileBenchmark>, CollaboratorError> {
        self.benchmarks.clone().ok_or_else(|| {
            CollaboratorError::Unavailable(format!("no benchmark file given for {}", sector))
        })
    }

    async fn macro_indicators(&self) -> Result<serde_json::Value, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "no macro indicator source configured".to_string(),
        ))
    }
}

/// Stub AI agents for offline runs: no narrative, no cost.
struct StubAiAgents;

#[async_trait]
impl AiAgents for StubAiAgents {
    async fn enrich(&self, _run: &AnalysisRun) -> Result<AiEnrichment, CollaboratorError> {
        Ok(AiEnrichment::default())
    }
}

/// Holds the run configuration and the latest persisted snapshot in memory.
struct InMemoryRepository {
    config: AnalysisConfig,
    snapshot: Mutex<Option<AnalysisRun>>,
}

#[async_trait]
impl RunRepository for InMemoryRepository {
    async fn load_config(&self, run_id: Uuid) -> Result<Option<AnalysisConfig>, CollaboratorError> {
        Ok((self.config.run_id == run_id).then(|| self.config.clone()))
    }

    async fn save(&self, run: &AnalysisRun) -> Result<(), CollaboratorError> {
        *self
            .snapshot
            .lock()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))? = Some(run.clone());
        Ok(())
    }
}

// ==============================================================================
// Command handlers
// ==============================================================================

async fn handle_analyze(args: AnalyzeArgs, config: configuration::Config) -> anyhow::Result<()> {
    let selections: Vec<AnalysisTypeSelection> = if args.selections.is_empty() {
        MetricId::ALL
            .iter()
            .map(|id| AnalysisTypeSelection::named(id.name()))
            .collect()
    } else {
        args.selections
            .iter()
            .map(|name| AnalysisTypeSelection::named(name.clone()))
            .collect()
    };

    let benchmarks = match &args.benchmarks {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read benchmark file {}", path.display()))?;
            Some(serde_json::from_str(&text).context("Malformed benchmark file")?)
        }
        None => None,
    };

    let run_id = Uuid::new_v4();
    let run_config = AnalysisConfig {
        run_id,
        selections,
        document_ref: args.input.display().to_string(),
        symbol: args.symbol,
        // Benchmarks are only fetched when a sector is set.
        sector: args
            .sector
            .or_else(|| benchmarks.is_some().then(|| "unspecified".to_string())),
        activity: args.activity,
    };

    let repository = Arc::new(InMemoryRepository {
        config: run_config,
        snapshot: Mutex::new(None),
    });
    let pipeline = AnalysisPipeline::new(
        config,
        Arc::new(FileDocumentProcessor),
        Arc::new(OfflineDataService { benchmarks }),
        Arc::new(StubAiAgents),
        Arc::clone(&repository) as Arc<dyn RunRepository>,
    )?;

    let run = pipeline.run(run_id, &CancelHandle::new()).await?;
    print_run(&run);

    if let Some(path) = args.output {
        let snapshot = serde_json::to_string_pretty(&run)?;
        std::fs::write(&path, snapshot)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        println!("\nSnapshot written to {}", path.display());
    }

    Ok(())
}

fn handle_metrics() -> anyhow::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Category"]);
    for id in MetricId::ALL {
        table.add_row(vec![Cell::new(id.name()), Cell::new(id.category())]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Terminal rendering
// ==============================================================================

fn print_run(run: &AnalysisRun) {
    println!("Run {}  status: {:?}", run.run_id, run.status);

    if let Some(summary) = &run.summary {
        for (category, category_summary) in summary {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec![
                Cell::new(format!("{} ({})", category, category_summary.representative)),
                Cell::new("Value"),
                Cell::new("Interpretation"),
            ]);
            for metric in &category_summary.metrics {
                let value = metric
                    .value
                    .map(|v| format!("{v}"))
                    .unwrap_or_else(|| "-".to_string());
                table.add_row(vec![
                    Cell::new(&metric.name),
                    Cell::new(value),
                    Cell::new(&metric.interpretation),
                ]);
            }
            println!("{table}");
        }
    }

    if let Some(benchmark) = &run.benchmark {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Metric", "Value", "Sector median", "Performance"]);
        for (name, entry) in benchmark {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(
                    entry
                        .value
                        .map(|v| format!("{v}"))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(
                    entry
                        .benchmark
                        .map(|b| format!("{}", b.p50))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(&entry.performance),
            ]);
        }
        println!("{table}");
    }

    if let Some(recommendations) = &run.recommendations {
        for area in &recommendations.priority_areas {
            println!("Priority area: {area}");
        }
        for item in &recommendations.action_items {
            println!("Action item: {item}");
        }
        for rec in &recommendations.ai_recommendations {
            println!("Recommendation: {rec}");
        }
    }

    if !run.errors.is_empty() {
        println!("\nDegraded components:");
        for error in &run.errors {
            println!("  - {error}");
        }
    }

    println!(
        "\nCalculated {} metrics ({} failures) in {} ms, cost {} USD",
        run.calculations
            .as_ref()
            .map(|b| b.total_calculated)
            .unwrap_or(0),
        run.calculations
            .as_ref()
            .map(|b| b.total_errors)
            .unwrap_or(0),
        run.processing_time_ms,
        run.cost
    );
}
