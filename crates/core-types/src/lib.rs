pub mod error;
pub mod metric;
pub mod record;
pub mod run;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use metric::{CalculationBatch, CategoryMetric, CategorySummary, MetricCategory, MetricResult};
pub use record::{AnalysisTypeSelection, FinancialDataRecord};
pub use run::{
    AiEnrichment, AnalysisConfig, AnalysisRun, BenchmarkComparison, BenchmarkEntry, ChartSeries,
    ExternalEnrichment, PercentileBenchmark, ProcessedDocument, Recommendations, RunStatus,
};
