//! @ai:module:intent Comparison records and run-level aggregation
//! @ai:module:layer application
//! @ai:module:public_api ComparisonRecord, Summary, ModeStats, CostAnalysis, BenchmarkResults, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use types::{
    BenchmarkResults, ComparisonRecord, CostAnalysis, FailedOperation, ModeStats,
    ScenarioHighlight, Summary,
};
