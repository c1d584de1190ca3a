//! @ai:module:intent Comparative metric types for benchmark results
//! @ai:module:layer domain
//! @ai:module:public_api ComparisonRecord, ModeStats, Summary, CostAnalysis, FailedOperation, ScenarioHighlight, BenchmarkResults
//! @ai:module:stateless true

use crate::claims::Verdict;
use crate::runner::{Mode, OperationResult};
use crate::scenario::Category;
use serde::{Deserialize, Serialize};

/// @ai:intent Semantic and naive results of one scenario with derived comparisons
/// Comparison fields are None when the naive mode was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub scenario_id: String,
    pub category: Category,
    pub semantic: OperationResult,
    pub naive: Option<OperationResult>,
    pub token_savings: Option<i64>,
    pub efficiency_improvement: Option<f64>,
    pub context_reduction: Option<f64>,
    pub semantic_detection_rate: f64,
    pub naive_detection_rate: Option<f64>,
    pub detection_ratio: Option<f64>,
}

impl ComparisonRecord {
    /// @ai:intent Results present in this record
    /// @ai:effects pure
    pub fn results(&self) -> impl Iterator<Item = &OperationResult> {
        std::iter::once(&self.semantic).chain(self.naive.as_ref())
    }
}

/// @ai:intent Aggregate statistics of one mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeStats {
    pub runs: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub detected: usize,
    pub expected: usize,
    pub detection_rate: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_tokens: u64,
    pub mean_elapsed_ms: f64,
    pub peak_memory_delta_bytes: u64,
}

/// @ai:intent Scenario singled out by efficiency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHighlight {
    pub scenario_id: String,
    pub efficiency_improvement: f64,
}

/// @ai:intent A (scenario, mode) execution that failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedOperation {
    pub scenario_id: String,
    pub mode: Mode,
    pub error: String,
}

/// @ai:intent Dollar cost of both modes under the configured pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub semantic_cost: f64,
    pub naive_cost: Option<f64>,
    pub savings: Option<f64>,
    pub cost_efficiency: Option<f64>,
}

/// @ai:intent Run-level summary across every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub scenario_count: usize,
    pub semantic: ModeStats,
    pub naive: Option<ModeStats>,
    pub total_token_savings: Option<i64>,
    pub overall_efficiency: Option<f64>,
    pub mean_efficiency_improvement: Option<f64>,
    pub mean_context_reduction: Option<f64>,
    pub detection_ratio: Option<f64>,
    pub best_scenario: Option<ScenarioHighlight>,
    pub worst_scenario: Option<ScenarioHighlight>,
    pub failures: Vec<FailedOperation>,
    pub partial_data: bool,
}

/// @ai:intent Complete results of a benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub timestamp: String,
    pub service: String,
    pub skip_naive: bool,
    pub records: Vec<ComparisonRecord>,
    pub summary: Summary,
    pub cost: CostAnalysis,
    pub verdicts: Vec<Verdict>,
}
