//! @ai:module:intent Execution mode and per-operation result record
//! @ai:module:layer domain
//! @ai:module:public_api Mode, OperationResult, ModePair
//! @ai:module:stateless true

use crate::error::Failure;
use crate::scenario::Category;
use crate::tokens::TokenCount;
use serde::{Deserialize, Serialize};

/// @ai:intent Execution mode of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Semantic,
    Naive,
}

impl Mode {
    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Semantic => "semantic",
            Mode::Naive => "naive",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Outcome of running one scenario in one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub scenario_id: String,
    pub category: Category,
    pub mode: Mode,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: f64,
    pub memory_delta_bytes: u64,
    pub output: String,
    /// Symbols or matching lines returned
    pub hits: usize,
    /// Ground-truth defects detected
    pub detected: usize,
    /// Ground-truth defects expected
    pub expected: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl OperationResult {
    /// @ai:intent Convert an explicit failure into a failed result with zero detections
    /// @ai:post success is false and error holds the failure message
    /// @ai:effects pure
    pub fn from_failure(
        failure: &Failure,
        category: Category,
        expected: usize,
        tokens: TokenCount,
    ) -> Self {
        Self {
            scenario_id: failure.scenario_id.clone(),
            category,
            mode: failure.mode,
            success: false,
            error: Some(failure.message.clone()),
            elapsed_ms: failure.elapsed_ms,
            memory_delta_bytes: 0,
            output: String::new(),
            hits: 0,
            detected: 0,
            expected,
            input_tokens: tokens.input,
            output_tokens: tokens.output,
            total_tokens: tokens.total,
        }
    }

    /// @ai:intent Percentage of expected defects detected
    /// @ai:post 0 when nothing is expected, never divides by zero
    /// @ai:effects pure
    pub fn detection_rate(&self) -> f64 {
        self.detected as f64 / self.expected.max(1) as f64 * 100.0
    }

    /// @ai:intent Token usage as a TokenCount
    /// @ai:effects pure
    pub fn tokens(&self) -> TokenCount {
        TokenCount {
            input: self.input_tokens,
            output: self.output_tokens,
            total: self.total_tokens,
        }
    }
}

/// @ai:intent Results of both modes for one scenario; naive is None when skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModePair {
    pub semantic: OperationResult,
    pub naive: Option<OperationResult>,
}

impl ModePair {
    /// @ai:intent Iterate over the results present
    /// @ai:effects pure
    pub fn results(&self) -> impl Iterator<Item = &OperationResult> {
        std::iter::once(&self.semantic).chain(self.naive.as_ref())
    }
}
