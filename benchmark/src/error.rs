//! @ai:module:intent Error taxonomy for fixtures, service calls and aggregation
//! @ai:module:layer domain
//! @ai:module:public_api FixtureError, ServiceError, AggregationError, Failure
//! @ai:module:stateless true

use crate::runner::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// @ai:intent Errors raised while preparing a scenario workspace
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("workspace {path} already exists with different content ({file})")]
    Collision { path: PathBuf, file: String },

    #[error("duplicate fixture file {file} in scenario {scenario}")]
    DuplicateFile { scenario: String, file: String },

    #[error("fixture file {file} not found in {path}")]
    MissingFile { path: PathBuf, file: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FixtureError {
    /// @ai:intent Wrap an io::Error with the path it concerns
    /// @ai:effects pure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixtureError::Io {
            path: path.into(),
            source,
        }
    }
}

/// @ai:intent Errors raised by the external semantic service boundary
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("semantic service unavailable: {0}")]
    Unavailable(String),

    #[error("semantic service failed: {0}")]
    Backend(String),

    #[error("malformed service payload: {0}")]
    Malformed(String),

    #[error("semantic service timed out after {0:?}")]
    Timeout(Duration),

    #[error("answer too long ({len} chars, limit {max})")]
    AnswerTooLong { len: usize, max: usize },
}

impl From<tfsym::Error> for ServiceError {
    fn from(err: tfsym::Error) -> Self {
        match err {
            tfsym::Error::AnswerTooLong { len, max } => ServiceError::AnswerTooLong { len, max },
            other => ServiceError::Backend(other.to_string()),
        }
    }
}

/// @ai:intent Structural errors while pairing per-mode results; these abort the run
#[derive(Debug, Error, PartialEq)]
pub enum AggregationError {
    #[error("scenario mismatch: semantic result for {semantic}, naive result for {naive}")]
    ScenarioMismatch { semantic: String, naive: String },

    #[error("mode mismatch for scenario {scenario}: expected {expected}, got {actual}")]
    ModeMismatch {
        scenario: String,
        expected: Mode,
        actual: Mode,
    },
}

/// @ai:intent Where in the pipeline a scenario failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Fixture,
    Service,
    Io,
}

impl FailureStage {
    /// @ai:intent Convert stage to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Fixture => "fixture",
            FailureStage::Service => "service",
            FailureStage::Io => "io",
        }
    }
}

/// @ai:intent Explicit failure value of one (scenario, mode) execution
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("{mode} run of {scenario_id} failed at {}: {message}", .stage.as_str())]
pub struct Failure {
    pub scenario_id: String,
    pub mode: Mode,
    pub stage: FailureStage,
    pub message: String,
    pub elapsed_ms: f64,
}

impl Failure {
    /// @ai:intent Build a failure from any displayable error
    /// @ai:effects pure
    pub fn new(
        scenario_id: &str,
        mode: Mode,
        stage: FailureStage,
        err: impl std::fmt::Display,
    ) -> Self {
        Self {
            scenario_id: scenario_id.to_string(),
            mode,
            stage,
            message: err.to_string(),
            elapsed_ms: 0.0,
        }
    }

    /// @ai:intent Attach the time spent before the failure
    pub fn with_elapsed(mut self, elapsed_ms: f64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tfsym_answer_too_long_maps_through() {
        let err: ServiceError = tfsym::Error::AnswerTooLong { len: 50, max: 10 }.into();
        assert!(matches!(err, ServiceError::AnswerTooLong { len: 50, max: 10 }));
    }

    #[test]
    fn test_failure_message() {
        let failure = Failure::new(
            "defect-dangling-subnet",
            Mode::Semantic,
            FailureStage::Service,
            ServiceError::Unavailable("backend offline".to_string()),
        );
        assert_eq!(
            failure.to_string(),
            "semantic run of defect-dangling-subnet failed at service: semantic service unavailable: backend offline"
        );
    }
}
