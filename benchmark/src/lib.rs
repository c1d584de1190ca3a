//! @ai:module:intent Semantic vs naive Terraform analysis benchmark library
//! @ai:module:layer application
//! @ai:module:public_api claims, config, error, metrics, report, runner, scenario, service, tokens, workspace

pub mod claims;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod service;
pub mod tokens;
pub mod workspace;

pub use claims::{default_claims, ClaimThreshold, ClaimsValidator, ClaimsValidatorTrait, Verdict, VerdictState};
pub use config::BenchmarkConfig;
pub use error::{AggregationError, Failure, FailureStage, FixtureError, ServiceError};
pub use metrics::{BenchmarkResults, ComparisonRecord, MetricsAggregator, MetricsAggregatorTrait, Summary};
pub use report::ReportGenerator;
pub use runner::{DualModeExecutor, Mode, ModePair, OperationResult};
pub use scenario::{Category, Scenario, ScenarioCatalog, ScenarioCatalogTrait};
pub use service::{LocalSymbolService, MockSemanticService, ProcessSymbolService, SemanticService};
pub use tokens::{TokenCount, TokenEstimator, TokenEstimatorTrait};
pub use workspace::{FixtureMaterializer, FixtureMaterializerTrait, OwnedWorkspace};
