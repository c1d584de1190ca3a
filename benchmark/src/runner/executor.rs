//! @ai:module:intent Run scenarios in semantic and naive mode and capture metrics
//! @ai:module:layer application
//! @ai:module:public_api DualModeExecutor, SemanticQuery
//! @ai:module:depends_on service, workspace, tokens, runner::probe, scenario
//! @ai:module:stateless false

use crate::config::BenchmarkConfig;
use crate::error::{Failure, FailureStage, FixtureError, ServiceError};
use crate::runner::probe::MemoryProbe;
use crate::runner::result::{Mode, ModePair, OperationResult};
use crate::scenario::{QueryKind, Scenario};
use crate::service::{parse_symbol_payload, PatternQuery, SemanticService};
use crate::tokens::{TokenEstimator, TokenEstimatorTrait};
use crate::workspace::{FixtureMaterializer, OwnedWorkspace};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tfsym::SymbolQuery;

/// Pattern payloads this short or shorter count as no match
const MIN_PATTERN_PAYLOAD_CHARS: usize = 10;

/// @ai:intent One query sent to the semantic service
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticQuery {
    Symbol(SymbolQuery),
    Pattern(PatternQuery),
}

impl SemanticQuery {
    /// @ai:intent Parameter summary included in the input context
    /// @ai:effects pure
    fn describe(&self) -> String {
        match self {
            SemanticQuery::Symbol(q) => format!(
                "name_path={} substring_matching={} include_body={}",
                q.name_path, q.substring_matching, q.include_body
            ),
            SemanticQuery::Pattern(q) => format!(
                "pattern={} file_glob={}",
                q.pattern,
                q.file_glob.as_deref().unwrap_or(tfsym::DEFAULT_FILE_GLOB)
            ),
        }
    }
}

/// @ai:intent Answer of one semantic query after boundary validation
struct QueryAnswer {
    payload: String,
    hits: usize,
    detected: bool,
}

/// @ai:intent Executes scenarios against a semantic service and against raw files
pub struct DualModeExecutor<S: SemanticService> {
    service: Arc<S>,
    estimator: TokenEstimator,
    materializer: FixtureMaterializer,
    probe: MemoryProbe,
    timeout: Duration,
    max_answer_chars: usize,
    skip_naive: bool,
    workspace_root: Option<PathBuf>,
}

impl<S: SemanticService> DualModeExecutor<S> {
    /// @ai:intent Create an executor with a 30s operation timeout and both modes enabled
    /// @ai:effects pure
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            estimator: TokenEstimator::new(),
            materializer: FixtureMaterializer::new(),
            probe: MemoryProbe::new(),
            timeout: Duration::from_secs(30),
            max_answer_chars: 0,
            skip_naive: false,
            workspace_root: None,
        }
    }

    /// @ai:intent Create an executor from the run, service and path configuration
    /// @ai:effects pure
    pub fn from_config(service: Arc<S>, config: &BenchmarkConfig) -> Self {
        Self::new(service)
            .with_timeout(config.run.operation_timeout())
            .with_max_answer_chars(config.service.max_answer_chars)
            .with_skip_naive(config.run.skip_naive)
            .with_workspace_root(config.paths.workspace_root.clone())
    }

    /// @ai:intent Set the per-operation timeout of semantic calls
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// @ai:intent Set the answer size limit of symbol queries
    pub fn with_max_answer_chars(mut self, max: usize) -> Self {
        self.max_answer_chars = max;
        self
    }

    /// @ai:intent Run only the semantic mode
    pub fn with_skip_naive(mut self, skip: bool) -> Self {
        self.skip_naive = skip;
        self
    }

    /// @ai:intent Create workspaces under root instead of the system temp dir
    pub fn with_workspace_root(mut self, root: Option<PathBuf>) -> Self {
        self.workspace_root = root;
        self
    }

    /// @ai:intent Queries issued in semantic mode: one per defect marker, or the lookup
    /// @ai:effects pure
    pub fn semantic_queries(&self, scenario: &Scenario) -> Vec<SemanticQuery> {
        let needles: Vec<&str> = if scenario.defects.is_empty() {
            scenario.lookup.as_deref().into_iter().collect()
        } else {
            scenario.defects.iter().map(|d| d.needle.as_str()).collect()
        };

        needles
            .into_iter()
            .map(|needle| match scenario.category.query_kind() {
                QueryKind::Pattern => SemanticQuery::Pattern(PatternQuery::new(needle)),
                QueryKind::Symbol => SemanticQuery::Symbol(
                    SymbolQuery::new(needle)
                        .substring()
                        .with_max_answer_chars(self.max_answer_chars),
                ),
            })
            .collect()
    }

    /// @ai:intent Send one query with the operation timeout and validate the answer
    /// @ai:effects io
    async fn query(&self, root: &Path, query: &SemanticQuery) -> Result<QueryAnswer, ServiceError> {
        let call = async {
            match query {
                SemanticQuery::Symbol(q) => self.service.find_symbol(root, q).await,
                SemanticQuery::Pattern(q) => self.service.search_pattern(root, q).await,
            }
        };

        let payload = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout))??;

        let answer = match query {
            SemanticQuery::Symbol(_) => {
                let hits = parse_symbol_payload(&payload)?.len();
                QueryAnswer {
                    payload,
                    hits,
                    detected: hits > 0,
                }
            }
            SemanticQuery::Pattern(_) => {
                let hits = payload.lines().filter(|l| !l.trim().is_empty()).count();
                let detected = payload.trim().len() > MIN_PATTERN_PAYLOAD_CHARS;
                QueryAnswer {
                    payload,
                    hits,
                    detected,
                }
            }
        };

        tracing::debug!(
            "{} -> {} hit(s), detected={}",
            query.describe(),
            answer.hits,
            answer.detected
        );

        Ok(answer)
    }

    /// @ai:intent Run a scenario in semantic mode against a materialized workspace
    /// @ai:effects io
    async fn run_semantic(
        &self,
        scenario: &Scenario,
        workspace: &Path,
    ) -> Result<OperationResult, Failure> {
        let queries = self.semantic_queries(scenario);

        let before = self.probe.resident_bytes();
        let start = Instant::now();

        let mut answers = Vec::with_capacity(queries.len());
        for query in &queries {
            match self.query(workspace, query).await {
                Ok(answer) => answers.push(answer),
                Err(e) => {
                    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                    return Err(Failure::new(&scenario.id, Mode::Semantic, FailureStage::Service, e)
                        .with_elapsed(elapsed_ms));
                }
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let after = self.probe.resident_bytes();

        let parameters: Vec<String> = queries.iter().map(SemanticQuery::describe).collect();
        let input = format!(
            "Task: {}\nUsing LSP semantic search\nParameters: {}",
            scenario.description,
            parameters.join("; ")
        );
        let output = answers
            .iter()
            .map(|a| a.payload.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let detected = if scenario.defects.is_empty() {
            0
        } else {
            answers.iter().filter(|a| a.detected).count()
        };

        Ok(self.build_result(
            scenario,
            Mode::Semantic,
            elapsed_ms,
            MemoryProbe::delta(before, after),
            &input,
            output,
            answers.iter().map(|a| a.hits).sum(),
            detected,
        ))
    }

    /// @ai:intent Run a scenario in naive mode: read whole files and scan text
    /// @ai:effects fs:read
    async fn run_naive(&self, scenario: &Scenario, workspace: &Path) -> Result<OperationResult, Failure> {
        let before = self.probe.resident_bytes();
        let start = Instant::now();

        let mut files = Vec::with_capacity(scenario.naive_files.len());
        for name in &scenario.naive_files {
            let path = workspace.join(name);
            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                let failure = if e.kind() == std::io::ErrorKind::NotFound {
                    let missing = FixtureError::MissingFile {
                        path: workspace.to_path_buf(),
                        file: name.clone(),
                    };
                    Failure::new(&scenario.id, Mode::Naive, FailureStage::Fixture, missing)
                } else {
                    Failure::new(
                        &scenario.id,
                        Mode::Naive,
                        FailureStage::Io,
                        format!("failed to read {}: {}", path.display(), e),
                    )
                };
                failure.with_elapsed(start.elapsed().as_secs_f64() * 1000.0)
            })?;
            files.push((name.as_str(), content));
        }

        let mut lines = Vec::new();
        let mut detected = 0;

        if scenario.defects.is_empty() {
            if let Some(lookup) = &scenario.lookup {
                lines.extend(matching_lines(&files, lookup));
            }
        } else {
            for defect in &scenario.defects {
                let Some(marker) = &defect.marker else {
                    continue;
                };
                let found = matching_lines(&files, marker);
                if !found.is_empty() {
                    detected += 1;
                }
                lines.extend(found);
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let after = self.probe.resident_bytes();

        let mut input = format!(
            "Task: {}\nReading entire files for context\nFiles: {:?}\n\n",
            scenario.description, scenario.naive_files
        );
        for (name, content) in &files {
            input.push_str(&format!("\n# File: {}\n{}\n", name, content));
        }

        let hits = lines.len();
        Ok(self.build_result(
            scenario,
            Mode::Naive,
            elapsed_ms,
            MemoryProbe::delta(before, after),
            &input,
            lines.join("\n"),
            hits,
            detected,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_result(
        &self,
        scenario: &Scenario,
        mode: Mode,
        elapsed_ms: f64,
        memory_delta_bytes: u64,
        input: &str,
        output: String,
        hits: usize,
        detected: usize,
    ) -> OperationResult {
        let tokens = self.estimator.count_operation(input, &output);
        OperationResult {
            scenario_id: scenario.id.clone(),
            category: scenario.category,
            mode,
            success: true,
            error: None,
            elapsed_ms,
            memory_delta_bytes,
            output,
            hits,
            detected,
            expected: scenario.expected_defects(),
            input_tokens: tokens.input,
            output_tokens: tokens.output,
            total_tokens: tokens.total,
        }
    }

    /// @ai:intent Run one scenario in one mode against an existing workspace
    /// @ai:pre the scenario's fixtures are materialized under workspace
    /// @ai:post Err carries the stage and message of the failure
    /// @ai:effects io
    pub async fn run(
        &self,
        scenario: &Scenario,
        workspace: &Path,
        mode: Mode,
    ) -> Result<OperationResult, Failure> {
        match mode {
            Mode::Semantic => self.run_semantic(scenario, workspace).await,
            Mode::Naive => self.run_naive(scenario, workspace).await,
        }
    }

    /// @ai:intent Convert a failure into a failed result, with failure-sized token usage
    /// @ai:effects pure
    pub fn failed_result(&self, scenario: &Scenario, failure: &Failure) -> OperationResult {
        tracing::warn!("{}", failure);
        let tokens = self.estimator.count_operation(
            &format!("Task: {}\nFailed operation", scenario.description),
            &format!("Error: {}", failure.message),
        );
        OperationResult::from_failure(failure, scenario.category, scenario.expected_defects(), tokens)
    }

    /// @ai:intent Materialize a scenario and run every enabled mode on it
    /// @ai:post never fails; failures become failed results
    /// @ai:post the workspace is deleted before returning
    /// @ai:effects fs:write, io
    pub async fn run_scenario(&self, scenario: &Scenario) -> ModePair {
        let workspace = match OwnedWorkspace::acquire(
            scenario,
            self.workspace_root.as_deref(),
            &self.materializer,
        ) {
            Ok(workspace) => workspace,
            Err(e) => {
                let fail = |mode: Mode| {
                    let failure = Failure::new(&scenario.id, mode, FailureStage::Fixture, &e);
                    self.failed_result(scenario, &failure)
                };
                return ModePair {
                    semantic: fail(Mode::Semantic),
                    naive: (!self.skip_naive).then(|| fail(Mode::Naive)),
                };
            }
        };

        let semantic = match self.run(scenario, workspace.path(), Mode::Semantic).await {
            Ok(result) => result,
            Err(failure) => self.failed_result(scenario, &failure),
        };

        let naive = if self.skip_naive {
            None
        } else {
            Some(match self.run(scenario, workspace.path(), Mode::Naive).await {
                Ok(result) => result,
                Err(failure) => self.failed_result(scenario, &failure),
            })
        };

        if let Err(e) = workspace.close() {
            tracing::warn!("Failed to remove workspace for {}: {}", scenario.id, e);
        }

        ModePair { semantic, naive }
    }

    /// @ai:intent Run every scenario sequentially
    /// @ai:post one pair per scenario, in input order
    /// @ai:effects fs:write, io
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<ModePair> {
        let mut pairs = Vec::with_capacity(scenarios.len());

        for (i, scenario) in scenarios.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Running scenario: {}",
                i + 1,
                scenarios.len(),
                scenario.id
            );
            pairs.push(self.run_scenario(scenario).await);
        }

        pairs
    }
}

/// @ai:intent Lines containing needle, as `file:line: text`
/// @ai:effects pure
fn matching_lines(files: &[(&str, String)], needle: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|(name, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(needle))
                .map(move |(idx, line)| format!("{}:{}: {}", name, idx + 1, line.trim()))
        })
        .collect()
}
