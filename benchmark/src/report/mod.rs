//! @ai:module:intent Report generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::BenchmarkResults;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Write results.json and results.md, then charts
    /// @ai:post a chart failure is logged and does not fail the call
    /// @ai:effects fs:write
    pub fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        self.json.generate(results, &output_dir.join("results.json"))?;
        self.markdown
            .generate(results, &output_dir.join("results.md"))?;

        match self.charts.generate_all(results, output_dir) {
            Ok(charts) => tracing::info!("Generated {} chart(s)", charts.len()),
            Err(e) => tracing::warn!("Chart generation failed: {:#}", e),
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Three scenarios: an exploration lookup, a detected defect and a failed semantic run.
#[cfg(test)]
pub(crate) fn sample_results() -> BenchmarkResults {
    use crate::claims::{default_claims, ClaimsValidator};
    use crate::config::PricingConfig;
    use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait};
    use crate::runner::{Mode, ModePair, OperationResult};
    use crate::scenario::Category;

    let result = |id: &str, category: Category, mode: Mode, input: u64, output: u64, detected: usize, expected: usize| {
        OperationResult {
            scenario_id: id.to_string(),
            category,
            mode,
            success: true,
            error: None,
            elapsed_ms: 2.0,
            memory_delta_bytes: 4096,
            output: String::new(),
            hits: 1,
            detected,
            expected,
            input_tokens: input,
            output_tokens: output,
            total_tokens: input + output,
        }
    };

    let mut failed = result("defect-missing-cidr-block", Category::MissingArgument, Mode::Semantic, 10, 5, 0, 1);
    failed.success = false;
    failed.error = Some("semantic service unavailable: backend offline".to_string());

    let pairs = vec![
        ModePair {
            semantic: result("explore-vpc", Category::Exploration, Mode::Semantic, 30, 20, 0, 0),
            naive: Some(result("explore-vpc", Category::Exploration, Mode::Naive, 2000, 100, 0, 0)),
        },
        ModePair {
            semantic: result("defect-dangling-subnet", Category::DanglingReference, Mode::Semantic, 40, 30, 1, 1),
            naive: Some(result("defect-dangling-subnet", Category::DanglingReference, Mode::Naive, 200, 20, 1, 1)),
        },
        ModePair {
            semantic: failed,
            naive: Some(result("defect-missing-cidr-block", Category::MissingArgument, Mode::Naive, 150, 0, 0, 1)),
        },
    ];

    let aggregator = MetricsAggregator::new();
    let records = aggregator.combine(pairs).unwrap();
    let summary = aggregator.summarize(&records);
    let cost = aggregator.cost_analysis(&records, &PricingConfig::default());
    let verdicts = ClaimsValidator::new().validate_summary(&summary, &default_claims());

    BenchmarkResults {
        timestamp: "2026-10-18T00:00:00Z".to_string(),
        service: "mock".to_string(),
        skip_naive: false,
        records,
        summary,
        cost,
        verdicts,
    }
}
