//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::claims::VerdictState;
use crate::metrics::{BenchmarkResults, ModeStats};
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from results
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from benchmark results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format an optional percentage, "n/a" when absent
    /// @ai:example (Some(95.04)) -> "95.0%"
    /// @ai:effects pure
    fn format_percent(value: Option<f64>) -> String {
        value.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v))
    }

    /// @ai:intent Format a signed token difference
    /// @ai:effects pure
    fn format_savings(value: Option<i64>) -> String {
        match value {
            Some(v) if v >= 0 => format!("+{}", v),
            Some(v) => v.to_string(),
            None => "n/a".to_string(),
        }
    }

    /// @ai:intent Render the whole report
    /// @ai:effects pure
    pub fn render(results: &BenchmarkResults) -> String {
        let mut output = String::new();
        output.push_str(&Self::generate_header(results));
        output.push_str(&Self::generate_scenario_table(results));
        output.push_str(&Self::generate_summary_section(results));
        output.push_str(&Self::generate_cost_section(results));
        output.push_str(&Self::generate_verdict_section(results));
        output.push_str(&Self::generate_failure_section(results));
        output
    }

    fn generate_header(results: &BenchmarkResults) -> String {
        let mut output = String::new();

        writeln!(output, "# Terraform Semantic Benchmark Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", results.timestamp).unwrap();
        writeln!(output, "**Service:** {}", results.service).unwrap();
        writeln!(
            output,
            "**Modes:** {}",
            if results.skip_naive { "semantic only" } else { "semantic, naive" }
        )
        .unwrap();
        writeln!(output, "**Scenarios:** {}", results.summary.scenario_count).unwrap();
        writeln!(output).unwrap();

        if results.summary.partial_data {
            writeln!(
                output,
                "> Some operations failed; aggregate figures are based on partial data."
            )
            .unwrap();
            writeln!(output).unwrap();
        }

        output
    }

    /// @ai:intent Per-scenario comparison table
    /// @ai:effects pure
    fn generate_scenario_table(results: &BenchmarkResults) -> String {
        let mut output = String::new();

        writeln!(output, "## Scenarios").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Scenario | Category | Semantic Tokens | Naive Tokens | Savings | Efficiency | Context Reduction | Semantic Detect | Naive Detect |"
        )
        .unwrap();
        writeln!(
            output,
            "|----------|----------|-----------------|--------------|---------|------------|-------------------|-----------------|--------------|"
        )
        .unwrap();

        for record in &results.records {
            let naive_tokens = record
                .naive
                .as_ref()
                .map_or_else(|| "n/a".to_string(), |n| n.total_tokens.to_string());
            let semantic_tokens = if record.semantic.success {
                record.semantic.total_tokens.to_string()
            } else {
                format!("{} (failed)", record.semantic.total_tokens)
            };

            writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {}/{} | {} |",
                record.scenario_id,
                record.category,
                semantic_tokens,
                naive_tokens,
                Self::format_savings(record.token_savings),
                Self::format_percent(record.efficiency_improvement),
                Self::format_percent(record.context_reduction),
                record.semantic.detected,
                record.semantic.expected,
                record
                    .naive
                    .as_ref()
                    .map_or_else(|| "n/a".to_string(), |n| format!("{}/{}", n.detected, n.expected)),
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    fn mode_row(output: &mut String, label: &str, semantic: String, naive: Option<String>) {
        writeln!(
            output,
            "| {} | {} | {} |",
            label,
            semantic,
            naive.unwrap_or_else(|| "n/a".to_string())
        )
        .unwrap();
    }

    /// @ai:intent Per-mode statistics and token efficiency
    /// @ai:effects pure
    fn generate_summary_section(results: &BenchmarkResults) -> String {
        let mut output = String::new();
        let summary = &results.summary;
        let semantic = &summary.semantic;
        let naive: Option<&ModeStats> = summary.naive.as_ref();

        writeln!(output, "## Summary").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Semantic | Naive |").unwrap();
        writeln!(output, "|--------|----------|-------|").unwrap();

        Self::mode_row(
            &mut output,
            "Success Rate",
            format!("{:.1}%", semantic.success_rate),
            naive.map(|n| format!("{:.1}%", n.success_rate)),
        );
        Self::mode_row(
            &mut output,
            "Detection Rate",
            format!("{:.1}% ({}/{})", semantic.detection_rate, semantic.detected, semantic.expected),
            naive.map(|n| format!("{:.1}% ({}/{})", n.detection_rate, n.detected, n.expected)),
        );
        Self::mode_row(
            &mut output,
            "Total Tokens",
            semantic.total_tokens.to_string(),
            naive.map(|n| n.total_tokens.to_string()),
        );
        Self::mode_row(
            &mut output,
            "Input Tokens",
            semantic.total_input_tokens.to_string(),
            naive.map(|n| n.total_input_tokens.to_string()),
        );
        Self::mode_row(
            &mut output,
            "Mean Time",
            format!("{:.2}ms", semantic.mean_elapsed_ms),
            naive.map(|n| format!("{:.2}ms", n.mean_elapsed_ms)),
        );
        Self::mode_row(
            &mut output,
            "Peak Memory Delta",
            format!("{:.2}MB", semantic.peak_memory_delta_bytes as f64 / (1024.0 * 1024.0)),
            naive.map(|n| format!("{:.2}MB", n.peak_memory_delta_bytes as f64 / (1024.0 * 1024.0))),
        );
        writeln!(output).unwrap();

        writeln!(output, "### Token Efficiency").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "- **Total savings:** {} tokens",
            Self::format_savings(summary.total_token_savings)
        )
        .unwrap();
        writeln!(
            output,
            "- **Overall efficiency:** {}",
            Self::format_percent(summary.overall_efficiency)
        )
        .unwrap();
        writeln!(
            output,
            "- **Mean efficiency improvement:** {}",
            Self::format_percent(summary.mean_efficiency_improvement)
        )
        .unwrap();
        writeln!(
            output,
            "- **Mean context reduction:** {}",
            Self::format_percent(summary.mean_context_reduction)
        )
        .unwrap();
        writeln!(
            output,
            "- **Detection ratio:** {}",
            summary
                .detection_ratio
                .map_or_else(|| "n/a".to_string(), |r| format!("{:.2}x", r))
        )
        .unwrap();
        if let Some(best) = &summary.best_scenario {
            writeln!(
                output,
                "- **Best scenario:** {} ({:.1}%)",
                best.scenario_id, best.efficiency_improvement
            )
            .unwrap();
        }
        if let Some(worst) = &summary.worst_scenario {
            writeln!(
                output,
                "- **Worst scenario:** {} ({:.1}%)",
                worst.scenario_id, worst.efficiency_improvement
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Dollar cost table
    /// @ai:effects pure
    fn generate_cost_section(results: &BenchmarkResults) -> String {
        let mut output = String::new();
        let cost = &results.cost;
        let money = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("${:.4}", v));

        writeln!(output, "## Cost Analysis").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Semantic | Naive | Savings | Cost Efficiency |").unwrap();
        writeln!(output, "|----------|-------|---------|-----------------|").unwrap();
        writeln!(
            output,
            "| {} | {} | {} | {} |",
            money(Some(cost.semantic_cost)),
            money(cost.naive_cost),
            money(cost.savings),
            Self::format_percent(cost.cost_efficiency)
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Claim verdict table
    /// @ai:effects pure
    fn generate_verdict_section(results: &BenchmarkResults) -> String {
        let mut output = String::new();

        writeln!(output, "## Claims").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Claim | Target | Observed | Verdict |").unwrap();
        writeln!(output, "|-------|--------|----------|---------|").unwrap();

        for verdict in &results.verdicts {
            let state = match verdict.state {
                VerdictState::Met => "MET",
                VerdictState::NotMet => "NOT MET",
                VerdictState::NeedsBaseline => "NEEDS BASELINE",
                VerdictState::InsufficientData => "INSUFFICIENT DATA",
            };
            writeln!(
                output,
                "| {} | {} {} | {} | {}{} |",
                verdict.claim_id,
                verdict.op,
                verdict.target,
                verdict
                    .observed
                    .map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v)),
                state,
                if verdict.partial_data { " (partial data)" } else { "" }
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    fn generate_failure_section(results: &BenchmarkResults) -> String {
        let mut output = String::new();
        if results.summary.failures.is_empty() {
            return output;
        }

        writeln!(output, "## Failures").unwrap();
        writeln!(output).unwrap();
        for failure in &results.summary.failures {
            writeln!(
                output,
                "- `{}` ({}): {}",
                failure.scenario_id, failure.mode, failure.error
            )
            .unwrap();
        }
        writeln!(output).unwrap();

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render(results))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_results;
    use tempfile::TempDir;

    #[test]
    fn test_format_helpers() {
        assert_eq!(MarkdownReporter::format_percent(Some(95.04)), "95.0%");
        assert_eq!(MarkdownReporter::format_percent(None), "n/a");
        assert_eq!(MarkdownReporter::format_savings(Some(12)), "+12");
        assert_eq!(MarkdownReporter::format_savings(Some(-3)), "-3");
    }

    #[test]
    fn test_render_sections() {
        let markdown = MarkdownReporter::render(&sample_results());

        assert!(markdown.contains("# Terraform Semantic Benchmark Results"));
        assert!(markdown.contains("| explore-vpc | exploration | 50 | 2100 | +2050 |"));
        assert!(markdown.contains("## Cost Analysis"));
        assert!(markdown.contains("| cost.mean_semantic_seconds | <= 0.5 | 0.00 | MET (partial data) |"));
        assert!(markdown.contains("- `defect-missing-cidr-block` (semantic): semantic service unavailable"));
        assert!(markdown.contains("partial data"));
    }

    #[test]
    fn test_generate_markdown_report() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.md");

        MarkdownReporter::new().generate(&sample_results(), &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("## Claims"));
    }
}
