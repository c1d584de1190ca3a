//! @ai:module:intent JSON report generation and loading
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::BenchmarkResults;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from results
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()>;

    /// @ai:intent Read results back from a JSON report
    fn load(&self, path: &Path) -> Result<BenchmarkResults>;
}

/// @ai:intent Generates JSON reports from benchmark results
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }

    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<BenchmarkResults> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse results from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_results;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.json");

        reporter.generate(&sample_results(), &output).unwrap();
        assert!(output.exists());

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("\"scenario_id\": \"explore-vpc\""));
        assert!(content.contains("\"state\": \"met\""));
    }

    #[test]
    fn test_load_written_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.json");
        let results = sample_results();

        reporter.generate(&results, &output).unwrap();
        let loaded = reporter.load(&output).unwrap();

        let ids = |r: &BenchmarkResults| -> Vec<String> {
            r.records.iter().map(|c| c.scenario_id.clone()).collect()
        };
        assert_eq!(ids(&loaded), ids(&results));
        assert_eq!(loaded.summary.failures, results.summary.failures);
        assert_eq!(
            loaded.verdicts.iter().map(|v| v.state).collect::<Vec<_>>(),
            results.verdicts.iter().map(|v| v.state).collect::<Vec<_>>()
        );
    }
}
