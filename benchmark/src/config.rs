//! @ai:module:intent Configuration structs for the benchmark system
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, RunConfig, ServiceConfig, PathConfig, PricingConfig, FilterConfig, Backend
//! @ai:module:stateless true

use crate::claims::{default_claims, ClaimThreshold};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// @ai:intent Main configuration for the benchmark system
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default = "default_claims")]
    pub claims: Vec<ClaimThreshold>,
}

/// @ai:intent Run configuration for benchmark execution
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run only the semantic mode; baseline claims report needs_baseline
    #[serde(default)]
    pub skip_naive: bool,
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// @ai:intent Which semantic service implementation answers queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Process,
}

impl Backend {
    /// @ai:intent Convert backend to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Process => "process",
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Backend::Local),
            "process" => Ok(Backend::Process),
            other => Err(format!("unknown backend: {} (expected local or process)", other)),
        }
    }
}

/// @ai:intent Semantic service configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Zero means unlimited
    #[serde(default = "default_max_answer_chars")]
    pub max_answer_chars: usize,
}

/// @ai:intent Path configuration for output and scratch directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Parent of per-scenario workspaces; system temp dir when unset
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,
}

/// @ai:intent Token pricing used by the cost analysis, in dollars per 1K tokens
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_input_cost")]
    pub input_per_1k: f64,
    #[serde(default = "default_output_cost")]
    pub output_per_1k: f64,
}

/// @ai:intent Filter configuration for selecting scenarios
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub categories: Option<Vec<String>>,
    pub scenario_ids: Option<Vec<String>>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            service: ServiceConfig::default(),
            paths: PathConfig::default(),
            pricing: PricingConfig::default(),
            claims: default_claims(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            skip_naive: false,
            operation_timeout_secs: default_operation_timeout(),
            filter: FilterConfig::default(),
        }
    }
}

impl RunConfig {
    /// @ai:intent Per-operation timeout as a Duration
    /// @ai:effects pure
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs.max(1))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            binary: default_binary(),
            max_answer_chars: default_max_answer_chars(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            workspace_root: None,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            input_per_1k: default_input_cost(),
            output_per_1k: default_output_cost(),
        }
    }
}

fn default_operation_timeout() -> u64 {
    30
}

fn default_binary() -> PathBuf {
    PathBuf::from("tfsym")
}

fn default_max_answer_chars() -> usize {
    200_000
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_input_cost() -> f64 {
    0.03
}

fn default_output_cost() -> f64 {
    0.06
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

impl FilterConfig {
    /// @ai:intent Check if filter matches a scenario
    /// @ai:effects pure
    pub fn matches(&self, category: &str, id: &str) -> bool {
        let category_match = self
            .categories
            .as_ref()
            .map(|c| c.iter().any(|cat| cat == category))
            .unwrap_or(true);

        let id_match = self
            .scenario_ids
            .as_ref()
            .map(|ids| ids.iter().any(|scenario_id| scenario_id == id))
            .unwrap_or(true);

        category_match && id_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_all_when_empty() {
        let filter = FilterConfig::default();
        assert!(filter.matches("syntax", "defect-syntax-unquoted-type"));
    }

    #[test]
    fn test_filter_matches_specific_category() {
        let filter = FilterConfig {
            categories: Some(vec!["exploration".to_string()]),
            ..Default::default()
        };
        assert!(filter.matches("exploration", "explore-vpc"));
        assert!(!filter.matches("syntax", "explore-vpc"));
    }

    #[test]
    fn test_filter_matches_multiple_criteria() {
        let filter = FilterConfig {
            categories: Some(vec!["exploration".to_string()]),
            scenario_ids: Some(vec!["explore-vpc".to_string(), "explore-outputs".to_string()]),
        };
        assert!(filter.matches("exploration", "explore-outputs"));
        assert!(!filter.matches("exploration", "explore-provider"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BenchmarkConfig = toml::from_str(
            r#"
[run]
skip_naive = true

[service]
backend = "process"
"#,
        )
        .unwrap();

        assert!(config.run.skip_naive);
        assert_eq!(config.run.operation_timeout_secs, 30);
        assert_eq!(config.service.backend, Backend::Process);
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.claims.len(), default_claims().len());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bench.toml");

        let mut config = BenchmarkConfig::default();
        config.run.filter.categories = Some(vec!["syntax".to_string()]);
        config.save(&path).unwrap();

        let loaded = BenchmarkConfig::load(&path).unwrap();
        assert_eq!(loaded.run.filter.categories, Some(vec!["syntax".to_string()]));
        assert_eq!(loaded.claims.len(), config.claims.len());
    }
}
