//! @ai:module:intent Semantic service that shells out to the tfsym binary
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProcessSymbolService
//! @ai:module:stateless true

use crate::error::ServiceError;
use crate::service::{PatternQuery, SemanticService};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tfsym::SymbolQuery;
use tokio::process::Command;

/// @ai:intent Client that runs the tfsym CLI as an external process
pub struct ProcessSymbolService {
    binary: PathBuf,
}

impl ProcessSymbolService {
    /// @ai:intent Create a client for the given tfsym executable
    /// @ai:effects pure
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// @ai:intent Arguments of a `tfsym symbols` invocation
    /// @ai:effects pure
    fn symbol_args(root: &Path, query: &SymbolQuery) -> Vec<String> {
        let mut args = vec![
            "symbols".to_string(),
            root.to_string_lossy().into_owned(),
            format!("--name={}", query.name_path),
        ];
        if query.substring_matching {
            args.push("--substring".to_string());
        }
        if query.include_body {
            args.push("--body".to_string());
        }
        if !query.include_kinds.is_empty() {
            let kinds: Vec<String> = query
                .include_kinds
                .iter()
                .map(|k| k.code().to_string())
                .collect();
            args.push("--kinds".to_string());
            args.push(kinds.join(","));
        }
        if query.max_answer_chars > 0 {
            args.push("--max-answer-chars".to_string());
            args.push(query.max_answer_chars.to_string());
        }
        args.extend(["--format".to_string(), "json".to_string()]);
        args
    }

    /// @ai:intent Arguments of a `tfsym search` invocation
    /// @ai:post options come first; root and pattern follow `--` so a leading `-` stays positional
    /// @ai:effects pure
    fn search_args(root: &Path, query: &PatternQuery) -> Vec<String> {
        let mut args = vec!["search".to_string()];
        if let Some(glob) = &query.file_glob {
            args.push(format!("--glob={}", glob));
        }
        args.extend([
            "--format".to_string(),
            "text".to_string(),
            "--".to_string(),
            root.to_string_lossy().into_owned(),
            query.pattern.clone(),
        ]);
        args
    }

    /// @ai:intent Run tfsym and return its stdout
    /// @ai:post spawn failure is Unavailable, non-zero exit is Backend with stderr
    /// @ai:effects io
    async fn invoke(&self, args: Vec<String>) -> Result<String, ServiceError> {
        tracing::debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ServiceError::Unavailable(format!("failed to run {}: {}", self.binary.display(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::warn!(
                "tfsym returned non-zero exit code: {:?}",
                output.status.code()
            );
            let message = stderr.trim().trim_start_matches("Error:").trim().to_string();
            return Err(ServiceError::Backend(if message.is_empty() {
                format!("exit code {:?}", output.status.code())
            } else {
                message
            }));
        }

        Ok(stdout.trim_end_matches('\n').to_string())
    }
}

impl SemanticService for ProcessSymbolService {
    fn name(&self) -> &str {
        "process"
    }

    async fn find_symbol(&self, root: &Path, query: &SymbolQuery) -> Result<String, ServiceError> {
        self.invoke(Self::symbol_args(root, query)).await
    }

    async fn search_pattern(
        &self,
        root: &Path,
        query: &PatternQuery,
    ) -> Result<String, ServiceError> {
        self.invoke(Self::search_args(root, query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfsym::SymbolKind;

    #[test]
    fn test_symbol_args() {
        let query = SymbolQuery::new("aws_instance")
            .substring()
            .with_kinds(vec![SymbolKind::Class, SymbolKind::Variable])
            .with_max_answer_chars(500);
        let args = ProcessSymbolService::symbol_args(Path::new("/ws"), &query);
        assert_eq!(
            args,
            vec![
                "symbols", "/ws", "--name=aws_instance", "--substring", "--kinds", "5,13",
                "--max-answer-chars", "500", "--format", "json"
            ]
        );
    }

    #[test]
    fn test_search_args() {
        let query = PatternQuery::new(r"var\.x").with_glob("**/*.tf");
        let args = ProcessSymbolService::search_args(Path::new("/ws"), &query);
        assert_eq!(
            args,
            vec!["search", "--glob=**/*.tf", "--format", "text", "--", "/ws", r"var\.x"]
        );
    }

    #[test]
    fn test_hyphen_leading_values_stay_values() {
        let args = ProcessSymbolService::search_args(Path::new("/ws"), &PatternQuery::new("-var"));
        assert_eq!(args, vec!["search", "--format", "text", "--", "/ws", "-var"]);

        let args = ProcessSymbolService::symbol_args(Path::new("/ws"), &SymbolQuery::new("-x"));
        assert_eq!(args, vec!["symbols", "/ws", "--name=-x", "--format", "json"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let service = ProcessSymbolService::new("/nonexistent/tfsym-binary");
        let err = service
            .search_pattern(Path::new("."), &PatternQuery::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }
}
