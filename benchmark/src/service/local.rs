//! @ai:module:intent In-process semantic service backed by the tfsym library
//! @ai:module:layer infrastructure
//! @ai:module:public_api LocalSymbolService
//! @ai:module:stateless true

use crate::error::ServiceError;
use crate::service::{run_blocking, PatternQuery, SemanticService};
use std::path::Path;
use tfsym::{search, SymbolIndex, SymbolQuery};

/// @ai:intent Answers queries by indexing the workspace with tfsym on every call
/// Index and search run on the blocking pool.
pub struct LocalSymbolService {
    max_answer_chars: usize,
}

impl LocalSymbolService {
    /// @ai:intent Create a local service with no answer size limit
    /// @ai:effects pure
    pub fn new() -> Self {
        Self { max_answer_chars: 0 }
    }

    /// @ai:intent Apply an answer size limit to queries that do not set one
    /// @ai:effects pure
    pub fn with_max_answer_chars(mut self, max: usize) -> Self {
        self.max_answer_chars = max;
        self
    }
}

impl Default for LocalSymbolService {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticService for LocalSymbolService {
    fn name(&self) -> &str {
        "local"
    }

    /// @ai:effects fs:read
    async fn find_symbol(&self, root: &Path, query: &SymbolQuery) -> Result<String, ServiceError> {
        let mut query = query.clone();
        if query.max_answer_chars == 0 {
            query.max_answer_chars = self.max_answer_chars;
        }
        let root = root.to_path_buf();

        run_blocking(move || {
            let index = SymbolIndex::build(&root)?;
            for skipped in index.skipped() {
                tracing::debug!("Skipped {}: {}", skipped.relative_path, skipped.message);
            }

            let symbols = index.find_symbol(&query)?;
            tracing::debug!(
                "find_symbol {} (substring={}) -> {} result(s)",
                query.name_path,
                query.substring_matching,
                symbols.len()
            );

            serde_json::to_string(&symbols).map_err(|e| ServiceError::Backend(e.to_string()))
        })
        .await
    }

    /// @ai:effects fs:read
    async fn search_pattern(
        &self,
        root: &Path,
        query: &PatternQuery,
    ) -> Result<String, ServiceError> {
        let root = root.to_path_buf();
        let query = query.clone();

        run_blocking(move || {
            let matches = search::search_pattern(&root, &query.pattern, query.file_glob.as_deref())?;
            tracing::debug!("search_pattern {} -> {} match(es)", query.pattern, matches.len());
            Ok(search::render_matches(&matches))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::parse_symbol_payload;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("main.tf"),
            "resource \"aws_vpc\" \"main\" {\n  cidr_block = \"10.0.0.0/16\"\n}\n\nvariable \"region\" {\n  default = \"us-east-1\"\n}\n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_find_symbol_returns_descriptor_json() {
        let dir = project();
        let payload = LocalSymbolService::new()
            .find_symbol(dir.path(), &SymbolQuery::new("aws_vpc").substring())
            .await
            .unwrap();

        let descriptors = parse_symbol_payload(&payload).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name_path, "aws_vpc.main");
    }

    #[tokio::test]
    async fn test_no_match_is_empty_list() {
        let dir = project();
        let payload = LocalSymbolService::new()
            .find_symbol(dir.path(), &SymbolQuery::new("aws_lb"))
            .await
            .unwrap();
        assert_eq!(payload, "[]");
    }

    #[tokio::test]
    async fn test_answer_limit_applies() {
        let dir = project();
        let err = LocalSymbolService::new()
            .with_max_answer_chars(10)
            .find_symbol(dir.path(), &SymbolQuery::new("variable").substring())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AnswerTooLong { max: 10, .. }));
    }

    #[tokio::test]
    async fn test_search_pattern_payload() {
        let dir = project();
        let payload = LocalSymbolService::new()
            .search_pattern(dir.path(), &PatternQuery::new(r"var(iable)?\s"))
            .await
            .unwrap();
        assert_eq!(payload, "main.tf:5: variable \"region\" {");
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_backend_error() {
        let dir = project();
        let err = LocalSymbolService::new()
            .search_pattern(dir.path(), &PatternQuery::new("(unclosed"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Backend(_)));
    }
}
