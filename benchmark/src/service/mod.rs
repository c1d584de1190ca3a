//! @ai:module:intent Boundary to the semantic analysis service
//! @ai:module:layer infrastructure
//! @ai:module:public_api SemanticService, PatternQuery, parse_symbol_payload, run_blocking, LocalSymbolService, ProcessSymbolService, MockSemanticService
//! @ai:module:stateless true

pub mod local;
pub mod process;

pub use local::LocalSymbolService;
pub use process::ProcessSymbolService;

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tfsym::{SymbolDescriptor, SymbolQuery};

/// @ai:intent Parameters of a pattern search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternQuery {
    pub pattern: String,
    /// Relative-path glob; the service default applies when None
    #[serde(default)]
    pub file_glob: Option<String>,
}

impl PatternQuery {
    /// @ai:intent Create a pattern query over the default file glob
    /// @ai:effects pure
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            file_glob: None,
        }
    }

    /// @ai:intent Restrict the search to files matching glob
    pub fn with_glob(mut self, glob: impl Into<String>) -> Self {
        self.file_glob = Some(glob.into());
        self
    }
}

/// @ai:intent Trait for the external semantic service
/// Symbol answers are a JSON list of descriptors; pattern answers are raw text.
#[allow(async_fn_in_trait)]
pub trait SemanticService: Send + Sync {
    /// @ai:intent Short name recorded in reports
    fn name(&self) -> &str;

    /// @ai:intent Look up symbols under root
    /// @ai:post an empty list means no match, never an error
    async fn find_symbol(&self, root: &Path, query: &SymbolQuery) -> Result<String, ServiceError>;

    /// @ai:intent Search files under root for a regex pattern
    /// @ai:post an empty or short payload means no match
    async fn search_pattern(&self, root: &Path, query: &PatternQuery)
        -> Result<String, ServiceError>;
}

/// @ai:intent Run synchronous backend work on the blocking pool so callers can time it out
/// @ai:post a panicked or cancelled task is a Backend error
/// @ai:effects io
pub async fn run_blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Backend(format!("blocking task failed: {}", e)))?
}

/// @ai:intent Parse and validate a symbol answer at the service boundary
/// @ai:pre payload is the raw text returned by find_symbol
/// @ai:post every descriptor has a non-empty name path and relative path
/// @ai:effects pure
pub fn parse_symbol_payload(payload: &str) -> Result<Vec<SymbolDescriptor>, ServiceError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let descriptors: Vec<SymbolDescriptor> = serde_json::from_str(trimmed)
        .map_err(|e| ServiceError::Malformed(format!("symbol payload is not a descriptor list: {}", e)))?;

    for (i, descriptor) in descriptors.iter().enumerate() {
        if descriptor.name_path.trim().is_empty() {
            return Err(ServiceError::Malformed(format!(
                "descriptor {} has an empty name_path",
                i
            )));
        }
        if descriptor.relative_path.trim().is_empty() {
            return Err(ServiceError::Malformed(format!(
                "descriptor {} ({}) has an empty relative_path",
                i, descriptor.name_path
            )));
        }
    }

    Ok(descriptors)
}

/// @ai:intent Mock service for testing
pub struct MockSemanticService {
    symbols: String,
    matches: String,
    failure: Option<String>,
}

impl MockSemanticService {
    /// @ai:intent Create a mock service returning fixed payloads
    /// @ai:effects pure
    pub fn new(symbols: impl Into<String>, matches: impl Into<String>) -> Self {
        Self {
            symbols: symbols.into(),
            matches: matches.into(),
            failure: None,
        }
    }

    /// @ai:intent Create a mock service whose every call fails as unavailable
    /// @ai:effects pure
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            symbols: String::new(),
            matches: String::new(),
            failure: Some(message.into()),
        }
    }
}

impl SemanticService for MockSemanticService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn find_symbol(&self, _root: &Path, _query: &SymbolQuery) -> Result<String, ServiceError> {
        match &self.failure {
            Some(message) => Err(ServiceError::Unavailable(message.clone())),
            None => Ok(self.symbols.clone()),
        }
    }

    async fn search_pattern(
        &self,
        _root: &Path,
        _query: &PatternQuery,
    ) -> Result<String, ServiceError> {
        match &self.failure {
            Some(message) => Err(ServiceError::Unavailable(message.clone())),
            None => Ok(self.matches.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfsym::SymbolKind;

    #[test]
    fn test_parse_symbol_payload() {
        let payload = r#"[{"name_path":"aws_instance.web","kind":5,"relative_path":"main.tf","start_line":1,"end_line":3}]"#;
        let descriptors = parse_symbol_payload(payload).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].kind, SymbolKind::Class);
    }

    #[test]
    fn test_empty_payload_is_no_match() {
        assert!(parse_symbol_payload("").unwrap().is_empty());
        assert!(parse_symbol_payload("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payloads_rejected() {
        assert!(matches!(
            parse_symbol_payload(r#"{"name":"x"}"#),
            Err(ServiceError::Malformed(_))
        ));
        assert!(matches!(
            parse_symbol_payload(
                r#"[{"name_path":"","kind":5,"relative_path":"main.tf","start_line":1,"end_line":1}]"#
            ),
            Err(ServiceError::Malformed(_))
        ));
        assert!(matches!(
            parse_symbol_payload(
                r#"[{"name_path":"aws_vpc.main","kind":99,"relative_path":"main.tf","start_line":1,"end_line":1}]"#
            ),
            Err(ServiceError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let service = MockSemanticService::failing("backend offline");
        let err = service
            .search_pattern(Path::new("."), &PatternQuery::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "semantic service unavailable: backend offline");
    }
}
