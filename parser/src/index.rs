//! @ai:module:intent Index Terraform blocks of a project and answer symbol queries
//! @ai:module:layer application
//! @ai:module:public_api SymbolIndex, SymbolQuery, SkippedFile
//! @ai:module:depends_on parser, symbol, language, error
//! @ai:module:stateless false

use crate::error::{Error, Result};
use crate::language::is_supported_file;
use crate::parser::parse_file;
use crate::symbol::{ParsedFile, SymbolDescriptor, SymbolKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Parameters of a symbol lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolQuery {
    pub name_path: String,
    #[serde(default)]
    pub substring_matching: bool,
    #[serde(default)]
    pub include_body: bool,
    /// Empty means every kind
    #[serde(default)]
    pub include_kinds: Vec<SymbolKind>,
    /// Zero means unlimited
    #[serde(default)]
    pub max_answer_chars: usize,
}

impl SymbolQuery {
    /// @ai:intent Create an exact-match query without bodies
    /// @ai:effects pure
    pub fn new(name_path: impl Into<String>) -> Self {
        Self {
            name_path: name_path.into(),
            ..Default::default()
        }
    }

    /// @ai:intent Enable substring matching
    pub fn substring(mut self) -> Self {
        self.substring_matching = true;
        self
    }

    /// @ai:intent Include block bodies in the answer
    pub fn with_body(mut self) -> Self {
        self.include_body = true;
        self
    }

    /// @ai:intent Restrict the answer to the given kinds
    pub fn with_kinds(mut self, kinds: Vec<SymbolKind>) -> Self {
        self.include_kinds = kinds;
        self
    }

    /// @ai:intent Fail queries whose JSON answer exceeds the limit
    pub fn with_max_answer_chars(mut self, max: usize) -> Self {
        self.max_answer_chars = max;
        self
    }

    /// @ai:intent Check a descriptor against name and kind filters
    /// @ai:effects pure
    fn matches(&self, descriptor: &SymbolDescriptor) -> bool {
        let name_ok = if self.substring_matching {
            descriptor.name_path.contains(&self.name_path)
        } else {
            descriptor.name_path == self.name_path
        };
        name_ok && (self.include_kinds.is_empty() || self.include_kinds.contains(&descriptor.kind))
    }
}

/// @ai:intent A file or directory entry left out of the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub relative_path: String,
    pub message: String,
}

/// @ai:intent In-memory index of every top-level block under a root
#[derive(Debug, Clone)]
pub struct SymbolIndex {
    root: PathBuf,
    files: Vec<ParsedFile>,
    skipped: Vec<SkippedFile>,
}

impl SymbolIndex {
    /// @ai:intent Walk root and parse every Terraform configuration file
    /// @ai:pre root is a readable directory
    /// @ai:post files are ordered by relative path
    /// @ai:post unparsable files and unreadable directory entries are recorded in skipped, not fatal
    /// @ai:post symlinks are followed; a link loop is a skipped entry
    /// @ai:effects fs:read
    pub fn build(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("not a directory: {}", root.display()),
            )));
        }

        let mut files = Vec::new();
        let mut skipped = Vec::new();

        let relative = |path: &Path| {
            path.strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned()
        };

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    skipped.push(SkippedFile {
                        relative_path: e.path().map(relative).unwrap_or_default(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_supported_file(path) {
                continue;
            }

            match parse_file(path, root) {
                Ok(parsed) => files.push(parsed),
                Err(e) => skipped.push(SkippedFile {
                    relative_path: relative(path),
                    message: e.to_string(),
                }),
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(Self {
            root: root.to_path_buf(),
            files,
            skipped,
        })
    }

    /// @ai:intent Root directory this index was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// @ai:intent Successfully parsed files
    pub fn files(&self) -> &[ParsedFile] {
        &self.files
    }

    /// @ai:intent Files that failed to parse
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// @ai:intent Total number of indexed blocks
    /// @ai:effects pure
    pub fn symbol_count(&self) -> usize {
        self.files.iter().map(|f| f.blocks.len()).sum()
    }

    /// @ai:intent Answer a symbol query
    /// @ai:post results are ordered by (relative_path, start_line)
    /// @ai:post no match is an empty vector, not an error
    /// @ai:post Error::AnswerTooLong when the JSON answer exceeds a non-zero limit
    /// @ai:effects pure
    pub fn find_symbol(&self, query: &SymbolQuery) -> Result<Vec<SymbolDescriptor>> {
        let mut found: Vec<SymbolDescriptor> = self
            .files
            .iter()
            .flat_map(|f| f.descriptors(query.include_body))
            .filter(|d| query.matches(d))
            .collect();

        found.sort_by(|a, b| {
            a.relative_path
                .cmp(&b.relative_path)
                .then(a.start_line.cmp(&b.start_line))
        });

        if query.max_answer_chars > 0 {
            let len = serde_json::to_string(&found)?.len();
            if len > query.max_answer_chars {
                return Err(Error::AnswerTooLong {
                    len,
                    max: query.max_answer_chars,
                });
            }
        }

        Ok(found)
    }
}
