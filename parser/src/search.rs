//! @ai:module:intent Regex search over project files selected by glob
//! @ai:module:layer application
//! @ai:module:public_api search_pattern, render_matches, PatternMatch, DEFAULT_FILE_GLOB
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use globset::GlobBuilder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

pub const DEFAULT_FILE_GLOB: &str = "*.tf";

/// @ai:intent One line matching a search pattern
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternMatch {
    pub relative_path: String,
    pub line: usize,
    pub text: String,
}

impl fmt::Display for PatternMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.relative_path, self.line, self.text)
    }
}

/// @ai:intent Search every file under root whose relative path matches the glob
/// @ai:pre pattern is a valid regex
/// @ai:post matches are ordered by (relative_path, line)
/// @ai:post unreadable or non-UTF-8 files are skipped
/// @ai:post a directory walk error, such as a symlink loop, fails the search
/// @ai:example (root, "undefined_variable", None) -> [reference_errors.tf:11: ...]
/// @ai:effects fs:read
pub fn search_pattern(root: &Path, pattern: &str, file_glob: Option<&str>) -> Result<Vec<PatternMatch>> {
    let re = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })?;

    let glob = file_glob.unwrap_or(DEFAULT_FILE_GLOB);
    let matcher = GlobBuilder::new(glob)
        .literal_separator(false)
        .build()
        .map_err(|e| Error::InvalidGlob {
            glob: glob.to_string(),
            source: e,
        })?
        .compile_matcher();

    let mut matches = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        if !matcher.is_match(&relative_path) {
            continue;
        }

        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if re.is_match(line) {
                matches.push(PatternMatch {
                    relative_path: relative_path.clone(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                });
            }
        }
    }

    matches.sort_by(|a, b| {
        a.relative_path
            .cmp(&b.relative_path)
            .then(a.line.cmp(&b.line))
    });

    Ok(matches)
}

/// @ai:intent Render matches as the raw text payload, one `path:line: text` per line
/// @ai:post empty input renders as an empty string
/// @ai:effects pure
pub fn render_matches(matches: &[PatternMatch]) -> String {
    matches
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("reference_errors.tf"),
            "locals {\n  invalid_ref = var.undefined_variable\n}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.md"), "undefined_variable\n").unwrap();
        fs::create_dir(dir.path().join("modules")).unwrap();
        fs::write(
            dir.path().join("modules").join("net.tf"),
            "# undefined_variable mentioned\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_default_glob_filters_tf() {
        let dir = project();
        let found = search_pattern(dir.path(), "undefined_variable", None).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].relative_path, "modules/net.tf");
        assert_eq!(found[1].relative_path, "reference_errors.tf");
        assert_eq!(found[1].line, 2);
        assert_eq!(
            found[1].to_string(),
            "reference_errors.tf:2: invalid_ref = var.undefined_variable"
        );
    }

    #[test]
    fn test_custom_glob() {
        let dir = project();
        let found = search_pattern(dir.path(), "undefined", Some("*.md")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].relative_path, "notes.md");
    }

    #[test]
    fn test_no_match_renders_empty() {
        let dir = project();
        let found = search_pattern(dir.path(), "aws_lb", None).unwrap();
        assert!(found.is_empty());
        assert_eq!(render_matches(&found), "");
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = project();
        let err = search_pattern(dir.path(), "resource (", None).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_error_fails_search() {
        let dir = project();
        std::os::unix::fs::symlink("..", dir.path().join("modules").join("loop")).unwrap();

        let err = search_pattern(dir.path(), "undefined_variable", None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
