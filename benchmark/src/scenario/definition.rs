//! @ai:module:intent Scenario definitions for the benchmark catalog
//! @ai:module:layer domain
//! @ai:module:public_api Scenario, Category, QueryKind, FixtureFile, DefectMarker
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Category of benchmark scenario
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Syntax,
    TypeMismatch,
    MissingArgument,
    CircularReference,
    DanglingReference,
    Exploration,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Syntax,
        Category::TypeMismatch,
        Category::MissingArgument,
        Category::CircularReference,
        Category::DanglingReference,
        Category::Exploration,
    ];

    /// @ai:intent Convert category to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Syntax => "syntax",
            Category::TypeMismatch => "type_mismatch",
            Category::MissingArgument => "missing_argument",
            Category::CircularReference => "circular_reference",
            Category::DanglingReference => "dangling_reference",
            Category::Exploration => "exploration",
        }
    }

    /// @ai:intent Semantic query used for scenarios of this category
    /// @ai:post Syntax and DanglingReference search text, all others look up symbols
    /// @ai:effects pure
    pub fn query_kind(&self) -> QueryKind {
        match self {
            Category::Syntax | Category::DanglingReference => QueryKind::Pattern,
            _ => QueryKind::Symbol,
        }
    }

    /// @ai:intent Whether scenarios of this category carry ground-truth defects
    /// @ai:effects pure
    pub fn is_defect(&self) -> bool {
        !matches!(self, Category::Exploration)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// @ai:intent Which semantic service interface a query goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Symbol,
    Pattern,
}

/// @ai:intent A named text file materialized into a scenario workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFile {
    pub name: String,
    pub content: String,
}

impl FixtureFile {
    /// @ai:intent Create a fixture file
    /// @ai:effects pure
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// @ai:intent Ground-truth defect expected to be detectable in a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectMarker {
    pub description: String,
    /// Symbol name fragment or regex, depending on the scenario's query kind
    pub needle: String,
    /// Literal substring a text scan can spot; None when the defect has no textual signature
    pub marker: Option<String>,
    pub file: String,
}

/// @ai:intent A benchmark scenario definition
#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: String,
    pub description: String,
    pub category: Category,
    pub fixtures: Vec<FixtureFile>,
    /// Files the naive mode reads
    pub naive_files: Vec<String>,
    /// Symbol fragment looked up by exploration scenarios
    pub lookup: Option<String>,
    pub defects: Vec<DefectMarker>,
}

impl Scenario {
    /// @ai:intent Number of ground-truth defects
    /// @ai:effects pure
    pub fn expected_defects(&self) -> usize {
        self.defects.len()
    }

    /// @ai:intent Look up a fixture by file name
    /// @ai:effects pure
    pub fn fixture(&self, name: &str) -> Option<&FixtureFile> {
        self.fixtures.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("logic".parse::<Category>().is_err());
    }

    #[test]
    fn test_query_kind_by_category() {
        assert_eq!(Category::Syntax.query_kind(), QueryKind::Pattern);
        assert_eq!(Category::DanglingReference.query_kind(), QueryKind::Pattern);
        assert_eq!(Category::CircularReference.query_kind(), QueryKind::Symbol);
        assert_eq!(Category::Exploration.query_kind(), QueryKind::Symbol);
        assert!(!Category::Exploration.is_defect());
    }
}
