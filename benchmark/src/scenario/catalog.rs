//! @ai:module:intent Fixed, ordered catalog of benchmark scenarios
//! @ai:module:layer domain
//! @ai:module:public_api ScenarioCatalog, ScenarioCatalogTrait
//! @ai:module:depends_on scenario::definition, scenario::fixtures, config
//! @ai:module:stateless true

use crate::config::FilterConfig;
use crate::scenario::definition::{Category, DefectMarker, FixtureFile, Scenario};
use crate::scenario::fixtures::{defect_file, project_files};
use std::collections::HashSet;

/// @ai:intent Trait for scenario catalogs
pub trait ScenarioCatalogTrait: Send + Sync {
    /// @ai:intent Every scenario in stable order
    fn scenarios(&self) -> Vec<Scenario>;

    /// @ai:intent Scenarios passing the filter, order preserved
    fn filtered(&self, filter: &FilterConfig) -> Vec<Scenario> {
        self.scenarios()
            .into_iter()
            .filter(|s| filter.matches(s.category.as_str(), &s.id))
            .collect()
    }

    /// @ai:intent Look up a scenario by id
    fn by_id(&self, id: &str) -> Option<Scenario> {
        self.scenarios().into_iter().find(|s| s.id == id)
    }
}

/// @ai:intent Built-in catalog: seeded-defect scenarios followed by exploration lookups
pub struct ScenarioCatalog;

impl ScenarioCatalog {
    /// @ai:intent Create the built-in catalog
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Sanity-check the catalog definitions
    /// @ai:post empty vector when every check passes
    /// @ai:effects pure
    pub fn validate(&self) -> Vec<String> {
        check_scenarios(&self.scenarios())
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioCatalogTrait for ScenarioCatalog {
    fn scenarios(&self) -> Vec<Scenario> {
        let mut scenarios = defect_scenarios();
        scenarios.extend(exploration_scenarios());
        scenarios
    }
}

/// @ai:intent Check ids, fixture names, naive file lists and defect markers
/// @ai:effects pure
pub fn check_scenarios(scenarios: &[Scenario]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut ids = HashSet::new();

    for scenario in scenarios {
        if !ids.insert(scenario.id.as_str()) {
            problems.push(format!("duplicate scenario id: {}", scenario.id));
        }

        let mut names = HashSet::new();
        for fixture in &scenario.fixtures {
            if !names.insert(fixture.name.as_str()) {
                problems.push(format!(
                    "{}: duplicate fixture file {}",
                    scenario.id, fixture.name
                ));
            }
        }

        for file in &scenario.naive_files {
            if scenario.fixture(file).is_none() {
                problems.push(format!("{}: naive file {} is not a fixture", scenario.id, file));
            }
        }

        if scenario.category.is_defect() && scenario.defects.is_empty() {
            problems.push(format!("{}: defect scenario has no markers", scenario.id));
        }
        if !scenario.category.is_defect() && scenario.lookup.is_none() {
            problems.push(format!("{}: exploration scenario has no lookup", scenario.id));
        }

        for defect in &scenario.defects {
            let Some(fixture) = scenario.fixture(&defect.file) else {
                problems.push(format!(
                    "{}: marker file {} is not a fixture",
                    scenario.id, defect.file
                ));
                continue;
            };
            if defect.needle.trim().is_empty() {
                problems.push(format!("{}: empty needle for '{}'", scenario.id, defect.description));
            }
            if let Some(marker) = &defect.marker {
                if !fixture.content.contains(marker.as_str()) {
                    problems.push(format!(
                        "{}: marker '{}' not present in {}",
                        scenario.id, marker, defect.file
                    ));
                }
            }
        }
    }

    for category in Category::ALL {
        if !scenarios.iter().any(|s| s.category == category) {
            problems.push(format!("no scenario covers category {}", category));
        }
    }

    problems
}

/// @ai:intent Build a single-file defect scenario
/// @ai:effects pure
fn defect(
    id: &str,
    category: Category,
    file: &str,
    description: &str,
    needle: &str,
    marker: Option<&str>,
) -> Scenario {
    let fixtures: Vec<FixtureFile> = defect_file(file).into_iter().collect();
    Scenario {
        id: id.to_string(),
        description: description.to_string(),
        category,
        fixtures,
        naive_files: vec![file.to_string()],
        lookup: None,
        defects: vec![DefectMarker {
            description: description.to_string(),
            needle: needle.to_string(),
            marker: marker.map(str::to_string),
            file: file.to_string(),
        }],
    }
}

/// @ai:intent Build an exploration scenario over the sample project
/// @ai:effects pure
fn exploration(id: &str, description: &str, lookup: &str, naive_files: &[&str]) -> Scenario {
    Scenario {
        id: id.to_string(),
        description: description.to_string(),
        category: Category::Exploration,
        fixtures: project_files(),
        naive_files: naive_files.iter().map(|f| f.to_string()).collect(),
        lookup: Some(lookup.to_string()),
        defects: Vec::new(),
    }
}

fn defect_scenarios() -> Vec<Scenario> {
    vec![
        defect(
            "defect-syntax-unquoted-type",
            Category::Syntax,
            "syntax_errors.tf",
            "Missing quotes around resource type",
            r"resource\s+aws_vpc\s",
            Some("resource aws_vpc"),
        ),
        defect(
            "defect-type-instance-type",
            Category::TypeMismatch,
            "syntax_errors.tf",
            "Number instead of string for instance_type",
            "aws_instance.type_error",
            Some("instance_type = 123"),
        ),
        defect(
            "defect-missing-cidr-block",
            Category::MissingArgument,
            "syntax_errors.tf",
            "Missing required cidr_block",
            "incomplete",
            None,
        ),
        defect(
            "defect-circular-security-groups",
            Category::CircularReference,
            "logic_errors.tf",
            "Circular dependency between security groups",
            "aws_security_group.sg",
            None,
        ),
        defect(
            "defect-dangling-subnet",
            Category::DanglingReference,
            "reference_errors.tf",
            "Reference to non-existent subnet",
            r"aws_subnet\.nonexistent",
            Some("nonexistent"),
        ),
        defect(
            "defect-undefined-variable",
            Category::DanglingReference,
            "reference_errors.tf",
            "Reference to undefined variable",
            r"var\.undefined_variable",
            Some("undefined_variable"),
        ),
        defect(
            "defect-type-variable-default",
            Category::TypeMismatch,
            "variables_errors.tf",
            "String value for number type",
            "variable.instance_count",
            Some("not_a_number"),
        ),
    ]
}

fn exploration_scenarios() -> Vec<Scenario> {
    vec![
        exploration("explore-vpc", "Find all VPC resources", "aws_vpc", &["main.tf"]),
        exploration(
            "explore-security-groups",
            "Find all security groups",
            "security_group",
            &["main.tf"],
        ),
        exploration(
            "explore-variables",
            "List all variables",
            "variable",
            &["variables.tf"],
        ),
        exploration("explore-outputs", "List all outputs", "output", &["outputs.tf"]),
        exploration(
            "explore-database",
            "Find database-related resources",
            "db",
            &["main.tf", "variables.tf", "outputs.tf"],
        ),
        exploration(
            "explore-load-balancer",
            "Find load balancer configuration",
            "aws_lb",
            &["main.tf", "outputs.tf"],
        ),
        exploration(
            "explore-instances",
            "Find EC2 instances",
            "aws_instance",
            &["main.tf"],
        ),
        exploration(
            "explore-autoscaling",
            "Find auto scaling configuration",
            "autoscaling",
            &["main.tf", "variables.tf", "outputs.tf"],
        ),
        exploration(
            "explore-provider",
            "Find provider configuration",
            "provider",
            &["main.tf"],
        ),
        exploration(
            "explore-terraform",
            "Find terraform settings block",
            "terraform",
            &["main.tf"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let problems = ScenarioCatalog::new().validate();
        assert!(problems.is_empty(), "{:?}", problems);
    }

    #[test]
    fn test_ordering_is_stable() {
        let catalog = ScenarioCatalog::new();
        let first: Vec<String> = catalog.scenarios().into_iter().map(|s| s.id).collect();
        let second: Vec<String> = catalog.scenarios().into_iter().map(|s| s.id).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "defect-syntax-unquoted-type");
        assert_eq!(first.len(), 17);
    }

    #[test]
    fn test_exploration_scenarios_expect_no_defects() {
        for scenario in ScenarioCatalog::new().scenarios() {
            if scenario.category == Category::Exploration {
                assert_eq!(scenario.expected_defects(), 0);
                assert_eq!(scenario.fixtures.len(), 4);
            } else {
                assert_eq!(scenario.expected_defects(), 1);
            }
        }
    }

    #[test]
    fn test_filtered_by_category_and_id() {
        let catalog = ScenarioCatalog::new();
        let filter = FilterConfig {
            categories: Some(vec!["dangling_reference".to_string()]),
            scenario_ids: None,
        };
        let ids: Vec<String> = catalog.filtered(&filter).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["defect-dangling-subnet", "defect-undefined-variable"]);

        assert!(catalog.by_id("explore-vpc").is_some());
        assert!(catalog.by_id("explore-nothing").is_none());
    }

    #[test]
    fn test_check_reports_missing_marker_and_duplicates() {
        let mut broken = ScenarioCatalog::new().scenarios();
        broken[0].defects[0].marker = Some("not in the file".to_string());
        let duplicate = broken[0].fixtures[0].clone();
        broken[0].fixtures.push(duplicate);
        let repeated = broken[1].clone();
        broken.push(repeated);

        let problems = check_scenarios(&broken);
        assert!(problems.iter().any(|p| p.contains("marker 'not in the file'")));
        assert!(problems.iter().any(|p| p.contains("duplicate fixture file syntax_errors.tf")));
        assert!(problems.iter().any(|p| p.contains("duplicate scenario id")));
    }
}
