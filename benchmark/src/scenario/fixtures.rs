//! @ai:module:intent Embedded Terraform fixture text
//! @ai:module:layer domain
//! @ai:module:public_api project_files, defect_file, DEFECT_FILES
//! @ai:module:stateless true

use crate::scenario::definition::FixtureFile;

const MAIN_TF: &str = include_str!("../../fixtures/project/main.tf");
const VARIABLES_TF: &str = include_str!("../../fixtures/project/variables.tf");
const OUTPUTS_TF: &str = include_str!("../../fixtures/project/outputs.tf");
const USER_DATA_SH: &str = include_str!("../../fixtures/project/user_data.sh");

const SYNTAX_ERRORS_TF: &str = include_str!("../../fixtures/defects/syntax_errors.tf");
const LOGIC_ERRORS_TF: &str = include_str!("../../fixtures/defects/logic_errors.tf");
const REFERENCE_ERRORS_TF: &str = include_str!("../../fixtures/defects/reference_errors.tf");
const VARIABLES_ERRORS_TF: &str = include_str!("../../fixtures/defects/variables_errors.tf");

pub const DEFECT_FILES: [&str; 4] = [
    "syntax_errors.tf",
    "logic_errors.tf",
    "reference_errors.tf",
    "variables_errors.tf",
];

/// @ai:intent The realistic multi-file project used by exploration scenarios
/// @ai:effects pure
pub fn project_files() -> Vec<FixtureFile> {
    vec![
        FixtureFile::new("main.tf", MAIN_TF),
        FixtureFile::new("variables.tf", VARIABLES_TF),
        FixtureFile::new("outputs.tf", OUTPUTS_TF),
        FixtureFile::new("user_data.sh", USER_DATA_SH),
    ]
}

/// @ai:intent Fixture file with seeded defects, by name
/// @ai:example ("logic_errors.tf") -> Some(..)
/// @ai:example ("main.tf") -> None
/// @ai:effects pure
pub fn defect_file(name: &str) -> Option<FixtureFile> {
    let content = match name {
        "syntax_errors.tf" => SYNTAX_ERRORS_TF,
        "logic_errors.tf" => LOGIC_ERRORS_TF,
        "reference_errors.tf" => REFERENCE_ERRORS_TF,
        "variables_errors.tf" => VARIABLES_ERRORS_TF,
        _ => return None,
    };
    Some(FixtureFile::new(name, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_defect_file_is_embedded() {
        for name in DEFECT_FILES {
            let file = defect_file(name).unwrap();
            assert!(!file.content.is_empty());
        }
        assert!(defect_file("main.tf").is_none());
    }

    #[test]
    fn test_project_files_parse_as_terraform() {
        for file in project_files().iter().filter(|f| f.name.ends_with(".tf")) {
            let blocks = tfsym::parse_source(&file.content, std::path::Path::new(&file.name)).unwrap();
            assert!(!blocks.is_empty(), "{} has no blocks", file.name);
        }
    }
}
