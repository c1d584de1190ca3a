//! @ai:module:intent Benchmark scenarios and their embedded fixtures
//! @ai:module:layer domain
//! @ai:module:public_api Scenario, Category, QueryKind, FixtureFile, DefectMarker, ScenarioCatalog

pub mod catalog;
pub mod definition;
pub mod fixtures;

pub use catalog::{check_scenarios, ScenarioCatalog, ScenarioCatalogTrait};
pub use definition::{Category, DefectMarker, FixtureFile, QueryKind, Scenario};
pub use fixtures::{defect_file, project_files, DEFECT_FILES};
