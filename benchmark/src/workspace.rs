//! @ai:module:intent Materialize scenario fixtures into owned, self-cleaning workspaces
//! @ai:module:layer infrastructure
//! @ai:module:public_api FixtureMaterializer, FixtureMaterializerTrait, OwnedWorkspace, snapshot
//! @ai:module:depends_on scenario, error
//! @ai:module:stateless true

use crate::error::FixtureError;
use crate::scenario::Scenario;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// @ai:intent Trait for writing a scenario's fixtures to disk
pub trait FixtureMaterializerTrait: Send + Sync {
    /// @ai:intent Write every fixture of scenario under workspace
    /// @ai:pre fixture names are unique within the scenario
    /// @ai:post files are byte-identical to the scenario definition
    /// @ai:effects fs:write
    fn materialize(&self, scenario: &Scenario, workspace: &Path)
        -> Result<Vec<PathBuf>, FixtureError>;
}

/// @ai:intent Writes fixtures, refusing to clobber foreign content
pub struct FixtureMaterializer;

impl FixtureMaterializer {
    /// @ai:intent Create a new materializer
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Ensure an existing workspace only holds this scenario's exact fixtures
    /// @ai:effects fs:read
    fn check_existing(scenario: &Scenario, workspace: &Path) -> Result<(), FixtureError> {
        let entries = fs::read_dir(workspace).map_err(|e| FixtureError::io(workspace, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| FixtureError::io(workspace, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            let Some(fixture) = scenario.fixture(&name) else {
                return Err(FixtureError::Collision {
                    path: workspace.to_path_buf(),
                    file: name,
                });
            };

            let path = entry.path();
            let identical = path.is_file()
                && fs::read(&path).map_err(|e| FixtureError::io(&path, e))?
                    == fixture.content.as_bytes();
            if !identical {
                return Err(FixtureError::Collision {
                    path: workspace.to_path_buf(),
                    file: name,
                });
            }
        }

        Ok(())
    }
}

impl Default for FixtureMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureMaterializerTrait for FixtureMaterializer {
    fn materialize(
        &self,
        scenario: &Scenario,
        workspace: &Path,
    ) -> Result<Vec<PathBuf>, FixtureError> {
        let mut seen = HashSet::new();
        for fixture in &scenario.fixtures {
            if !seen.insert(fixture.name.as_str()) {
                return Err(FixtureError::DuplicateFile {
                    scenario: scenario.id.clone(),
                    file: fixture.name.clone(),
                });
            }
        }

        if workspace.exists() {
            if !workspace.is_dir() {
                return Err(FixtureError::Collision {
                    path: workspace.to_path_buf(),
                    file: String::new(),
                });
            }
            Self::check_existing(scenario, workspace)?;
        } else {
            fs::create_dir_all(workspace).map_err(|e| FixtureError::io(workspace, e))?;
        }

        let mut written = Vec::with_capacity(scenario.fixtures.len());
        for fixture in &scenario.fixtures {
            let path = workspace.join(&fixture.name);
            fs::write(&path, fixture.content.as_bytes()).map_err(|e| FixtureError::io(&path, e))?;
            written.push(path);
        }

        tracing::debug!(
            "Materialized {} fixture file(s) for {} into {}",
            written.len(),
            scenario.id,
            workspace.display()
        );

        Ok(written)
    }
}

/// @ai:intent Temporary workspace owned by one scenario run, removed on drop
#[derive(Debug)]
pub struct OwnedWorkspace {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl OwnedWorkspace {
    /// @ai:intent Create a fresh directory and materialize the scenario into it
    /// @ai:post the directory is deleted when the value is dropped, on every exit path
    /// @ai:effects fs:write
    pub fn acquire<M: FixtureMaterializerTrait + ?Sized>(
        scenario: &Scenario,
        parent: Option<&Path>,
        materializer: &M,
    ) -> Result<Self, FixtureError> {
        let prefix = format!("tflsp-{}-", scenario.id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match parent {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| FixtureError::io(parent, e))?;
                builder.tempdir_in(parent).map_err(|e| FixtureError::io(parent, e))?
            }
            None => builder
                .tempdir()
                .map_err(|e| FixtureError::io(std::env::temp_dir(), e))?,
        };

        let files = materializer.materialize(scenario, dir.path())?;
        Ok(Self { dir, files })
    }

    /// @ai:intent Root directory of the workspace
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// @ai:intent Paths of the materialized files
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// @ai:intent Delete the workspace now, surfacing any I/O error
    /// @ai:effects fs:write
    pub fn close(self) -> Result<(), FixtureError> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| FixtureError::io(path, e))
    }
}

/// @ai:intent Read every file under root into a relative-path keyed map
/// @ai:post keys use forward slashes
/// @ai:effects fs:read
pub fn snapshot(root: &Path) -> Result<BTreeMap<String, Vec<u8>>, FixtureError> {
    let mut tree = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            FixtureError::io(path, std::io::Error::other(e.to_string()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        let bytes = fs::read(path).map_err(|e| FixtureError::io(path, e))?;
        tree.insert(relative, bytes);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{ScenarioCatalog, ScenarioCatalogTrait};
    use pretty_assertions::assert_eq;

    fn scenario(id: &str) -> Scenario {
        ScenarioCatalog::new().by_id(id).unwrap()
    }

    #[test]
    fn test_materialize_writes_all_fixtures() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("ws");
        let scenario = scenario("explore-vpc");

        let files = FixtureMaterializer::new().materialize(&scenario, &target).unwrap();

        assert_eq!(files.len(), 4);
        let main = fs::read_to_string(target.join("main.tf")).unwrap();
        assert_eq!(main, scenario.fixture("main.tf").unwrap().content);
    }

    #[test]
    fn test_materialize_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let scenario = scenario("defect-dangling-subnet");
        let materializer = FixtureMaterializer::new();

        materializer.materialize(&scenario, dir.path()).unwrap();
        let first = snapshot(dir.path()).unwrap();
        materializer.materialize(&scenario, dir.path()).unwrap();
        let second = snapshot(dir.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_foreign_content_is_a_collision() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let err = FixtureMaterializer::new()
            .materialize(&scenario("defect-dangling-subnet"), dir.path())
            .unwrap_err();

        assert!(matches!(err, FixtureError::Collision { ref file, .. } if file == "notes.txt"));
        assert_eq!(fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "keep me");
    }

    #[test]
    fn test_modified_fixture_is_a_collision() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("reference_errors.tf"), "# edited").unwrap();

        let err = FixtureMaterializer::new()
            .materialize(&scenario("defect-dangling-subnet"), dir.path())
            .unwrap_err();

        assert!(matches!(err, FixtureError::Collision { .. }));
    }

    #[test]
    fn test_duplicate_fixture_names_rejected() {
        let dir = TempDir::new().unwrap();
        let mut scenario = scenario("defect-dangling-subnet");
        let copy = scenario.fixtures[0].clone();
        scenario.fixtures.push(copy);

        let err = FixtureMaterializer::new()
            .materialize(&scenario, &dir.path().join("ws"))
            .unwrap_err();

        assert!(matches!(err, FixtureError::DuplicateFile { .. }));
    }

    #[test]
    fn test_owned_workspace_removed_on_drop() {
        let parent = TempDir::new().unwrap();
        let path = {
            let workspace = OwnedWorkspace::acquire(
                &scenario("explore-outputs"),
                Some(parent.path()),
                &FixtureMaterializer::new(),
            )
            .unwrap();
            assert!(workspace.path().join("outputs.tf").is_file());
            assert_eq!(workspace.files().len(), 4);
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_owned_workspace_close() {
        let workspace = OwnedWorkspace::acquire(
            &scenario("explore-outputs"),
            None,
            &FixtureMaterializer::new(),
        )
        .unwrap();
        let path = workspace.path().to_path_buf();
        workspace.close().unwrap();
        assert!(!path.exists());
    }
}
