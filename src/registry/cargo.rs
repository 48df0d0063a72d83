use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ProjectRegistry;
use crate::core::{ProjectDescriptor, ProjectKind, ROOT_PROJECT_ID};
use crate::dependency_filter::DependencyFilter;
use crate::error::{AffectedError, RegistryError};
use crate::progress::ProgressReporter;
use crate::toml_parser::CargoToml;
use crate::utils::path::{normalize, qualified_id_for};
use crate::workspace_discovery::ProjectDiscovery;

#[derive(Debug, Clone)]
struct CargoProject {
    descriptor: ProjectDescriptor,
    /// `None` for the synthetic root aggregator
    manifest: Option<PathBuf>,
    /// Set when the manifest is not valid TOML
    parse_error: Option<String>,
}

/// Registry of the Cargo packages found below a working tree root.
///
/// Every package becomes a project whose qualified id mirrors its directory
/// (`crates/core` is `:crates:core`). When the root manifest is not itself a
/// package, a synthetic aggregator `:` owns the root directory so that files
/// like `Cargo.lock` still map to a project.
#[derive(Debug, Clone)]
pub struct CargoRegistry {
    root: PathBuf,
    projects: BTreeMap<String, CargoProject>,
    /// Workspace roots (relative) with their path dependencies, deepest first
    workspaces: Vec<(PathBuf, HashMap<String, PathBuf>)>,
    filter: DependencyFilter,
    warnings: Vec<String>,
}

impl CargoRegistry {
    /// Discover every package below `root`
    pub fn discover(
        root: &Path,
        filter: DependencyFilter,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<Self, AffectedError> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        let mut progress = progress;
        if let Some(p) = progress.as_mut() {
            p.start_discovery();
        }

        let mut discovery = ProjectDiscovery::new();
        let manifests = discovery.discover(&root, progress.as_deref())?;

        let mut projects = BTreeMap::new();
        let mut workspaces = Vec::new();

        for manifest in &manifests {
            if let Some(deps) = &manifest.workspace_dependencies {
                workspaces.push((manifest.relative.clone(), deps.clone()));
            }

            if let Some(name) = &manifest.package_name {
                let qualified_id = qualified_id_for(&manifest.relative);
                projects.insert(
                    qualified_id.clone(),
                    CargoProject {
                        descriptor: ProjectDescriptor::new(
                            qualified_id,
                            name.clone(),
                            manifest.relative.clone(),
                        ),
                        manifest: Some(manifest.manifest_path()),
                        parse_error: manifest.parse_error.clone(),
                    },
                );
            }
        }

        if !projects.contains_key(ROOT_PROJECT_ID) {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string());
            projects.insert(
                ROOT_PROJECT_ID.to_string(),
                CargoProject {
                    descriptor: ProjectDescriptor::new(ROOT_PROJECT_ID, name, PathBuf::new())
                        .with_kind(ProjectKind::Aggregator),
                    manifest: None,
                    parse_error: None,
                },
            );
        }

        workspaces.sort_by_key(|(dir, _)| std::cmp::Reverse(dir.components().count()));

        if let Some(p) = progress.as_mut() {
            p.finish_discovery(projects.len());
        }

        debug!(
            projects = projects.len(),
            workspaces = workspaces.len(),
            "discovered cargo projects"
        );

        Ok(Self {
            root,
            projects,
            workspaces,
            filter,
            warnings: discovery.warnings().to_vec(),
        })
    }

    /// The canonical working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Non-fatal problems found during discovery
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Path dependencies declared in the nearest enclosing workspace
    fn workspace_dependency_path(&self, project_dir: &Path, name: &str) -> Option<PathBuf> {
        self.workspaces
            .iter()
            .find(|(ws_dir, _)| project_dir.starts_with(ws_dir))
            .and_then(|(ws_dir, deps)| deps.get(name).map(|path| ws_dir.join(path)))
    }
}

impl ProjectRegistry for CargoRegistry {
    fn all_projects(&self) -> Vec<ProjectDescriptor> {
        self.projects
            .values()
            .map(|project| project.descriptor.clone())
            .collect()
    }

    fn direct_dependencies_of(&self, qualified_id: &str) -> Result<Vec<String>, RegistryError> {
        let project =
            self.projects
                .get(qualified_id)
                .ok_or_else(|| RegistryError::UnknownProject {
                    id: qualified_id.to_string(),
                })?;

        let Some(manifest) = &project.manifest else {
            return Ok(Vec::new());
        };

        if let Some(reason) = &project.parse_error {
            return Err(RegistryError::Unreadable {
                id: qualified_id.to_string(),
                message: reason.clone(),
            });
        }

        let cargo_toml =
            CargoToml::parse_file(manifest).map_err(|e| RegistryError::Unreadable {
                id: qualified_id.to_string(),
                message: match &e {
                    AffectedError::TomlParseError(inner) => format!("{e}: {}", inner.source),
                    _ => e.to_string(),
                },
            })?;

        let project_dir = &project.descriptor.root;
        let mut seen = HashSet::new();
        let mut dependency_ids = Vec::new();

        for (name, dep, dep_type) in cargo_toml.get_all_dependencies() {
            if !self.filter.should_include(&dep_type) {
                continue;
            }

            let target = if let Some(path) = CargoToml::extract_path(&dep) {
                Some(project_dir.join(path))
            } else if CargoToml::is_workspace_dependency(&dep) {
                self.workspace_dependency_path(project_dir, &name)
            } else {
                None
            };

            if let Some(target) = target {
                let id = qualified_id_for(&normalize(&target));
                if id != qualified_id && seen.insert(id.clone()) {
                    dependency_ids.push(id);
                }
            }
        }

        Ok(dependency_ids)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_package(root: &Path, dir: &str, name: &str, extra: &str) {
        fs::create_dir_all(root.join(dir).join("src")).unwrap();
        fs::write(
            root.join(dir).join("Cargo.toml"),
            format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\n\n{extra}"),
        )
        .unwrap();
    }

    fn create_monorepo() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(
            root.join("Cargo.toml"),
            r#"
[workspace]
members = ["libs/*", "services/*"]

[workspace.dependencies]
common-lib = { path = "libs/common-lib" }
serde = "1.0"
"#,
        )
        .unwrap();

        write_package(root, "libs/common-lib", "common-lib", "");
        write_package(
            root,
            "services/service",
            "service",
            "[dependencies]\ncommon-lib = { workspace = true }\nserde = { workspace = true }\n",
        );
        write_package(
            root,
            "services/app",
            "app",
            "[dependencies]\nservice = { path = \"../service\" }\n\n[dev-dependencies]\ncommon-lib = { path = \"../../libs/common-lib\" }\n",
        );
        write_package(
            root,
            "tools/broken",
            "broken",
            "[dependencies]\nservice = 42\n",
        );

        temp
    }

    #[test]
    fn test_discovers_packages_and_root_aggregator() {
        let temp = create_monorepo();
        let registry =
            CargoRegistry::discover(temp.path(), DependencyFilter::default(), None).unwrap();

        let ids: Vec<_> = registry
            .all_projects()
            .into_iter()
            .map(|p| p.qualified_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                ":",
                ":libs:common-lib",
                ":services:app",
                ":services:service",
                ":tools:broken",
            ]
        );

        let root = &registry.all_projects()[0];
        assert_eq!(root.kind, ProjectKind::Aggregator);
    }

    #[test]
    fn test_path_and_workspace_dependencies() {
        let temp = create_monorepo();
        let registry =
            CargoRegistry::discover(temp.path(), DependencyFilter::default(), None).unwrap();

        assert_eq!(
            registry.direct_dependencies_of(":services:service").unwrap(),
            vec![":libs:common-lib".to_string()]
        );
        assert_eq!(
            registry.direct_dependencies_of(":services:app").unwrap(),
            vec![":libs:common-lib".to_string(), ":services:service".to_string()]
        );
        assert_eq!(
            registry.direct_dependencies_of(":").unwrap(),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_dependency_filter_excludes_dev() {
        let temp = create_monorepo();
        let registry =
            CargoRegistry::discover(temp.path(), DependencyFilter::new(true, false, false), None)
                .unwrap();

        assert_eq!(
            registry.direct_dependencies_of(":services:app").unwrap(),
            vec![":services:service".to_string()]
        );
    }

    #[test]
    fn test_malformed_dependencies_are_a_registry_error() {
        let temp = create_monorepo();
        let registry =
            CargoRegistry::discover(temp.path(), DependencyFilter::default(), None).unwrap();

        assert!(matches!(
            registry.direct_dependencies_of(":tools:broken"),
            Err(RegistryError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_manifest_with_syntax_error_stays_registered() {
        let temp = create_monorepo();
        fs::create_dir_all(temp.path().join("tools/garbled")).unwrap();
        fs::write(
            temp.path().join("tools/garbled/Cargo.toml"),
            "[package]\nname = \"garbled-tool\"\nversion = \n",
        )
        .unwrap();

        let registry =
            CargoRegistry::discover(temp.path(), DependencyFilter::default(), None).unwrap();
        let garbled = registry
            .all_projects()
            .into_iter()
            .find(|p| p.qualified_id == ":tools:garbled")
            .unwrap();

        assert_eq!(garbled.name, "garbled-tool");
        assert_eq!(garbled.kind, ProjectKind::Package);
        assert!(matches!(
            registry.direct_dependencies_of(":tools:garbled"),
            Err(RegistryError::Unreadable { .. })
        ));
        assert_eq!(registry.warnings().len(), 1);
    }

    #[test]
    fn test_root_package_has_no_aggregator() {
        let temp = TempDir::new().unwrap();
        write_package(temp.path(), ".", "solo", "");

        let registry =
            CargoRegistry::discover(temp.path(), DependencyFilter::default(), None).unwrap();
        let projects = registry.all_projects();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "solo");
        assert_eq!(projects[0].kind, ProjectKind::Package);
    }
}
