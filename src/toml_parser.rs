use std::collections::HashMap;
use std::path::{Path, PathBuf};

use miette::{NamedSource, SourceSpan};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AffectedError, TomlParseError};

/// The parts of a manifest needed to decide whether a directory is a project.
///
/// A manifest whose dependency tables are malformed still parses here; the
/// failure surfaces when its dependencies are read.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestHeader {
    pub package: Option<Package>,
    pub workspace: Option<WorkspaceHeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceHeader {
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CargoToml {
    pub workspace: Option<Workspace>,
    pub dependencies: Option<HashMap<String, Dependency>>,
    #[serde(rename = "dev-dependencies")]
    pub dev_dependencies: Option<HashMap<String, Dependency>>,
    #[serde(rename = "build-dependencies")]
    pub build_dependencies: Option<HashMap<String, Dependency>>,
    pub target: Option<HashMap<String, TargetDependencies>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub name: String,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub dependencies: Option<HashMap<String, Dependency>>,
}

/// `[workspace.metadata]` / `[package.metadata]`; only our own table is read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    pub affected: Option<toml::Table>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetDependencies {
    pub dependencies: Option<HashMap<String, Dependency>>,
    #[serde(rename = "dev-dependencies")]
    pub dev_dependencies: Option<HashMap<String, Dependency>>,
    #[serde(rename = "build-dependencies")]
    pub build_dependencies: Option<HashMap<String, Dependency>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Simple(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailedDependency {
    pub path: Option<String>,
    pub workspace: Option<bool>,
}

/// Read and deserialize a TOML file, attaching the source span on failure
pub fn parse_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T, AffectedError> {
    let content = std::fs::read_to_string(path).map_err(|e| AffectedError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| {
        let span = e
            .span()
            .map(|span| SourceSpan::new(span.start.into(), span.end - span.start));

        AffectedError::TomlParseError(Box::new(TomlParseError {
            file: path.display().to_string(),
            source_code: NamedSource::new(path.display().to_string(), content.clone()),
            span,
            source: e,
        }))
    })
}

impl ManifestHeader {
    pub fn parse_file(path: &Path) -> Result<Self, AffectedError> {
        parse_toml_file(path)
    }

    /// Best-effort `[package] name` of a manifest that is not valid TOML.
    ///
    /// Scans line by line, so a syntax error elsewhere in the file does not
    /// hide the name.
    pub fn recover_package_name(content: &str) -> Option<String> {
        let mut in_package = false;

        for line in content.lines().map(str::trim) {
            if line.starts_with('[') {
                in_package = line.trim_end_matches(|c: char| c != ']') == "[package]";
                continue;
            }
            if !in_package {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() != "name" {
                continue;
            }
            let name = value
                .split('#')
                .next()
                .unwrap_or_default()
                .trim()
                .trim_matches(|c| c == '"' || c == '\'');
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }

        None
    }

    /// The `affected` metadata table, preferring the workspace one
    pub fn affected_metadata(&self) -> Option<&toml::Table> {
        self.workspace
            .as_ref()
            .and_then(|ws| ws.metadata.as_ref())
            .and_then(|m| m.affected.as_ref())
            .or_else(|| {
                self.package
                    .as_ref()
                    .and_then(|p| p.metadata.as_ref())
                    .and_then(|m| m.affected.as_ref())
            })
    }
}

impl CargoToml {
    pub fn parse_file(path: &Path) -> Result<Self, AffectedError> {
        parse_toml_file(path)
    }

    /// `[workspace.dependencies]` entries that point at a local path
    pub fn get_workspace_dependencies(&self) -> HashMap<String, PathBuf> {
        let mut deps = HashMap::new();

        if let Some(workspace) = &self.workspace
            && let Some(workspace_deps) = &workspace.dependencies
        {
            for (name, dep) in workspace_deps {
                if let Some(path) = Self::extract_path(dep) {
                    deps.insert(name.clone(), PathBuf::from(path));
                }
            }
        }

        deps
    }

    pub fn get_all_dependencies(&self) -> Vec<(String, Dependency, DependencyType)> {
        let mut all_deps = Vec::new();

        let mut push_all = |deps: &Option<HashMap<String, Dependency>>, dep_type: DependencyType| {
            if let Some(deps) = deps {
                for (name, dep) in deps {
                    all_deps.push((name.clone(), dep.clone(), dep_type.clone()));
                }
            }
        };

        push_all(&self.dependencies, DependencyType::Normal);
        push_all(&self.dev_dependencies, DependencyType::Dev);
        push_all(&self.build_dependencies, DependencyType::Build);

        if let Some(targets) = &self.target {
            for (target_name, target_deps) in targets {
                push_all(
                    &target_deps.dependencies,
                    DependencyType::Target(target_name.clone()),
                );
                push_all(
                    &target_deps.dev_dependencies,
                    DependencyType::TargetDev(target_name.clone()),
                );
                push_all(
                    &target_deps.build_dependencies,
                    DependencyType::TargetBuild(target_name.clone()),
                );
            }
        }

        // HashMap iteration order is random; keep reads reproducible
        all_deps.sort_by(|a, b| a.0.cmp(&b.0));
        all_deps
    }

    pub fn extract_path(dep: &Dependency) -> Option<String> {
        match dep {
            Dependency::Simple(_) => None,
            Dependency::Detailed(detailed) => detailed.path.clone(),
        }
    }

    pub fn is_workspace_dependency(dep: &Dependency) -> bool {
        match dep {
            Dependency::Simple(_) => false,
            Dependency::Detailed(detailed) => detailed.workspace.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DependencyType {
    Normal,
    Dev,
    Build,
    Target(String),
    TargetDev(String),
    TargetBuild(String),
}

impl DependencyType {
    pub fn is_dev(&self) -> bool {
        matches!(self, DependencyType::Dev | DependencyType::TargetDev(_))
    }

    pub fn is_build(&self) -> bool {
        matches!(self, DependencyType::Build | DependencyType::TargetBuild(_))
    }

    pub fn is_target_specific(&self) -> bool {
        matches!(
            self,
            DependencyType::Target(_) | DependencyType::TargetDev(_) | DependencyType::TargetBuild(_)
        )
    }
}
