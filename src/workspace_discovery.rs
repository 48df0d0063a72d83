use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::detection::SKIPPED_DIRS;
use crate::error::AffectedError;
use crate::progress::ProgressReporter;
use crate::toml_parser::{CargoToml, ManifestHeader};

/// Walks a working tree and collects every Cargo manifest in it
pub struct ProjectDiscovery {
    warnings: Vec<String>,
}

impl Default for ProjectDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectDiscovery {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Problems that did not stop discovery, e.g. unparseable manifests
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Discover all manifests below `root`, sorted by relative path
    pub fn discover(
        &mut self,
        root: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<DiscoveredManifest>, AffectedError> {
        if !root.is_dir() {
            return Err(AffectedError::ConfigurationError {
                message: format!("'{}' is not a directory", root.display()),
            });
        }

        let manifest_paths: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !(e.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == "Cargo.toml")
            .map(|e| e.into_path())
            .collect();

        debug!(count = manifest_paths.len(), "found Cargo manifests");

        let results: Vec<Result<DiscoveredManifest, String>> = manifest_paths
            .into_par_iter()
            .map(|manifest_path| {
                if let Some(p) = progress {
                    p.checking_manifest(&manifest_path);
                }
                Self::load_manifest(root, &manifest_path)
            })
            .collect();

        let mut manifests = Vec::new();
        for result in results {
            match result {
                Ok(manifest) => {
                    if let Some(reason) = &manifest.parse_error {
                        let warning = format!(
                            "Failed to parse {}: {}",
                            manifest.manifest_path().display(),
                            reason
                        );
                        warn!("{warning}");
                        self.warnings.push(warning);
                    }
                    manifests.push(manifest);
                }
                Err(warning) => {
                    warn!("{warning}");
                    self.warnings.push(warning);
                }
            }
        }

        manifests.sort_by(|a, b| a.relative.cmp(&b.relative));

        Ok(manifests)
    }

    fn load_manifest(root: &Path, manifest_path: &Path) -> Result<DiscoveredManifest, String> {
        let dir = manifest_path
            .parent()
            .ok_or_else(|| format!("Manifest {} has no parent", manifest_path.display()))?;
        let relative = dir
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let header = match ManifestHeader::parse_file(manifest_path) {
            Ok(header) => header,
            // Still a project: it keeps ownership of its files and is read
            // as unresolved later
            Err(e) => {
                let reason = match &e {
                    AffectedError::TomlParseError(inner) => format!("{e}: {}", inner.source),
                    _ => e.to_string(),
                };
                let package_name = std::fs::read_to_string(manifest_path)
                    .ok()
                    .and_then(|content| ManifestHeader::recover_package_name(&content))
                    .or_else(|| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| "root".to_string());

                return Ok(DiscoveredManifest {
                    dir: dir.to_path_buf(),
                    relative,
                    package_name: Some(package_name),
                    workspace_dependencies: None,
                    parse_error: Some(reason),
                });
            }
        };

        let workspace_dependencies = if header.workspace.is_some() {
            match CargoToml::parse_file(manifest_path) {
                Ok(cargo_toml) => Some(cargo_toml.get_workspace_dependencies()),
                Err(e) => {
                    warn!(
                        manifest = %manifest_path.display(),
                        error = %e,
                        "workspace dependencies unreadable"
                    );
                    Some(HashMap::new())
                }
            }
        } else {
            None
        };

        Ok(DiscoveredManifest {
            dir: dir.to_path_buf(),
            relative,
            package_name: header.package.map(|p| p.name),
            workspace_dependencies,
            parse_error: None,
        })
    }
}

/// A `Cargo.toml` found during discovery
#[derive(Debug, Clone)]
pub struct DiscoveredManifest {
    /// Directory containing the manifest
    pub dir: PathBuf,
    /// `dir` relative to the discovery root; empty for the root itself
    pub relative: PathBuf,
    /// Set when the manifest has a `[package]` table, or when it could not
    /// be parsed at all (recovered name, else the directory name)
    pub package_name: Option<String>,
    /// Set when the manifest has a `[workspace]` table: path dependencies
    /// declared in `[workspace.dependencies]`, relative to `dir`
    pub workspace_dependencies: Option<HashMap<String, PathBuf>>,
    /// Why the manifest is not valid TOML
    pub parse_error: Option<String>,
}

impl DiscoveredManifest {
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join("Cargo.toml")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(
            root.join("Cargo.toml"),
            r#"
[workspace]
members = ["crates/*"]

[workspace.dependencies]
shared = { path = "crates/shared" }
"#,
        )
        .unwrap();

        for name in ["shared", "app"] {
            fs::create_dir_all(root.join("crates").join(name)).unwrap();
            fs::write(
                root.join("crates").join(name).join("Cargo.toml"),
                format!("[package]\nname = \"{name}\"\n"),
            )
            .unwrap();
        }

        // Build output must never be mistaken for a project
        fs::create_dir_all(root.join("target/package/ghost")).unwrap();
        fs::write(
            root.join("target/package/ghost/Cargo.toml"),
            "[package]\nname = \"ghost\"\n",
        )
        .unwrap();

        fs::create_dir_all(root.join("broken")).unwrap();
        fs::write(root.join("broken/Cargo.toml"), "[package\n").unwrap();

        temp
    }

    #[test]
    fn test_discover_manifests() {
        let temp = create_test_tree();
        let mut discovery = ProjectDiscovery::new();

        let manifests = discovery.discover(temp.path(), None).unwrap();

        let relative: Vec<_> = manifests.iter().map(|m| m.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::new(),
                PathBuf::from("broken"),
                PathBuf::from("crates/app"),
                PathBuf::from("crates/shared"),
            ]
        );

        let root = &manifests[0];
        assert!(root.package_name.is_none());
        assert_eq!(
            root.workspace_dependencies.as_ref().unwrap().get("shared"),
            Some(&PathBuf::from("crates/shared"))
        );

        let broken = &manifests[1];
        assert_eq!(broken.package_name.as_deref(), Some("broken"));
        assert!(broken.parse_error.is_some());

        assert_eq!(manifests[2].package_name.as_deref(), Some("app"));
        assert!(manifests[2].parse_error.is_none());
        assert_eq!(discovery.warnings().len(), 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut discovery = ProjectDiscovery::new();

        let result = discovery.discover(&temp.path().join("nope"), None);
        assert!(matches!(
            result,
            Err(AffectedError::ConfigurationError { .. })
        ));
    }
}
