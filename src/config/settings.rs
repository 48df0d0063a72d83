//! Repository-level defaults read from the root `Cargo.toml`

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::constants::detection::{
    DEFAULT_BASE_BRANCH, DEFAULT_GIT_TIMEOUT, DEFAULT_INCLUDE_UNTRACKED,
};
use crate::error::AffectedError;
use crate::toml_parser::ManifestHeader;

/// Contents of `[workspace.metadata.affected]` (or
/// `[package.metadata.affected]`), with built-in defaults for missing keys
///
/// ```toml
/// [workspace.metadata.affected]
/// base-branch = "develop"
/// include-untracked = false
/// git-timeout-secs = 60
/// ignore = ["**/*.md", "docs/**"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AffectedSettings {
    pub base_branch: String,
    pub include_untracked: bool,
    pub git_timeout_secs: u64,
    pub ignore: Vec<String>,
}

impl Default for AffectedSettings {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            include_untracked: DEFAULT_INCLUDE_UNTRACKED,
            git_timeout_secs: DEFAULT_GIT_TIMEOUT.as_secs(),
            ignore: Vec::new(),
        }
    }
}

impl AffectedSettings {
    /// Settings of the repository at `root`; defaults when there is no root
    /// manifest or it has no `affected` metadata
    pub fn load(root: &Path) -> Result<Self, AffectedError> {
        let manifest = root.join("Cargo.toml");
        if !manifest.is_file() {
            return Ok(Self::default());
        }

        let header = ManifestHeader::parse_file(&manifest)?;
        let Some(table) = header.affected_metadata() else {
            return Ok(Self::default());
        };

        let settings: Self = toml::Value::Table(table.clone())
            .try_into()
            .map_err(|e| AffectedError::ConfigurationError {
                message: format!(
                    "Invalid `affected` metadata in '{}': {e}",
                    manifest.display()
                ),
            })?;

        debug!(?settings, "loaded repository settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults_without_manifest() {
        let temp = TempDir::new().unwrap();

        let settings = AffectedSettings::load(temp.path()).unwrap();

        assert_eq!(settings, AffectedSettings::default());
        assert_eq!(settings.base_branch, "main");
        assert!(settings.include_untracked);
    }

    #[test]
    fn test_workspace_metadata() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            r#"
[workspace]
members = []

[workspace.metadata.affected]
base-branch = "develop"
ignore = ["**/*.md"]
"#,
        )
        .unwrap();

        let settings = AffectedSettings::load(temp.path()).unwrap();

        assert_eq!(settings.base_branch, "develop");
        assert_eq!(settings.ignore, vec!["**/*.md".to_string()]);
        assert_eq!(settings.git_timeout_secs, 30);
        assert!(settings.include_untracked);
    }

    #[test]
    fn test_package_metadata() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            r#"
[package]
name = "root"
version = "0.1.0"

[package.metadata.affected]
include-untracked = false
"#,
        )
        .unwrap();

        let settings = AffectedSettings::load(temp.path()).unwrap();

        assert!(!settings.include_untracked);
        assert_eq!(settings.base_branch, "main");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            r#"
[workspace]

[workspace.metadata.affected]
base_branch = "develop"
"#,
        )
        .unwrap();

        let err = AffectedSettings::load(temp.path()).unwrap_err();

        assert!(matches!(err, AffectedError::ConfigurationError { .. }));
    }
}
