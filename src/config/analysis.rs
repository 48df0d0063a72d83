//! Configuration shared by every command that runs an impact analysis

use std::path::PathBuf;
use std::time::Duration;

use super::settings::AffectedSettings;
use crate::common::ConfigBuilder;
use crate::dependency_filter::DependencyFilter;
use crate::error::AffectedError;
use crate::vcs::ChangedFilesOptions;

/// Where changed files come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// An explicit list, git is not consulted
    Files(Vec<String>),
    Git(ChangedFilesOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Repository root
    pub root: PathBuf,

    /// Dependency kinds that count as project edges
    pub filter: DependencyFilter,

    pub source: ChangeSource,

    /// Globs of root-relative paths that never count as changes
    pub ignore: Vec<String>,
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Command-line values are `Option`s so that unset ones fall back to the
/// repository settings, then to built-in defaults.
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    root: Option<PathBuf>,
    filter: DependencyFilter,
    files: Option<Vec<String>>,
    base_branch: Option<String>,
    include_untracked: Option<bool>,
    git_timeout: Option<Duration>,
    ignore: Vec<String>,
    settings: Option<AffectedSettings>,
}

impl AnalysisConfigBuilder {
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_filter(mut self, filter: DependencyFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_files(mut self, files: Option<Vec<String>>) -> Self {
        self.files = files;
        self
    }

    pub fn with_base_branch(mut self, base_branch: Option<String>) -> Self {
        self.base_branch = base_branch;
        self
    }

    pub fn with_include_untracked(mut self, include_untracked: Option<bool>) -> Self {
        self.include_untracked = include_untracked;
        self
    }

    pub fn with_git_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.git_timeout = timeout;
        self
    }

    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Use these settings instead of reading them from the root manifest
    pub fn with_settings(mut self, settings: AffectedSettings) -> Self {
        self.settings = Some(settings);
        self
    }
}

impl ConfigBuilder for AnalysisConfigBuilder {
    type Config = AnalysisConfig;

    fn build(self) -> Result<AnalysisConfig, AffectedError> {
        let root = self.root.ok_or_else(|| AffectedError::ConfigurationError {
            message: "Missing required field: root".to_string(),
        })?;

        let settings = match self.settings {
            Some(settings) => settings,
            None => AffectedSettings::load(&root)?,
        };

        let timeout = self
            .git_timeout
            .unwrap_or(Duration::from_secs(settings.git_timeout_secs));
        if timeout.is_zero() {
            return Err(AffectedError::ConfigurationError {
                message: "Git timeout must be at least one second".to_string(),
            });
        }

        let source = match self.files {
            Some(files) => ChangeSource::Files(
                files
                    .into_iter()
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect(),
            ),
            None => {
                let base_branch = self.base_branch.unwrap_or(settings.base_branch);
                if base_branch.trim().is_empty() {
                    return Err(AffectedError::ConfigurationError {
                        message: "Base branch must not be empty".to_string(),
                    });
                }
                ChangeSource::Git(
                    ChangedFilesOptions::default()
                        .with_base_branch(base_branch)
                        .with_include_untracked(
                            self.include_untracked
                                .unwrap_or(settings.include_untracked),
                        )
                        .with_timeout(timeout),
                )
            }
        };

        let mut ignore = settings.ignore;
        ignore.extend(self.ignore);

        Ok(AnalysisConfig {
            root,
            filter: self.filter,
            source,
            ignore,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings() -> AffectedSettings {
        AffectedSettings {
            base_branch: "develop".to_string(),
            include_untracked: true,
            git_timeout_secs: 10,
            ignore: vec!["**/*.md".to_string()],
        }
    }

    #[test]
    fn test_settings_fill_unset_values() {
        let config = AnalysisConfig::builder()
            .with_root(PathBuf::from("/repo"))
            .with_settings(settings())
            .build()
            .unwrap();

        assert_eq!(
            config.source,
            ChangeSource::Git(ChangedFilesOptions {
                base_branch: "develop".to_string(),
                include_untracked: true,
                timeout: Duration::from_secs(10),
            })
        );
        assert_eq!(config.ignore, vec!["**/*.md".to_string()]);
    }

    #[test]
    fn test_flags_override_settings() {
        let config = AnalysisConfig::builder()
            .with_root(PathBuf::from("/repo"))
            .with_settings(settings())
            .with_base_branch(Some("release".to_string()))
            .with_include_untracked(Some(false))
            .with_git_timeout(Some(Duration::from_secs(5)))
            .with_ignore(vec!["docs/**".to_string()])
            .build()
            .unwrap();

        assert_eq!(
            config.source,
            ChangeSource::Git(ChangedFilesOptions {
                base_branch: "release".to_string(),
                include_untracked: false,
                timeout: Duration::from_secs(5),
            })
        );
        assert_eq!(
            config.ignore,
            vec!["**/*.md".to_string(), "docs/**".to_string()]
        );
    }

    #[test]
    fn test_flag_reenables_untracked_files_disabled_in_settings() {
        let settings = AffectedSettings {
            include_untracked: false,
            ..settings()
        };

        let build = |flag: Option<bool>| {
            AnalysisConfig::builder()
                .with_root(PathBuf::from("/repo"))
                .with_settings(settings.clone())
                .with_include_untracked(flag)
                .build()
                .unwrap()
                .source
        };
        let untracked = |source: ChangeSource| match source {
            ChangeSource::Git(options) => options.include_untracked,
            ChangeSource::Files(_) => panic!("expected git source"),
        };

        assert!(!untracked(build(None)));
        assert!(untracked(build(Some(true))));
    }

    #[test]
    fn test_explicit_files_bypass_git() {
        let config = AnalysisConfig::builder()
            .with_root(PathBuf::from("/repo"))
            .with_settings(AffectedSettings::default())
            .with_files(Some(vec![" a.rs".to_string(), String::new()]))
            .build()
            .unwrap();

        assert_eq!(config.source, ChangeSource::Files(vec!["a.rs".to_string()]));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = AnalysisConfig::builder()
            .with_settings(AffectedSettings::default())
            .build();

        assert!(matches!(
            result,
            Err(AffectedError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = AnalysisConfig::builder()
            .with_root(PathBuf::from("/repo"))
            .with_settings(AffectedSettings::default())
            .with_git_timeout(Some(Duration::ZERO))
            .build();

        assert!(result.is_err());
    }
}
