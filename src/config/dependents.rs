//! Configuration for the dependents command

use std::path::PathBuf;

use crate::cli::ListFormat;
use crate::common::ConfigBuilder;
use crate::dependency_filter::DependencyFilter;
use crate::error::AffectedError;

#[derive(Debug, Clone)]
pub struct DependentsConfig {
    /// Qualified id or name of the project
    pub project: String,

    /// Repository root
    pub root: PathBuf,

    pub filter: DependencyFilter,

    /// Output format
    pub format: ListFormat,

    /// Snapshot to load instead of scanning the repository
    pub from: Option<PathBuf>,
}

impl DependentsConfig {
    pub fn builder() -> DependentsConfigBuilder {
        DependentsConfigBuilder::default()
    }
}

pub struct DependentsConfigBuilder {
    project: Option<String>,
    root: Option<PathBuf>,
    filter: DependencyFilter,
    format: ListFormat,
    from: Option<PathBuf>,
}

impl Default for DependentsConfigBuilder {
    fn default() -> Self {
        Self {
            project: None,
            root: None,
            filter: DependencyFilter::default(),
            format: ListFormat::Human,
            from: None,
        }
    }
}

impl DependentsConfigBuilder {
    pub fn with_project(mut self, project: String) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_filter(mut self, filter: DependencyFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_format(mut self, format: ListFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_from(mut self, from: Option<PathBuf>) -> Self {
        self.from = from;
        self
    }
}

impl ConfigBuilder for DependentsConfigBuilder {
    type Config = DependentsConfig;

    fn build(self) -> Result<DependentsConfig, AffectedError> {
        let project = self
            .project
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AffectedError::ConfigurationError {
                message: "A project name or qualified id is required".to_string(),
            })?;

        let root = self.root.ok_or_else(|| AffectedError::ConfigurationError {
            message: "Missing required field: root".to_string(),
        })?;

        Ok(DependentsConfig {
            project,
            root,
            filter: self.filter,
            format: self.format,
            from: self.from,
        })
    }
}
