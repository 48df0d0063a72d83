//! Core type definitions
//!
//! This module contains the basic data structures used throughout the
//! application, with minimal logic - focusing on data representation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Qualified id of the project rooted at the top of the working tree
pub const ROOT_PROJECT_ID: &str = ":";

/// Changed files grouped by the qualified id of the owning project.
///
/// File paths are relative to the owning project's root and keep the order
/// in which they were discovered.
pub type ChangedFilesByProject = BTreeMap<String, Vec<String>>;

/// What kind of buildable unit a project is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    /// A real package with its own manifest
    #[default]
    Package,
    /// A synthetic project that only owns files no package claims
    Aggregator,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Package => write!(f, "package"),
            ProjectKind::Aggregator => write!(f, "aggregator"),
        }
    }
}

/// A project as enumerated by a registry, before any change information is
/// attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub qualified_id: String,
    pub name: String,
    /// Root directory relative to the working tree root; empty for the root
    pub root: PathBuf,
    pub kind: ProjectKind,
}

impl ProjectDescriptor {
    pub fn new(
        qualified_id: impl Into<String>,
        name: impl Into<String>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            qualified_id: qualified_id.into(),
            name: name.into(),
            root: root.into(),
            kind: ProjectKind::Package,
        }
    }

    pub fn with_kind(mut self, kind: ProjectKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Whether a node's dependency list could be read completely
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DependencyStatus {
    #[default]
    Complete,
    /// The registry failed to report dependencies; the node was built with
    /// an empty dependency list
    Unresolved(String),
}

impl DependencyStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, DependencyStatus::Complete)
    }
}

/// One project in the analysed dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub name: String,
    pub qualified_id: String,
    #[serde(default)]
    pub dependency_ids: Vec<String>,
    #[serde(default)]
    pub changed_files: Vec<String>,
    #[serde(default)]
    pub kind: ProjectKind,
    #[serde(default)]
    pub dependency_status: DependencyStatus,
}

impl ProjectNode {
    pub fn new(name: impl Into<String>, qualified_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_id: qualified_id.into(),
            dependency_ids: Vec::new(),
            changed_files: Vec::new(),
            kind: ProjectKind::Package,
            dependency_status: DependencyStatus::Complete,
        }
    }

    pub fn with_dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependency_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_changed_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kind(mut self, kind: ProjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_dependency_status(mut self, status: DependencyStatus) -> Self {
        self.dependency_status = status;
        self
    }

    /// True if the project contains at least one changed file
    pub fn has_changes(&self) -> bool {
        !self.changed_files.is_empty()
    }

    /// True if the project directly declares a dependency on `id`
    pub fn has_dependency(&self, id: &str) -> bool {
        self.dependency_ids.iter().any(|dep| dep == id)
    }

    pub fn is_aggregator(&self) -> bool {
        self.kind == ProjectKind::Aggregator
    }
}

impl fmt::Display for ProjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProjectNode(name='{}', qualified_id='{}', dependencies={}, changed_files={} files)",
            self.name,
            self.qualified_id,
            self.dependency_ids.len(),
            self.changed_files.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_changes() {
        let node = ProjectNode::new("test-project", ":test-project")
            .with_changed_files(["src/main.rs", "Cargo.toml"]);
        assert!(node.has_changes());

        let node = ProjectNode::new("test-project", ":test-project");
        assert!(!node.has_changes());
    }

    #[test]
    fn test_has_dependency() {
        let node = ProjectNode::new("test-project", ":test-project")
            .with_dependencies([":common-lib", ":utils"]);

        assert!(node.has_dependency(":common-lib"));
        assert!(node.has_dependency(":utils"));
        assert!(!node.has_dependency(":other-lib"));
    }

    #[test]
    fn test_display_includes_counts() {
        let node = ProjectNode::new("test-project", ":test-project")
            .with_dependencies([":dep1", ":dep2"])
            .with_changed_files(["a.rs", "b.rs", "c.rs"]);

        assert_eq!(
            node.to_string(),
            "ProjectNode(name='test-project', qualified_id=':test-project', dependencies=2, \
             changed_files=3 files)"
        );
    }

    #[test]
    fn test_snapshot_fields_default_when_missing() {
        let node: ProjectNode =
            serde_json::from_str(r#"{"name":"app","qualified_id":":app","future_field":1}"#)
                .unwrap();

        assert!(node.dependency_ids.is_empty());
        assert!(node.changed_files.is_empty());
        assert_eq!(node.kind, ProjectKind::Package);
        assert!(node.dependency_status.is_complete());
    }
}
