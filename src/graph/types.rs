//! Core graph types
//!
//! This module contains the analysed project graph and its on-disk snapshot
//! form.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::snapshot::VERSION;
use crate::core::ProjectNode;
use crate::error::AffectedError;

/// Every project of one analysis run keyed by qualified id.
///
/// Immutable once built; all queries go through
/// [`ChangeSet`](crate::analyzer::ChangeSet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    nodes: BTreeMap<String, ProjectNode>,
}

impl ProjectGraph {
    /// Build a graph from nodes. A later node replaces an earlier one with
    /// the same qualified id.
    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = ProjectNode>,
    {
        Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.qualified_id.clone(), node))
                .collect(),
        }
    }

    pub fn nodes(&self) -> &BTreeMap<String, ProjectNode> {
        &self.nodes
    }

    pub fn get(&self, qualified_id: &str) -> Option<&ProjectNode> {
        self.nodes.get(qualified_id)
    }

    /// Nodes in qualified id order
    pub fn iter(&self) -> impl Iterator<Item = &ProjectNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> BTreeMap<String, ProjectNode> {
        self.nodes
    }

    /// Serialize to the versioned snapshot format
    pub fn to_snapshot_json(&self) -> Result<String, AffectedError> {
        let snapshot = GraphSnapshot {
            version: VERSION,
            projects: self.nodes.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Parse a snapshot, rejecting versions this build does not understand
    pub fn from_snapshot_json(json: &str) -> Result<Self, AffectedError> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        if snapshot.version != VERSION {
            return Err(AffectedError::SnapshotVersion {
                found: snapshot.version,
                expected: VERSION,
            });
        }
        Ok(Self::from_nodes(snapshot.projects))
    }

    pub fn write_snapshot(&self, path: &Path) -> Result<(), AffectedError> {
        std::fs::write(path, self.to_snapshot_json()?)?;
        Ok(())
    }

    pub fn read_snapshot(path: &Path) -> Result<Self, AffectedError> {
        let json = std::fs::read_to_string(path).map_err(|e| AffectedError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_snapshot_json(&json)
    }
}

/// Persisted form of a [`ProjectGraph`]; unknown fields are ignored on read
#[derive(Debug, Serialize, Deserialize)]
struct GraphSnapshot {
    version: u32,
    #[serde(default)]
    projects: Vec<ProjectNode>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::DependencyStatus;

    fn sample_graph() -> ProjectGraph {
        ProjectGraph::from_nodes(vec![
            ProjectNode::new("service", ":service").with_dependencies([":common-lib"]),
            ProjectNode::new("common-lib", ":common-lib").with_changed_files(["src/lib.rs"]),
            ProjectNode::new("flaky", ":flaky")
                .with_dependency_status(DependencyStatus::Unresolved("boom".into())),
        ])
    }

    #[test]
    fn test_nodes_are_ordered_by_id() {
        let graph = sample_graph();
        let ids: Vec<_> = graph.iter().map(|n| n.qualified_id.as_str()).collect();

        assert_eq!(ids, vec![":common-lib", ":flaky", ":service"]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_snapshot_preserves_graph() {
        let graph = sample_graph();
        let json = graph.to_snapshot_json().unwrap();

        assert_eq!(ProjectGraph::from_snapshot_json(&json).unwrap(), graph);
    }

    #[test]
    fn test_snapshot_ignores_unknown_fields() {
        let json = r#"{
            "version": 1,
            "generator": "something newer",
            "projects": [
                {"name": "app", "qualified_id": ":app", "dependency_ids": [":lib"], "owner": "team-a"}
            ]
        }"#;

        let graph = ProjectGraph::from_snapshot_json(json).unwrap();
        let app = graph.get(":app").unwrap();

        assert_eq!(app.dependency_ids, vec![":lib".to_string()]);
        assert!(app.changed_files.is_empty());
        assert!(app.dependency_status.is_complete());
    }

    #[test]
    fn test_snapshot_rejects_other_versions() {
        let result = ProjectGraph::from_snapshot_json(r#"{"version": 99, "projects": []}"#);

        assert!(matches!(
            result,
            Err(AffectedError::SnapshotVersion {
                found: 99,
                expected: 1
            })
        ));
    }
}
