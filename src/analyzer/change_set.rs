use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::warn;

use super::summary::ChangeSummary;
use super::walker::DependencyWalker;
use crate::core::ProjectNode;
use crate::graph::ProjectGraph;

/// How [`ChangeSet::filter_by_prefix`] compares qualified ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixMatch {
    /// Plain string prefix: `:app` matches `:app:sub` and `:app-extra`
    Raw,
    /// Whole id segments only: `:app` matches `:app` and `:app:sub`
    #[default]
    Segment,
}

impl PrefixMatch {
    pub fn matches(self, qualified_id: &str, prefix: &str) -> bool {
        match self {
            PrefixMatch::Raw => qualified_id.starts_with(prefix),
            PrefixMatch::Segment => {
                let prefix = prefix.trim_end_matches(':');
                prefix.is_empty()
                    || qualified_id == prefix
                    || qualified_id
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with(':'))
            }
        }
    }
}

/// Read-only query surface over the project graph of one run.
///
/// Every query recomputes from the node collection, and every list comes
/// back in qualified id order unless stated otherwise. Lookups of projects
/// outside the graph yield empty results, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    graph: ProjectGraph,
}

impl ChangeSet {
    pub fn new(graph: ProjectGraph) -> Self {
        Self { graph }
    }

    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = ProjectNode>,
    {
        Self::new(ProjectGraph::from_nodes(nodes))
    }

    pub fn graph(&self) -> &ProjectGraph {
        &self.graph
    }

    fn walker(&self) -> DependencyWalker<'_> {
        DependencyWalker::new(self.graph.nodes())
    }

    pub fn all_projects(&self) -> Vec<&ProjectNode> {
        self.graph.iter().collect()
    }

    pub fn all_project_names(&self) -> Vec<String> {
        self.graph.iter().map(|n| n.name.clone()).collect()
    }

    pub fn all_project_ids(&self) -> Vec<String> {
        self.graph.iter().map(|n| n.qualified_id.clone()).collect()
    }

    /// Projects with at least one changed file
    pub fn directly_changed_projects(&self) -> Vec<&ProjectNode> {
        self.graph.iter().filter(|n| n.has_changes()).collect()
    }

    /// Directly changed projects plus every project depending on one of them,
    /// directly or transitively
    pub fn affected_projects(&self) -> Vec<&ProjectNode> {
        let walker = self.walker();
        let changed: HashSet<&str> = self
            .graph
            .iter()
            .filter(|n| n.has_changes())
            .map(|n| n.qualified_id.as_str())
            .collect();

        if changed.is_empty() {
            return Vec::new();
        }

        let is_changed = |dep: &str| {
            changed.contains(dep)
                || walker
                    .resolve(dep)
                    .is_some_and(|n| changed.contains(n.qualified_id.as_str()))
        };

        self.graph
            .iter()
            .filter(|node| node.has_changes() || walker.reaches(node, &is_changed))
            .collect()
    }

    pub fn affected_project_names(&self) -> Vec<String> {
        names(&self.affected_projects())
    }

    pub fn affected_project_ids(&self) -> Vec<String> {
        ids(&self.affected_projects())
    }

    pub fn affected_count(&self) -> usize {
        self.affected_projects().len()
    }

    /// Projects depending on `target` directly or transitively.
    ///
    /// `target` may be a qualified id or a short name; a declared dependency
    /// matches when it equals `target` as written or resolves to the same
    /// project.
    pub fn projects_depending_on(&self, target: &str) -> Vec<&ProjectNode> {
        let walker = self.walker();
        let target_id = walker.resolve(target).map(|n| n.qualified_id.as_str());

        let is_target = |dep: &str| {
            dep == target
                || target_id.is_some_and(|id| {
                    walker
                        .resolve(dep)
                        .is_some_and(|n| n.qualified_id.as_str() == id)
                })
        };

        self.graph
            .iter()
            .filter(|node| walker.reaches(node, &is_target))
            .collect()
    }

    /// Affected projects whose qualified id matches `prefix`
    pub fn filter_by_prefix(&self, prefix: &str, mode: PrefixMatch) -> Vec<&ProjectNode> {
        self.affected_projects()
            .into_iter()
            .filter(|n| mode.matches(&n.qualified_id, prefix))
            .collect()
    }

    pub fn filter_names_by_prefix(&self, prefix: &str, mode: PrefixMatch) -> Vec<String> {
        names(&self.filter_by_prefix(prefix, mode))
    }

    pub fn filter_ids_by_prefix(&self, prefix: &str, mode: PrefixMatch) -> Vec<String> {
        ids(&self.filter_by_prefix(prefix, mode))
    }

    /// Changed file count per directly changed project, by qualified id
    pub fn changed_file_count_by_project(&self) -> BTreeMap<String, usize> {
        self.graph
            .iter()
            .filter(|n| n.has_changes())
            .map(|n| (n.qualified_id.clone(), n.changed_files.len()))
            .collect()
    }

    /// Distinct changed file paths across all projects.
    ///
    /// Paths are project relative, so `src/lib.rs` changed in two projects
    /// appears once.
    pub fn all_changed_files(&self) -> BTreeSet<String> {
        self.graph
            .iter()
            .flat_map(|n| n.changed_files.iter().cloned())
            .collect()
    }

    pub fn total_changed_files_count(&self) -> usize {
        self.graph.iter().map(|n| n.changed_files.len()).sum()
    }

    pub fn has_any_changes(&self) -> bool {
        self.graph.iter().any(|n| n.has_changes())
    }

    /// Look a project up by qualified id, then by short name
    pub fn find_project(&self, name_or_id: &str) -> Option<&ProjectNode> {
        self.walker().resolve(name_or_id)
    }

    pub fn summary(&self) -> ChangeSummary {
        let direct = self.directly_changed_projects();
        let affected = self.affected_projects();

        ChangeSummary {
            total_projects: self.graph.len(),
            changed_projects: direct.len(),
            affected_projects: affected.len(),
            total_changed_files: self.total_changed_files_count(),
            direct_project_ids: ids(&direct),
            affected_project_ids: ids(&affected),
        }
    }

    /// Affected projects ordered so that dependencies come before their
    /// dependents.
    ///
    /// If the affected projects form a cycle, falls back to qualified id
    /// order.
    pub fn build_order(&self) -> Vec<&ProjectNode> {
        let affected = self.affected_projects();
        let walker = self.walker();

        let mut graph: DiGraph<&ProjectNode, ()> = DiGraph::new();
        let indices: HashMap<&str, _> = affected
            .iter()
            .map(|node| (node.qualified_id.as_str(), graph.add_node(*node)))
            .collect();

        for node in &affected {
            let dependent = indices[node.qualified_id.as_str()];
            for dep in &node.dependency_ids {
                if let Some(dependency) = walker
                    .resolve(dep)
                    .and_then(|n| indices.get(n.qualified_id.as_str()))
                {
                    graph.update_edge(*dependency, dependent, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => order.into_iter().map(|idx| graph[idx]).collect(),
            Err(cycle) => {
                warn!(
                    project = %graph[cycle.node_id()].qualified_id,
                    "affected projects form a dependency cycle; using id order"
                );
                affected
            }
        }
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChangeSet(total={}, changed={}, files={})",
            self.graph.len(),
            self.affected_count(),
            self.total_changed_files_count()
        )
    }
}

fn names(nodes: &[&ProjectNode]) -> Vec<String> {
    nodes.iter().map(|n| n.name.clone()).collect()
}

fn ids(nodes: &[&ProjectNode]) -> Vec<String> {
    nodes.iter().map(|n| n.qualified_id.clone()).collect()
}
