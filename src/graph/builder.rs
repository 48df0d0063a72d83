use std::collections::{BTreeMap, HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use super::types::ProjectGraph;
use crate::core::{ChangedFilesByProject, DependencyStatus, ProjectDescriptor, ProjectNode};
use crate::error::RegistryError;
use crate::progress::ProgressReporter;
use crate::registry::ProjectRegistry;

type DependencyRead = Result<Vec<String>, RegistryError>;

/// Builder for the project graph of one analysis run
///
/// Reads every project's dependency declarations from a registry and
/// attaches the changed files to each node. Failed reads never abort the
/// build; the node is kept with no edges and an
/// [`Unresolved`](DependencyStatus::Unresolved) status.
pub struct ProjectGraphBuilder<'r, R: ProjectRegistry + ?Sized> {
    registry: &'r R,
    parallel_reads: bool,
}

impl<'r, R: ProjectRegistry + ?Sized> ProjectGraphBuilder<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            parallel_reads: true,
        }
    }

    /// Read dependency declarations on the rayon pool before assembling
    /// nodes (the default). Sequential reads happen lazily during assembly.
    pub fn with_parallel_reads(mut self, parallel_reads: bool) -> Self {
        self.parallel_reads = parallel_reads;
        self
    }

    /// Build the graph. Deterministic for a fixed registry and change map.
    pub fn build(
        &self,
        changed_files: &ChangedFilesByProject,
        progress: Option<&ProgressReporter>,
    ) -> ProjectGraph {
        let descriptors: BTreeMap<String, ProjectDescriptor> = self
            .registry
            .all_projects()
            .into_iter()
            .map(|descriptor| (descriptor.qualified_id.clone(), descriptor))
            .collect();

        let prefetched = self.parallel_reads.then(|| {
            descriptors
                .par_iter()
                .map(|(id, _)| (id.clone(), self.registry.direct_dependencies_of(id)))
                .collect::<HashMap<String, DependencyRead>>()
        });

        let mut assembly = Assembly {
            registry: self.registry,
            descriptors: &descriptors,
            changed_files,
            prefetched,
            cache: BTreeMap::new(),
            progress,
        };

        for id in descriptors.keys() {
            assembly.ensure_node(id);
        }

        let unresolved = assembly
            .cache
            .values()
            .filter(|node| !node.dependency_status.is_complete())
            .count();
        debug!(
            projects = assembly.cache.len(),
            unresolved, "built project graph"
        );

        ProjectGraph::from_nodes(assembly.cache.into_values())
    }
}

/// State of one `build` call; the memoization cache lives and dies here
struct Assembly<'a, R: ProjectRegistry + ?Sized> {
    registry: &'a R,
    descriptors: &'a BTreeMap<String, ProjectDescriptor>,
    changed_files: &'a ChangedFilesByProject,
    prefetched: Option<HashMap<String, DependencyRead>>,
    cache: BTreeMap<String, ProjectNode>,
    progress: Option<&'a ProgressReporter>,
}

impl<R: ProjectRegistry + ?Sized> Assembly<'_, R> {
    /// Construct `id` and every registered project reachable from it.
    ///
    /// Nodes are cached before their dependencies are visited, so a cycle in
    /// the declarations ends at the first repeated id.
    fn ensure_node(&mut self, id: &str) {
        let descriptors = self.descriptors;
        let mut pending = vec![id.to_string()];

        while let Some(id) = pending.pop() {
            if self.cache.contains_key(&id) {
                continue;
            }
            let Some(descriptor) = descriptors.get(&id) else {
                continue;
            };

            let node = self.make_node(descriptor);
            pending.extend(node.dependency_ids.iter().rev().cloned());
            self.cache.insert(id, node);
        }
    }

    fn make_node(&mut self, descriptor: &ProjectDescriptor) -> ProjectNode {
        let id = descriptor.qualified_id.as_str();

        if let Some(p) = self.progress {
            p.update_graph_progress(&descriptor.name);
        }

        let read = match self.prefetched.as_mut().and_then(|reads| reads.remove(id)) {
            Some(read) => read,
            None => self.registry.direct_dependencies_of(id),
        };

        let (dependency_ids, status) = match read {
            Ok(ids) => (dedup_preserving_order(ids), DependencyStatus::Complete),
            Err(e) => {
                debug!(project = id, error = %e, "continuing without dependency edges");
                (Vec::new(), DependencyStatus::Unresolved(e.to_string()))
            }
        };

        ProjectNode::new(&descriptor.name, id)
            .with_kind(descriptor.kind)
            .with_dependencies(dependency_ids)
            .with_changed_files(self.changed_files.get(id).cloned().unwrap_or_default())
            .with_dependency_status(status)
    }
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
