use std::collections::{BTreeMap, HashMap, HashSet};

use crate::core::ProjectNode;

/// Depth-first walker over declared dependency edges.
///
/// Dependency ids resolve by qualified id first and by short name second.
/// When several projects share a name, the one with the smallest qualified
/// id wins.
pub(crate) struct DependencyWalker<'a> {
    by_id: &'a BTreeMap<String, ProjectNode>,
    by_name: HashMap<&'a str, &'a ProjectNode>,
}

impl<'a> DependencyWalker<'a> {
    pub(crate) fn new(by_id: &'a BTreeMap<String, ProjectNode>) -> Self {
        let mut by_name = HashMap::new();
        for node in by_id.values() {
            by_name.entry(node.name.as_str()).or_insert(node);
        }
        Self { by_id, by_name }
    }

    pub(crate) fn resolve(&self, id_or_name: &str) -> Option<&'a ProjectNode> {
        self.by_id
            .get(id_or_name)
            .or_else(|| self.by_name.get(id_or_name).copied())
    }

    /// True if some dependency id reachable from `start` satisfies
    /// `is_target`. `start` itself is not tested.
    ///
    /// Each call keeps its own visited set, so cycles end the walk instead of
    /// looping; ids that resolve to nothing are dead ends.
    pub(crate) fn reaches<F>(&self, start: &'a ProjectNode, is_target: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.qualified_id.as_str()) {
                continue;
            }

            for dep in &node.dependency_ids {
                if is_target(dep) {
                    return true;
                }
                if let Some(next) = self.resolve(dep) {
                    stack.push(next);
                }
            }
        }

        false
    }
}
