//! Mapping of changed files onto the projects that own them

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::ChangedFilesByProject;
use crate::utils::path::{relative_to, to_unix_string};

/// Result of mapping a batch of changed files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMapping {
    /// Files per owning project, relative to that project's root
    pub by_project: ChangedFilesByProject,
    /// Files no project root contains, as given
    pub unmatched: Vec<String>,
}

/// Resolves file ownership by longest matching project root.
///
/// Matching is done per path component, so `service-extra/lib.rs` is never
/// owned by a project rooted at `service`. A project with an empty root owns
/// every file no more specific project claims.
#[derive(Debug, Clone)]
pub struct FileToProjectMapper {
    /// (root, qualified id), longest roots first
    roots: Vec<(PathBuf, String)>,
    base: Option<PathBuf>,
}

impl FileToProjectMapper {
    pub fn new<I, S, P>(project_roots: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: AsRef<Path>,
    {
        let mut roots: Vec<(PathBuf, String)> = project_roots
            .into_iter()
            .map(|(id, root)| (relative_to(root.as_ref(), None), id.into()))
            .collect();

        sort_longest_first(&mut roots);

        Self { roots, base: None }
    }

    /// Treat absolute paths under `base` as relative to it.
    ///
    /// Applies to both project roots and changed files.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        for (root, _) in &mut self.roots {
            *root = relative_to(root, Some(base.as_path()));
        }
        sort_longest_first(&mut self.roots);
        self.base = Some(base);
        self
    }

    /// Find the owning project of a single file.
    ///
    /// Returns the qualified id and the file path relative to the project
    /// root.
    pub fn owner_of(&self, file: &Path) -> Option<(&str, PathBuf)> {
        let file = relative_to(file, self.base.as_deref());

        self.roots.iter().find_map(|(root, id)| {
            if file.is_absolute() != root.is_absolute() {
                return None;
            }
            // `../x` lies outside every root inside the tree, the empty one included
            if escapes_tree(&file) && !escapes_tree(root) {
                return None;
            }
            file.strip_prefix(root)
                .ok()
                .map(|relative| (id.as_str(), relative.to_path_buf()))
        })
    }

    /// Group changed files by owning project.
    ///
    /// Discovery order is preserved within each project and duplicates are
    /// kept as given.
    pub fn map_files_to_projects<I, P>(&self, changed_files: I) -> FileMapping
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut mapping = FileMapping::default();

        for file in changed_files {
            let file = file.as_ref();
            match self.owner_of(file) {
                Some((id, relative)) => mapping
                    .by_project
                    .entry(id.to_string())
                    .or_default()
                    .push(to_unix_string(&relative)),
                None => mapping.unmatched.push(file.display().to_string()),
            }
        }

        debug!(
            projects = mapping.by_project.len(),
            unmatched = mapping.unmatched.len(),
            "mapped changed files to projects"
        );

        mapping
    }
}

fn escapes_tree(path: &Path) -> bool {
    matches!(path.components().next(), Some(Component::ParentDir))
}

// Equal depths fall back to id order so ownership stays deterministic
fn sort_longest_first(roots: &mut [(PathBuf, String)]) {
    roots.sort_by(|(a_root, a_id), (b_root, b_id)| {
        b_root
            .components()
            .count()
            .cmp(&a_root.components().count())
            .then_with(|| a_id.cmp(b_id))
    });
}
