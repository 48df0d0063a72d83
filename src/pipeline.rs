//! End-to-end change impact analysis over a registry

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;

use crate::analyzer::ChangeSet;
use crate::error::AffectedError;
use crate::graph::ProjectGraphBuilder;
use crate::mapper::FileToProjectMapper;
use crate::progress::ProgressReporter;
use crate::registry::ProjectRegistry;
use crate::utils::path::{relative_to, to_unix_string};

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactAnalysis {
    pub change_set: ChangeSet,
    /// Files removed by ignore patterns before mapping
    pub ignored_files: Vec<String>,
    /// Files owned by no project
    pub unmatched_files: Vec<String>,
}

/// Ignore filter, file mapping, graph construction and change set, in that
/// order
pub struct ImpactPipeline<'r, R: ProjectRegistry + ?Sized> {
    registry: &'r R,
    base: Option<PathBuf>,
    ignore: Vec<Pattern>,
    parallel_reads: bool,
}

impl<'r, R: ProjectRegistry + ?Sized> ImpactPipeline<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            base: None,
            ignore: Vec::new(),
            parallel_reads: true,
        }
    }

    /// Working tree root; absolute changed paths below it are made relative
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Glob patterns, matched against root-relative paths, of files that
    /// never count as changes
    pub fn with_ignore_patterns<S: AsRef<str>>(
        mut self,
        patterns: &[S],
    ) -> Result<Self, AffectedError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled =
                Pattern::new(pattern).map_err(|e| AffectedError::ConfigurationError {
                    message: format!("Invalid ignore pattern '{pattern}': {e}"),
                })?;
            self.ignore.push(compiled);
        }
        Ok(self)
    }

    pub fn with_parallel_reads(mut self, parallel_reads: bool) -> Self {
        self.parallel_reads = parallel_reads;
        self
    }

    fn is_ignored(&self, file: &str) -> bool {
        if self.ignore.is_empty() {
            return false;
        }
        let relative = to_unix_string(&relative_to(Path::new(file), self.base.as_deref()));
        self.ignore.iter().any(|pattern| pattern.matches(&relative))
    }

    pub fn run<I, S>(
        &self,
        changed_files: I,
        progress: Option<&ProgressReporter>,
    ) -> ImpactAnalysis
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (ignored_files, kept): (Vec<String>, Vec<String>) = changed_files
            .into_iter()
            .map(Into::into)
            .partition(|file| self.is_ignored(file));

        let projects = self.registry.all_projects();
        let mut mapper = FileToProjectMapper::new(
            projects
                .iter()
                .map(|p| (p.qualified_id.clone(), p.root.clone())),
        );
        if let Some(base) = &self.base {
            mapper = mapper.with_base(base.clone());
        }

        let mapping = mapper.map_files_to_projects(&kept);

        let graph = ProjectGraphBuilder::new(self.registry)
            .with_parallel_reads(self.parallel_reads)
            .build(&mapping.by_project, progress);

        debug!(
            ignored = ignored_files.len(),
            unmatched = mapping.unmatched.len(),
            projects = graph.len(),
            "impact analysis complete"
        );

        ImpactAnalysis {
            change_set: ChangeSet::new(graph),
            ignored_files,
            unmatched_files: mapping.unmatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::registry::InMemoryRegistry;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new()
            .with_root_aggregator("repo")
            .with_project(":common-lib", "common-lib", "common-lib", &[])
            .with_project(":service", "service", "service", &[":common-lib"])
    }

    #[test]
    fn test_ignored_files_never_count() {
        let registry = registry();
        let analysis = ImpactPipeline::new(&registry)
            .with_ignore_patterns(&["*.md"])
            .unwrap()
            .run(["common-lib/README.md", "service/src/main.rs"], None);

        assert_eq!(analysis.ignored_files, vec!["common-lib/README.md"]);
        assert_eq!(
            analysis.change_set.affected_project_ids(),
            vec![":service".to_string()]
        );
    }

    #[test]
    fn test_root_files_belong_to_aggregator() {
        let registry = registry();
        let analysis = ImpactPipeline::new(&registry).run(["Cargo.lock"], None);

        assert_eq!(analysis.change_set.affected_project_ids(), vec![":"]);
        assert!(analysis.unmatched_files.is_empty());
    }

    #[test]
    fn test_unmatched_files_are_reported() {
        let registry =
            InMemoryRegistry::new().with_project(":common-lib", "common-lib", "common-lib", &[]);
        let analysis = ImpactPipeline::new(&registry).run(["docs/guide.md"], None);

        assert!(!analysis.change_set.has_any_changes());
        assert_eq!(analysis.unmatched_files, vec!["docs/guide.md"]);
    }

    #[test]
    fn test_absolute_paths_under_base() {
        let registry = registry();
        let analysis = ImpactPipeline::new(&registry)
            .with_base("/repo")
            .with_ignore_patterns(&["service/**"])
            .unwrap()
            .run(["/repo/common-lib/src/lib.rs", "/repo/service/src/main.rs"], None);

        assert_eq!(analysis.ignored_files, vec!["/repo/service/src/main.rs"]);
        assert_eq!(
            analysis
                .change_set
                .graph()
                .get(":common-lib")
                .unwrap()
                .changed_files,
            vec!["src/lib.rs".to_string()]
        );
    }

    #[test]
    fn test_invalid_pattern_is_a_configuration_error() {
        let registry = registry();
        let result = ImpactPipeline::new(&registry).with_ignore_patterns(&["[unclosed"]);

        assert!(matches!(
            result,
            Err(AffectedError::ConfigurationError { .. })
        ));
    }
}
