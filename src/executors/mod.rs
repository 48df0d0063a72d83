//! Command executors that handle the actual logic for each command

pub mod build;
pub mod dependents;
pub mod detect;

use std::path::Path;

use console::style;
use miette::{Result, WrapErr};
use tracing::debug;

use crate::config::{AnalysisConfig, ChangeSource};
use crate::dependency_filter::DependencyFilter;
use crate::pipeline::{ImpactAnalysis, ImpactPipeline};
use crate::progress::ProgressReporter;
use crate::registry::{CargoRegistry, ProjectRegistry};
use crate::vcs::{ChangedFilesOptions, ChangedFilesSource, GitChangedFiles, StaticChangedFiles};

/// Trait for command executors
pub trait CommandExecutor {
    type Config;

    /// Execute the command with the given configuration
    fn execute(config: Self::Config) -> Result<()>;
}

/// Discover the repository, collect changed files and run the pipeline
pub(crate) fn run_analysis(
    config: &AnalysisConfig,
    mut progress: Option<&mut ProgressReporter>,
) -> Result<ImpactAnalysis> {
    let registry = discover_registry(&config.root, config.filter, progress.as_deref_mut())?;

    let files = match &config.source {
        ChangeSource::Files(files) => StaticChangedFiles::new(files.iter().cloned())
            .changed_files(registry.root(), &ChangedFilesOptions::default())?,
        ChangeSource::Git(options) => {
            if let Some(p) = progress.as_deref_mut() {
                p.start_change_detection(&options.base_branch);
            }
            GitChangedFiles::new()
                .changed_files(registry.root(), options)
                .wrap_err("Failed to list changed files")?
        }
    };

    if let Some(p) = progress.as_deref_mut() {
        p.finish_change_detection(files.len());
    }
    debug!(count = files.len(), "changed files");

    let pipeline = ImpactPipeline::new(&registry)
        .with_base(registry.root())
        .with_ignore_patterns(&config.ignore)
        .wrap_err("Failed to compile ignore patterns")?;

    if let Some(p) = progress.as_deref_mut() {
        p.start_graph_building(registry.all_projects().len());
    }
    let analysis = pipeline.run(files, progress.as_deref());
    if let Some(p) = progress.as_deref_mut() {
        p.finish_graph_building();
    }

    if !analysis.ignored_files.is_empty() {
        debug!(files = ?analysis.ignored_files, "ignored changed files");
    }

    Ok(analysis)
}

pub(crate) fn discover_registry(
    root: &Path,
    filter: DependencyFilter,
    progress: Option<&mut ProgressReporter>,
) -> Result<CargoRegistry> {
    let registry = CargoRegistry::discover(root, filter, progress)
        .wrap_err_with(|| format!("Failed to discover projects under '{}'", root.display()))?;

    for warning in registry.warnings() {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    Ok(registry)
}
