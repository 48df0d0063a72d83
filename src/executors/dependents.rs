//! Dependents command executor

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::json;

use crate::analyzer::ChangeSet;
use crate::cli::ListFormat;
use crate::config::DependentsConfig;
use crate::core::ChangedFilesByProject;
use crate::error::AffectedError;
use crate::executors::{CommandExecutor, discover_registry};
use crate::graph::{ProjectGraph, ProjectGraphBuilder};
use crate::progress::ProgressReporter;

pub struct DependentsExecutor;

impl CommandExecutor for DependentsExecutor {
    type Config = DependentsConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let graph = match &config.from {
            Some(path) => ProjectGraph::read_snapshot(path)
                .wrap_err_with(|| format!("Failed to load snapshot '{}'", path.display()))?,
            None => {
                let mut progress = ProgressReporter::for_stderr();
                let registry = discover_registry(&config.root, config.filter, progress.as_mut())?;
                ProjectGraphBuilder::new(&registry)
                    .build(&ChangedFilesByProject::new(), progress.as_ref())
            }
        };
        let change_set = ChangeSet::new(graph);

        let target = change_set.find_project(&config.project).ok_or_else(|| {
            AffectedError::ConfigurationError {
                message: format!("Unknown project '{}'", config.project),
            }
        })?;
        let dependents = change_set.projects_depending_on(&target.qualified_id);

        match config.format {
            ListFormat::Human => {
                eprintln!(
                    "{} Projects depending on {}:",
                    style("🔗").cyan(),
                    style(&target.qualified_id).bold()
                );
                if dependents.is_empty() {
                    println!("(none)");
                }
                for node in &dependents {
                    println!("{}", node.qualified_id);
                }
            }
            ListFormat::Json => {
                let output = json!({
                    "project": target.qualified_id,
                    "dependents": dependents
                        .iter()
                        .map(|n| json!({ "name": n.name, "qualified_id": n.qualified_id }))
                        .collect::<Vec<_>>(),
                });
                let rendered = serde_json::to_string_pretty(&output)
                    .into_diagnostic()
                    .wrap_err("Failed to generate report")?;
                println!("{rendered}");
            }
        }

        Ok(())
    }
}
