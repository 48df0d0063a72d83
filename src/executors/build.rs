//! Build command executor

use std::ffi::OsString;
use std::process::Command;

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::debug;

use crate::analyzer::ChangeSet;
use crate::config::BuildConfig;
use crate::core::ProjectNode;
use crate::error::AffectedError;
use crate::executors::{CommandExecutor, run_analysis};
use crate::graph::ProjectGraph;
use crate::progress::ProgressReporter;

pub struct BuildExecutor;

impl CommandExecutor for BuildExecutor {
    type Config = BuildConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let change_set = load_change_set(&config)?;
        let plan = plan_build(&change_set, &config);

        print!("{}", plan.render(config.dry_run));

        if plan.is_empty() || config.dry_run {
            return Ok(());
        }

        let cargo = std::env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"));
        debug!(?cargo, args = ?plan.args, "running cargo");

        let status = Command::new(&cargo)
            .args(&plan.args)
            .current_dir(&config.analysis.root)
            .status()
            .into_diagnostic()
            .wrap_err("Failed to run cargo")?;

        if !status.success() {
            return Err(AffectedError::BuildFailed {
                command: plan.args.join(" "),
                status: status.to_string(),
            }
            .into());
        }

        eprintln!("{} Build finished", style("✓").green().bold());
        Ok(())
    }
}

/// The change set to build: the `--from` snapshot, or a fresh analysis
fn load_change_set(config: &BuildConfig) -> Result<ChangeSet> {
    match &config.from {
        Some(path) => {
            eprintln!(
                "{} Loading snapshot {}",
                style("📂").cyan(),
                style(path.display()).bold()
            );
            let graph = ProjectGraph::read_snapshot(path)
                .wrap_err_with(|| format!("Failed to load snapshot '{}'", path.display()))?;
            Ok(ChangeSet::new(graph))
        }
        None => {
            let mut progress = ProgressReporter::for_stderr();
            Ok(run_analysis(&config.analysis, progress.as_mut())
                .wrap_err("Failed to analyse changes")?
                .change_set)
        }
    }
}

/// What a build run does with a change set
#[derive(Debug)]
pub(crate) struct BuildPlan<'a> {
    /// Affected projects under the prefix, dependencies first
    pub order: Vec<&'a ProjectNode>,
    /// Cargo arguments; empty when there is nothing to build
    pub args: Vec<String>,
}

impl BuildPlan<'_> {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Text printed to stdout. A dry run adds the cargo command line.
    pub fn render(&self, dry_run: bool) -> String {
        if self.is_empty() {
            return "No projects have changed - nothing to build\n".to_string();
        }

        let mut output = format!("Building {} changed project(s)\n", self.order.len());
        for (i, node) in self.order.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} ({})\n",
                i + 1,
                node.qualified_id,
                node.name
            ));
        }
        if dry_run {
            output.push_str(&format!("Would run: cargo {}\n", self.args.join(" ")));
        }
        output
    }
}

pub(crate) fn plan_build<'a>(change_set: &'a ChangeSet, config: &BuildConfig) -> BuildPlan<'a> {
    let order: Vec<&ProjectNode> = change_set
        .build_order()
        .into_iter()
        .filter(|node| match &config.prefix {
            Some(prefix) => config.prefix_match.matches(&node.qualified_id, prefix),
            None => true,
        })
        .collect();

    let args = if order.is_empty() {
        Vec::new()
    } else {
        cargo_arguments(&config.cargo_command, &order, &config.cargo_args)
    };

    BuildPlan { order, args }
}

/// `<command> --workspace` when the root aggregator is affected, otherwise
/// one `-p` per package in build order, followed by the extra arguments
pub(crate) fn cargo_arguments(
    command: &str,
    order: &[&ProjectNode],
    extra: &[String],
) -> Vec<String> {
    let mut args = vec![command.to_string()];

    if order.iter().any(|node| node.is_aggregator()) {
        args.push("--workspace".to_string());
    } else {
        for node in order {
            args.push("-p".to_string());
            args.push(node.name.clone());
        }
    }

    args.extend(extra.iter().cloned());
    args
}
