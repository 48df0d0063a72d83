//! Detect command executor

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::{ChangeSource, DetectConfig};
use crate::executors::{CommandExecutor, run_analysis};
use crate::progress::ProgressReporter;
use crate::reports::{
    GitHubReportGenerator, HumanReportGenerator, ImpactReport, JsonReportGenerator,
    JunitReportGenerator, ReportGenerator,
};
use crate::utils::string::{join_or_none, pluralize};

pub struct DetectExecutor;

impl CommandExecutor for DetectExecutor {
    type Config = DetectConfig;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!("{} Detecting changed projects...", style("🔍").cyan());
        match &config.analysis.source {
            ChangeSource::Git(options) => {
                eprintln!(
                    "  {} Base branch: {}",
                    style("→").dim(),
                    style(&options.base_branch).bold()
                );
                eprintln!(
                    "  {} Include untracked: {}",
                    style("→").dim(),
                    if options.include_untracked {
                        style("yes").green()
                    } else {
                        style("no").red()
                    }
                );
            }
            ChangeSource::Files(files) => {
                eprintln!(
                    "  {} Using {} explicitly listed {}",
                    style("→").dim(),
                    files.len(),
                    pluralize("file", files.len())
                );
            }
        }
        let filter = &config.analysis.filter;
        for (label, included) in [
            ("dev", filter.include_dev()),
            ("build", filter.include_build()),
            ("target", filter.include_target()),
        ] {
            eprintln!(
                "  {} Include {} dependencies: {}",
                style("→").dim(),
                label,
                if included {
                    style("yes").green()
                } else {
                    style("no").red()
                }
            );
        }
        eprintln!();

        // Create progress reporter if we're in an interactive terminal
        let mut progress = ProgressReporter::for_stderr();

        let analysis = run_analysis(&config.analysis, progress.as_mut())
            .wrap_err("Failed to analyse changes")?;
        let change_set = &analysis.change_set;

        if let Some(p) = progress.as_ref() {
            p.finish_analysis(change_set.affected_count());
        }

        let direct = change_set.directly_changed_projects();
        info!(
            direct = %join_or_none(direct.iter().map(|n| n.qualified_id.as_str())),
            "directly changed projects"
        );
        info!(
            affected = %join_or_none(change_set.affected_project_ids()),
            "all affected projects (including dependents)"
        );

        let mut report =
            ImpactReport::new(change_set).with_unmatched_files(&analysis.unmatched_files);
        if let Some(prefix) = &config.prefix {
            report = report.with_prefix(prefix, config.prefix_match);
        }

        // Generate report based on format
        let report_result = match config.format {
            OutputFormat::Human => {
                let generator = HumanReportGenerator::new(config.show_files);
                generator.generate_report(&report)
            }
            OutputFormat::Json => {
                let generator = JsonReportGenerator::new();
                generator.generate_report(&report)
            }
            OutputFormat::Junit => {
                let generator = JunitReportGenerator::new();
                generator.generate_report(&report)
            }
            OutputFormat::GitHub => {
                let generator = GitHubReportGenerator::new();
                generator.generate_report(&report)
            }
        };

        match report_result {
            Ok(output) => print!("{output}"),
            Err(e) => {
                return Err(e)
                    .into_diagnostic()
                    .wrap_err("Failed to generate report");
            }
        }

        if let Some(path) = &config.output {
            change_set
                .graph()
                .write_snapshot(path)
                .wrap_err_with(|| format!("Failed to write snapshot '{}'", path.display()))?;
            eprintln!(
                "\n{} Snapshot written to {}",
                style("💾").cyan(),
                style(path.display()).bold()
            );
        }

        Ok(())
    }
}
