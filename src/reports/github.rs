//! GitHub Actions format report generation

use std::fmt::Write;

use super::{ImpactReport, ReportGenerator};
use crate::error::AffectedError;
use crate::utils::string::pluralize;

pub struct GitHubReportGenerator;

impl Default for GitHubReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for GitHubReportGenerator {
    fn generate_report(&self, report: &ImpactReport<'_>) -> Result<String, AffectedError> {
        let mut output = String::new();
        let change_set = report.change_set();

        for (node, reason) in report.unresolved() {
            writeln!(
                output,
                "::warning title=Unreadable Dependencies::{}: {}",
                node.qualified_id, reason
            )?;
        }

        if report.affected().is_empty() {
            writeln!(
                output,
                "::notice title=Affected Projects::No projects have changed - nothing to build"
            )?;
            return Ok(output);
        }

        let count = report.affected().len();
        writeln!(
            output,
            "::notice title=Affected Projects::{} affected {} from {} changed {}",
            count,
            pluralize("project", count),
            change_set.total_changed_files_count(),
            pluralize("file", change_set.total_changed_files_count())
        )?;

        for node in report.affected() {
            let reason = if node.has_changes() {
                format!(
                    "{} changed {}",
                    node.changed_files.len(),
                    pluralize("file", node.changed_files.len())
                )
            } else {
                "depends on a changed project".to_string()
            };
            writeln!(output, "::notice::  {} ({})", node.qualified_id, reason)?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::{sample_change_set, unchanged_change_set};

    #[test]
    fn test_github_report_no_changes() {
        let change_set = unchanged_change_set();
        let report = GitHubReportGenerator::new()
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert_eq!(
            report,
            "::notice title=Affected Projects::No projects have changed - nothing to build\n"
        );
    }

    #[test]
    fn test_github_report_with_changes() {
        let change_set = sample_change_set();
        let report = GitHubReportGenerator::new()
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert!(report.starts_with("::warning title=Unreadable Dependencies:::flaky: "));
        assert!(report.contains("::notice title=Affected Projects::3 affected projects from 2 changed files"));
        assert!(report.contains("::notice::  :libs:common-lib (2 changed files)"));
        assert!(report.contains("::notice::  :apps:app (depends on a changed project)"));
    }
}
