//! Human-readable console report generation

use std::fmt::Write;

use console::style;

use super::{ImpactReport, ReportGenerator};
use crate::error::AffectedError;
use crate::utils::string::{join_or_none, pluralize};

pub struct HumanReportGenerator {
    show_files: bool,
}

impl HumanReportGenerator {
    /// `show_files` lists every changed file under its project
    pub fn new(show_files: bool) -> Self {
        Self { show_files }
    }
}

impl ReportGenerator for HumanReportGenerator {
    fn generate_report(&self, report: &ImpactReport<'_>) -> Result<String, AffectedError> {
        let mut output = String::new();
        let change_set = report.change_set();
        let direct = change_set.directly_changed_projects();

        writeln!(
            output,
            "{} Changed files count: {}",
            style("📝").cyan(),
            style(change_set.total_changed_files_count()).bold()
        )?;
        writeln!(
            output,
            "{} Directly changed projects: {}",
            style("📦").blue(),
            join_or_none(direct.iter().map(|n| n.qualified_id.as_str()))
        )?;

        if self.show_files {
            for node in &direct {
                writeln!(output, "  {} {}", style("•").dim(), style(&node.qualified_id).bold())?;
                for file in &node.changed_files {
                    writeln!(output, "      {file}")?;
                }
            }
        }

        let label = match report.prefix() {
            Some(prefix) => format!("All affected projects matching '{prefix}'"),
            None => "All affected projects (including dependents)".to_string(),
        };
        writeln!(
            output,
            "{} {}: {}",
            style("🔗").cyan(),
            label,
            join_or_none(report.affected().iter().map(|n| n.qualified_id.as_str()))
        )?;

        let unmatched = report.unmatched_files();
        if !unmatched.is_empty() {
            writeln!(
                output,
                "\n{} {} changed {} outside any project",
                style("ℹ").blue(),
                unmatched.len(),
                pluralize("file", unmatched.len())
            )?;
        }

        for (node, reason) in report.unresolved() {
            writeln!(
                output,
                "{} Dependencies of {} could not be read: {}",
                style("⚠").yellow(),
                style(&node.qualified_id).bold(),
                style(reason).dim()
            )?;
        }

        if report.affected().is_empty() {
            writeln!(
                output,
                "\n{} No projects affected - nothing to build",
                style("✅").green().bold()
            )?;
        } else {
            writeln!(
                output,
                "\n{} {} {} to build",
                style("⚡").yellow().bold(),
                style(report.affected().len()).yellow().bold(),
                pluralize("project", report.affected().len())
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use predicates::prelude::*;

    use super::*;
    use crate::analyzer::PrefixMatch;
    use crate::reports::test_support::{sample_change_set, unchanged_change_set};

    #[test]
    fn test_human_report_lists_direct_and_affected() {
        let change_set = sample_change_set();
        let report = HumanReportGenerator::new(false)
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert!(predicate::str::contains("Changed files count: 2").eval(&report));
        assert!(predicate::str::contains("Directly changed projects: :libs:common-lib").eval(&report));
        assert!(
            predicate::str::contains(
                "All affected projects (including dependents): :apps:app, :libs:common-lib, \
                 :services:service"
            )
            .eval(&report)
        );
        assert!(predicate::str::contains("3 projects to build").eval(&report));
    }

    #[test]
    fn test_human_report_mentions_unreadable_dependencies() {
        let change_set = sample_change_set();
        let report = HumanReportGenerator::new(false)
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert!(
            predicate::str::contains("Dependencies of :flaky could not be read").eval(&report)
        );
    }

    #[test]
    fn test_human_report_with_files_and_prefix() {
        let change_set = sample_change_set();
        let unmatched = vec!["README.md".to_string()];
        let report = HumanReportGenerator::new(true)
            .generate_report(
                &ImpactReport::new(&change_set)
                    .with_prefix(":apps", PrefixMatch::Segment)
                    .with_unmatched_files(&unmatched),
            )
            .unwrap();

        assert!(predicate::str::contains("      src/lib.rs").eval(&report));
        assert!(predicate::str::contains("matching ':apps': :apps:app").eval(&report));
        assert!(predicate::str::contains("1 changed file outside any project").eval(&report));
    }

    #[test]
    fn test_human_report_without_changes() {
        let change_set = unchanged_change_set();
        let report = HumanReportGenerator::new(false)
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert!(predicate::str::contains("Changed files count: 0").eval(&report));
        assert!(predicate::str::contains("Directly changed projects: (none)").eval(&report));
        assert!(predicate::str::contains("nothing to build").eval(&report));
    }
}
