//! JUnit XML format report generation
//!
//! Every project becomes a test case; projects that need no rebuild are
//! reported as skipped.

use std::fmt::Write;

use super::{ImpactReport, ReportGenerator};
use crate::error::AffectedError;
use crate::utils::string::xml_escape;

pub struct JunitReportGenerator;

impl Default for JunitReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JunitReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JunitReportGenerator {
    fn generate_report(&self, report: &ImpactReport<'_>) -> Result<String, AffectedError> {
        let mut output = String::new();
        let projects = report.change_set().all_projects();
        let skipped = projects
            .iter()
            .filter(|n| !report.is_affected(&n.qualified_id))
            .count();

        writeln!(output, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            output,
            r#"<testsuites name="cargo-affected" tests="{}" failures="0" skipped="{}">"#,
            projects.len(),
            skipped
        )?;
        writeln!(
            output,
            r#"  <testsuite name="affected-projects" tests="{}" failures="0" skipped="{}">"#,
            projects.len(),
            skipped
        )?;

        for node in projects {
            let name = xml_escape(&node.qualified_id);
            if !report.is_affected(&node.qualified_id) {
                writeln!(
                    output,
                    r#"    <testcase name="{name}" classname="cargo-affected">"#
                )?;
                writeln!(output, r#"      <skipped message="not affected" />"#)?;
                writeln!(output, r#"    </testcase>"#)?;
                continue;
            }

            writeln!(
                output,
                r#"    <testcase name="{name}" classname="cargo-affected">"#
            )?;
            writeln!(output, "      <system-out>")?;
            if node.has_changes() {
                for file in &node.changed_files {
                    writeln!(output, "changed: {}", xml_escape(file))?;
                }
            } else {
                writeln!(output, "affected through dependencies")?;
            }
            writeln!(output, "      </system-out>")?;
            writeln!(output, r#"    </testcase>"#)?;
        }

        writeln!(output, r#"  </testsuite>"#)?;
        writeln!(output, r#"</testsuites>"#)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::{sample_change_set, unchanged_change_set};

    #[test]
    fn test_junit_report_structure() {
        let change_set = sample_change_set();
        let report = JunitReportGenerator::new()
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert!(report.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(report.contains(r#"tests="5" failures="0" skipped="2""#));
        assert!(report.contains(r#"<testcase name=":libs:common-lib" classname="cargo-affected">"#));
        assert!(report.contains("changed: src/lib.rs"));
        assert!(report.contains("affected through dependencies"));
        assert!(report.ends_with("</testsuites>\n"));
    }

    #[test]
    fn test_junit_report_all_skipped() {
        let change_set = unchanged_change_set();
        let report = JunitReportGenerator::new()
            .generate_report(&ImpactReport::new(&change_set))
            .unwrap();

        assert!(report.contains(r#"tests="1" failures="0" skipped="1""#));
        assert!(report.contains(r#"<skipped message="not affected" />"#));
    }
}
