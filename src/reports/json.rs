//! JSON format report generation

use serde_json::json;

use super::{ImpactReport, ReportGenerator};
use crate::error::AffectedError;

pub struct JsonReportGenerator;

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate_report(&self, report: &ImpactReport<'_>) -> Result<String, AffectedError> {
        let change_set = report.change_set();

        let directly_changed: Vec<_> = change_set
            .directly_changed_projects()
            .into_iter()
            .map(|node| {
                json!({
                    "name": node.name,
                    "qualified_id": node.qualified_id,
                    "changed_files": node.changed_files,
                })
            })
            .collect();

        let affected: Vec<_> = report
            .affected()
            .iter()
            .map(|node| {
                json!({
                    "name": node.name,
                    "qualified_id": node.qualified_id,
                    "kind": node.kind,
                    "directly_changed": node.has_changes(),
                })
            })
            .collect();

        let unresolved: Vec<_> = report
            .unresolved()
            .into_iter()
            .map(|(node, reason)| {
                json!({
                    "qualified_id": node.qualified_id,
                    "reason": reason,
                })
            })
            .collect();

        let output = json!({
            "has_changes": change_set.has_any_changes(),
            "changed_files_count": change_set.total_changed_files_count(),
            "affected_count": affected.len(),
            "prefix": report.prefix(),
            "directly_changed": directly_changed,
            "affected": affected,
            "summary": change_set.summary(),
            "unmatched_files": report.unmatched_files(),
            "unresolved_dependencies": unresolved,
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }
}
