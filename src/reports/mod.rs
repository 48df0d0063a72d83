//! # Report Generation Module
//!
//! This module renders the outcome of a change impact analysis in several
//! output formats for humans and CI systems.
//!
//! ## Available Formats
//!
//! - **Human**: styled terminal output listing changed and affected projects
//! - **JSON**: machine-readable output with per-project detail
//! - **JUnit**: one test case per project, unaffected ones skipped
//! - **GitHub**: workflow commands for GitHub Actions annotations
//!
//! ## Example
//!
//! ```
//! use cargo_affected::analyzer::ChangeSet;
//! use cargo_affected::core::ProjectNode;
//! use cargo_affected::reports::{ImpactReport, JsonReportGenerator, ReportGenerator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let change_set = ChangeSet::from_nodes(vec![
//!     ProjectNode::new("lib", ":lib").with_changed_files(["src/lib.rs"]),
//!     ProjectNode::new("app", ":app").with_dependencies([":lib"]),
//! ]);
//!
//! let report = ImpactReport::new(&change_set);
//! let json = JsonReportGenerator::new().generate_report(&report)?;
//!
//! assert!(json.contains("\"affected_count\": 2"));
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod human;
pub mod json;
pub mod junit;

use crate::analyzer::{ChangeSet, PrefixMatch};
use crate::core::{DependencyStatus, ProjectNode};
use crate::error::AffectedError;

/// What a report is generated from
#[derive(Debug, Clone)]
pub struct ImpactReport<'a> {
    change_set: &'a ChangeSet,
    affected: Vec<&'a ProjectNode>,
    prefix: Option<String>,
    unmatched_files: &'a [String],
}

impl<'a> ImpactReport<'a> {
    pub fn new(change_set: &'a ChangeSet) -> Self {
        Self {
            change_set,
            affected: change_set.affected_projects(),
            prefix: None,
            unmatched_files: &[],
        }
    }

    /// Only report affected projects whose qualified id matches `prefix`
    pub fn with_prefix(mut self, prefix: &str, mode: PrefixMatch) -> Self {
        self.affected = self.change_set.filter_by_prefix(prefix, mode);
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_unmatched_files(mut self, unmatched_files: &'a [String]) -> Self {
        self.unmatched_files = unmatched_files;
        self
    }

    pub fn change_set(&self) -> &'a ChangeSet {
        self.change_set
    }

    /// Affected projects after prefix filtering, in qualified id order
    pub fn affected(&self) -> &[&'a ProjectNode] {
        &self.affected
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn unmatched_files(&self) -> &'a [String] {
        self.unmatched_files
    }

    /// Projects whose dependencies could not be read, with the reason
    pub fn unresolved(&self) -> Vec<(&'a ProjectNode, &'a str)> {
        self.change_set
            .graph()
            .iter()
            .filter_map(|node| match &node.dependency_status {
                DependencyStatus::Unresolved(reason) => Some((node, reason.as_str())),
                DependencyStatus::Complete => None,
            })
            .collect()
    }

    pub fn is_affected(&self, qualified_id: &str) -> bool {
        self.affected.iter().any(|n| n.qualified_id == qualified_id)
    }
}

/// Common trait for all report generators
pub trait ReportGenerator {
    /// Render an impact analysis
    fn generate_report(&self, report: &ImpactReport<'_>) -> Result<String, AffectedError>;
}

pub use github::GitHubReportGenerator;
pub use human::HumanReportGenerator;
pub use json::JsonReportGenerator;
pub use junit::JunitReportGenerator;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::analyzer::ChangeSet;
    use crate::core::{DependencyStatus, ProjectNode};

    /// common-lib (changed) <- service <- app, standalone, flaky (unreadable)
    pub fn sample_change_set() -> ChangeSet {
        ChangeSet::from_nodes(vec![
            ProjectNode::new("common-lib", ":libs:common-lib")
                .with_changed_files(["src/lib.rs", "Cargo.toml"]),
            ProjectNode::new("service", ":services:service")
                .with_dependencies([":libs:common-lib"]),
            ProjectNode::new("app", ":apps:app").with_dependencies([":services:service"]),
            ProjectNode::new("standalone", ":standalone"),
            ProjectNode::new("flaky", ":flaky").with_dependency_status(
                DependencyStatus::Unresolved("manifest unreadable".to_string()),
            ),
        ])
    }

    pub fn unchanged_change_set() -> ChangeSet {
        ChangeSet::from_nodes(vec![ProjectNode::new("app", ":app")])
    }
}
