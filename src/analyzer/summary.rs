use std::fmt;

use serde::Serialize;

/// Aggregate counts for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub total_projects: usize,
    /// Projects with at least one changed file
    pub changed_projects: usize,
    /// Changed projects plus everything depending on them
    pub affected_projects: usize,
    pub total_changed_files: usize,
    /// Qualified ids of the directly changed projects
    pub direct_project_ids: Vec<String>,
    /// Qualified ids of the affected projects
    pub affected_project_ids: Vec<String>,
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Change Summary:")?;
        writeln!(f, "  Total Projects: {}", self.total_projects)?;
        writeln!(f, "  Changed Projects (direct): {}", self.changed_projects)?;
        writeln!(
            f,
            "  Affected Projects (including dependents): {}",
            self.affected_projects
        )?;
        writeln!(f, "  Total Changed Files: {}", self.total_changed_files)?;
        writeln!(f, "  Direct Changes: {}", self.direct_project_ids.join(", "))?;
        write!(f, "  All Affected: {}", self.affected_project_ids.join(", "))
    }
}
