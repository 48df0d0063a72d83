//! # Project Registry Module
//!
//! A registry enumerates the projects of a monorepo and answers, per
//! project, which other projects it directly depends on.
//!
//! - **CargoRegistry**: discovers Cargo packages below a working tree root
//! - **InMemoryRegistry**: a hand-assembled registry for tests and embedding
//!
//! ## Example
//!
//! ```
//! use cargo_affected::registry::{InMemoryRegistry, ProjectRegistry};
//!
//! let registry = InMemoryRegistry::new()
//!     .with_project(":common-lib", "common-lib", "common-lib", &[])
//!     .with_project(":service", "service", "service", &[":common-lib"]);
//!
//! assert_eq!(registry.all_projects().len(), 2);
//! assert_eq!(
//!     registry.direct_dependencies_of(":service").unwrap(),
//!     vec![":common-lib".to_string()]
//! );
//! ```

mod cargo;

use std::collections::BTreeMap;
use std::path::PathBuf;

pub use cargo::CargoRegistry;

use crate::core::{ProjectDescriptor, ProjectKind};
use crate::error::RegistryError;

/// Source of projects and their declared dependencies.
///
/// Implementations must be `Sync`: dependency reads for different projects
/// may run in parallel.
pub trait ProjectRegistry: Sync {
    /// Every project, each exactly once
    fn all_projects(&self) -> Vec<ProjectDescriptor>;

    /// Qualified ids of the projects `qualified_id` directly depends on.
    ///
    /// Ids may point at projects the registry does not know about.
    fn direct_dependencies_of(&self, qualified_id: &str) -> Result<Vec<String>, RegistryError>;
}

#[derive(Debug, Clone)]
struct InMemoryProject {
    descriptor: ProjectDescriptor,
    dependencies: Result<Vec<String>, String>,
}

/// Registry backed by plain data
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    projects: BTreeMap<String, InMemoryProject>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package project
    pub fn with_project(
        mut self,
        qualified_id: &str,
        name: &str,
        root: impl Into<PathBuf>,
        dependencies: &[&str],
    ) -> Self {
        self.projects.insert(
            qualified_id.to_string(),
            InMemoryProject {
                descriptor: ProjectDescriptor::new(qualified_id, name, root),
                dependencies: Ok(dependencies.iter().map(|d| d.to_string()).collect()),
            },
        );
        self
    }

    /// Add the synthetic root project owning otherwise unclaimed files
    pub fn with_root_aggregator(mut self, name: &str) -> Self {
        let id = crate::core::ROOT_PROJECT_ID;
        self.projects.insert(
            id.to_string(),
            InMemoryProject {
                descriptor: ProjectDescriptor::new(id, name, PathBuf::new())
                    .with_kind(ProjectKind::Aggregator),
                dependencies: Ok(Vec::new()),
            },
        );
        self
    }

    /// Add a project whose dependency declarations cannot be read
    pub fn with_unreadable_project(
        mut self,
        qualified_id: &str,
        name: &str,
        root: impl Into<PathBuf>,
        reason: &str,
    ) -> Self {
        self.projects.insert(
            qualified_id.to_string(),
            InMemoryProject {
                descriptor: ProjectDescriptor::new(qualified_id, name, root),
                dependencies: Err(reason.to_string()),
            },
        );
        self
    }
}

impl ProjectRegistry for InMemoryRegistry {
    fn all_projects(&self) -> Vec<ProjectDescriptor> {
        self.projects
            .values()
            .map(|project| project.descriptor.clone())
            .collect()
    }

    fn direct_dependencies_of(&self, qualified_id: &str) -> Result<Vec<String>, RegistryError> {
        let project =
            self.projects
                .get(qualified_id)
                .ok_or_else(|| RegistryError::UnknownProject {
                    id: qualified_id.to_string(),
                })?;

        project
            .dependencies
            .clone()
            .map_err(|message| RegistryError::Unreadable {
                id: qualified_id.to_string(),
                message,
            })
    }
}
