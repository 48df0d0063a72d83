//! # Project Graph Module
//!
//! This module builds the per-run map from qualified project id to
//! [`ProjectNode`](crate::core::ProjectNode).
//!
//! ## Components
//!
//! - **ProjectGraphBuilder**: reads dependency declarations from a registry
//!   and attaches changed files, memoizing every node it constructs
//! - **ProjectGraph**: the immutable result, with a versioned JSON snapshot
//!   form for handing analyses between processes
//!
//! ## Example
//!
//! ```
//! use cargo_affected::core::ChangedFilesByProject;
//! use cargo_affected::graph::ProjectGraphBuilder;
//! use cargo_affected::registry::InMemoryRegistry;
//!
//! let registry = InMemoryRegistry::new()
//!     .with_project(":common-lib", "common-lib", "common-lib", &[])
//!     .with_project(":service", "service", "service", &[":common-lib"]);
//!
//! let mut changed = ChangedFilesByProject::new();
//! changed.insert(":common-lib".to_string(), vec!["src/lib.rs".to_string()]);
//!
//! let graph = ProjectGraphBuilder::new(&registry).build(&changed, None);
//!
//! assert_eq!(graph.len(), 2);
//! assert!(graph.get(":common-lib").unwrap().has_changes());
//! assert!(graph.get(":service").unwrap().has_dependency(":common-lib"));
//! ```

mod builder;
mod types;

pub use builder::ProjectGraphBuilder;
pub use types::ProjectGraph;
