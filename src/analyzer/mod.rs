//! # Change Impact Analysis Module
//!
//! Answers which projects are affected by a set of changes: the projects
//! with changed files, plus every project that depends on one of them
//! directly or transitively.
//!
//! ## Key Components
//!
//! - **ChangeSet**: query surface over one run's project graph (affected
//!   projects, dependents, prefix filters, counts, build order)
//! - **ChangeSummary**: aggregate counts with a multi-line `Display`
//! - **PrefixMatch**: raw or segment-aware qualified id prefix matching
//!
//! Dependency walks keep a visited set per traversal, so cyclic
//! declarations terminate.
//!
//! ## Example
//!
//! ```
//! use cargo_affected::analyzer::ChangeSet;
//! use cargo_affected::core::ProjectNode;
//!
//! let change_set = ChangeSet::from_nodes(vec![
//!     ProjectNode::new("common-lib", ":common-lib").with_changed_files(["src/lib.rs"]),
//!     ProjectNode::new("service", ":service").with_dependencies([":common-lib"]),
//!     ProjectNode::new("app", ":app").with_dependencies([":service"]),
//!     ProjectNode::new("standalone", ":standalone"),
//! ]);
//!
//! assert_eq!(
//!     change_set.affected_project_names(),
//!     vec!["app", "common-lib", "service"]
//! );
//! assert_eq!(change_set.summary().changed_projects, 1);
//! ```

mod change_set;
mod summary;
mod walker;

pub use change_set::{ChangeSet, PrefixMatch};
pub use summary::ChangeSummary;
