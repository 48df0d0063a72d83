//! # cargo-affected - Change Impact Analysis for Rust Monorepos
//!
//! cargo-affected works out which projects of a Cargo monorepo need to be
//! rebuilt or retested after a change. Changed files (from git, or an
//! explicit list) are attributed to the deepest project containing them,
//! and every project that depends on a changed project, directly or
//! transitively, is affected as well.
//!
//! ## Main Components
//!
//! - **Registry**: Discovers projects and reads their path dependencies
//! - **VCS**: Lists files changed since the merge base with a base branch
//! - **Mapper**: Attributes changed files to their owning projects
//! - **Graph**: Builds the project dependency graph, memoised per project
//! - **Analyzer**: Answers change impact queries over the graph
//! - **Reports**: Renders results for humans and CI systems
//!
//! ## Usage
//!
//! ### Example: Analysing a Monorepo
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cargo_affected::dependency_filter::DependencyFilter;
//! use cargo_affected::pipeline::ImpactPipeline;
//! use cargo_affected::registry::CargoRegistry;
//! use cargo_affected::reports::{HumanReportGenerator, ImpactReport, ReportGenerator};
//! use cargo_affected::vcs::{ChangedFilesOptions, ChangedFilesSource, GitChangedFiles};
//!
//! # fn main() -> miette::Result<()> {
//! // Step 1: Discover every package below the repository root
//! let registry = CargoRegistry::discover(
//!     Path::new("/path/to/your/monorepo"),
//!     DependencyFilter::default(),
//!     None,
//! )?;
//!
//! // Step 2: Ask git what changed since the merge base with `main`
//! let options = ChangedFilesOptions::default().with_base_branch("main");
//! let files = GitChangedFiles::new().changed_files(registry.root(), &options)?;
//!
//! // Step 3: Map files to projects and follow dependents
//! let analysis = ImpactPipeline::new(&registry)
//!     .with_base(registry.root())
//!     .with_ignore_patterns(&["**/*.md"])?
//!     .run(files, None);
//!
//! // Step 4: Report
//! let report = ImpactReport::new(&analysis.change_set);
//! print!("{}", HumanReportGenerator::new(false).generate_report(&report)?);
//!
//! for node in analysis.change_set.build_order() {
//!     println!("cargo build -p {}", node.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Example: Embedding with an In-Memory Registry
//!
//! ```
//! use cargo_affected::pipeline::ImpactPipeline;
//! use cargo_affected::registry::InMemoryRegistry;
//!
//! let registry = InMemoryRegistry::new()
//!     .with_project(":libs:core", "core", "libs/core", &[])
//!     .with_project(":apps:web", "web", "apps/web", &[":libs:core"])
//!     .with_project(":apps:cli", "cli", "apps/cli", &[]);
//!
//! let analysis = ImpactPipeline::new(&registry).run(["libs/core/src/lib.rs"], None);
//!
//! assert_eq!(
//!     analysis.change_set.affected_project_ids(),
//!     vec![":apps:web", ":libs:core"]
//! );
//! ```

// Private modules
mod constants;
mod progress;
mod toml_parser;
mod utils;
mod workspace_discovery;

// Public modules
pub mod analyzer;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod core;
pub mod dependency_filter;
pub mod error;
pub mod executors;
pub mod graph;
pub mod mapper;
pub mod pipeline;
pub mod registry;
pub mod reports;
pub mod vcs;

pub use common::ConfigBuilder;

/// Install the global tracing subscriber, writing to stderr.
///
/// `CARGO_AFFECTED_LOG` holds a filter directive; `-v` and `-vv` override it.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    use crate::constants::logging::{DEFAULT_FILTER, LOG_ENV};

    let directive = match verbose {
        0 => std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
        1 => "cargo_affected=debug".to_string(),
        _ => "cargo_affected=trace".to_string(),
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::{CargoArgs, CargoCommand};
    use crate::commands::execute_command;

    let cargo_args = CargoArgs::parse();
    let CargoCommand::Affected(cli) = cargo_args.command;

    init_tracing(cli.verbose);
    execute_command(cli.command)
}
