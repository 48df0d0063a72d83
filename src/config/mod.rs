//! # Configuration Module
//!
//! This module provides configuration structures for all cargo-affected
//! commands. Each command has its own config module with a builder; the
//! analysis settings they share live in [`analysis`].
//!
//! Values are layered: command-line flags, then `CARGO_AFFECTED_*`
//! environment variables (both handled by clap), then the
//! `[workspace.metadata.affected]` table of the root manifest, then built-in
//! defaults.
//!
//! ## Command Configurations
//!
//! - **DetectConfig**: Configuration for the `detect` command
//! - **BuildConfig**: Configuration for the `build` command
//! - **DependentsConfig**: Configuration for the `dependents` command
//!
//! ## Example
//!
//! ```
//! use std::path::PathBuf;
//!
//! use cargo_affected::ConfigBuilder;
//! use cargo_affected::cli::OutputFormat;
//! use cargo_affected::config::{AffectedSettings, AnalysisConfig, ChangeSource, DetectConfig};
//!
//! # fn main() -> Result<(), cargo_affected::error::AffectedError> {
//! let analysis = AnalysisConfig::builder()
//!     .with_root(PathBuf::from("/path/to/monorepo"))
//!     .with_settings(AffectedSettings::default())
//!     .with_base_branch(Some("develop".to_string()))
//!     .build()?;
//!
//! let config = DetectConfig::builder()
//!     .with_analysis(analysis)
//!     .with_format(OutputFormat::Json)
//!     .build()?;
//!
//! assert!(matches!(config.analysis.source, ChangeSource::Git(_)));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod build;
pub mod dependents;
pub mod detect;
pub mod settings;

pub use analysis::{AnalysisConfig, ChangeSource};
pub use build::BuildConfig;
pub use dependents::DependentsConfig;
pub use detect::DetectConfig;
pub use settings::AffectedSettings;
