//! Command implementations for cargo-affected CLI
//!
//! This module contains the implementations for each CLI command:
//! - detect: Report changed and affected projects
//! - build: Build only the affected projects
//! - dependents: List the projects that depend on a project

pub mod build;
pub mod dependents;
pub mod detect;

use miette::Result;

use crate::cli::Commands;
use crate::common::{CommonArgs, ConfigBuilder, DetectionArgs};
use crate::config::AnalysisConfig;
use crate::error::AffectedError;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Detect { .. } => detect::execute_detect_command(command),
        Commands::Build { .. } => build::execute_build_command(command),
        Commands::Dependents { .. } => dependents::execute_dependents_command(command),
    }
}

/// The analysis settings shared by `detect` and `build`
fn analysis_config(
    common: &CommonArgs,
    detection: DetectionArgs,
) -> Result<AnalysisConfig, AffectedError> {
    AnalysisConfig::builder()
        .with_root(common.get_root())
        .with_filter(common.into())
        .with_files(detection.files.clone())
        .with_base_branch(detection.base_branch.clone())
        .with_include_untracked(detection.include_untracked())
        .with_git_timeout(detection.git_timeout())
        .with_ignore(detection.ignore)
        .build()
}
