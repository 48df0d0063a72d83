//! Configuration for the build command

use std::path::PathBuf;

use super::analysis::AnalysisConfig;
use crate::analyzer::PrefixMatch;
use crate::common::ConfigBuilder;
use crate::constants::build::DEFAULT_CARGO_COMMAND;
use crate::error::AffectedError;

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub analysis: AnalysisConfig,

    /// Only build affected projects under this prefix
    pub prefix: Option<String>,
    pub prefix_match: PrefixMatch,

    /// Snapshot to load instead of running the analysis
    pub from: Option<PathBuf>,

    /// Cargo subcommand, e.g. `build` or `test`
    pub cargo_command: String,

    /// Appended to the cargo invocation
    pub cargo_args: Vec<String>,

    pub dry_run: bool,
}

impl BuildConfig {
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }
}

pub struct BuildConfigBuilder {
    analysis: Option<AnalysisConfig>,
    prefix: Option<String>,
    prefix_match: PrefixMatch,
    from: Option<PathBuf>,
    cargo_command: String,
    cargo_args: Vec<String>,
    dry_run: bool,
}

impl Default for BuildConfigBuilder {
    fn default() -> Self {
        Self {
            analysis: None,
            prefix: None,
            prefix_match: PrefixMatch::default(),
            from: None,
            cargo_command: DEFAULT_CARGO_COMMAND.to_string(),
            cargo_args: Vec::new(),
            dry_run: false,
        }
    }
}

impl BuildConfigBuilder {
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>, prefix_match: PrefixMatch) -> Self {
        self.prefix = prefix;
        self.prefix_match = prefix_match;
        self
    }

    pub fn with_from(mut self, from: Option<PathBuf>) -> Self {
        self.from = from;
        self
    }

    pub fn with_cargo_command(mut self, cargo_command: String) -> Self {
        self.cargo_command = cargo_command;
        self
    }

    pub fn with_cargo_args(mut self, cargo_args: Vec<String>) -> Self {
        self.cargo_args = cargo_args;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl ConfigBuilder for BuildConfigBuilder {
    type Config = BuildConfig;

    fn build(self) -> Result<BuildConfig, AffectedError> {
        let analysis = self
            .analysis
            .ok_or_else(|| AffectedError::ConfigurationError {
                message: "Missing required field: analysis".to_string(),
            })?;

        let cargo_command = self.cargo_command.trim().to_string();
        if cargo_command.is_empty() || cargo_command.contains(char::is_whitespace) {
            return Err(AffectedError::ConfigurationError {
                message: format!(
                    "Cargo command must be a single subcommand, got '{}'",
                    self.cargo_command
                ),
            });
        }

        Ok(BuildConfig {
            analysis,
            prefix: self.prefix,
            prefix_match: self.prefix_match,
            from: self.from,
            cargo_command,
            cargo_args: self.cargo_args,
            dry_run: self.dry_run,
        })
    }
}
