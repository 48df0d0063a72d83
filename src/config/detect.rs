//! Configuration for the detect command

use std::path::PathBuf;

use super::analysis::AnalysisConfig;
use crate::analyzer::PrefixMatch;
use crate::cli::OutputFormat;
use crate::common::ConfigBuilder;
use crate::error::AffectedError;

#[derive(Debug, Clone)]
pub struct DetectConfig {
    pub analysis: AnalysisConfig,

    /// Output format
    pub format: OutputFormat,

    /// Only report affected projects under this prefix
    pub prefix: Option<String>,
    pub prefix_match: PrefixMatch,

    /// Snapshot file to write
    pub output: Option<PathBuf>,

    /// List changed files per project (human format only)
    pub show_files: bool,
}

impl DetectConfig {
    pub fn builder() -> DetectConfigBuilder {
        DetectConfigBuilder::default()
    }
}

pub struct DetectConfigBuilder {
    analysis: Option<AnalysisConfig>,
    format: OutputFormat,
    prefix: Option<String>,
    prefix_match: PrefixMatch,
    output: Option<PathBuf>,
    show_files: bool,
}

impl Default for DetectConfigBuilder {
    fn default() -> Self {
        Self {
            analysis: None,
            format: OutputFormat::Human,
            prefix: None,
            prefix_match: PrefixMatch::default(),
            output: None,
            show_files: false,
        }
    }
}

impl DetectConfigBuilder {
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>, prefix_match: PrefixMatch) -> Self {
        self.prefix = prefix;
        self.prefix_match = prefix_match;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_show_files(mut self, show_files: bool) -> Self {
        self.show_files = show_files;
        self
    }
}

impl ConfigBuilder for DetectConfigBuilder {
    type Config = DetectConfig;

    fn build(self) -> Result<DetectConfig, AffectedError> {
        let analysis = self
            .analysis
            .ok_or_else(|| AffectedError::ConfigurationError {
                message: "Missing required field: analysis".to_string(),
            })?;

        Ok(DetectConfig {
            analysis,
            format: self.format,
            prefix: self.prefix,
            prefix_match: self.prefix_match,
            output: self.output,
            show_files: self.show_files,
        })
    }
}
