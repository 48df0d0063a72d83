//! Detect command implementation

use miette::{Result, WrapErr};

use super::analysis_config;
use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::DetectConfig;
use crate::error::AffectedError;

impl FromCommand for DetectConfig {
    fn from_command(command: Commands) -> Result<Self, AffectedError> {
        match command {
            Commands::Detect {
                common,
                detection,
                format,
                prefix,
                output,
                show_files,
            } => DetectConfig::builder()
                .with_analysis(analysis_config(&common, detection)?)
                .with_format(format.format)
                .with_prefix(prefix.prefix.clone(), prefix.prefix_match())
                .with_output(output)
                .with_show_files(show_files)
                .build(),
            _ => Err(AffectedError::ConfigurationError {
                message: "Invalid command type for DetectConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(DetectConfig);

/// Execute the detect command for reporting changed and affected projects
pub fn execute_detect_command(command: Commands) -> Result<()> {
    let config = DetectConfig::from_command(command)
        .wrap_err("Failed to parse detect command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::detect::DetectExecutor;
    DetectExecutor::execute(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::{CargoArgs, CargoCommand, OutputFormat};
    use crate::config::ChangeSource;

    fn parse(args: &[&str]) -> Commands {
        let CargoCommand::Affected(cli) = CargoArgs::try_parse_from(args).unwrap().command;
        cli.command
    }

    #[test]
    fn test_detect_config_from_command() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().to_string_lossy().into_owned();
        let command = parse(&[
            "cargo",
            "affected",
            "detect",
            "--root",
            &root,
            "--files",
            "libs/core/src/lib.rs",
            "--format",
            "github",
            "--prefix",
            ":libs",
            "--output",
            "snapshot.json",
        ]);

        let config = DetectConfig::try_from(command).unwrap();

        assert_eq!(config.analysis.root, PathBuf::from(&root));
        assert_eq!(
            config.analysis.source,
            ChangeSource::Files(vec!["libs/core/src/lib.rs".to_string()])
        );
        assert_eq!(config.format, OutputFormat::GitHub);
        assert_eq!(config.prefix.as_deref(), Some(":libs"));
        assert_eq!(config.output, Some(PathBuf::from("snapshot.json")));
    }

    #[test]
    fn test_wrong_command_is_rejected() {
        let command = parse(&["cargo", "affected", "dependents", "core"]);

        assert!(DetectConfig::from_command(command).is_err());
    }
}
