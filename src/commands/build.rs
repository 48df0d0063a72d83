//! Build command implementation

use miette::{Result, WrapErr};

use super::analysis_config;
use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::BuildConfig;
use crate::error::AffectedError;

impl FromCommand for BuildConfig {
    fn from_command(command: Commands) -> Result<Self, AffectedError> {
        match command {
            Commands::Build {
                common,
                detection,
                prefix,
                from,
                cargo_command,
                dry_run,
                cargo_args,
            } => BuildConfig::builder()
                .with_analysis(analysis_config(&common, detection)?)
                .with_prefix(prefix.prefix.clone(), prefix.prefix_match())
                .with_from(from)
                .with_cargo_command(cargo_command)
                .with_cargo_args(cargo_args)
                .with_dry_run(dry_run)
                .build(),
            _ => Err(AffectedError::ConfigurationError {
                message: "Invalid command type for BuildConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(BuildConfig);

/// Execute the build command for building affected projects
pub fn execute_build_command(command: Commands) -> Result<()> {
    let config = BuildConfig::from_command(command)
        .wrap_err("Failed to parse build command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::build::BuildExecutor;
    BuildExecutor::execute(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::analyzer::PrefixMatch;
    use crate::cli::{CargoArgs, CargoCommand};

    #[test]
    fn test_build_config_from_command() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().to_string_lossy().into_owned();
        let args = CargoArgs::try_parse_from([
            "cargo",
            "affected",
            "build",
            "--root",
            &root,
            "--prefix",
            ":services",
            "--raw-prefix",
            "--cargo-command",
            "test",
            "--",
            "--locked",
        ])
        .unwrap();
        let CargoCommand::Affected(cli) = args.command;

        let config = BuildConfig::try_from(cli.command).unwrap();

        assert_eq!(config.cargo_command, "test");
        assert_eq!(config.cargo_args, vec!["--locked".to_string()]);
        assert_eq!(config.prefix_match, PrefixMatch::Raw);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_multi_word_cargo_command_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().to_string_lossy().into_owned();
        let args = CargoArgs::try_parse_from([
            "cargo",
            "affected",
            "build",
            "--root",
            &root,
            "--cargo-command",
            "build --release",
        ])
        .unwrap();
        let CargoCommand::Affected(cli) = args.command;

        assert!(BuildConfig::try_from(cli.command).is_err());
    }
}
