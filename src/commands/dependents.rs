//! Dependents command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::DependentsConfig;
use crate::error::AffectedError;

impl FromCommand for DependentsConfig {
    fn from_command(command: Commands) -> Result<Self, AffectedError> {
        match command {
            Commands::Dependents {
                project,
                common,
                format,
                from,
            } => DependentsConfig::builder()
                .with_project(project)
                .with_root(common.get_root())
                .with_filter((&common).into())
                .with_format(format)
                .with_from(from)
                .build(),
            _ => Err(AffectedError::ConfigurationError {
                message: "Invalid command type for DependentsConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(DependentsConfig);

/// Execute the dependents command for listing reverse dependencies
pub fn execute_dependents_command(command: Commands) -> Result<()> {
    let config = DependentsConfig::from_command(command)
        .wrap_err("Failed to parse dependents command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::dependents::DependentsExecutor;
    DependentsExecutor::execute(config)
}
