//! Common functionality shared across commands

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::analyzer::PrefixMatch;

/// Common arguments shared by multiple commands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Repository root to analyse (defaults to current directory)
    #[arg(long, value_name = "PATH", env = "CARGO_AFFECTED_ROOT")]
    pub root: Option<PathBuf>,

    /// Exclude dev-dependencies from analysis
    #[arg(long, env = "CARGO_AFFECTED_EXCLUDE_DEV")]
    pub exclude_dev: bool,

    /// Exclude build-dependencies from analysis
    #[arg(long, env = "CARGO_AFFECTED_EXCLUDE_BUILD")]
    pub exclude_build: bool,

    /// Exclude target-specific dependencies
    #[arg(long, env = "CARGO_AFFECTED_EXCLUDE_TARGET")]
    pub exclude_target: bool,
}

/// How changed files are found
#[derive(Args, Debug, Clone)]
pub struct DetectionArgs {
    /// Branch to compare against [default: main, or metadata `base-branch`]
    #[arg(long, value_name = "BRANCH", env = "CARGO_AFFECTED_BASE_BRANCH")]
    pub base_branch: Option<String>,

    /// Count untracked files as changes [default: yes, or metadata `include-untracked`]
    #[arg(long, env = "CARGO_AFFECTED_INCLUDE_UNTRACKED", conflicts_with = "no_untracked")]
    pub include_untracked: bool,

    /// Do not count untracked files as changes
    #[arg(long, env = "CARGO_AFFECTED_NO_UNTRACKED")]
    pub no_untracked: bool,

    /// Seconds each git invocation may take
    #[arg(long, value_name = "SECS", env = "CARGO_AFFECTED_GIT_TIMEOUT")]
    pub git_timeout: Option<u64>,

    /// Glob of root-relative paths that never count as changes (repeatable)
    #[arg(long, value_name = "GLOB", env = "CARGO_AFFECTED_IGNORE", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Use these changed files instead of asking git
    #[arg(long, value_name = "FILES", env = "CARGO_AFFECTED_FILES", value_delimiter = ',')]
    pub files: Option<Vec<String>>,
}

/// Common output format arguments
#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = crate::constants::output::DEFAULT_FORMAT, env = "CARGO_AFFECTED_FORMAT")]
    pub format: crate::cli::OutputFormat,
}

/// Affected project filtering arguments
#[derive(Args, Debug, Clone)]
pub struct PrefixArgs {
    /// Only consider affected projects under this qualified id prefix
    #[arg(long, value_name = "PREFIX", env = "CARGO_AFFECTED_PREFIX")]
    pub prefix: Option<String>,

    /// Match the prefix as a plain string instead of by id segments
    #[arg(long, env = "CARGO_AFFECTED_RAW_PREFIX")]
    pub raw_prefix: bool,
}

impl CommonArgs {
    /// Get the root, using current directory if none provided
    pub fn get_root(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl DetectionArgs {
    pub fn git_timeout(&self) -> Option<Duration> {
        self.git_timeout.map(Duration::from_secs)
    }

    /// `None` when neither flag was given, leaving the choice to the settings
    pub fn include_untracked(&self) -> Option<bool> {
        match (self.include_untracked, self.no_untracked) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl PrefixArgs {
    pub fn prefix_match(&self) -> PrefixMatch {
        if self.raw_prefix {
            PrefixMatch::Raw
        } else {
            PrefixMatch::Segment
        }
    }
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, crate::error::AffectedError>;
}

/// Trait for configurations that can be created from CLI commands
/// This trait simplifies command-to-config conversions
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, crate::error::AffectedError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::AffectedError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_args_get_root_default() {
        let args = CommonArgs {
            root: None,
            exclude_dev: false,
            exclude_build: false,
            exclude_target: false,
        };

        let root = args.get_root();
        // Should default to current directory
        assert!(root.is_absolute() || root == std::path::Path::new("."));
    }

    #[test]
    fn test_common_args_get_root_with_value() {
        let args = CommonArgs {
            root: Some(PathBuf::from("/tmp/repo")),
            exclude_dev: false,
            exclude_build: false,
            exclude_target: false,
        };

        assert_eq!(args.get_root(), PathBuf::from("/tmp/repo"));
    }

    fn detection_args(include_untracked: bool, no_untracked: bool) -> DetectionArgs {
        DetectionArgs {
            base_branch: None,
            include_untracked,
            no_untracked,
            git_timeout: None,
            ignore: Vec::new(),
            files: None,
        }
    }

    #[test]
    fn test_untracked_flags() {
        assert_eq!(detection_args(false, false).include_untracked(), None);
        assert_eq!(detection_args(true, false).include_untracked(), Some(true));
        assert_eq!(detection_args(false, true).include_untracked(), Some(false));
    }

    #[test]
    fn test_prefix_match_mode() {
        let segment = PrefixArgs {
            prefix: Some(":libs".to_string()),
            raw_prefix: false,
        };
        let raw = PrefixArgs {
            prefix: Some(":libs".to_string()),
            raw_prefix: true,
        };

        assert_eq!(segment.prefix_match(), PrefixMatch::Segment);
        assert_eq!(raw.prefix_match(), PrefixMatch::Raw);
    }
}
