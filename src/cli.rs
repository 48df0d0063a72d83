use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::common::{CommonArgs, DetectionArgs, FormatArgs, PrefixArgs};
use crate::constants::build::DEFAULT_CARGO_COMMAND;

#[derive(Parser)]
#[command(
    bin_name = "cargo",
    subcommand_required = true,
    subcommand_precedence_over_arg = true,
    version
)]
pub struct CargoArgs {
    #[command(subcommand)]
    pub command: CargoCommand,
}

#[derive(Subcommand)]
pub enum CargoCommand {
    #[command(name = "affected")]
    Affected(Cli),
}

#[derive(Parser)]
#[command(
    name = "affected",
    about = "Find the projects in a Rust monorepo affected by changes since a base branch",
    long_about = "cargo-affected maps the files changed since the merge base with a base branch \
                  onto the packages of your repository, then follows path dependencies in \
                  reverse to find every package that needs to be rebuilt or retested.",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report changed and affected projects
    ///
    /// Lists the files changed since the merge base with the base branch,
    /// the projects that own them, and every project that depends on one
    /// of those projects directly or transitively.
    #[command(
        long_about = "Detect changed projects. Changed files come from git (merge base with the \
                      base branch, plus untracked files unless disabled) or from --files. Each \
                      file is attributed to the deepest project containing it, and the affected \
                      set is extended with all transitive dependents."
    )]
    Detect {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        detection: DetectionArgs,

        #[command(flatten)]
        format: FormatArgs,

        #[command(flatten)]
        prefix: PrefixArgs,

        /// Write the analysed project graph to a JSON snapshot
        #[arg(short, long, value_name = "FILE", env = "CARGO_AFFECTED_OUTPUT")]
        output: Option<PathBuf>,

        /// List the changed files of every directly changed project
        #[arg(long, env = "CARGO_AFFECTED_SHOW_FILES")]
        show_files: bool,
    },

    /// Build only the affected projects
    ///
    /// Runs a cargo command for every affected project, dependencies
    /// first. Nothing is run when no project is affected.
    #[command(
        long_about = "Compute the affected projects (or load them from a snapshot written by \
                      `detect --output`) and run `cargo <command> -p <package>...` for them. When \
                      the repository root itself is affected the whole workspace is built. \
                      Arguments after `--` are passed to cargo."
    )]
    Build {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        detection: DetectionArgs,

        #[command(flatten)]
        prefix: PrefixArgs,

        /// Use a snapshot written by `detect --output` instead of git
        #[arg(long, value_name = "SNAPSHOT", env = "CARGO_AFFECTED_FROM")]
        from: Option<PathBuf>,

        /// Cargo subcommand to run
        #[arg(
            long,
            value_name = "COMMAND",
            default_value = DEFAULT_CARGO_COMMAND,
            env = "CARGO_AFFECTED_CARGO_COMMAND"
        )]
        cargo_command: String,

        /// Print the cargo invocation without running it
        #[arg(long, env = "CARGO_AFFECTED_DRY_RUN")]
        dry_run: bool,

        /// Extra arguments for cargo
        #[arg(last = true, value_name = "CARGO_ARGS")]
        cargo_args: Vec<String>,
    },

    /// List the projects that depend on a project
    ///
    /// Follows dependencies in reverse from the given project. Git is not
    /// consulted.
    Dependents {
        /// Qualified id (e.g. `:libs:core`) or package name
        #[arg(value_name = "PROJECT")]
        project: String,

        #[command(flatten)]
        common: CommonArgs,

        /// Output format
        #[arg(
            short,
            long,
            value_enum,
            default_value = "human",
            env = "CARGO_AFFECTED_DEPENDENTS_FORMAT"
        )]
        format: ListFormat,

        /// Use a snapshot written by `detect --output` instead of scanning
        #[arg(long, value_name = "SNAPSHOT", env = "CARGO_AFFECTED_FROM")]
        from: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Junit,
    #[value(name = "github")]
    GitHub,
}

/// Formats for plain project lists
#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum ListFormat {
    Human,
    Json,
}
