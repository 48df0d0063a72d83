use std::path::PathBuf;
use std::time::Duration;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid TOML syntax in '{file}'")]
#[diagnostic(
    code(cargo_affected::toml_parse_error),
    help("Check the TOML syntax near the highlighted position")
)]
pub struct TomlParseError {
    pub file: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("syntax error here")]
    pub span: Option<SourceSpan>,
    #[source]
    pub source: toml::de::Error,
}

#[derive(Error, Debug, Diagnostic)]
pub enum AffectedError {
    #[error("Failed to read file '{path}'")]
    #[diagnostic(
        code(cargo_affected::io_error),
        help("Check if the file exists and you have read permissions")
    )]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    TomlParseError(Box<TomlParseError>),

    #[error("JSON serialization error")]
    #[diagnostic(
        code(cargo_affected::json_error),
        help("If this happened while loading a snapshot, regenerate it with `cargo affected detect --output`")
    )]
    Json(#[from] serde_json::Error),

    #[error("String formatting error")]
    #[diagnostic(
        code(cargo_affected::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("IO error")]
    #[diagnostic(
        code(cargo_affected::io_error),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(cargo_affected::config_error),
        help("Check your command arguments and configuration")
    )]
    ConfigurationError { message: String },

    #[error("`git {command}` failed: {stderr}")]
    #[diagnostic(
        code(cargo_affected::git_error),
        help("Make sure the path is inside a git repository and the base branch exists locally")
    )]
    Git { command: String, stderr: String },

    #[error("`git {command}` did not finish within {timeout:?}")]
    #[diagnostic(
        code(cargo_affected::git_timeout),
        help("Increase the timeout with --git-timeout or CARGO_AFFECTED_GIT_TIMEOUT")
    )]
    GitTimeout { command: String, timeout: Duration },

    #[error("`cargo {command}` exited with {status}")]
    #[diagnostic(
        code(cargo_affected::build_failed),
        help("See the cargo output above for the failing project")
    )]
    BuildFailed { command: String, status: String },

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    #[diagnostic(
        code(cargo_affected::snapshot_version),
        help("Regenerate the snapshot with this version of cargo-affected")
    )]
    SnapshotVersion { found: u32, expected: u32 },
}

/// Failure to read one project's information from a registry.
///
/// These are never fatal: the graph builder records them on the affected
/// node and carries on.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Project '{id}' is not known to the registry")]
    #[diagnostic(code(cargo_affected::registry::unknown_project))]
    UnknownProject { id: String },

    #[error("Could not read dependency declarations of '{id}': {message}")]
    #[diagnostic(
        code(cargo_affected::registry::unreadable),
        help("The project is still analysed, but without dependency edges")
    )]
    Unreadable { id: String, message: String },
}
