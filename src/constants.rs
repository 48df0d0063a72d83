//! Configuration constants for cargo-affected
//!
//! This module contains the built-in defaults used throughout the
//! application. Most of them can be overridden through command-line flags,
//! environment variables or `[workspace.metadata.affected]`.

use std::time::Duration;

/// Progress bar configuration
pub mod progress {
    use super::*;

    /// Duration between progress bar updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Spinner frames shown while scanning the repository
    pub const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
}

/// Output formatting configuration
pub mod output {
    /// Default output format when not specified
    pub const DEFAULT_FORMAT: &str = "human";
}

/// Change detection defaults
pub mod detection {
    use super::*;

    /// Branch the working tree is compared against
    pub const DEFAULT_BASE_BRANCH: &str = "main";

    /// Untracked files count as changes unless disabled
    pub const DEFAULT_INCLUDE_UNTRACKED: bool = true;

    /// Upper bound for a single git invocation
    pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Directories never searched for project manifests
    pub const SKIPPED_DIRS: &[&str] = &["target", ".git", "node_modules"];
}

/// Build command defaults
pub mod build {
    /// Cargo subcommand run for affected projects
    pub const DEFAULT_CARGO_COMMAND: &str = "build";
}

/// Logging configuration
pub mod logging {
    /// Environment variable holding a tracing filter directive
    pub const LOG_ENV: &str = "CARGO_AFFECTED_LOG";

    /// Filter used when neither the environment nor `--verbose` say otherwise
    pub const DEFAULT_FILTER: &str = "warn";
}

/// Snapshot format
pub mod snapshot {
    pub const VERSION: u32 = 1;
}
