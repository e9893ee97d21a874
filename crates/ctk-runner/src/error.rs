//! Runner generator error types.

use std::path::PathBuf;

/// Errors that can occur while scanning a test file or writing a runner.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid test name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Config(#[from] ctk_config::ConfigError),
}
