//! Module scaffolding error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("The design pattern '{0}' specified isn't one that I recognize")]
    UnknownPattern(String),

    #[error("File {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("Invalid module name '{0}': use letters, digits and underscores")]
    InvalidName(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
