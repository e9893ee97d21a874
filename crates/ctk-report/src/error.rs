//! Report error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't parse test results in {file}: {line}")]
    UnparseableSummary { file: PathBuf, line: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub(crate) fn compile(pattern: &str) -> Result<regex::Regex, ReportError> {
    regex::Regex::new(pattern).map_err(|source| ReportError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String, ReportError> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Captured build logs are not always UTF-8; keep what can be read.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
