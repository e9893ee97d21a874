//! Source-control hooks for created and removed module files.

use std::path::Path;
use std::process::Command;

/// Registers created files with, and removes deleted files from, a
/// version-control system. Errors are plain messages: callers report them
/// and carry on.
pub trait SourceControl {
    /// # Errors
    /// Returns a description of why the file could not be added.
    fn add(&self, path: &Path) -> Result<(), String>;

    /// Delete the file from the working copy and schedule its removal.
    ///
    /// # Errors
    /// Returns a description of why the file could not be removed.
    fn delete(&self, path: &Path) -> Result<(), String>;
}

/// Subversion, through the `svn` command-line client.
#[derive(Debug, Clone, Copy, Default)]
pub struct Svn;

impl Svn {
    fn run(args: &[&str], path: &Path) -> Result<(), String> {
        let output = Command::new("svn")
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| format!("run svn {}: {e}", args.join(" ")))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

impl SourceControl for Svn {
    fn add(&self, path: &Path) -> Result<(), String> {
        Self::run(&["add"], path)
    }

    fn delete(&self, path: &Path) -> Result<(), String> {
        Self::run(&["delete", "--force"], path)
    }
}
