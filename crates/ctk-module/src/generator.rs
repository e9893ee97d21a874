//! Creation and removal of a module's source, header and test files.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use ctk_config::ModuleConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ModuleError;
use crate::pattern::{Member, Pattern};
use crate::template;
use crate::vcs::{SourceControl, Svn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Source,
    Header,
    Test,
}

/// One file a module operation works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    pub kind: FileKind,
    pub path: PathBuf,
    /// Module name plus pattern member, e.g. `LedDriver`.
    pub name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FileAction {
    Created,
    CreatedAndAdded,
    AddFailed { reason: String },
    Deleted,
    DeletedAndRemoved,
    RemoveFailed { reason: String },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub action: FileAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Generate,
    Destroy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub pattern: String,
    pub operation: Operation,
    pub files: Vec<FileOutcome>,
}

impl ModuleReport {
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let path = file.path.display();
            let _ = match &file.action {
                FileAction::Created => writeln!(out, "File {path} created"),
                FileAction::CreatedAndAdded => {
                    writeln!(out, "File {path} created and added to source control")
                }
                FileAction::AddFailed { .. } => writeln!(
                    out,
                    "File {path} created but FAILED adding to source control!"
                ),
                FileAction::Deleted => writeln!(out, "File {path} deleted"),
                FileAction::DeletedAndRemoved => {
                    writeln!(out, "File {path} deleted and removed from source control")
                }
                FileAction::RemoveFailed { .. } => writeln!(
                    out,
                    "File {path} FAILED removing from source control!"
                ),
                FileAction::Missing => {
                    writeln!(out, "File {path} does not exist so cannot be removed.")
                }
            };
        }
        let _ = match self.operation {
            Operation::Generate => writeln!(out, "Generate Complete"),
            Operation::Destroy => writeln!(out, "Destroy Complete"),
        };
        out
    }
}

/// Module names become file names and C identifiers.
///
/// # Errors
/// Returns `ModuleError::InvalidName` unless the name is non-empty and made
/// of ASCII letters, digits and underscores.
pub fn validate_name(name: &str) -> Result<(), ModuleError> {
    if !name.is_empty() && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        Ok(())
    } else {
        Err(ModuleError::InvalidName(name.to_string()))
    }
}

pub struct ModuleGenerator<V = Svn> {
    config: ModuleConfig,
    vcs: V,
}

impl ModuleGenerator {
    #[must_use]
    pub const fn new(config: ModuleConfig) -> Self {
        Self { config, vcs: Svn }
    }
}

impl<V: SourceControl> ModuleGenerator<V> {
    pub const fn with_source_control(config: ModuleConfig, vcs: V) -> Self {
        Self { config, vcs }
    }

    #[must_use]
    pub const fn source_control(&self) -> &V {
        &self.vcs
    }

    /// Resolve the pattern to use: the explicit one, else the configured one.
    ///
    /// # Errors
    /// Returns `ModuleError::UnknownPattern` for an unrecognised name.
    pub fn resolve_pattern(&self, pattern: Option<&str>) -> Result<Pattern, ModuleError> {
        pattern.unwrap_or(&self.config.pattern).parse()
    }

    /// Every file of the module, sources first, then headers, then tests,
    /// each in pattern-member order.
    ///
    /// # Errors
    /// Returns `ModuleError::InvalidName` or `ModuleError::UnknownPattern`.
    pub fn plan(&self, module: &str, pattern: Option<&str>) -> Result<Vec<ModuleFile>, ModuleError> {
        validate_name(module)?;
        let pattern = self.resolve_pattern(pattern)?;
        let kinds = [FileKind::Source, FileKind::Header, FileKind::Test];
        Ok(kinds
            .iter()
            .flat_map(|&kind| {
                pattern
                    .members()
                    .iter()
                    .map(move |member| self.module_file(kind, module, member))
            })
            .collect())
    }

    fn module_file(&self, kind: FileKind, module: &str, member: &Member) -> ModuleFile {
        let name = format!("{module}{}", member.suffix);
        let includes = &self.config.includes;
        let boilerplates = &self.config.boilerplates;
        let siblings = member.depends_on.iter().map(|dep| format!("{module}{dep}.h"));

        let (path, body, boilerplate) = match kind {
            FileKind::Source => {
                let mut list = includes.src.clone();
                siblings.for_each(|include| push_unique(&mut list, include));
                (
                    self.config.path_src.join(format!("{name}.c")),
                    template::source(&name, &list),
                    boilerplates.src.as_deref(),
                )
            }
            FileKind::Header => (
                self.config.include_dir().join(format!("{name}.h")),
                template::header(&name, &includes.inc),
                boilerplates.inc.as_deref(),
            ),
            FileKind::Test => {
                let mut list = includes.tst.clone();
                siblings.for_each(|include| push_unique(&mut list, format!("Mock{include}")));
                (
                    self.config
                        .path_tst
                        .join(format!("{}{name}.c", self.config.test_file_prefix)),
                    template::test(&name, &list),
                    boilerplates.tst.as_deref(),
                )
            }
        };

        let contents = match boilerplate {
            Some(text) => format!("{}{body}", template::boilerplate(text, &name)),
            None => body,
        };
        ModuleFile {
            kind,
            path,
            name,
            contents,
        }
    }

    /// Write every file of the module. Nothing is written if any target
    /// already exists.
    ///
    /// # Errors
    /// Returns `ModuleError::AlreadyExists` for the first existing target,
    /// or `ModuleError::Io` if a directory or file cannot be written.
    pub fn generate(&self, module: &str, pattern: Option<&str>) -> Result<ModuleReport, ModuleError> {
        let resolved = self.resolve_pattern(pattern)?;
        let files = self.plan(module, pattern)?;
        if let Some(existing) = files.iter().find(|file| file.path.exists()) {
            return Err(ModuleError::AlreadyExists(existing.path.clone()));
        }

        let mut outcomes = Vec::with_capacity(files.len());
        for file in &files {
            write_file(&file.path, &file.contents)?;
            info!(path = %file.path.display(), kind = ?file.kind, "created module file");
            let action = if self.config.update_svn {
                match self.vcs.add(&file.path) {
                    Ok(()) => FileAction::CreatedAndAdded,
                    Err(reason) => {
                        warn!(path = %file.path.display(), %reason, "svn add failed");
                        FileAction::AddFailed { reason }
                    }
                }
            } else {
                FileAction::Created
            };
            outcomes.push(FileOutcome {
                path: file.path.clone(),
                action,
            });
        }

        Ok(ModuleReport {
            module: module.to_string(),
            pattern: resolved.to_string(),
            operation: Operation::Generate,
            files: outcomes,
        })
    }

    /// Remove every existing file of the module, noting the missing ones.
    ///
    /// # Errors
    /// Returns `ModuleError::Io` if an existing file cannot be removed.
    pub fn destroy(&self, module: &str, pattern: Option<&str>) -> Result<ModuleReport, ModuleError> {
        let resolved = self.resolve_pattern(pattern)?;
        let files = self.plan(module, pattern)?;

        let mut outcomes = Vec::with_capacity(files.len());
        for file in &files {
            let action = if !file.path.exists() {
                debug!(path = %file.path.display(), "module file missing");
                FileAction::Missing
            } else if self.config.update_svn {
                match self.vcs.delete(&file.path) {
                    Ok(()) => FileAction::DeletedAndRemoved,
                    Err(reason) => {
                        warn!(path = %file.path.display(), %reason, "svn delete failed");
                        FileAction::RemoveFailed { reason }
                    }
                }
            } else {
                fs::remove_file(&file.path).map_err(|source| ModuleError::Io {
                    path: file.path.clone(),
                    source,
                })?;
                FileAction::Deleted
            };
            if matches!(action, FileAction::Deleted | FileAction::DeletedAndRemoved) {
                info!(path = %file.path.display(), "removed module file");
            }
            outcomes.push(FileOutcome {
                path: file.path.clone(),
                action,
            });
        }

        Ok(ModuleReport {
            module: module.to_string(),
            pattern: resolved.to_string(),
            operation: Operation::Destroy,
            files: outcomes,
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ModuleError> {
    let io_error = |source| ModuleError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}
