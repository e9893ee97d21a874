//! Module scaffolding configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_pattern() -> String {
    String::from("src")
}

fn default_test_file_prefix() -> String {
    String::from("Test")
}

fn default_path_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_path_tst() -> PathBuf {
    PathBuf::from("test")
}

/// Per-kind lists of extra includes for scaffolded files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleIncludes {
    #[serde(default)]
    pub src: Vec<String>,
    #[serde(default)]
    pub inc: Vec<String>,
    #[serde(default)]
    pub tst: Vec<String>,
}

/// Per-kind boilerplate written before the template (e.g. a license banner).
///
/// `%1$s` inside a boilerplate is replaced by the file's module name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Boilerplates {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub inc: Option<String>,
    #[serde(default)]
    pub tst: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleConfig {
    /// Design pattern: `src`, `dh`, `dih`, `mch` or `mvp`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    #[serde(default)]
    pub includes: ModuleIncludes,

    #[serde(default)]
    pub boilerplates: Boilerplates,

    /// File-name prefix of generated test files.
    #[serde(default = "default_test_file_prefix")]
    pub test_file_prefix: String,

    #[serde(default = "default_path_src")]
    pub path_src: PathBuf,

    /// Header directory. Falls back to `path_src` when unset.
    #[serde(default)]
    pub path_inc: Option<PathBuf>,

    #[serde(default = "default_path_tst")]
    pub path_tst: PathBuf,

    /// Run `svn add` / `svn delete` on created and removed files.
    #[serde(default)]
    pub update_svn: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            includes: ModuleIncludes::default(),
            boilerplates: Boilerplates::default(),
            test_file_prefix: default_test_file_prefix(),
            path_src: default_path_src(),
            path_inc: None,
            path_tst: default_path_tst(),
            update_svn: false,
        }
    }
}

impl ModuleConfig {
    /// Directory headers are written to.
    #[must_use]
    pub fn include_dir(&self) -> &PathBuf {
        self.path_inc.as_ref().unwrap_or(&self.path_src)
    }
}
