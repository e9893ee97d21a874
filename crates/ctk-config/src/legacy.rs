//! Loading of legacy `:unity:` / `:cmock:` YAML option files.
//!
//! Keys in those files are usually symbol-style (`:test_prefix:`). Leading
//! colons are stripped before the chosen section is handed to figment.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Yaml},
    value::{Dict, Value},
};

use crate::ConfigError;

/// Section names searched in order; the first present one wins.
const SECTIONS: [&str; 2] = ["unity", "cmock"];

/// Which part of [`crate::CtkConfig`] a legacy YAML section feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyTarget {
    Runner,
    Module,
}

impl LegacyTarget {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Runner => "runner",
            Self::Module => "module",
        }
    }
}

/// A legacy YAML option file and the section it configures.
#[derive(Clone, Debug)]
pub struct LegacyYaml {
    pub path: PathBuf,
    pub target: LegacyTarget,
}

impl LegacyYaml {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, target: LegacyTarget) -> Self {
        Self {
            path: path.into(),
            target,
        }
    }
}

/// Read the `unity` (or `cmock`) section of a legacy YAML file.
pub(crate) fn load_section(yaml: &LegacyYaml) -> Result<Value, ConfigError> {
    if !yaml.path.is_file() {
        return Err(ConfigError::MissingFile(yaml.path.clone()));
    }

    let root: Dict = Figment::from(Yaml::file(&yaml.path)).extract()?;
    let root = strip_symbol_keys(root);
    let section = find_section(&root, &yaml.path)?;
    tracing::debug!(path = %yaml.path.display(), target = yaml.target.key(), "loaded legacy yaml section");

    Ok(match yaml.target {
        LegacyTarget::Runner => section,
        // The module generator shares `test_prefix` with the runner but means
        // a file-name prefix by it.
        LegacyTarget::Module => rename_key(section, "test_prefix", "test_file_prefix"),
    })
}

fn find_section(root: &Dict, path: &Path) -> Result<Value, ConfigError> {
    SECTIONS
        .iter()
        .find_map(|name| root.get(*name))
        .cloned()
        .ok_or_else(|| ConfigError::NotConfigured {
            section: String::from(":unity or :cmock"),
            path: path.to_path_buf(),
        })
}

fn strip_symbol_keys(dict: Dict) -> Dict {
    dict.into_iter()
        .map(|(key, value)| {
            (
                key.trim_start_matches(':').to_string(),
                strip_value(value),
            )
        })
        .collect()
}

fn strip_value(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => Value::Dict(tag, strip_symbol_keys(dict)),
        Value::Array(tag, items) => {
            Value::Array(tag, items.into_iter().map(strip_value).collect())
        }
        other => other,
    }
}

fn rename_key(value: Value, from: &str, to: &str) -> Value {
    match value {
        Value::Dict(tag, mut dict) => {
            if let Some(moved) = dict.remove(from) {
                dict.entry(to.to_string()).or_insert(moved);
            }
            Value::Dict(tag, dict)
        }
        other => other,
    }
}
