//! # ctk-config
//!
//! Layered configuration loading for the C test kit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CTK_*` prefix, `__` as separator)
//! 2. A legacy `:unity:` / `:cmock:` YAML option file, when one is given
//! 3. Project-level `.ctk/config.toml`
//! 4. User-level `~/.config/ctk/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CTK_RUNNER__TEST_PREFIX` -> `runner.test_prefix`,
//! `CTK_REPORT__COLOR` -> `report.color`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ctk_config::{ConfigSources, CtkConfig, LegacyTarget, LegacyYaml};
//!
//! // Defaults + TOML files + env:
//! let config = CtkConfig::load().expect("config");
//!
//! // With a legacy `:unity:` YAML option file feeding the runner section:
//! let sources = ConfigSources {
//!     legacy_yaml: Some(LegacyYaml::new("project.yml", LegacyTarget::Runner)),
//!     ..ConfigSources::default()
//! };
//! let config = CtkConfig::load_from(&sources).expect("config");
//! println!("test prefix: {}", config.runner.test_prefix);
//! ```

mod error;
mod legacy;
mod module;
mod report;
mod runner;

pub use error::ConfigError;
pub use legacy::{LegacyTarget, LegacyYaml};
pub use module::{Boilerplates, ModuleConfig, ModuleIncludes};
pub use report::{ColorMode, ReportConfig};
pub use runner::{Plugin, RunnerConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CtkConfig {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub module: ModuleConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where [`CtkConfig::load_from`] looks for configuration.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Project-local TOML file. Skipped when it does not exist.
    pub project_config: PathBuf,
    /// Whether `~/.config/ctk/config.toml` is consulted.
    pub user_config: bool,
    /// Optional legacy YAML option file. Must exist when given.
    pub legacy_yaml: Option<LegacyYaml>,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            project_config: PathBuf::from(".ctk/config.toml"),
            user_config: true,
            legacy_yaml: None,
        }
    }
}

impl CtkConfig {
    /// Load configuration from the default sources.
    ///
    /// # Errors
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSources::default())
    }

    /// Load configuration from explicit sources.
    ///
    /// The result is always fully defaulted: any field no source mentions
    /// keeps its built-in value.
    ///
    /// # Errors
    /// Returns `ConfigError` if a source cannot be parsed, a requested legacy
    /// YAML file is missing or lacks a `unity`/`cmock` section, or the merged
    /// runner settings are invalid.
    pub fn load_from(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(sources)?.extract()?;
        config.runner.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    ///
    /// # Errors
    /// Returns `ConfigError` if the legacy YAML file cannot be read.
    pub fn figment(sources: &ConfigSources) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if sources.user_config {
            if let Some(global_path) = Self::global_config_path() {
                if global_path.exists() {
                    figment = figment.merge(Toml::file(global_path));
                }
            }
        }

        // Layer 2: Project-local config
        if sources.project_config.exists() {
            figment = figment.merge(Toml::file(&sources.project_config));
        }

        // Layer 3: Legacy YAML option file
        if let Some(yaml) = &sources.legacy_yaml {
            let section = legacy::load_section(yaml)?;
            figment = figment.merge(Serialized::default(yaml.target.key(), section));
        }

        // Layer 4: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("CTK_").split("__"));

        Ok(figment)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ctk").join("config.toml"))
    }
}
