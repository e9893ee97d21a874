use anyhow::Context;
use ctk_config::{ConfigSources, CtkConfig, LegacyTarget, LegacyYaml};

use crate::cli::{Commands, GlobalFlags};

/// Section a legacy YAML option file configures for `command`, if any.
#[must_use]
pub const fn legacy_target(command: &Commands) -> Option<LegacyTarget> {
    match command {
        Commands::Runner(_) => Some(LegacyTarget::Runner),
        Commands::Module(_) => Some(LegacyTarget::Module),
        Commands::Parse(_) | Commands::Summary(_) | Commands::Junit(_) | Commands::Colour(_) => None,
    }
}

/// Load defaults, TOML files, the legacy YAML file (when the command uses
/// one) and `CTK_*` environment variables.
pub fn load_config(flags: &GlobalFlags, command: &Commands) -> anyhow::Result<CtkConfig> {
    let legacy_yaml = match (&flags.config, legacy_target(command)) {
        (Some(path), Some(target)) => Some(LegacyYaml::new(path, target)),
        (Some(path), None) => {
            tracing::warn!(path = %path.display(), "--config is only read by runner and module; ignoring");
            None
        }
        (None, _) => None,
    };

    let sources = ConfigSources {
        legacy_yaml,
        ..ConfigSources::default()
    };
    CtkConfig::load_from(&sources).context("failed to load ctk configuration")
}
