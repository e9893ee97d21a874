//! Test-runner generator configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_framework() -> String {
    String::from("unity")
}

fn default_test_prefix() -> String {
    String::from("test|spec|should")
}

fn default_mock_prefix() -> String {
    String::from("mock")
}

fn default_setup_name() -> String {
    String::from("setUp")
}

fn default_teardown_name() -> String {
    String::from("tearDown")
}

fn default_main_name() -> String {
    String::from("main")
}

/// Optional runner plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plugin {
    /// Wrap setup and test calls in a `Try`/`Catch` region.
    #[serde(alias = ":cexception")]
    Cexception,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunnerConfig {
    /// Extra headers force-included into every generated runner.
    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default)]
    pub plugins: Vec<Plugin>,

    /// Framework header base name (`unity` -> `#include "unity.h"`).
    #[serde(default = "default_framework")]
    pub framework: String,

    /// Regex alternation a test function name must start with.
    #[serde(default = "default_test_prefix")]
    pub test_prefix: String,

    /// Case-insensitive base-name prefix marking an include as a mock header.
    #[serde(default = "default_mock_prefix")]
    pub mock_prefix: String,

    #[serde(default = "default_setup_name")]
    pub setup_name: String,

    #[serde(default = "default_teardown_name")]
    pub teardown_name: String,

    #[serde(default = "default_main_name")]
    pub main_name: String,

    /// Suffix the entry point with the input file stem (`main_test_foo`).
    #[serde(default)]
    pub auto_main_name: bool,

    /// Entry point takes `argc`/`argv` and supports list and filter modes.
    #[serde(default)]
    pub main_with_params: bool,

    /// Text placed before the entry point's return type (e.g. `__declspec(dllexport)`).
    #[serde(default)]
    pub main_export_decl: String,

    /// Wrap the runner in `#ifdef USE_REAL_<NAME>` / `#endif`.
    #[serde(default)]
    pub isolation_directive: bool,

    /// Honour `TEST_CASE(...)` annotations.
    #[serde(default)]
    pub use_param_tests: bool,

    /// Emit and reset the global call-ordering counters used by mocks.
    #[serde(default)]
    pub enforce_strict_ordering: bool,

    /// Raw C body of `suite_setup`, emitted verbatim.
    #[serde(default)]
    pub suite_setup: Option<String>,

    /// Raw C body of `suite_teardown(int num_failures)`, emitted verbatim.
    #[serde(default)]
    pub suite_teardown: Option<String>,

    /// Also write a header exposing the test prototypes.
    #[serde(default)]
    pub header_file: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            plugins: Vec::new(),
            framework: default_framework(),
            test_prefix: default_test_prefix(),
            mock_prefix: default_mock_prefix(),
            setup_name: default_setup_name(),
            teardown_name: default_teardown_name(),
            main_name: default_main_name(),
            auto_main_name: false,
            main_with_params: false,
            main_export_decl: String::new(),
            isolation_directive: false,
            use_param_tests: false,
            enforce_strict_ordering: false,
            suite_setup: None,
            suite_teardown: None,
            header_file: None,
        }
    }
}

impl RunnerConfig {
    #[must_use]
    pub fn has_plugin(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }

    /// Configured header path, treating an empty path as absent.
    #[must_use]
    pub fn header_path(&self) -> Option<&PathBuf> {
        self.header_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Reject settings that would produce a runner with unnamed functions.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first empty field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("runner.framework", &self.framework),
            ("runner.test_prefix", &self.test_prefix),
            ("runner.setup_name", &self.setup_name),
            ("runner.teardown_name", &self.teardown_name),
            ("runner.main_name", &self.main_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: String::from("must not be empty"),
                });
            }
        }
        Ok(())
    }
}
