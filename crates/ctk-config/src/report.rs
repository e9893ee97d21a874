//! Report rendering configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_suite_name() -> String {
    String::from("Unity")
}

fn default_xml_output() -> PathBuf {
    PathBuf::from("report.xml")
}

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub color: ColorMode,

    /// `name` attribute of the JUnit `<testsuite>` element.
    #[serde(default = "default_suite_name")]
    pub suite_name: String,

    /// Where `ctk parse --xml` writes its report by default.
    #[serde(default = "default_xml_output")]
    pub xml_output: PathBuf,

    /// Prefix prepended to source paths in summary detail lines.
    #[serde(default)]
    pub root: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            suite_name: default_suite_name(),
            xml_output: default_xml_output(),
            root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ReportConfig::default();
        assert_eq!(config.color, ColorMode::Auto);
        assert_eq!(config.suite_name, "Unity");
        assert_eq!(config.xml_output, PathBuf::from("report.xml"));
        assert!(config.root.is_none());
    }
}
