//! Outcome of a single executed test.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result status reported for one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Pass,
    Fail,
    Ignore,
}

impl TestStatus {
    /// Label used in text reports (`PASS`, `FAILED`, `IGNORED`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAILED",
            Self::Ignore => "IGNORED",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TestStatus::Ignore).expect("serialize"),
            "\"ignore\""
        );
    }

    #[test]
    fn labels_match_report_text() {
        assert_eq!(TestStatus::Pass.label(), "PASS");
        assert_eq!(TestStatus::Fail.label(), "FAILED");
        assert_eq!(TestStatus::Ignore.label(), "IGNORED");
    }
}
