//! Line-by-line ANSI colouring of build and test output.

use regex::Regex;
use serde::Serialize;

use crate::error::{ReportError, compile};

/// Colour assigned to one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Green,
    Red,
    Yellow,
    White,
    Blue,
}

impl Colour {
    const fn code(self) -> &'static str {
        match self {
            Self::Red => "31",
            Self::Green => "32",
            Self::Yellow => "33",
            Self::Blue => "34",
            Self::White => "37",
        }
    }
}

/// Colours Unity output. Whether escapes are emitted is decided once, by the
/// caller, at construction.
#[derive(Debug, Clone)]
pub struct ColourReporter {
    enabled: bool,
    tally: Regex,
}

impl ColourReporter {
    /// # Errors
    /// Returns `ReportError::InvalidPattern` if the tally pattern fails to compile.
    pub fn new(enabled: bool) -> Result<Self, ReportError> {
        Ok(Self {
            enabled,
            tally: compile(r"Tests\s+(\d+)\s+Failures\s+\d+\s+Ignored")?,
        })
    }

    /// Pick the colour for a single line; first matching rule wins.
    #[must_use]
    pub fn classify(&self, line: &str) -> Colour {
        if let Some(caps) = self.tally.captures(line) {
            // The number after "Tests" is the failure count in `T Tests F Failures I Ignored`.
            return if caps[1].bytes().all(|digit| digit == b'0') {
                Colour::Green
            } else {
                Colour::Red
            };
        }
        if line.contains("PASS") || line == "OK" {
            Colour::Green
        } else if line.contains("FAIL") || line.contains("ERROR") {
            Colour::Red
        } else if line.contains("IGNORE") {
            Colour::Yellow
        } else if ["Creating", "Compiling", "Linking"]
            .iter()
            .any(|prefix| line.starts_with(prefix))
        {
            Colour::White
        } else {
            Colour::Blue
        }
    }

    /// Colour every line of `message`. Disabled reporters return it unchanged.
    #[must_use]
    pub fn report(&self, message: &str) -> String {
        if !self.enabled {
            return message.to_string();
        }
        let mut out = String::with_capacity(message.len() + 16);
        for line in message.lines() {
            let code = self.classify(line).code();
            out.push_str("\u{1b}[");
            out.push_str(code);
            out.push('m');
            out.push_str(line);
            out.push_str("\u{1b}[0m\n");
        }
        out
    }
}
