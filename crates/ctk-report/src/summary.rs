//! Roll-up of Unity result files into one overall summary.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::error::{ReportError, compile, read_to_string};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub total_tests: u64,
    pub total_failures: u64,
    pub total_ignored: u64,
    /// `file:line:test:: msg` entries for failed tests.
    pub failures: Vec<String>,
    /// `file:line:test:: msg` entries for ignored tests.
    pub ignores: Vec<String>,
    pub empty_files: Vec<PathBuf>,
}

impl SummaryReport {
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.total_failures > 0
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.empty_files {
            let _ = writeln!(out, "Empty test result file: {}", file.display());
        }
        if self.total_ignored > 0 {
            write_block(&mut out, "UNITY IGNORED TEST SUMMARY", &self.ignores);
        }
        if self.total_failures > 0 {
            write_block(&mut out, "UNITY FAILED TEST SUMMARY", &self.failures);
        }
        write_block(
            &mut out,
            "OVERALL UNITY TEST SUMMARY",
            &[format!(
                "TOTAL TESTS: {} TOTAL FAILURES: {} IGNORED: {}",
                self.total_tests, self.total_failures, self.total_ignored
            )],
        );
        let _ = writeln!(out);
        out
    }
}

fn write_block(out: &mut String, title: &str, lines: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "--------------------------");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "--------------------------");
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
}

#[derive(Debug, Clone)]
pub struct Summarizer {
    root: Option<String>,
    tally: Regex,
    source_ref: Regex,
    word_colon: Regex,
}

impl Summarizer {
    /// `root` is prefixed to every source file named in a detail entry.
    ///
    /// # Errors
    /// Returns `ReportError::InvalidPattern` if a built-in pattern fails to compile.
    pub fn new(root: Option<String>) -> Result<Self, ReportError> {
        Ok(Self {
            root: root.filter(|root| !root.is_empty()),
            tally: compile(r"(\d+) Tests (\d+) Failures (\d+) Ignored")?,
            source_ref: compile(r"^.*\.c:\d+")?,
            word_colon: compile(r"\w:")?,
        })
    }

    /// Summarize every result file, in order.
    ///
    /// # Errors
    /// Fails on the first unreadable file or unparseable tally line.
    pub fn summarize(&self, files: &[PathBuf]) -> Result<SummaryReport, ReportError> {
        let mut report = SummaryReport::default();
        for file in files {
            let text = read_to_string(file)?;
            self.add_result(&mut report, file, &text)?;
        }
        tracing::info!(
            files = files.len(),
            tests = report.total_tests,
            failures = report.total_failures,
            ignored = report.total_ignored,
            "summarized test results"
        );
        Ok(report)
    }

    /// Fold one result file's text into `report`.
    ///
    /// # Errors
    /// Returns `ReportError::UnparseableSummary` if the second-to-last line is
    /// not a `N Tests N Failures N Ignored` tally.
    pub fn add_result(
        &self,
        report: &mut SummaryReport,
        file: &Path,
        text: &str,
    ) -> Result<(), ReportError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            tracing::warn!(file = %file.display(), "empty test result file");
            report.empty_files.push(file.to_path_buf());
            return Ok(());
        }

        // The tally sits second to last, above the `OK`/`FAIL` verdict.
        let tally_line = lines.len().checked_sub(2).and_then(|index| lines.get(index)).copied();
        let caps = tally_line
            .and_then(|line| self.tally.captures(line))
            .ok_or_else(|| ReportError::UnparseableSummary {
                file: file.to_path_buf(),
                line: tally_line.unwrap_or(lines[0]).to_string(),
            })?;
        let number = |index: usize| caps[index].parse::<u64>().unwrap_or_default();
        report.total_tests += number(1);
        report.total_failures += number(2);
        report.total_ignored += number(3);

        let detail_count = lines.len().saturating_sub(2);
        for line in &lines[..detail_count] {
            if line.ends_with("PASS") {
                continue;
            }
            let ignored = line.ends_with("IGNORED") || line.contains(":IGNORE");
            if !ignored && !self.source_ref.is_match(line) {
                continue;
            }
            if !self.word_colon.is_match(line) {
                continue;
            }
            let detail = self.detail(line);
            if ignored {
                report.ignores.push(detail);
            } else {
                report.failures.push(detail);
            }
        }
        Ok(())
    }

    /// `file:line:test:: msg`, with the root prefix and backslash separators.
    /// Only the first four `:`-separated fields are used, so `msg` is the
    /// status word of a `file:line:test:STATUS:detail` line.
    fn detail(&self, line: &str) -> String {
        let mut parts = line.split(':');
        let file = parts.next().unwrap_or_default();
        let line_number = parts.next().unwrap_or_default();
        let test = parts.next().unwrap_or_default();
        let message = parts.next().unwrap_or_default();
        let root = self.root.as_deref().unwrap_or_default();
        format!("{root}{file}:{line_number}:{test}:: {message}").replace('/', "\\")
    }
}
