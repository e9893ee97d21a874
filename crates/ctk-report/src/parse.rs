//! Extraction of test results from captured Unity build/test output.
//!
//! Recognised line shapes:
//! - raw Unity: `path/test_x.c:36:test_Name:FAIL: Expected 1 Was 0`, optionally
//!   ending in `(12 ms)`
//! - fixture: `path/test_x.c:63:TEST(Group, Name):FAIL: message`
//! - verbose fixture: `TEST(Group, Name) PASS`,
//!   `TEST(Group, Name)path/test_x.c:168::FAIL: message`, `IGNORE_TEST(Group, Name)`
//! - colourised output, where the status word sits inside escape codes

use std::fmt::Write;
use std::path::Path;

use ctk_core::TestStatus;
use regex::Regex;
use serde::Serialize;

use crate::error::{ReportError, compile, read_to_string};

const NO_REASON: &str = "No reason given";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCase {
    /// Test file base name, or the fixture group.
    pub class_name: String,
    pub test_name: String,
    pub status: TestStatus,
    pub reason: Option<String>,
    /// Execution time; `None` for verbose fixture lines, which carry none.
    pub time_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub suite_name: String,
    pub cases: Vec<ParsedCase>,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl ParseReport {
    #[must_use]
    pub fn new(suite_name: impl Into<String>, cases: Vec<ParsedCase>) -> Self {
        let count = |status| cases.iter().filter(|case| case.status == status).count();
        let (passed, failed, ignored) = (
            count(TestStatus::Pass),
            count(TestStatus::Fail),
            count(TestStatus::Ignore),
        );
        Self {
            suite_name: suite_name.into(),
            cases,
            passed,
            failed,
            ignored,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.ignored
    }

    /// Human-readable listing: a RESULTS block with a `New Test:` line on every
    /// class change, then a SUMMARY block with the counts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "=================== RESULTS =====================");
        let _ = writeln!(out);

        let mut current_class: Option<&str> = None;
        for case in &self.cases {
            if current_class != Some(case.class_name.as_str()) {
                current_class = Some(&case.class_name);
                let _ = writeln!(out, "New Test: {}", case.class_name);
            }
            match case.time_ms {
                Some(ms) => {
                    let _ = writeln!(
                        out,
                        "{:<40} {} {:>10} ms",
                        case.test_name,
                        case.status.label(),
                        ms as i64
                    );
                }
                None => {
                    let _ = writeln!(out, "{:<40} {}", case.test_name, case.status.label());
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "=================== SUMMARY =====================");
        let _ = writeln!(out);
        let _ = writeln!(out, "Tests Passed  : {}", self.passed);
        let _ = writeln!(out, "Tests Failed  : {}", self.failed);
        let _ = writeln!(out, "Tests Ignored : {}", self.ignored);
        out
    }
}

#[derive(Debug, Clone)]
pub struct OutputParser {
    suite_name: String,
    time: Regex,
}

impl OutputParser {
    /// # Errors
    /// Returns `ReportError::InvalidPattern` if the timing pattern fails to compile.
    pub fn new(suite_name: impl Into<String>) -> Result<Self, ReportError> {
        Ok(Self {
            suite_name: suite_name.into(),
            time: compile(r"\((-?\d+.?\d*) ms\)\s*$")?,
        })
    }

    /// # Errors
    /// Returns `ReportError::Io` if the file cannot be read.
    pub fn parse_file(&self, path: &Path) -> Result<ParseReport, ReportError> {
        let text = read_to_string(path)?;
        let report = self.parse(&text);
        tracing::debug!(file = %path.display(), cases = report.cases.len(), "parsed test output");
        Ok(report)
    }

    #[must_use]
    pub fn parse(&self, text: &str) -> ParseReport {
        let cases = text.lines().filter_map(|line| self.parse_line(line)).collect();
        ParseReport::new(self.suite_name.clone(), cases)
    }

    /// Parse one output line; anything that is not a test result is `None`.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<ParsedCase> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with("TEST(") || line.starts_with("IGNORE_TEST(") {
            return parse_verbose_fixture(line);
        }

        let fields: Vec<&str> = line.split(':').collect();
        // `C:\dir\test_x.c:12:...` splits the drive letter off into its own field.
        let offset = usize::from(
            fields.len() > 1
                && fields[0].len() == 1
                && fields[0].chars().all(|ch| ch.is_ascii_alphabetic())
                && fields[1].starts_with('\\'),
        );
        if fields.len() < 4 + offset {
            return None;
        }

        let (status, index) = locate_status(line, &fields, 3 + offset)?;
        let path = if offset == 1 {
            format!("{}:{}", fields[0], fields[1])
        } else {
            fields[0].to_string()
        };
        let line_number = fields[1 + offset].trim();
        let raw_name = fields[2 + offset..index].join(":");
        let message = self
            .time
            .replace(fields[index + 1..].join(":").trim(), "")
            .trim()
            .to_string();

        let (class_name, test_name) = split_fixture_name(&raw_name)
            .unwrap_or_else(|| (class_from_path(&path), raw_name.clone()));

        let reason = match status {
            TestStatus::Pass => None,
            TestStatus::Fail if message.is_empty() => Some(format!("at line: {line_number}")),
            TestStatus::Fail => Some(format!("{message} at line: {line_number}")),
            TestStatus::Ignore if message.is_empty() => Some(NO_REASON.to_string()),
            TestStatus::Ignore => Some(message),
        };

        Some(ParsedCase {
            class_name,
            test_name,
            status,
            reason,
            time_ms: Some(self.time_ms(line)),
        })
    }

    fn time_ms(&self, line: &str) -> f64 {
        self.time
            .captures(line)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

/// Find the status and the index of the field carrying it.
///
/// Plain `:STATUS` tokens are checked first, in PASS, FAIL, IGNORE order;
/// otherwise any later field merely containing the word counts, which
/// covers colourised output.
fn locate_status(line: &str, fields: &[&str], first: usize) -> Option<(TestStatus, usize)> {
    let candidates = [
        (TestStatus::Pass, "PASS"),
        (TestStatus::Fail, "FAIL"),
        (TestStatus::Ignore, "IGNORE"),
    ];

    for (status, word) in candidates {
        if line.contains(&format!(":{word}")) {
            if let Some(index) = (first..fields.len()).find(|&i| fields[i].starts_with(word)) {
                return Some((status, index));
            }
        }
    }
    for (status, word) in candidates {
        if let Some(index) = (first..fields.len()).find(|&i| fields[i].contains(word)) {
            return Some((status, index));
        }
    }
    None
}

/// `TEST(Group, Name)` used as a test name in non-verbose fixture output.
fn split_fixture_name(raw: &str) -> Option<(String, String)> {
    let inner = raw.trim().strip_prefix("TEST(")?;
    let (group, name) = inner.split_once(',')?;
    Some((
        group.trim().to_string(),
        name.trim().trim_end_matches(')').trim().to_string(),
    ))
}

fn parse_verbose_fixture(line: &str) -> Option<ParsedCase> {
    let body = line
        .strip_prefix("IGNORE_TEST(")
        .or_else(|| line.strip_prefix("TEST("))?;
    let (group, rest) = body.split_once(',')?;
    let (name, tail) = rest.split_once(')')?;

    let status = if line.contains(" PASS") {
        TestStatus::Pass
    } else if line.contains("FAIL") {
        TestStatus::Fail
    } else if line.contains("IGNORE") {
        TestStatus::Ignore
    } else {
        return None;
    };

    let parts: Vec<&str> = tail.split(':').collect();
    let status_index = parts
        .iter()
        .position(|part| part.starts_with("FAIL") || part.starts_with("IGNORE"));
    let message = status_index
        .map(|index| parts[index + 1..].join(":").trim().to_string())
        .unwrap_or_default();

    let reason = match status {
        TestStatus::Pass => None,
        TestStatus::Fail => {
            let line_number = status_index
                .and_then(|index| index.checked_sub(2))
                .map_or("", |index| parts[index].trim());
            Some(format!("{message} at line: {line_number}"))
        }
        TestStatus::Ignore if message.is_empty() => Some(NO_REASON.to_string()),
        TestStatus::Ignore => Some(message),
    };

    Some(ParsedCase {
        class_name: group.trim().to_string(),
        test_name: name.trim().to_string(),
        status,
        reason,
        time_ms: None,
    })
}

/// Base name of a test file without its extension.
fn class_from_path(path: &str) -> String {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    base.split('.').next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn parser() -> OutputParser {
        OutputParser::new("Unity").expect("parser builds")
    }

    fn case(line: &str) -> ParsedCase {
        parser().parse_line(line).expect("line parses")
    }

    #[test]
    fn raw_pass_line() {
        let parsed = case("build/test/test_uart.c:115:test_InitWorks:PASS");
        assert_eq!(
            parsed,
            ParsedCase {
                class_name: String::from("test_uart"),
                test_name: String::from("test_InitWorks"),
                status: TestStatus::Pass,
                reason: None,
                time_ms: Some(0.0),
            }
        );
    }

    #[test]
    fn raw_fail_line_carries_line_number() {
        let parsed = case("test/test_uart.c:36:test_Opsys:FAIL: Expected 1 Was 0");
        assert_eq!(parsed.status, TestStatus::Fail);
        assert_eq!(parsed.reason.as_deref(), Some("Expected 1 Was 0 at line: 36"));
    }

    #[test]
    fn message_colons_are_kept() {
        let parsed = case("test/test_uart.c:36:test_Opsys:FAIL: Expected 'a:b' Was 'c'");
        assert_eq!(parsed.reason.as_deref(), Some("Expected 'a:b' Was 'c' at line: 36"));
    }

    #[rstest]
    #[case("test/test_can.c:112:test_InitCan:IGNORE: Not Yet Implemented", "Not Yet Implemented")]
    #[case("test/test_can.c:112:test_InitCan:IGNORE", "No reason given")]
    fn raw_ignore_lines(#[case] line: &str, #[case] reason: &str) {
        let parsed = case(line);
        assert_eq!(parsed.status, TestStatus::Ignore);
        assert_eq!(parsed.reason.as_deref(), Some(reason));
    }

    #[rstest]
    #[case("test/test_t.c:10:test_Fast:PASS (12 ms)", 12.0)]
    #[case("test/test_t.c:10:test_Fast:PASS (1.5 ms)", 1.5)]
    #[case("test/test_t.c:10:test_Fast:PASS", 0.0)]
    fn execution_time_is_read(#[case] line: &str, #[case] expected: f64) {
        assert_eq!(case(line).time_ms, Some(expected));
    }

    #[test]
    fn time_suffix_is_not_part_of_the_reason() {
        let parsed = case("test/test_t.c:10:test_Slow:FAIL: too slow (250 ms)");
        assert_eq!(parsed.reason.as_deref(), Some("too slow at line: 10"));
        assert_eq!(parsed.time_ms, Some(250.0));
    }

    #[test]
    fn colons_in_test_names_are_joined() {
        let parsed = case("test/test_p.c:20:test_Param(a:b):PASS");
        assert_eq!(parsed.test_name, "test_Param(a:b)");
    }

    #[test]
    fn windows_drive_paths_shift_fields() {
        let parsed = case(r"C:\work\test\test_win.c:44:test_OnWindows:FAIL: boom");
        assert_eq!(parsed.class_name, "test_win");
        assert_eq!(parsed.test_name, "test_OnWindows");
        assert_eq!(parsed.reason.as_deref(), Some("boom at line: 44"));
    }

    #[test]
    fn fixture_line_uses_group_as_class() {
        let parsed = case("test/test_led.c:63:TEST(LedDriver, TurnsOn):FAIL: Expected 0x1234 Was 0x5A5A");
        assert_eq!(parsed.class_name, "LedDriver");
        assert_eq!(parsed.test_name, "TurnsOn");
        assert_eq!(parsed.reason.as_deref(), Some("Expected 0x1234 Was 0x5A5A at line: 63"));
    }

    #[test]
    fn verbose_fixture_lines() {
        let pass = case("TEST(LedDriver, TurnsOn) PASS");
        assert_eq!(pass.status, TestStatus::Pass);
        assert_eq!(pass.class_name, "LedDriver");
        assert_eq!(pass.test_name, "TurnsOn");
        assert_eq!(pass.time_ms, None);

        let fail = case("TEST(LedDriver, TurnsOff)test/test_led.c:168::FAIL: Expected 0x8D Was 0x8C");
        assert_eq!(fail.status, TestStatus::Fail);
        assert_eq!(fail.reason.as_deref(), Some("Expected 0x8D Was 0x8C at line: 168"));

        let ignored = case("IGNORE_TEST(LedDriver, Blinks)");
        assert_eq!(ignored.status, TestStatus::Ignore);
        assert_eq!(ignored.reason.as_deref(), Some("No reason given"));

        let ignored = case("TEST(LedDriver, Dims)test/test_led.c:22::IGNORE: Ignored On Purpose");
        assert_eq!(ignored.reason.as_deref(), Some("Ignored On Purpose"));
    }

    #[test]
    fn colourised_status_is_found() {
        let parsed = case("test/test_c.c:5:test_Coloured:\u{1b}[42mPASS\u{1b}[0m");
        assert_eq!(parsed.status, TestStatus::Pass);
        assert_eq!(parsed.test_name, "test_Coloured");
    }

    #[rstest]
    #[case("Compiling test_uart.c...")]
    #[case("-----------------------")]
    #[case("3 Tests 1 Failures 1 Ignored")]
    #[case("OK")]
    #[case("a:b:c:d")]
    fn non_result_lines_are_skipped(#[case] line: &str) {
        assert_eq!(parser().parse_line(line), None);
    }

    #[test]
    fn report_counts_and_renders() {
        let text = "\
test/test_uart.c:10:test_A:PASS (3 ms)
test/test_uart.c:20:test_B:FAIL: Expected 1 Was 2
test/test_spi.c:5:test_C:IGNORE
-----------------------
3 Tests 1 Failures 1 Ignored
FAIL
";
        let report = parser().parse(text);
        assert_eq!((report.passed, report.failed, report.ignored), (1, 1, 1));
        assert_eq!(report.total(), 3);

        let rendered = report.render_text();
        let expected = format!(
            "\n=================== RESULTS =====================\n\n\
New Test: test_uart\n\
{:<40} PASS {:>10} ms\n\
{:<40} FAILED {:>10} ms\n\
New Test: test_spi\n\
{:<40} IGNORED {:>10} ms\n\
\n=================== SUMMARY =====================\n\n\
Tests Passed  : 1\nTests Failed  : 1\nTests Ignored : 1\n",
            "test_A", 3, "test_B", 0, "test_C", 0
        );
        assert_eq!(rendered, expected);
    }
}
