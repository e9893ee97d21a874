//! JUnit-style XML from parsed output or from Unity result files.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use ctk_core::TestStatus;
use serde::Serialize;

use crate::error::{ReportError, read_to_string};
use crate::parse::ParseReport;

/// Escape text for use in XML attributes and character data.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One `<testsuite>` document for a [`ParseReport`].
#[must_use]
pub fn report_to_xml(report: &ParseReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    let _ = writeln!(
        out,
        "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" skips=\"{}\">",
        escape_xml(&report.suite_name),
        report.total(),
        report.failed,
        report.ignored
    );
    for case in &report.cases {
        let opening = format!(
            "    <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
            escape_xml(&case.class_name),
            escape_xml(&case.test_name),
            case.time_ms.unwrap_or(0.0) / 1000.0
        );
        let reason = escape_xml(case.reason.as_deref().unwrap_or_default());
        match case.status {
            TestStatus::Pass => {
                let _ = writeln!(out, "{opening} />");
            }
            TestStatus::Fail => {
                let _ = writeln!(out, "{opening}>");
                let _ = writeln!(out, "        <failure type=\"ASSERT FAILED\">{reason}</failure>");
                let _ = writeln!(out, "    </testcase>");
            }
            TestStatus::Ignore => {
                let _ = writeln!(out, "{opening}>");
                let _ = writeln!(out, "        <skipped type=\"TEST IGNORED\">{reason}</skipped>");
                let _ = writeln!(out, "    </testcase>");
            }
        }
    }
    let _ = writeln!(out, "</testsuite>");
    out
}

/// A test case read from a `file:line:name:STATUS[:msg]` result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCase {
    pub classname: String,
    pub name: String,
    pub status: TestStatus,
    pub message: Option<String>,
    pub file: Option<String>,
    pub line: String,
}

/// All cases read from one result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSuite {
    pub name: String,
    pub cases: Vec<ResultCase>,
}

impl ResultSuite {
    fn count(&self, status: TestStatus) -> usize {
        self.cases.iter().filter(|case| case.status == status).count()
    }
}

/// Read result cases out of a result file's text.
///
/// Separator lines, the `N Tests N Failures N Ignored` tally and the final
/// `OK`/`FAIL` line carry no status field and are skipped.
#[must_use]
pub fn parse_result_text(suite_name: &str, text: &str) -> ResultSuite {
    let fallback_class = suite_name.trim_start_matches("./").to_string();
    let cases = text
        .lines()
        .filter_map(|line| parse_result_line(line.trim_end(), &fallback_class))
        .collect();
    ResultSuite {
        name: suite_name.to_string(),
        cases,
    }
}

fn parse_result_line(line: &str, fallback_class: &str) -> Option<ResultCase> {
    let mut fields: Vec<String> = line.split(':').map(str::to_string).collect();
    // Re-join `C:/dir/file.c` style drive letters.
    if fields.len() > 1
        && fields[0].len() == 1
        && fields[0].chars().all(|ch| ch.is_ascii_alphabetic())
        && (fields[1].starts_with('/') || fields[1].starts_with('\\'))
    {
        let drive = fields.remove(0);
        fields[0] = format!("{drive}:{}", fields[0]);
    }

    let status_at = |index: usize| match fields.get(index).map(|field| field.trim()) {
        Some("PASS") => Some(TestStatus::Pass),
        Some("FAIL") => Some(TestStatus::Fail),
        Some("IGNORE") => Some(TestStatus::Ignore),
        _ => None,
    };

    let (file, rest) = if let Some(status) = status_at(3) {
        (Some(fields[0].clone()), (status, &fields[1..]))
    } else if let Some(status) = status_at(2) {
        (None, (status, &fields[..]))
    } else {
        return None;
    };
    let (status, rest) = rest;

    let message = (rest.len() > 3)
        .then(|| rest[3..].join(":").trim().to_string())
        .filter(|message| !message.is_empty());
    let classname = file.as_deref().map_or_else(
        || fallback_class.to_string(),
        |path| {
            let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
            base.rsplit_once('.').map_or(base, |(stem, _)| stem).to_string()
        },
    );

    Some(ResultCase {
        classname,
        name: rest[1].trim().to_string(),
        status,
        message,
        file,
        line: rest[0].trim().to_string(),
    })
}

/// A `<testsuites>` document with one `<testsuite>` per result file.
#[must_use]
pub fn suites_to_xml(suites: &[ResultSuite]) -> String {
    let tests: usize = suites.iter().map(|suite| suite.cases.len()).sum();
    let failures: usize = suites.iter().map(|suite| suite.count(TestStatus::Fail)).sum();

    let mut out = String::new();
    let _ = writeln!(out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>");
    let _ = writeln!(
        out,
        "<testsuites disabled=\"0\" errors=\"0\" failures=\"{failures}\" tests=\"{tests}\">"
    );
    for suite in suites {
        let _ = writeln!(
            out,
            "    <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" errors=\"0\">",
            escape_xml(&suite.name),
            suite.cases.len(),
            suite.count(TestStatus::Fail),
            suite.count(TestStatus::Ignore)
        );
        for case in &suite.cases {
            let opening = format!(
                "        <testcase name=\"{}\" classname=\"{}\"",
                escape_xml(&case.name),
                escape_xml(&case.classname)
            );
            let element = match case.status {
                TestStatus::Pass => {
                    let _ = writeln!(out, "{opening}/>");
                    continue;
                }
                TestStatus::Fail => "failure",
                TestStatus::Ignore => "skipped",
            };
            let message = escape_xml(case.message.as_deref().unwrap_or(" "));
            let location = escape_xml(&format!(
                "[File]={}, [Line]={}",
                case.file.as_deref().unwrap_or_default(),
                case.line
            ));
            let _ = writeln!(out, "{opening}>");
            let _ = writeln!(
                out,
                "            <{element} type=\"{element}\" message=\"{message}\">{location}</{element}>"
            );
            let _ = writeln!(out, "        </testcase>");
        }
        let _ = writeln!(out, "    </testsuite>");
    }
    let _ = writeln!(out, "</testsuites>");
    out
}

/// Read each result file and render them as one `<testsuites>` document.
///
/// # Errors
/// Returns `ReportError::Io` if a result file cannot be read.
pub fn results_to_xml(paths: &[PathBuf]) -> Result<String, ReportError> {
    let mut suites = Vec::with_capacity(paths.len());
    for path in paths {
        suites.push(read_result_file(path)?);
    }
    Ok(suites_to_xml(&suites))
}

/// # Errors
/// Returns `ReportError::Io` if the file cannot be read.
pub fn read_result_file(path: &Path) -> Result<ResultSuite, ReportError> {
    let text = read_to_string(path)?;
    let name = path.to_string_lossy().replace('\\', "/");
    let suite = parse_result_text(&name, &text);
    if suite.cases.is_empty() {
        tracing::warn!(file = %path.display(), "no test results found");
    }
    Ok(suite)
}
