use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use ctk_config::ReportConfig;
use ctk_core::TestStatus;
use ctk_report::junit::{ResultSuite, read_result_file};
use ctk_report::suites_to_xml;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::JunitArgs;
use crate::commands::Outcome;
use crate::output::{Output, emit};
use crate::ui::UiPrefs;

#[derive(Debug, Serialize)]
struct SuiteRow {
    name: String,
    tests: usize,
    failures: usize,
    skipped: usize,
}

impl From<&ResultSuite> for SuiteRow {
    fn from(suite: &ResultSuite) -> Self {
        let count = |status| suite.cases.iter().filter(|case| case.status == status).count();
        Self {
            name: suite.name.clone(),
            tests: suite.cases.len(),
            failures: count(TestStatus::Fail),
            skipped: count(TestStatus::Ignore),
        }
    }
}

#[derive(Debug, Serialize)]
struct JunitResponse {
    output: PathBuf,
    tests: usize,
    failures: usize,
    suites: Vec<SuiteRow>,
}

/// Handle `ctk junit`.
pub fn handle(
    args: &JunitArgs,
    config: &ReportConfig,
    flags: &GlobalFlags,
    prefs: UiPrefs,
) -> anyhow::Result<Outcome> {
    let suites = args
        .results
        .iter()
        .map(|path| read_result_file(path))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read test results")?;

    let output = args.output.clone().unwrap_or_else(|| config.xml_output.clone());
    fs::write(&output, suites_to_xml(&suites))
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), suites = suites.len(), "wrote JUnit XML");

    let rows: Vec<SuiteRow> = suites.iter().map(SuiteRow::from).collect();
    let response = JunitResponse {
        output,
        tests: rows.iter().map(|row| row.tests).sum(),
        failures: rows.iter().map(|row| row.failures).sum(),
        suites: rows,
    };
    let text = format!(
        "Wrote {} ({} tests, {} failures)",
        response.output.display(),
        response.tests,
        response.failures
    );

    emit(
        &Output {
            report: &response,
            rows: &response.suites,
            text,
        },
        flags.format,
        prefs,
    )?;
    Ok(Outcome::Success)
}
