use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use ctk_config::ReportConfig;
use ctk_report::{OutputParser, report_to_xml};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ParseArgs;
use crate::commands::Outcome;
use crate::output::{Output, emit};
use crate::ui::UiPrefs;

/// Handle `ctk parse`.
pub fn handle(
    args: &ParseArgs,
    config: &ReportConfig,
    flags: &GlobalFlags,
    prefs: UiPrefs,
) -> anyhow::Result<Outcome> {
    let suite = args.suite.clone().unwrap_or_else(|| config.suite_name.clone());
    let parser = OutputParser::new(suite)?;
    let report = parser
        .parse_file(&args.log)
        .with_context(|| format!("failed to parse {}", args.log.display()))?;

    if let Some(xml_path) = xml_destination(args, config) {
        fs::write(&xml_path, report_to_xml(&report))
            .with_context(|| format!("failed to write {}", xml_path.display()))?;
        tracing::info!(path = %xml_path.display(), tests = report.total(), "wrote JUnit XML");
    }

    emit(
        &Output {
            report: &report,
            rows: &report.cases,
            text: report.render_text(),
        },
        flags.format,
        prefs,
    )?;
    Ok(Outcome::Success)
}

/// `--xml PATH` writes to PATH, a bare `--xml` to the configured default.
fn xml_destination(args: &ParseArgs, config: &ReportConfig) -> Option<PathBuf> {
    args.xml
        .as_ref()
        .map(|path| path.clone().unwrap_or_else(|| config.xml_output.clone()))
}
