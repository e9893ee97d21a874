use anyhow::Context;
use ctk_config::ReportConfig;
use ctk_report::Summarizer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SummaryArgs;
use crate::commands::Outcome;
use crate::output::{Output, emit};
use crate::ui::UiPrefs;

/// Handle `ctk summary`. Any failed test makes the process exit 1.
pub fn handle(
    args: &SummaryArgs,
    config: &ReportConfig,
    flags: &GlobalFlags,
    prefs: UiPrefs,
) -> anyhow::Result<Outcome> {
    let root = args.root.clone().or_else(|| config.root.clone());
    let report = Summarizer::new(root)?
        .summarize(&args.results)
        .context("failed to summarize test results")?;

    emit(
        &Output {
            report: &report,
            rows: &report,
            text: report.render_text(),
        },
        flags.format,
        prefs,
    )?;

    Ok(if report.has_failures() {
        Outcome::TestsFailed
    } else {
        Outcome::Success
    })
}
