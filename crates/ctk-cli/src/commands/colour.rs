use std::fs;
use std::io;

use anyhow::Context;
use ctk_report::{Colour, ColourReporter};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ColourArgs;
use crate::commands::Outcome;
use crate::output::{Output, emit};
use crate::ui::UiPrefs;

#[derive(Debug, Serialize)]
struct ColouredLine<'a> {
    colour: Colour,
    line: &'a str,
}

/// Handle `ctk colour`.
pub fn handle(args: &ColourArgs, flags: &GlobalFlags, prefs: UiPrefs) -> anyhow::Result<Outcome> {
    let text = match &args.file {
        Some(path) => fs::read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("failed to read stdin")?,
    };

    let reporter = ColourReporter::new(prefs.color)?;
    let lines: Vec<ColouredLine<'_>> = text
        .lines()
        .map(|line| ColouredLine {
            colour: reporter.classify(line),
            line,
        })
        .collect();

    emit(
        &Output {
            report: &lines,
            rows: &lines,
            text: reporter.report(&text),
        },
        flags.format,
        prefs,
    )?;
    Ok(Outcome::Success)
}
