use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui::UiPrefs;

pub mod table;

/// What one command produced, in each of its renderable shapes.
pub struct Output<'a, R, T> {
    /// Full report, for `--format json`.
    pub report: &'a R,
    /// The rows worth tabulating, for `--format table`.
    pub rows: &'a T,
    /// Classic human-readable output, for `--format text`.
    pub text: String,
}

/// Render a command's output to a string in the requested format.
pub fn render<R: Serialize, T: Serialize>(
    output: &Output<'_, R, T>,
    format: OutputFormat,
    prefs: UiPrefs,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(output.text.trim_end_matches('\n').to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output.report)?),
        OutputFormat::Table => render_table(output.rows, prefs),
    }
}

/// Print a command's output to stdout. Empty renders print nothing.
pub fn emit<R: Serialize, T: Serialize>(
    output: &Output<'_, R, T>,
    format: OutputFormat,
    prefs: UiPrefs,
) -> anyhow::Result<()> {
    let rendered = render(output, format, prefs)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

fn render_table<T: Serialize>(value: &T, prefs: UiPrefs) -> anyhow::Result<String> {
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_rows(&items, options)),
        Value::Object(map) => {
            let rows = map
                .into_iter()
                .map(|(key, value)| vec![key, cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_table(&["key", "value"], &rows, options))
        }
        scalar => Ok(table::render_table(&["value"], &[vec![cell(&scalar)]], options)),
    }
}

fn render_rows(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options);
    }

    // Columns in first-seen key order across all rows.
    let mut headers = Vec::<String>::new();
    for key in items.iter().filter_map(Value::as_object).flat_map(|map| map.keys()) {
        if !headers.contains(key) {
            headers.push(key.clone());
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_table(&header_refs, &rows, options)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{Output, render};
    use crate::cli::OutputFormat;
    use crate::ui::UiPrefs;

    #[derive(Serialize)]
    struct Case {
        test: &'static str,
        status: &'static str,
    }

    #[derive(Serialize)]
    struct Report {
        suite: &'static str,
        cases: Vec<Case>,
    }

    fn sample() -> Report {
        Report {
            suite: "Unity",
            cases: vec![
                Case {
                    test: "test_A",
                    status: "pass",
                },
                Case {
                    test: "test_B",
                    status: "fail",
                },
            ],
        }
    }

    #[test]
    fn json_render_is_the_full_report() {
        let report = sample();
        let output = Output {
            report: &report,
            rows: &report.cases,
            text: String::new(),
        };
        let out = render(&output, OutputFormat::Json, UiPrefs::default()).expect("json render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["suite"], "Unity");
        assert_eq!(parsed["cases"][1]["status"], "fail");
    }

    #[test]
    fn table_render_uses_rows() {
        let report = sample();
        let output = Output {
            report: &report,
            rows: &report.cases,
            text: String::new(),
        };
        let out = render(&output, OutputFormat::Table, UiPrefs::default()).expect("table render");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("test"));
        assert!(lines[0].contains("status"));
        assert!(lines[3].contains("test_B"));
        assert!(lines[3].contains("fail"));
    }

    #[test]
    fn text_render_drops_trailing_newlines() {
        let report = sample();
        let output = Output {
            report: &report,
            rows: &report.cases,
            text: String::from("Generate Complete\n"),
        };
        let out = render(&output, OutputFormat::Text, UiPrefs::default()).expect("text render");
        assert_eq!(out, "Generate Complete");
    }
}
