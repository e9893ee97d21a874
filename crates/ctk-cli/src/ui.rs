use std::io::IsTerminal;

use ctk_config::ColorMode;

use crate::cli::{GlobalFlags, OutputFormat};

/// Terminal preferences resolved once per invocation and passed to handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    /// Colour text output (`ctk colour` and the text logs it understands).
    pub color: bool,
    /// Colour status cells in `--format table`.
    pub table_color: bool,
    pub term_width: Option<usize>,
}

impl UiPrefs {
    /// `--color` wins over the configured `report.color`.
    #[must_use]
    pub fn resolve(flags: &GlobalFlags, configured: ColorMode) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let mode = flags.color.map_or(configured, ColorMode::from);
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_tty && std::env::var_os("NO_COLOR").is_none(),
        };

        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|width| *width >= 40);

        Self {
            color,
            table_color: color && flags.format == OutputFormat::Table && !flags.quiet,
            term_width,
        }
    }
}
