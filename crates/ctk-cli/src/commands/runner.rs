use anyhow::Context;
use ctk_config::{Plugin, RunnerConfig};
use ctk_runner::{GenerationReport, Generator};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunnerArgs;
use crate::commands::Outcome;
use crate::output::{Output, emit};
use crate::ui::UiPrefs;

/// Handle `ctk runner`.
pub fn handle(
    args: &RunnerArgs,
    mut config: RunnerConfig,
    flags: &GlobalFlags,
    prefs: UiPrefs,
) -> anyhow::Result<Outcome> {
    apply_overrides(&mut config, args);
    let generator = Generator::new(config).context("invalid runner configuration")?;
    let report = generator
        .run(&args.input, args.output.as_deref())
        .with_context(|| format!("failed to generate a runner for {}", args.input.display()))?;

    emit(
        &Output {
            report: &report,
            rows: &report,
            text: render_text(&report),
        },
        flags.format,
        prefs,
    )?;
    Ok(Outcome::Success)
}

/// Command-line flags win over every configuration source.
pub fn apply_overrides(config: &mut RunnerConfig, args: &RunnerArgs) {
    for include in &args.includes {
        if !config.includes.contains(include) {
            config.includes.push(include.clone());
        }
    }
    if args.cexception && !config.has_plugin(Plugin::Cexception) {
        config.plugins.push(Plugin::Cexception);
    }

    let strings = [
        (&args.test_prefix, &mut config.test_prefix),
        (&args.mock_prefix, &mut config.mock_prefix),
        (&args.setup_name, &mut config.setup_name),
        (&args.teardown_name, &mut config.teardown_name),
        (&args.main_name, &mut config.main_name),
    ];
    for (flag, field) in strings {
        if let Some(value) = flag {
            field.clone_from(value);
        }
    }
    if args.suite_setup.is_some() {
        config.suite_setup.clone_from(&args.suite_setup);
    }
    if args.suite_teardown.is_some() {
        config.suite_teardown.clone_from(&args.suite_teardown);
    }
    if args.header_file.is_some() {
        config.header_file.clone_from(&args.header_file);
    }

    config.auto_main_name |= args.auto_main_name;
    config.use_param_tests |= args.use_param_tests;
    config.main_with_params |= args.main_with_params;
    config.enforce_strict_ordering |= args.enforce_strict_ordering;
    config.isolation_directive |= args.isolation_directive;
}

fn render_text(report: &GenerationReport) -> String {
    let mut text = format!(
        "Generated {} ({} tests)",
        report.output.display(),
        report.tests.len()
    );
    if let Some(header) = &report.header {
        text.push_str(&format!("\nGenerated {}", header.display()));
    }
    text
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn runner_args(argv: &[&str]) -> RunnerArgs {
        let cli = Cli::try_parse_from(argv).expect("cli should parse");
        match cli.command {
            Commands::Runner(args) => args,
            other => panic!("expected runner command, got {other:?}"),
        }
    }

    #[test]
    fn flags_override_configuration() {
        let mut config = RunnerConfig {
            includes: vec![String::from("Types.h")],
            ..RunnerConfig::default()
        };
        let args = runner_args(&[
            "ctk",
            "runner",
            "test_a.c",
            "--include",
            "Types.h",
            "--include",
            "Extra.h",
            "--cexception",
            "--setup-name",
            "before",
            "--use-param-tests",
            "--header-file",
            "build/test_a.h",
        ]);
        apply_overrides(&mut config, &args);

        assert_eq!(config.includes, vec!["Types.h", "Extra.h"]);
        assert_eq!(config.plugins, vec![Plugin::Cexception]);
        assert_eq!(config.setup_name, "before");
        assert_eq!(config.teardown_name, "tearDown");
        assert!(config.use_param_tests);
        assert!(!config.main_with_params);
        assert_eq!(config.header_file, Some(PathBuf::from("build/test_a.h")));
    }

    #[test]
    fn absent_flags_keep_configured_values() {
        let mut config = RunnerConfig {
            main_with_params: true,
            suite_setup: Some(String::from("init();")),
            ..RunnerConfig::default()
        };
        apply_overrides(&mut config, &runner_args(&["ctk", "runner", "test_a.c"]));
        assert!(config.main_with_params);
        assert_eq!(config.suite_setup.as_deref(), Some("init();"));
        assert_eq!(config.test_prefix, "test|spec|should");
    }
}
