use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{ColorChoice, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `ctk` binary.
#[derive(Debug, Parser)]
#[command(name = "ctk", version, about = "C test kit - Unity runner and report tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json, table
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Colour output: auto, always, never
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,

    /// Legacy YAML option file with a `:unity:` or `:cmock:` section
    #[arg(short, long, global = true, value_name = "YAML")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, ColorChoice, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "ctk",
            "--format",
            "json",
            "--verbose",
            "colour",
            "build.log",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Colour(args) if args.file == Some(PathBuf::from("build.log"))));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["ctk", "colour", "--format", "table", "--quiet", "--color", "never"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.quiet);
        assert_eq!(cli.color, Some(ColorChoice::Never));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["ctk", "--format", "xml", "colour"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn runner_requires_an_input() {
        assert!(Cli::try_parse_from(["ctk", "runner"]).is_err());
    }

    #[test]
    fn runner_flags_parse() {
        let cli = Cli::try_parse_from([
            "ctk",
            "runner",
            "test/test_uart.c",
            "build/runner.c",
            "--include",
            "Types.h",
            "--include",
            "<stdio.h>",
            "--cexception",
            "--test-prefix",
            "should",
            "--main-with-params",
        ])
        .expect("cli should parse");

        let Commands::Runner(args) = cli.command else {
            panic!("expected runner command");
        };
        assert_eq!(args.input, PathBuf::from("test/test_uart.c"));
        assert_eq!(args.output, Some(PathBuf::from("build/runner.c")));
        assert_eq!(args.includes, vec!["Types.h", "<stdio.h>"]);
        assert!(args.cexception);
        assert_eq!(args.test_prefix.as_deref(), Some("should"));
        assert!(args.main_with_params);
        assert!(!args.use_param_tests);
    }

    #[test]
    fn parse_xml_path_is_optional() {
        let bare = Cli::try_parse_from(["ctk", "parse", "out.log", "--xml"]).expect("cli should parse");
        assert!(matches!(bare.command, Commands::Parse(args) if args.xml == Some(None)));

        let with_path = Cli::try_parse_from(["ctk", "parse", "out.log", "--xml", "junit.xml"])
            .expect("cli should parse");
        assert!(matches!(
            with_path.command,
            Commands::Parse(args) if args.xml == Some(Some(PathBuf::from("junit.xml")))
        ));

        let absent = Cli::try_parse_from(["ctk", "parse", "out.log"]).expect("cli should parse");
        assert!(matches!(absent.command, Commands::Parse(args) if args.xml.is_none()));
    }

    #[test]
    fn summary_needs_result_files() {
        assert!(Cli::try_parse_from(["ctk", "summary"]).is_err());
        let cli = Cli::try_parse_from(["ctk", "summary", "a.testpass", "b.testfail", "--root", "/ci/"])
            .expect("cli should parse");
        assert!(matches!(cli.command, Commands::Summary(args) if args.results.len() == 2));
    }

    #[test]
    fn module_flags_parse() {
        let cli = Cli::try_parse_from([
            "ctk", "module", "Led", "-p", "dh", "--test", "tests", "--destroy",
        ])
        .expect("cli should parse");
        let Commands::Module(args) = cli.command else {
            panic!("expected module command");
        };
        assert_eq!(args.name, "Led");
        assert_eq!(args.pattern.as_deref(), Some("dh"));
        assert_eq!(args.tst, Some(PathBuf::from("tests")));
        assert!(args.destroy);
        assert!(!args.update_svn);
    }
}
