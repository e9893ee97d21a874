use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Generate a Unity test runner for a C test file.
    Runner(RunnerArgs),
    /// Create or destroy the source, header and test files of a module.
    Module(ModuleArgs),
    /// Extract per-test results from captured build/test output.
    Parse(ParseArgs),
    /// Summarize Unity result files; exits 1 when any test failed.
    Summary(SummaryArgs),
    /// Convert Unity result files to JUnit XML.
    Junit(JunitArgs),
    /// Colour build/test output by outcome.
    Colour(ColourArgs),
}

#[derive(Clone, Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunnerArgs {
    /// C test file to scan.
    pub input: PathBuf,

    /// Runner to write (defaults to `<input stem>_Runner.c`).
    pub output: Option<PathBuf>,

    /// Header to force-include in the runner (repeatable).
    #[arg(long = "include", value_name = "HEADER")]
    pub includes: Vec<String>,

    /// Wrap setup and test calls in CException `Try`/`Catch`.
    #[arg(long)]
    pub cexception: bool,

    /// Regex alternation test names must start with.
    #[arg(long)]
    pub test_prefix: Option<String>,

    /// Base-name prefix marking a mock header.
    #[arg(long)]
    pub mock_prefix: Option<String>,

    #[arg(long)]
    pub setup_name: Option<String>,

    #[arg(long)]
    pub teardown_name: Option<String>,

    #[arg(long)]
    pub main_name: Option<String>,

    /// Name the entry point `main_<file stem>`.
    #[arg(long)]
    pub auto_main_name: bool,

    /// Code run before any test.
    #[arg(long, value_name = "CODE")]
    pub suite_setup: Option<String>,

    /// Code run after all tests; sees `num_failures`.
    #[arg(long, value_name = "CODE")]
    pub suite_teardown: Option<String>,

    /// Honour `TEST_CASE(...)` parameterization.
    #[arg(long)]
    pub use_param_tests: bool,

    /// Give the entry point `argc`/`argv` with list and filter flags.
    #[arg(long)]
    pub main_with_params: bool,

    /// Verify mock call ordering across expectations.
    #[arg(long)]
    pub enforce_strict_ordering: bool,

    /// Wrap the runner in `#ifdef USE_REAL_<NAME>` / `#endif`.
    #[arg(long)]
    pub isolation_directive: bool,

    /// Also write a header with every test's prototype.
    #[arg(long, value_name = "PATH")]
    pub header_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ModuleArgs {
    /// Module name (letters, digits and underscores).
    pub name: String,

    /// Design pattern: src, dh, dih, mch or mvp.
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Source directory.
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Header directory.
    #[arg(long, value_name = "DIR")]
    pub inc: Option<PathBuf>,

    /// Test directory.
    #[arg(long = "test", value_name = "DIR")]
    pub tst: Option<PathBuf>,

    /// Remove the module's files instead of creating them.
    #[arg(short, long)]
    pub destroy: bool,

    /// Add created files to, and delete removed files from, svn.
    #[arg(short, long)]
    pub update_svn: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ParseArgs {
    /// Captured build/test output.
    pub log: PathBuf,

    /// Also write JUnit XML (to `report.xml_output` when no path is given).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub xml: Option<Option<PathBuf>>,

    /// `<testsuite>` name for the XML report.
    #[arg(long)]
    pub suite: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SummaryArgs {
    /// Unity result files (`*.testpass`, `*.testfail`).
    #[arg(required = true)]
    pub results: Vec<PathBuf>,

    /// Prefix for source paths in detail lines.
    #[arg(long)]
    pub root: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct JunitArgs {
    /// Unity result files.
    #[arg(required = true)]
    pub results: Vec<PathBuf>,

    /// XML file to write (defaults to `report.xml_output`).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ColourArgs {
    /// File to colour; stdin when absent.
    pub file: Option<PathBuf>,
}
