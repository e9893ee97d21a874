use ctk_config::CtkConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::ui::UiPrefs;

pub mod colour;
pub mod junit;
pub mod module;
pub mod parse;
pub mod runner;
pub mod summary;

/// How a successfully executed command wants the process to exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command ran, but the results it reports contain failures.
    TestsFailed,
}

impl Outcome {
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::TestsFailed => 1,
        }
    }
}

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: &Commands,
    config: CtkConfig,
    flags: &GlobalFlags,
    prefs: UiPrefs,
) -> anyhow::Result<Outcome> {
    match command {
        Commands::Runner(args) => runner::handle(args, config.runner, flags, prefs),
        Commands::Module(args) => module::handle(args, config.module, flags, prefs),
        Commands::Parse(args) => parse::handle(args, &config.report, flags, prefs),
        Commands::Summary(args) => summary::handle(args, &config.report, flags, prefs),
        Commands::Junit(args) => junit::handle(args, &config.report, flags, prefs),
        Commands::Colour(args) => colour::handle(args, flags, prefs),
    }
}
