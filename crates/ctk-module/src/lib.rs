//! # ctk-module
//!
//! Scaffolding for new C modules: a source file, a header and a Unity test
//! file per member of a design pattern (`src`, `dh`, `dih`, `mch`, `mvp`).
//!
//! ```no_run
//! use ctk_config::ModuleConfig;
//! use ctk_module::ModuleGenerator;
//!
//! let generator = ModuleGenerator::new(ModuleConfig::default());
//! let report = generator.generate("Led", Some("dh")).expect("module files written");
//! print!("{}", report.render_text());
//! ```

pub mod error;
pub mod generator;
pub mod pattern;
pub mod template;
pub mod vcs;

pub use error::ModuleError;
pub use generator::{
    FileAction, FileKind, FileOutcome, ModuleFile, ModuleGenerator, ModuleReport, Operation,
    validate_name,
};
pub use pattern::{Member, Pattern};
pub use vcs::{SourceControl, Svn};
