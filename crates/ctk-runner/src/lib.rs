//! # ctk-runner
//!
//! Generates the `main()` runner source (and optionally a prototype header)
//! for a Unity C test file.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ctk_config::RunnerConfig;
//! use ctk_runner::Generator;
//!
//! let generator = Generator::new(RunnerConfig::default()).expect("valid config");
//! let report = generator
//!     .run(Path::new("test/test_uart.c"), None)
//!     .expect("runner written");
//! println!("{} tests -> {}", report.tests.len(), report.output.display());
//! ```

pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod header;
pub mod scanner;

pub use descriptor::{IncludeSet, ScanResult, TestDescriptor};
pub use emitter::RunnerEmitter;
pub use error::RunnerError;
pub use generator::{
    GeneratedFiles, GeneratedHeader, GenerationReport, Generator, decode_source,
    default_output_path,
};
pub use header::HeaderEmitter;
pub use scanner::{RegexScanner, SourceScanner};
