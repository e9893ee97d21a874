//! # ctk-report
//!
//! Post-processing of Unity test output:
//! - [`colour`]: ANSI colouring of build/test logs
//! - [`parse`]: extraction of per-test results from captured output
//! - [`junit`]: JUnit-style XML from parsed output or result files
//! - [`summary`]: totals and failure/ignore details across result files

pub mod colour;
pub mod error;
pub mod junit;
pub mod parse;
pub mod summary;

pub use colour::{Colour, ColourReporter};
pub use error::ReportError;
pub use junit::{ResultCase, ResultSuite, escape_xml, report_to_xml, results_to_xml, suites_to_xml};
pub use parse::{OutputParser, ParseReport, ParsedCase};
pub use summary::{Summarizer, SummaryReport};
