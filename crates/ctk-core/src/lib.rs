//! # ctk-core
//!
//! Shared vocabulary for the C test kit crates:
//! - C identifier sanitizing and include-guard tokens
//! - `#include` directive formatting for generated sources
//! - The pass/fail/ignore status carried by parsed test results

pub mod identifier;
pub mod include;
pub mod status;

pub use identifier::{guard_token, sanitize_c_identifier};
pub use include::include_directive;
pub use status::TestStatus;
