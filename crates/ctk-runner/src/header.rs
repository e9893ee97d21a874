//! Companion header exposing the discovered test prototypes.

use std::fmt::Write;
use std::path::Path;

use ctk_config::RunnerConfig;
use ctk_core::{guard_token, include_directive};

use crate::descriptor::ScanResult;
use crate::emitter::{BANNER, forced_includes, runner_includes};

#[derive(Debug, Clone, Copy)]
pub struct HeaderEmitter<'a> {
    config: &'a RunnerConfig,
}

impl<'a> HeaderEmitter<'a> {
    #[must_use]
    pub const fn new(config: &'a RunnerConfig) -> Self {
        Self { config }
    }

    /// Render the header written to `header_path`.
    ///
    /// The include guard is derived from the header's own file name. The
    /// runner includes this header in place of the configured and discovered
    /// includes, so both sets are pulled in here after the framework headers.
    #[must_use]
    pub fn emit(&self, header_path: &Path, scan: &ScanResult) -> String {
        let guard = guard_token(&header_path.to_string_lossy());
        let mut out = String::new();

        let _ = writeln!(out, "{BANNER}");
        let _ = writeln!(out, "#ifndef {guard}");
        let _ = writeln!(out, "#define {guard}");
        let _ = writeln!(out);
        let _ = writeln!(out, "#include \"{}.h\"", self.config.framework);
        if !scan.mocks.is_empty() {
            let _ = writeln!(out, "#include \"cmock.h\"");
        }
        for include in forced_includes(self.config).into_iter().chain(runner_includes(scan)) {
            let _ = writeln!(out, "{}", include_directive(include));
        }
        let _ = writeln!(out);
        for test in &scan.tests {
            let _ = writeln!(out, "void {}({});", test.name, test.prototype_params());
        }
        let _ = writeln!(out, "#endif");
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::descriptor::{IncludeSet, TestDescriptor};

    #[test]
    fn header_declares_each_test() {
        let config = RunnerConfig {
            includes: vec![String::from("Forced")],
            ..RunnerConfig::default()
        };
        let scan = ScanResult {
            tests: vec![
                TestDescriptor {
                    name: String::from("test_A"),
                    parameter_args: Vec::new(),
                    call_signature: String::new(),
                    source_line: 2,
                },
                TestDescriptor {
                    name: String::from("test_B"),
                    parameter_args: vec![String::from("3")],
                    call_signature: String::from("int n"),
                    source_line: 8,
                },
            ],
            includes: IncludeSet {
                local: vec![String::from("Private")],
                system: Vec::new(),
            },
            mocks: vec![String::from("mockThing")],
        };

        let out = HeaderEmitter::new(&config).emit(Path::new("build/test-x.runner.h"), &scan);
        assert_eq!(
            out,
            "\
/* AUTOGENERATED FILE. DO NOT EDIT. */
#ifndef _TEST_X_RUNNER_H
#define _TEST_X_RUNNER_H

#include \"unity.h\"
#include \"cmock.h\"
#include \"Forced.h\"
#include \"Private.h\"

void test_A(void);
void test_B(int n);
#endif
"
        );
    }

    #[test]
    fn header_without_tests_is_still_guarded() {
        let config = RunnerConfig::default();
        let out = HeaderEmitter::new(&config).emit(Path::new("empty.h"), &ScanResult::default());
        assert!(out.starts_with("/* AUTOGENERATED FILE. DO NOT EDIT. */\n#ifndef _EMPTY_H\n"));
        assert!(out.ends_with("\n#endif\n"));
        assert!(!out.contains("cmock"));
    }
}
