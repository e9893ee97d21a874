//! Unity runner source emission.
//!
//! The runner is emitted in a fixed section order so that identical inputs
//! give byte-identical output:
//! isolation guard, banner, `RUN_TEST` macro, includes, strict-ordering
//! globals, externs, mock management, suite hooks, `resetTest`, entry point.

use std::fmt::Write;
use std::path::Path;

use ctk_config::{Plugin, RunnerConfig};
use ctk_core::{include_directive, sanitize_c_identifier};

use crate::descriptor::{ScanResult, TestDescriptor};

pub(crate) const BANNER: &str = "/* AUTOGENERATED FILE. DO NOT EDIT. */";

/// Writes a runner `.c` file for one scanned test file.
#[derive(Debug, Clone, Copy)]
pub struct RunnerEmitter<'a> {
    config: &'a RunnerConfig,
}

impl<'a> RunnerEmitter<'a> {
    #[must_use]
    pub const fn new(config: &'a RunnerConfig) -> Self {
        Self { config }
    }

    /// Render the complete runner source.
    ///
    /// `input` is the test file path as given by the caller; it is echoed
    /// into `UnityBegin(...)` and used to derive the entry point and
    /// isolation macro names.
    #[must_use]
    pub fn emit(&self, input: &Path, scan: &ScanResult) -> String {
        let mut out = String::new();
        let has_mocks = !scan.mocks.is_empty();

        if self.config.isolation_directive {
            let _ = writeln!(out, "#ifdef USE_REAL_{}", isolation_name(input));
        }
        let _ = writeln!(out, "{BANNER}");
        self.write_run_test_macro(&mut out, has_mocks);
        self.write_includes(&mut out, scan);
        self.write_externs(&mut out, &scan.tests);
        if has_mocks {
            self.write_mock_management(&mut out, &scan.mocks);
        }
        self.write_suite_hooks(&mut out);
        self.write_reset(&mut out, has_mocks);
        self.write_main(&mut out, input, &scan.tests, has_mocks);
        if self.config.isolation_directive {
            let _ = writeln!(out, "#endif");
        }
        out
    }

    /// Name of the generated entry point.
    #[must_use]
    pub fn main_name(&self, input: &Path) -> String {
        if self.config.auto_main_name {
            format!(
                "{}_{}",
                self.config.main_name,
                sanitize_c_identifier(&file_stem(input))
            )
        } else {
            self.config.main_name.clone()
        }
    }

    fn write_run_test_macro(&self, out: &mut String, has_mocks: bool) {
        let params = self.config.use_param_tests;
        let filter = self.config.main_with_params;
        let cexception = self.config.has_plugin(Plugin::Cexception);

        let _ = writeln!(out, "\n//=======Test Runner Used To Run Each Test Below=====");
        if params {
            let _ = writeln!(out, "#define RUN_TEST_NO_ARGS");
        }
        let _ = writeln!(
            out,
            "#define RUN_TEST(TestFunc, {}TestLineNum{}) \\",
            if filter { "Filter, " } else { "" },
            if params { ", ..." } else { "" }
        );
        let _ = writeln!(out, "{{ \\");
        let _ = writeln!(
            out,
            "  Unity.CurrentTestName = #TestFunc{}; \\",
            if params { " \"(\" #__VA_ARGS__ \")\"" } else { "" }
        );
        if filter {
            let _ = writeln!(out, "  if (MatchFilter(Filter)) \\");
        } else {
            let _ = writeln!(out, "  \\");
        }
        let _ = writeln!(out, "  {{ \\");
        let _ = writeln!(out, "  Unity.CurrentTestLineNumber = TestLineNum; \\");
        let _ = writeln!(out, "  Unity.NumberOfTests++; \\");
        if has_mocks {
            let _ = writeln!(out, "  CMock_Init(); \\");
            let _ = writeln!(out, "  UNITY_CLR_DETAILS(); \\");
        }
        let _ = writeln!(out, "  if (TEST_PROTECT()) \\");
        let _ = writeln!(out, "  {{ \\");
        if cexception {
            let _ = writeln!(out, "    CEXCEPTION_T e; \\");
            let _ = writeln!(out, "    Try {{ \\");
        }
        let _ = writeln!(out, "      {}(); \\", self.config.setup_name);
        let _ = writeln!(
            out,
            "      TestFunc({}); \\",
            if params { "__VA_ARGS__" } else { "" }
        );
        if cexception {
            let _ = writeln!(
                out,
                "    }} Catch(e) {{ TEST_ASSERT_EQUAL_HEX32_MESSAGE(CEXCEPTION_NONE, e, \"Unhandled Exception!\"); }} \\"
            );
        }
        let _ = writeln!(out, "  }} \\");
        let _ = writeln!(out, "  if (TEST_PROTECT() && !TEST_IS_IGNORED) \\");
        let _ = writeln!(out, "  {{ \\");
        let _ = writeln!(out, "    {}(); \\", self.config.teardown_name);
        if has_mocks {
            let _ = writeln!(out, "    CMock_Verify(); \\");
        }
        let _ = writeln!(out, "  }} \\");
        if has_mocks {
            let _ = writeln!(out, "  CMock_Destroy(); \\");
        }
        let _ = writeln!(out, "  UnityConcludeTest(); \\");
        let _ = writeln!(out, "  }} \\");
        let _ = writeln!(out, "}}");
    }

    fn write_includes(&self, out: &mut String, scan: &ScanResult) {
        let _ = writeln!(out, "\n//=======Automagically Detected Files To Include=====");
        let _ = writeln!(out, "#include \"{}.h\"", self.config.framework);
        if !scan.mocks.is_empty() {
            let _ = writeln!(out, "#include \"cmock.h\"");
        }
        let _ = writeln!(out, "#include <setjmp.h>");
        let _ = writeln!(out, "#include <stdio.h>");
        if self.config.has_plugin(Plugin::Cexception) {
            let _ = writeln!(out, "#include \"CException.h\"");
        }

        if let Some(header) = self.config.header_path() {
            // The generated header already pulls in everything the tests need.
            let base = header
                .file_name()
                .map_or_else(|| header.to_string_lossy(), |name| name.to_string_lossy());
            let _ = writeln!(out, "#include \"{base}\"");
        } else {
            for include in forced_includes(self.config) {
                let _ = writeln!(out, "{}", include_directive(include));
            }
            for include in runner_includes(scan) {
                let _ = writeln!(out, "{}", include_directive(include));
            }
        }

        for mock in &scan.mocks {
            let _ = writeln!(out, "{}", include_directive(mock));
        }

        if self.config.enforce_strict_ordering {
            let _ = writeln!(out);
            let _ = writeln!(out, "int GlobalExpectCount;");
            let _ = writeln!(out, "int GlobalVerifyOrder;");
            let _ = writeln!(out, "char* GlobalOrderError;");
        }
    }

    fn write_externs(&self, out: &mut String, tests: &[TestDescriptor]) {
        let _ = writeln!(out, "\n//=======External Functions This Runner Calls=====");
        let _ = writeln!(out, "extern void {}(void);", self.config.setup_name);
        let _ = writeln!(out, "extern void {}(void);", self.config.teardown_name);
        for test in tests {
            let _ = writeln!(out, "extern void {}({});", test.name, test.prototype_params());
        }
        let _ = writeln!(out);
    }

    fn write_mock_management(&self, out: &mut String, mocks: &[String]) {
        let names: Vec<String> = mocks.iter().map(|mock| mock_identifier(mock)).collect();

        let _ = writeln!(out, "\n//=======Mock Management=====");
        let _ = writeln!(out, "static void CMock_Init(void)");
        let _ = writeln!(out, "{{");
        if self.config.enforce_strict_ordering {
            let _ = writeln!(out, "  GlobalExpectCount = 0;");
            let _ = writeln!(out, "  GlobalVerifyOrder = 0;");
            let _ = writeln!(out, "  GlobalOrderError = NULL;");
        }
        for name in &names {
            let _ = writeln!(out, "  {name}_Init();");
        }
        let _ = writeln!(out, "}}");

        for (function, suffix) in [("CMock_Verify", "Verify"), ("CMock_Destroy", "Destroy")] {
            let _ = writeln!(out, "static void {function}(void)");
            let _ = writeln!(out, "{{");
            for name in &names {
                let _ = writeln!(out, "  {name}_{suffix}();");
            }
            let _ = writeln!(out, "}}");
        }
    }

    fn write_suite_hooks(&self, out: &mut String) {
        if let Some(body) = &self.config.suite_setup {
            let _ = writeln!(out, "\n//=======Suite Setup=====");
            let _ = writeln!(out, "static int suite_setup(void)");
            let _ = writeln!(out, "{{");
            let _ = writeln!(out, "{body}");
            let _ = writeln!(out, "}}");
        }
        if let Some(body) = &self.config.suite_teardown {
            let _ = writeln!(out, "\n//=======Suite Teardown=====");
            let _ = writeln!(out, "static int suite_teardown(int num_failures)");
            let _ = writeln!(out, "{{");
            let _ = writeln!(out, "{body}");
            let _ = writeln!(out, "}}");
        }
    }

    fn write_reset(&self, out: &mut String, has_mocks: bool) {
        let _ = writeln!(out, "\n//=======Test Reset Option=====");
        let _ = writeln!(out, "void resetTest(void);");
        let _ = writeln!(out, "void resetTest(void)");
        let _ = writeln!(out, "{{");
        if has_mocks {
            let _ = writeln!(out, "  CMock_Verify();");
            let _ = writeln!(out, "  CMock_Destroy();");
        }
        let _ = writeln!(out, "  {}();", self.config.teardown_name);
        if has_mocks {
            let _ = writeln!(out, "  CMock_Init();");
        }
        let _ = writeln!(out, "  {}();", self.config.setup_name);
        let _ = writeln!(out, "}}");
    }

    fn write_main(&self, out: &mut String, input: &Path, tests: &[TestDescriptor], has_mocks: bool) {
        let name = self.main_name(input);
        let params = if self.config.main_with_params {
            "int argc, char **argv"
        } else {
            "void"
        };
        let signature = if self.config.main_export_decl.is_empty() {
            format!("int {name}({params})")
        } else {
            format!("{} int {name}({params})", self.config.main_export_decl)
        };
        // Nested bodies sit one level deeper inside the list/run `else` block.
        let indent = if self.config.main_with_params { "    " } else { "  " };

        let _ = writeln!(out, "\n\n//=======MAIN=====");
        if name != "main" {
            let _ = writeln!(out, "{signature};");
        }
        let _ = writeln!(out, "{signature}");
        let _ = writeln!(out, "{{");

        if self.config.main_with_params {
            self.write_list_mode(out, input, tests);
        }

        if self.config.suite_setup.is_some() {
            let _ = writeln!(out, "{indent}suite_setup();");
        }
        let _ = writeln!(
            out,
            "{indent}UnityBegin(\"{}\");",
            input.to_string_lossy().replace('\\', "\\\\")
        );
        if self.config.main_with_params {
            let _ = writeln!(out, "{indent}char * Filter = \"\";");
            let _ = writeln!(
                out,
                "{indent}if (IsFlagTrue(UNITY_FLAG_FILTER_TESTS, argc, argv)) Filter = argv[1]+3;"
            );
        }

        let filter = if self.config.main_with_params { "Filter, " } else { "" };
        for test in tests {
            if !self.config.use_param_tests {
                let _ = writeln!(out, "{indent}RUN_TEST({}, {filter}{});", test.name, test.source_line);
            } else if !test.is_parameterized() {
                let _ = writeln!(
                    out,
                    "{indent}RUN_TEST({}, {filter}{}, RUN_TEST_NO_ARGS);",
                    test.name, test.source_line
                );
            } else {
                for args in &test.parameter_args {
                    let _ = writeln!(
                        out,
                        "{indent}RUN_TEST({}, {filter}{}, {args});",
                        test.name, test.source_line
                    );
                }
            }
        }
        let _ = writeln!(out);

        if has_mocks {
            let _ = writeln!(out, "{indent}CMock_Guts_MemFreeFinal();");
        }
        if self.config.suite_teardown.is_some() {
            let _ = writeln!(out, "{indent}return suite_teardown(UnityEnd());");
        } else {
            let _ = writeln!(out, "{indent}return UnityEnd();");
        }
        if self.config.main_with_params {
            let _ = writeln!(out, "  }}");
        }
        let _ = writeln!(out, "}}");
    }

    fn write_list_mode(&self, out: &mut String, input: &Path, tests: &[TestDescriptor]) {
        let _ = writeln!(out, "  if (IsFlagTrue(UNITY_FLAG_LIST_TESTS, argc, argv))");
        let _ = writeln!(out, "  {{");
        let _ = writeln!(out, "    UnityPrint(\"{}.\");", file_stem(input));
        let _ = writeln!(out, "    UNITY_PRINT_EOL();");
        for test in tests {
            if !self.config.use_param_tests {
                let _ = writeln!(out, "    UnityPrint(\"  {}\");", test.name);
                let _ = writeln!(out, "    UNITY_PRINT_EOL();");
            } else if !test.is_parameterized() {
                let _ = writeln!(out, "    UnityPrint(\"  {}(RUN_TEST_NO_ARGS)\");", test.name);
                let _ = writeln!(out, "    UNITY_PRINT_EOL();");
            } else {
                for args in &test.parameter_args {
                    let _ = writeln!(out, "    UnityPrint(\"  {}({args})\");", test.name);
                    let _ = writeln!(out, "    UNITY_PRINT_EOL();");
                }
            }
        }
        let _ = writeln!(out, "    return 0;");
        let _ = writeln!(out, "  }}");
        let _ = writeln!(out, "  else");
        let _ = writeln!(out, "  {{");
    }
}

/// Configured forced includes, first occurrence of each kept.
pub(crate) fn forced_includes(config: &RunnerConfig) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for include in &config.includes {
        if !include.is_empty() && !seen.contains(&include.as_str()) {
            seen.push(include);
        }
    }
    seen
}

/// Test-file includes that belong in the runner: no framework or mock headers.
pub(crate) fn runner_includes(scan: &ScanResult) -> impl Iterator<Item = &str> {
    scan.includes
        .iter()
        .filter(|include| !include.contains("unity") && !include.contains("cmock"))
}

/// `mock_uart` for `drivers/mock_uart`.
pub(crate) fn mock_identifier(mock: &str) -> String {
    let base = mock.rsplit(['/', '\\']).next().unwrap_or(mock);
    sanitize_c_identifier(base)
}

fn file_stem(input: &Path) -> String {
    let name = input
        .file_name()
        .map_or_else(|| input.to_string_lossy(), |name| name.to_string_lossy());
    name.strip_suffix(".c").unwrap_or(&*name).to_string()
}

fn isolation_name(input: &Path) -> String {
    file_stem(input).replace("_test", "").to_uppercase()
}
