//! Discovery of test functions, includes and mock headers in C test files.
//!
//! This is a regex-driven lightweight lexer, not a C parser:
//! - string literals and comments are blanked before declarations are matched
//! - the remaining text is cut into logical units at `;`, `{`, `}` and at
//!   preprocessor lines, and each unit is matched against a
//!   `[TEST_CASE(...)]* void <prefix>name(params)` shape
//! - includes are read from a separately comment-stripped copy
//!
//! Unterminated comments or strings and unbalanced braces are not detected;
//! they make the scanner under- or over-split and miss or invent tests.
//! Existing inputs depend on this exact behavior, so it is kept loose.

use regex::Regex;

use crate::descriptor::{IncludeSet, ScanResult, TestDescriptor};
use crate::error::RunnerError;

/// Anything that can turn C test source text into a [`ScanResult`].
///
/// The emitters only consume the scan result, so a real tokenizer can
/// replace [`RegexScanner`] without touching them.
pub trait SourceScanner {
    fn scan(&self, source: &str) -> ScanResult;
}

/// The default heuristic scanner.
#[derive(Debug, Clone)]
pub struct RegexScanner {
    test_decl: Regex,
    test_case: Regex,
    string_literal: Regex,
    line_comment: Regex,
    block_comment: Regex,
    commented_block_start: Regex,
    statement_split: Regex,
    local_include: Regex,
    system_include: Regex,
    mock_prefix: String,
    use_param_tests: bool,
}

fn compile(pattern: &str) -> Result<Regex, RunnerError> {
    Regex::new(pattern).map_err(|source| RunnerError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl RegexScanner {
    /// Build a scanner.
    ///
    /// `test_prefix` is a regex alternation (e.g. `test|spec|should`) a test
    /// function name must start with. `mock_prefix` is matched
    /// case-insensitively against include base names.
    ///
    /// # Errors
    /// Returns `RunnerError::InvalidPattern` if `test_prefix` is not a valid regex.
    pub fn new(
        test_prefix: &str,
        mock_prefix: &str,
        use_param_tests: bool,
    ) -> Result<Self, RunnerError> {
        // Validate the prefix on its own so the error names the user's text.
        Regex::new(test_prefix).map_err(|source| RunnerError::InvalidPattern {
            pattern: test_prefix.to_string(),
            source,
        })?;

        let test_decl = compile(&format!(
            r"(?m)^((?:\s*TEST_CASE\s*\(.*?\)\s*)*)\s*void\s+((?:{test_prefix})\w*)\s*\(\s*(.*)\s*\)"
        ))?;

        Ok(Self {
            test_decl,
            test_case: compile(r"(?m)TEST_CASE\s*\((.*)\)\s*$")?,
            string_literal: compile(r#""[^"]*""#)?,
            line_comment: compile(r"(?m)//.*$")?,
            block_comment: compile(r"(?s)/\*.*?\*/")?,
            commented_block_start: compile(r"(?m)//(?:.+/\*|\*(?:$|[^/])).*$")?,
            statement_split: compile(r"(?m)^\s*#.*$|[;{}]")?,
            local_include: compile(r#"(?m)^\s*#include\s+"\s*(.+)\.[hH]\s*""#)?,
            system_include: compile(r"(?m)^\s*#include\s+<\s*(.+)\s*>")?,
            mock_prefix: mock_prefix.to_lowercase(),
            use_param_tests,
        })
    }

    /// Find test declarations, first occurrence of each name wins.
    #[must_use]
    pub fn find_tests(&self, source: &str) -> Vec<TestDescriptor> {
        // Strings go first so `//` or `/*` inside a literal is not a comment.
        let scrubbed = self.string_literal.replace_all(source, "").into_owned();
        let scrubbed = self.line_comment.replace_all(&scrubbed, "").into_owned();
        let scrubbed = self.block_comment.replace_all(&scrubbed, "").into_owned();

        let mut tests: Vec<TestDescriptor> = Vec::new();
        for unit in self.logical_units(&scrubbed) {
            let Some(caps) = self.test_decl.captures(unit) else {
                continue;
            };
            let name = caps[2].to_string();
            if tests.iter().any(|test| test.name == name) {
                continue;
            }

            let annotations = caps.get(1).map_or("", |m| m.as_str());
            let parameter_args = if self.use_param_tests {
                self.test_case
                    .captures_iter(annotations)
                    .map(|arg| arg[1].to_string())
                    .collect()
            } else {
                Vec::new()
            };

            tests.push(TestDescriptor {
                name,
                parameter_args,
                call_signature: caps[3].trim().to_string(),
                source_line: 0,
            });
        }

        assign_line_numbers(source, &mut tests);
        tests
    }

    /// Find `#include "x.h"` and `#include <y>` directives outside comments.
    #[must_use]
    pub fn find_includes(&self, source: &str) -> IncludeSet {
        // Line comments that hide the start of a block comment go first,
        // otherwise the block regex would swallow live code up to the next `*/`.
        let cleaned = self.commented_block_start.replace_all(source, "").into_owned();
        let cleaned = self.block_comment.replace_all(&cleaned, "").into_owned();
        let cleaned = self.line_comment.replace_all(&cleaned, "").into_owned();

        let mut includes = IncludeSet::default();
        for caps in self.local_include.captures_iter(&cleaned) {
            push_unique(&mut includes.local, caps[1].trim().to_string());
        }
        for caps in self.system_include.captures_iter(&cleaned) {
            push_unique(&mut includes.system, format!("<{}>", caps[1].trim()));
        }
        includes
    }

    /// Whether an include's base file name marks it as a mock header.
    #[must_use]
    pub fn is_mock(&self, include: &str) -> bool {
        let base = include.rsplit(['/', '\\']).next().unwrap_or(include);
        base.to_lowercase().starts_with(&self.mock_prefix)
    }

    /// Move mock headers out of `includes`.
    fn split_mocks(&self, includes: IncludeSet) -> (IncludeSet, Vec<String>) {
        let mut mocks = Vec::new();
        let mut plain = IncludeSet::default();
        for include in includes.local {
            if self.is_mock(&include) {
                push_unique(&mut mocks, include);
            } else {
                plain.local.push(include);
            }
        }
        for include in includes.system {
            if self.is_mock(&include) {
                push_unique(&mut mocks, include);
            } else {
                plain.system.push(include);
            }
        }
        (plain, mocks)
    }

    /// Cut text at statement boundaries; preprocessor lines stay whole units.
    fn logical_units<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut units = Vec::new();
        let mut last = 0;
        for boundary in self.statement_split.find_iter(text) {
            units.push(&text[last..boundary.start()]);
            if boundary.as_str().trim_start().starts_with('#') {
                units.push(boundary.as_str());
            }
            last = boundary.end();
        }
        units.push(&text[last..]);
        units
    }
}

impl SourceScanner for RegexScanner {
    fn scan(&self, source: &str) -> ScanResult {
        let tests = self.find_tests(source);
        let (includes, mocks) = self.split_mocks(self.find_includes(source));
        tracing::debug!(
            tests = tests.len(),
            includes = includes.local.len() + includes.system.len(),
            mocks = mocks.len(),
            "scanned test source"
        );
        ScanResult {
            tests,
            includes,
            mocks,
        }
    }
}

/// Attribute line numbers by plain substring search over the unmodified source.
///
/// Each search resumes at the line where the previous test was found, so a
/// name that also occurs earlier (in a comment, a string, or as the prefix of
/// a longer name) is attributed to that earlier line. Tests whose name is
/// never found keep line 0.
fn assign_line_numbers(source: &str, tests: &mut [TestDescriptor]) {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut index = 0;
    for test in tests.iter_mut() {
        if let Some(offset) = lines[index..]
            .iter()
            .position(|line| line.contains(test.name.as_str()))
        {
            index += offset;
            test.source_line = index + 1;
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scanner() -> RegexScanner {
        RegexScanner::new("test|spec|should", "mock", false).expect("scanner builds")
    }

    fn param_scanner() -> RegexScanner {
        RegexScanner::new("test|spec|should", "mock", true).expect("scanner builds")
    }

    fn names(tests: &[TestDescriptor]) -> Vec<&str> {
        tests.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn finds_tests_with_default_prefixes() {
        let source = "void test_Foo(void) { }\nvoid should_Bar(void) { }\nvoid helper(void) { }\n";
        let tests = scanner().find_tests(source);
        assert_eq!(names(&tests), vec!["test_Foo", "should_Bar"]);
        assert_eq!(tests[0].source_line, 1);
        assert_eq!(tests[1].source_line, 2);
        assert_eq!(tests[0].call_signature, "void");
    }

    #[test]
    fn narrower_prefix_filters_tests() {
        let source = "void test_Foo(void) { }\nvoid should_Bar(void) { }\n";
        let scanner = RegexScanner::new("should", "mock", false).expect("scanner builds");
        assert_eq!(names(&scanner.find_tests(source)), vec!["should_Bar"]);
    }

    #[test]
    fn ignores_commented_out_tests() {
        let source = "\
/*
void test_ShouldBeIgnored(void)
{
}
*/
//void test_ShouldAlsoNotBeTested(void)
void test_Real(void)
{
}
";
        assert_eq!(names(&scanner().find_tests(source)), vec!["test_Real"]);
    }

    #[test]
    fn comment_markers_inside_strings_do_not_hide_tests() {
        let source = "\
void test_A(void)
{
    const char* s = \"http://example.com/* not a comment\";
}

void test_B(void)
{
}
";
        assert_eq!(names(&scanner().find_tests(source)), vec!["test_A", "test_B"]);
    }

    #[test]
    fn keeps_raw_parameter_list() {
        let source = "void test_WithArgs(int a, char* b)\n{\n}\n";
        let tests = scanner().find_tests(source);
        assert_eq!(tests[0].call_signature, "int a, char* b");
        assert_eq!(tests[0].prototype_params(), "int a, char* b");
    }

    #[test]
    fn empty_parameter_list_prototypes_as_void() {
        let tests = scanner().find_tests("void test_Empty()\n{\n}\n");
        assert_eq!(tests[0].call_signature, "");
        assert_eq!(tests[0].prototype_params(), "void");
    }

    #[test]
    fn duplicate_names_keep_first_occurrence() {
        let source = "\
#ifdef ALT
void test_Twice(void)
{
}
#else
void test_Twice(void)
{
}
#endif
";
        let tests = scanner().find_tests(source);
        assert_eq!(names(&tests), vec!["test_Twice"]);
        assert_eq!(tests[0].source_line, 2);
    }

    #[test]
    fn preprocessor_lines_split_declarations() {
        let source = "#define FOO 1\nvoid test_AfterDefine(void)\n{\n}\n";
        let tests = scanner().find_tests(source);
        assert_eq!(names(&tests), vec!["test_AfterDefine"]);
    }

    #[test]
    fn collects_test_case_arguments_when_enabled() {
        let source = "\
TEST_CASE(0)
TEST_CASE(44)
TEST_CASE((90)+9)
void test_Params(int Num)
{
}
";
        let tests = param_scanner().find_tests(source);
        assert_eq!(tests[0].parameter_args, vec!["0", "44", "(90)+9"]);
        assert_eq!(tests[0].call_signature, "int Num");
        assert!(tests[0].is_parameterized());
    }

    #[test]
    fn test_case_arguments_ignored_when_disabled() {
        let source = "TEST_CASE(1)\nvoid test_Params(int Num)\n{\n}\n";
        let tests = scanner().find_tests(source);
        assert_eq!(names(&tests), vec!["test_Params"]);
        assert!(tests[0].parameter_args.is_empty());
    }

    #[test]
    fn line_number_search_can_hit_an_earlier_mention() {
        // The name is searched as plain text, so the comment on line 1 wins.
        let source = "// test_Early comes first\nvoid test_Early(void)\n{\n}\nvoid test_Late(void)\n{\n}\n";
        let tests = scanner().find_tests(source);
        assert_eq!(names(&tests), vec!["test_Early", "test_Late"]);
        assert_eq!(tests[0].source_line, 1);
        assert_eq!(tests[1].source_line, 5);

        let source = "void test_Ab(void)\n{\n}\n// test_Abc mentioned\nvoid test_Abc(void)\n{\n}\n";
        let tests = scanner().find_tests(source);
        assert_eq!(tests[1].name, "test_Abc");
        assert_eq!(tests[1].source_line, 4);
    }

    #[test]
    fn line_number_search_matches_longer_names() {
        // test_A is declared after test_AB but its search resumes at
        // test_AB's line, which already contains "test_A".
        let source = "void test_AB(void)\n{\n}\nvoid test_A(void)\n{\n}\n";
        let tests = scanner().find_tests(source);
        assert_eq!(names(&tests), vec!["test_AB", "test_A"]);
        assert_eq!(tests[0].source_line, 1);
        assert_eq!(tests[1].source_line, 1);
    }

    #[test]
    fn finds_local_and_system_includes() {
        let source = "\
#include <setjmp.h>
#include \"unity.h\"
#include \"funky.h\"
  #include \"sub/stanky.H\"
// #include \"commented.h\"
/* #include \"blocked.h\" */
#include <stdio.h>
#include \"funky.h\"
";
        let includes = scanner().find_includes(source);
        assert_eq!(includes.local, vec!["unity", "funky", "sub/stanky"]);
        assert_eq!(includes.system, vec!["<setjmp.h>", "<stdio.h>"]);
    }

    #[test]
    fn line_comment_hiding_block_start_does_not_eat_includes() {
        let source = "// old code /* start\n#include \"kept.h\"\n/* real */\n";
        let includes = scanner().find_includes(source);
        assert_eq!(includes.local, vec!["kept"]);
    }

    #[test]
    fn mock_headers_are_split_out_case_insensitively() {
        let source = "\
#include \"unity.h\"
#include \"mockMock.h\"
#include \"MockUart.h\"
#include \"drivers/mock_spi.h\"
#include \"Hardware.h\"
";
        let result = scanner().scan(source);
        assert_eq!(result.mocks, vec!["mockMock", "MockUart", "drivers/mock_spi"]);
        assert_eq!(result.includes.local, vec!["unity", "Hardware"]);
    }

    #[test]
    fn custom_mock_prefix() {
        let scanner = RegexScanner::new("test", "fake", false).expect("scanner builds");
        assert!(scanner.is_mock("FakeTimer"));
        assert!(!scanner.is_mock("mockTimer"));
    }

    #[test]
    fn invalid_prefix_is_reported() {
        let err = RegexScanner::new("test(", "mock", false).expect_err("should fail");
        assert!(err.to_string().contains("test("));
    }

    #[test]
    fn empty_source_scans_to_nothing() {
        let result = scanner().scan("");
        assert!(result.tests.is_empty());
        assert!(result.includes.is_empty());
        assert!(result.mocks.is_empty());
    }
}
