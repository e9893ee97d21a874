//! Records produced by scanning a C test file.

use serde::Serialize;

/// One discovered test function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestDescriptor {
    /// Function identifier.
    pub name: String,
    /// Raw argument text of each `TEST_CASE(...)` annotation, in source order.
    /// Empty unless parameterized tests are enabled and annotations exist.
    pub parameter_args: Vec<String>,
    /// Raw parameter-list text between the declaration's parentheses.
    pub call_signature: String,
    /// 1-based line of the name's first textual occurrence, or 0 if not found.
    pub source_line: usize,
}

impl TestDescriptor {
    /// Parameter list for prototypes, `void` when the declaration had none.
    #[must_use]
    pub fn prototype_params(&self) -> &str {
        let trimmed = self.call_signature.trim();
        if trimmed.is_empty() { "void" } else { trimmed }
    }

    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        !self.parameter_args.is_empty()
    }
}

/// `#include` directives found in a source file, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncludeSet {
    /// Quoted includes with the `.h` extension stripped.
    pub local: Vec<String>,
    /// Angle-bracket includes, kept as `<name>`.
    pub system: Vec<String>,
}

impl IncludeSet {
    /// Local includes followed by system includes.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.local.iter().chain(self.system.iter()).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.system.is_empty()
    }
}

/// Everything the emitters need from one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub tests: Vec<TestDescriptor>,
    /// Includes with mock headers removed.
    pub includes: IncludeSet,
    /// Mock headers, as written in the include (extension stripped for local ones).
    pub mocks: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(call: &str) -> TestDescriptor {
        TestDescriptor {
            name: String::from("test_Thing"),
            parameter_args: Vec::new(),
            call_signature: call.to_string(),
            source_line: 1,
        }
    }

    #[test]
    fn prototype_params_defaults_to_void() {
        assert_eq!(descriptor("").prototype_params(), "void");
        assert_eq!(descriptor("  ").prototype_params(), "void");
        assert_eq!(descriptor("int value").prototype_params(), "int value");
    }

    #[test]
    fn include_set_iterates_local_first() {
        let includes = IncludeSet {
            local: vec![String::from("funky")],
            system: vec![String::from("<stdio.h>")],
        };
        assert_eq!(includes.iter().collect::<Vec<_>>(), vec!["funky", "<stdio.h>"]);
        assert!(!includes.is_empty());
        assert!(IncludeSet::default().is_empty());
    }
}
