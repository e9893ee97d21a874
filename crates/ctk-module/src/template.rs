//! File templates for scaffolded modules.

use std::fmt::Write;

fn include_lines(includes: &[String]) -> String {
    let mut out = String::new();
    for include in includes {
        let _ = writeln!(out, "#include \"{include}\"");
    }
    out
}

/// `name.c`: its includes followed by its own header.
#[must_use]
pub fn source(name: &str, includes: &[String]) -> String {
    format!("{}#include \"{name}.h\"\n", include_lines(includes))
}

/// `name.h`: an include guard around the configured includes.
#[must_use]
pub fn header(name: &str, includes: &[String]) -> String {
    let guard = format!("_{}_H", name.to_uppercase());
    format!(
        "#ifndef {guard}\n#define {guard}\n{}\n#endif // {guard}\n",
        include_lines(includes)
    )
}

/// Unity test file with empty fixtures and one ignored placeholder test.
#[must_use]
pub fn test(name: &str, includes: &[String]) -> String {
    format!(
        "#include \"unity.h\"
{includes}#include \"{name}.h\"

void setUp(void)
{{
}}

void tearDown(void)
{{
}}

void test_{name}_NeedToImplement(void)
{{
    TEST_IGNORE_MESSAGE(\"Need to Implement {name}\");
}}
",
        includes = include_lines(includes)
    )
}

/// Expand `%1$s` in a boilerplate to the module file name.
#[must_use]
pub fn boilerplate(text: &str, name: &str) -> String {
    text.replace("%1$s", name)
}
