//! Formatting of `#include` lines in generated C sources.

/// Render an include directive for `name`.
///
/// Names containing `<` are treated as system includes and emitted verbatim.
/// Anything else is quoted with exactly one `.h` suffix, so `foo`, `foo.h`
/// and `"foo.h"` forms all collapse to `#include "foo.h"`.
#[must_use]
pub fn include_directive(name: &str) -> String {
    if name.contains('<') {
        return format!("#include {name}");
    }
    let bare = name.trim_matches('"');
    let stem = bare.strip_suffix(".h").unwrap_or(bare);
    format!("#include \"{stem}.h\"")
}
