//! Mapping of arbitrary file names onto valid C identifiers.

/// Characters that cannot appear in a C identifier derived from a file name.
const DISALLOWED: [char; 6] = ['-', '/', '\\', '.', ',', ' '];

/// Convert a file name into a C identifier by replacing path separators,
/// dots, commas, dashes and whitespace with `_`.
///
/// Other characters pass through untouched; the result is not validated.
#[must_use]
pub fn sanitize_c_identifier(unsanitized: &str) -> String {
    unsanitized
        .chars()
        .map(|ch| {
            if DISALLOWED.contains(&ch) || ch.is_whitespace() {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

/// Include-guard token for a generated header: the sanitized base name,
/// uppercased and prefixed with `_`.
#[must_use]
pub fn guard_token(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    format!("_{}", sanitize_c_identifier(base).to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_mock_header_names() {
        assert_eq!(sanitize_c_identifier("mockMock.h"), "mockMock_h");
        assert_eq!(sanitize_c_identifier("mock-uart driver.h"), "mock_uart_driver_h");
    }

    #[test]
    fn sanitizes_path_separators() {
        assert_eq!(sanitize_c_identifier("sub/dir\\mockA,b"), "sub_dir_mockA_b");
    }

    #[test]
    fn keeps_other_characters() {
        assert_eq!(sanitize_c_identifier("mock$odd"), "mock$odd");
    }

    #[test]
    fn guard_token_uses_base_name() {
        assert_eq!(guard_token("build/test_runner.h"), "_TEST_RUNNER_H");
        assert_eq!(guard_token("C:\\out\\my-header.h"), "_MY_HEADER_H");
    }
}
