//! Text measuring shared by label parsing and validation.
//!
//! Stored data is written by browser form inputs, so trimming and length
//! limits follow the browser's string rules.

/// Byte order mark, stripped as whitespace by browser `trim`.
const BOM: char = '\u{FEFF}';

/// Whether `c` is stripped when trimming input.
fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || c == BOM
}

/// Trims Unicode whitespace and byte order marks from both ends.
pub(crate) fn trim_input(s: &str) -> &str {
    s.trim_matches(is_trimmed)
}

/// Length of `s` in UTF-16 code units.
pub(crate) fn input_len(s: &str) -> usize {
    s.encode_utf16().count()
}
