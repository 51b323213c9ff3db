//! Label parsing.
//!
//! Labels are entered as a single `;`-separated string, e.g. `"work; vpn"`.

use super::model::AccountLabel;
use super::text::trim_input;

/// Separator between labels in raw input.
pub const LABEL_SEPARATOR: char = ';';

/// Parse a raw label string into labels.
///
/// Segments are trimmed and empty ones dropped; order is preserved.
/// Blank input yields no labels.
#[must_use]
pub fn parse_labels(raw: &str) -> Vec<AccountLabel> {
    raw.split(LABEL_SEPARATOR)
        .map(trim_input)
        .filter(|segment| !segment.is_empty())
        .map(AccountLabel::new)
        .collect()
}

/// Join labels back into the raw input form.
#[must_use]
pub fn format_labels(labels: &[AccountLabel]) -> String {
    labels
        .iter()
        .map(|label| label.text.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
