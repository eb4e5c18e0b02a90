//! Canonical key fragments for joining

use crate::table::CellValue;

/// Convert a cell to its trimmed string form; missing cells become `""`
pub fn normalize(value: &CellValue) -> String {
    match value {
        CellValue::Missing => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// How blank key fragments take part in a join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankKeyPolicy {
    /// A key whose leading fragment is blank never matches; blank later
    /// fragments join like any other text
    #[default]
    NeverMatch,
    /// Blank fragments join like any other text, so blank matches blank
    MatchLiteral,
}

/// Build the composite key for one row, or `None` if the policy rejects it
pub fn composite_key(
    fragments: impl IntoIterator<Item = String>,
    separator: &str,
    policy: BlankKeyPolicy,
) -> Option<String> {
    let fragments: Vec<String> = fragments.into_iter().collect();

    if policy == BlankKeyPolicy::NeverMatch && fragments.first().is_none_or(|f| f.is_empty()) {
        return None;
    }

    Some(fragments.join(separator))
}
