//! Tag normalization
//!
//! Free-text tags are compared in canonical form: trimmed, lowercased, at most
//! [`MAX_TAG_CHARS`] characters and unique.

use std::collections::HashSet;

pub const MAX_TAG_CHARS: usize = 25;

/// Trim and lowercase a single tag. Whitespace-only input yields `""`.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonicalize a list of tags, keeping the first occurrence of each.
///
/// Empty tags and tags longer than [`MAX_TAG_CHARS`] are dropped.
pub fn normalize_set<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|t| normalize(t.as_ref()))
        .filter(|t| !t.is_empty() && t.chars().count() <= MAX_TAG_CHARS)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Split a comma-separated tag string (e.g. `"mystery, Horror,"`)
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_set(raw.split(','))
}
