//! Tag model

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A tag attached to notes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Backend identifier
    pub id: u64,
    /// Display name
    pub name: String,
}

/// Trim tag names, drop empties and case-insensitive duplicates, keep first-seen order.
pub fn normalize_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref().trim();
            if name.is_empty() || !seen.insert(name.to_lowercase()) {
                None
            } else {
                Some(name.to_string())
            }
        })
        .collect()
}

/// Parse a comma-separated tag field such as `"work, ideas"`.
///
/// # Examples
///
/// ```
/// use jotter_core::models::parse_tag_list;
///
/// assert_eq!(parse_tag_list("work, ideas,,Work"), vec!["work", "ideas"]);
/// ```
#[must_use]
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_tag_names(raw.split(','))
}
