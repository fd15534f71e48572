//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Trim a base URL and drop trailing slashes, requiring an HTTP(S) scheme.
pub fn normalize_base_url(raw: &str) -> Result<String, &'static str> {
    let base = raw.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err("API base URL must not be empty");
    }
    if !is_http_url(base) {
        return Err("API base URL must include http:// or https://");
    }
    Ok(base.to_string())
}
