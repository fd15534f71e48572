//! Error types for jotter-core

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::util::compact_text;

/// Field name used for messages that are not tied to a single input field.
pub const DETAIL_FIELD: &str = "detail";

/// Result type alias using jotter-core's error taxonomy
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure to read or write persisted session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Errors surfaced to callers of the synchronizers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received from the backend
    #[error("Network error: {0}")]
    Network(String),

    /// The request was rejected with per-field messages (4xx, or local checks)
    #[error("Validation failed: {}", render_field_errors(.field_errors))]
    Validation {
        field_errors: BTreeMap<String, String>,
    },

    /// Missing, expired, or rejected credentials (401/403)
    #[error("Authentication required: {0}")]
    Auth(String),

    /// The backend failed (5xx) or answered with an unreadable payload
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Session tokens could not be persisted
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Builds a validation error carrying a single field message.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(field.into(), message.into());
        Self::Validation { field_errors }
    }

    /// Returns the message recorded for `field`, when this is a validation error.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        match self {
            Self::Validation { field_errors } => field_errors.get(field).map(String::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Maps a non-success HTTP status and body onto the taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Auth(detail_message(body).unwrap_or_else(|| format!("HTTP {status}"))),
            400..=499 => Self::Validation {
                field_errors: parse_field_errors(status, body),
            },
            _ => Self::Server {
                status,
                message: detail_message(body).unwrap_or_else(|| format!("HTTP {status}")),
            },
        }
    }
}

/// Collects local validation failures, returning `Ok` when there are none.
pub(crate) fn check_fields(field_errors: BTreeMap<String, String>) -> Result<()> {
    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation { field_errors })
    }
}

fn render_field_errors(field_errors: &BTreeMap<String, String>) -> String {
    field_errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses DRF-style error bodies: `{"field": ["msg", ...]}` or `{"detail": "msg"}`.
fn parse_field_errors(status: u16, body: &str) -> BTreeMap<String, String> {
    let mut field_errors = BTreeMap::new();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for (field, value) in map {
            let Some(message) = flatten_message(&value) else {
                continue;
            };
            let field = if field == "non_field_errors" {
                DETAIL_FIELD.to_string()
            } else {
                field
            };
            field_errors
                .entry(field)
                .and_modify(|existing: &mut String| {
                    existing.push(' ');
                    existing.push_str(&message);
                })
                .or_insert(message);
        }
    }

    if field_errors.is_empty() {
        let message = Some(compact_text(body))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        field_errors.insert(DETAIL_FIELD.to_string(), message);
    }
    field_errors
}

fn detail_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(message) = map.get(DETAIL_FIELD).and_then(flatten_message) {
            return Some(message);
        }
    }
    Some(compact_text(body)).filter(|text| !text.is_empty())
}

fn flatten_message(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()).filter(|text| !text.is_empty()),
        Value::Array(items) => {
            let parts = items.iter().filter_map(flatten_message).collect::<Vec<_>>();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
