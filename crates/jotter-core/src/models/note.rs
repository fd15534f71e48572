//! Note model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{check_fields, ApiError, Result};
use crate::models::tag::{normalize_tag_names, Tag};

/// Color applied to notes created without an explicit one.
pub const DEFAULT_NOTE_COLOR: &str = "#FFFFFF";

/// Longest title the backend accepts.
pub const MAX_TITLE_CHARS: usize = 100;

const BLANK_FIELD_MESSAGE: &str = "This field may not be blank.";

/// URL-safe identifier the backend assigns to every note
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteSlug(String);

impl NoteSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteSlug {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        let slug = s.trim();
        if slug.is_empty() {
            return Err(ApiError::field("slug", "Note slug cannot be empty."));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ApiError::field(
                "slug",
                "Note slug may only contain letters, numbers, hyphens, and underscores.",
            ));
        }
        Ok(Self(slug.to_string()))
    }
}

/// A note as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Numeric primary key, when the backend exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub slug: NoteSlug,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Tags in backend order
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

impl Note {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }

    /// First line of the content, truncated to `max_len` characters
    #[must_use]
    pub fn content_preview(&self, max_len: usize) -> String {
        self.content
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    /// The editable fields of this note, as a draft
    #[must_use]
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: self.tags.iter().map(|tag| tag.name.clone()).collect(),
            color: self.color.clone(),
        }
    }
}

/// Fields sent when creating or replacing a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub color: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            color: default_color(),
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tag_names(tags);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Checks the draft locally, before any request is made.
    pub fn validate(&self) -> Result<()> {
        let mut field_errors = BTreeMap::new();

        let title = self.title.trim();
        if title.is_empty() {
            field_errors.insert("title".to_string(), BLANK_FIELD_MESSAGE.to_string());
        } else if title.chars().count() > MAX_TITLE_CHARS {
            field_errors.insert(
                "title".to_string(),
                format!("Ensure this field has no more than {MAX_TITLE_CHARS} characters."),
            );
        }
        if self.content.trim().is_empty() {
            field_errors.insert("content".to_string(), BLANK_FIELD_MESSAGE.to_string());
        }
        if !hex_color_pattern().is_match(self.color.trim()) {
            field_errors.insert(
                "color".to_string(),
                "Enter a valid hex color such as #FFFFFF.".to_string(),
            );
        }

        check_fields(field_errors)
    }

    pub(crate) fn to_payload(&self) -> Value {
        let tags = normalize_tag_names(&self.tags)
            .into_iter()
            .map(|name| json!({ "name": name }))
            .collect::<Vec<_>>();
        json!({
            "title": self.title.trim(),
            "content": self.content,
            "tags": tags,
            "color": self.color.trim(),
        })
    }
}

/// Partial edit applied on top of a fetched note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub color: Option<String>,
}

impl NotePatch {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.color.is_none()
    }

    /// Merges this patch over `note`, producing the full representation to send.
    #[must_use]
    pub fn apply_to(&self, note: &Note) -> NoteDraft {
        let mut draft = note.to_draft();
        if let Some(title) = &self.title {
            draft.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            draft.content.clone_from(content);
        }
        if let Some(tags) = &self.tags {
            draft.tags = normalize_tag_names(tags);
        }
        if let Some(color) = &self.color {
            draft.color.clone_from(color);
        }
        draft
    }
}

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid regex"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_note() -> Note {
        serde_json::from_value(json!({
            "id": 7,
            "slug": "groceries",
            "title": "Groceries",
            "content": "Milk\nEggs",
            "tags": [{"id": 1, "name": "home"}],
            "color": "#FFEEAA",
            "is_archived": false,
            "is_pinned": true,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-02T08:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn note_deserializes_backend_payload() {
        let note = sample_note();
        assert_eq!(note.slug.as_str(), "groceries");
        assert_eq!(note.tag_names(), vec!["home"]);
        assert!(note.is_pinned);
        assert!(note.created_at < note.updated_at);
    }

    #[test]
    fn note_defaults_optional_fields() {
        let note: Note = serde_json::from_value(json!({
            "slug": "bare",
            "title": "Bare",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(note.color, DEFAULT_NOTE_COLOR);
        assert!(note.tags.is_empty());
        assert!(!note.is_archived);
    }

    #[test]
    fn slug_rejects_path_characters() {
        assert!("my-note_2".parse::<NoteSlug>().is_ok());
        let error = "../etc".parse::<NoteSlug>().unwrap_err();
        assert!(error.field_error("slug").is_some());
        assert!("  ".parse::<NoteSlug>().is_err());
    }

    #[test]
    fn draft_requires_title_and_content() {
        let error = NoteDraft::new("", "hello").validate().unwrap_err();
        assert_eq!(error.field_error("title"), Some(BLANK_FIELD_MESSAGE));
        assert_eq!(error.field_error("content"), None);

        let error = NoteDraft::new("Title", "  ").validate().unwrap_err();
        assert_eq!(error.field_error("content"), Some(BLANK_FIELD_MESSAGE));
    }

    #[test]
    fn draft_rejects_long_titles_and_bad_colors() {
        let error = NoteDraft::new("x".repeat(MAX_TITLE_CHARS + 1), "body")
            .with_color("white")
            .validate()
            .unwrap_err();
        assert!(error.field_error("title").unwrap().contains("100"));
        assert!(error.field_error("color").is_some());
    }

    #[test]
    fn draft_payload_uses_defaults_and_tag_objects() {
        let payload = NoteDraft::new(" Plan ", "Write it down")
            .with_tags(["work", "Work", " ideas "])
            .to_payload();
        assert_eq!(
            payload,
            json!({
                "title": "Plan",
                "content": "Write it down",
                "tags": [{"name": "work"}, {"name": "ideas"}],
                "color": "#FFFFFF"
            })
        );
    }

    #[test]
    fn patch_overrides_only_given_fields() {
        let note = sample_note();
        let patch = NotePatch {
            content: Some("Bread".to_string()),
            ..NotePatch::default()
        };
        let draft = patch.apply_to(&note);
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.content, "Bread");
        assert_eq!(draft.tags, vec!["home"]);
        assert_eq!(draft.color, "#FFEEAA");
        assert!(NotePatch::default().is_empty());
    }

    #[test]
    fn content_preview_takes_first_line() {
        let note = sample_note();
        assert_eq!(note.content_preview(50), "Milk");
        assert_eq!(note.content_preview(2), "Mi");
    }
}
