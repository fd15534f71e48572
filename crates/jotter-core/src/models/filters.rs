//! List query parameters for the notes collection

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{ApiError, Result};
use crate::util::normalize_text_option;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

impl FromStr for SortField {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            other => Err(ApiError::field(
                "ordering",
                format!("Unsupported ordering field '{other}'."),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Search, tag, sort, and state filters for one list view.
///
/// Defaults to newest-created first with no other filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NoteFilters {
    pub search: Option<String>,
    pub tags: BTreeSet<String>,
    pub ordering: SortField,
    pub direction: SortDirection,
    pub archived: Option<bool>,
    pub pinned: Option<bool>,
}

impl NoteFilters {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = normalize_text_option(Some(search.into()));
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl AsRef<str>) -> Self {
        if let Some(tag) = normalize_text_option(Some(tag.as_ref().to_string())) {
            self.tags.insert(tag);
        }
        self
    }

    #[must_use]
    pub fn ordered_by(mut self, ordering: SortField, direction: SortDirection) -> Self {
        self.ordering = ordering;
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    #[must_use]
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    /// Value of the `ordering` query parameter, e.g. `-created_at`
    pub fn ordering_param(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.ordering.as_str().to_string(),
            SortDirection::Desc => format!("-{}", self.ordering.as_str()),
        }
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("ordering".to_string(), self.ordering_param())];
        if let Some(search) = normalize_text_option(self.search.clone()) {
            query.push(("search".to_string(), search));
        }
        for tag in &self.tags {
            query.push(("tags__name".to_string(), tag.clone()));
        }
        if let Some(archived) = self.archived {
            query.push(("is_archived".to_string(), archived.to_string()));
        }
        if let Some(pinned) = self.pinned {
            query.push(("is_pinned".to_string(), pinned.to_string()));
        }
        query
    }
}
