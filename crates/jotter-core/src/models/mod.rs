//! Data models mirrored from the notes backend

mod filters;
mod note;
mod profile;
mod tag;

pub use filters::{NoteFilters, SortDirection, SortField};
pub use note::{Note, NoteDraft, NotePatch, NoteSlug, DEFAULT_NOTE_COLOR, MAX_TITLE_CHARS};
pub use profile::{Attachment, Gender, ProfilePatch, UserProfile};
pub use tag::{normalize_tag_names, parse_tag_list, Tag};
