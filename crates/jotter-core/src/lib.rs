//! jotter-core - Core library for Jotter
//!
//! This crate holds the client-side session handling, the REST transport, and
//! the synchronizers that keep note, tag, and profile views consistent with the
//! backend. It is shared by every Jotter front end (currently the CLI).

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod notes;
pub mod profile;
pub mod session;
pub mod tags;
pub mod transport;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use api::ApiClient;
pub use error::{ApiError, Result, StorageError};
pub use events::{Notice, Notifier};
pub use models::{Note, NoteDraft, NoteFilters, NotePatch, NoteSlug, Tag, UserProfile};
pub use session::{RouteDecision, Session, SessionManager, TokenStorage};
