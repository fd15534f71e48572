//! List state for one notes view, with a staleness guard.
//!
//! Each fetch is tagged with the filters it was dispatched for and a
//! sequence number. A response is applied only if those filters are still
//! current and nothing newer has been applied; otherwise it is dropped.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::NotesSynchronizer;
use crate::error::{ApiError, Result};
use crate::events::Notifier;
use crate::models::{Note, NoteFilters};
use crate::session::TokenStorage;
use crate::transport::ApiTransport;

/// Identifies one dispatched list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTicket {
    sequence: u64,
    filters: NoteFilters,
}

impl ListTicket {
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub const fn filters(&self) -> &NoteFilters {
        &self.filters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// The response replaced the visible list.
    Applied { count: usize },
    /// The response was superseded and discarded.
    Stale,
    /// The request failed; the previous list is still visible.
    Failed(ApiError),
}

#[derive(Debug, Default)]
struct ListState {
    filters: NoteFilters,
    notes: Vec<Note>,
    last_error: Option<ApiError>,
    issued: u64,
    applied: u64,
}

pub struct NoteListView {
    state: Mutex<ListState>,
    notifier: Notifier,
}

impl NoteListView {
    pub fn new(notifier: Notifier) -> Self {
        Self::with_filters(notifier, NoteFilters::default())
    }

    pub fn with_filters(notifier: Notifier, filters: NoteFilters) -> Self {
        Self {
            state: Mutex::new(ListState {
                filters,
                ..ListState::default()
            }),
            notifier,
        }
    }

    /// Makes `filters` current and tags a new request with them.
    pub fn begin(&self, filters: NoteFilters) -> ListTicket {
        let mut state = self.lock();
        state.issued += 1;
        state.filters = filters.clone();
        ListTicket {
            sequence: state.issued,
            filters,
        }
    }

    /// Runs the list request for `ticket` and applies it unless it went stale.
    pub async fn fetch<T: ApiTransport, S: TokenStorage>(
        &self,
        notes: &NotesSynchronizer<T, S>,
        ticket: ListTicket,
    ) -> ListOutcome {
        let result = notes.list_notes(&ticket.filters).await;

        let mut state = self.lock();
        if ticket.filters != state.filters || ticket.sequence < state.applied {
            tracing::debug!(
                sequence = ticket.sequence,
                applied = state.applied,
                "Discarding stale notes response"
            );
            return ListOutcome::Stale;
        }
        state.applied = ticket.sequence;

        match result {
            Ok(fetched) => {
                let count = fetched.len();
                state.notes = fetched;
                state.last_error = None;
                ListOutcome::Applied { count }
            }
            Err(error) => {
                state.last_error = Some(error.clone());
                drop(state);
                tracing::warn!("Keeping previous notes after failed refresh: {error}");
                if !error.is_auth() {
                    self.notifier.failure("Loading notes", error.to_string());
                }
                ListOutcome::Failed(error)
            }
        }
    }

    pub async fn load<T: ApiTransport, S: TokenStorage>(
        &self,
        notes: &NotesSynchronizer<T, S>,
        filters: NoteFilters,
    ) -> ListOutcome {
        let ticket = self.begin(filters);
        self.fetch(notes, ticket).await
    }

    /// Reloads with the current filters.
    pub async fn refresh<T: ApiTransport, S: TokenStorage>(
        &self,
        notes: &NotesSynchronizer<T, S>,
    ) -> ListOutcome {
        let filters = self.filters();
        self.load(notes, filters).await
    }

    /// Awaits `mutation`, then refreshes the list if it succeeded.
    pub async fn commit<T, S, V, F>(&self, notes: &NotesSynchronizer<T, S>, mutation: F) -> Result<V>
    where
        T: ApiTransport,
        S: TokenStorage,
        F: Future<Output = Result<V>>,
    {
        match mutation.await {
            Ok(value) => {
                self.refresh(notes).await;
                Ok(value)
            }
            Err(error) => {
                if !error.is_auth() {
                    self.notifier.failure("Saving note", error.to_string());
                }
                Err(error)
            }
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    pub fn filters(&self) -> NoteFilters {
        self.lock().filters.clone()
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.lock().last_error.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
