//! Notes synchronizer: list/query and mutation calls against `/api/notes/`.
//!
//! Every mutation is a single round trip that reports success or failure.
//! Refreshing a list afterwards is the caller's job; [`NoteListView::commit`]
//! does it for the common case.

mod view;

pub use view::{ListOutcome, ListTicket, NoteListView};

use serde_json::json;

use crate::api::{decode, ApiClient};
use crate::error::{ApiError, Result};
use crate::models::{Note, NoteDraft, NoteFilters, NotePatch, NoteSlug};
use crate::session::TokenStorage;
use crate::transport::{ApiRequest, ApiTransport};

const NOTES_PATH: &str = "/api/notes/";

pub struct NotesSynchronizer<T: ApiTransport, S: TokenStorage> {
    api: ApiClient<T, S>,
}

impl<T: ApiTransport, S: TokenStorage> NotesSynchronizer<T, S> {
    pub const fn new(api: ApiClient<T, S>) -> Self {
        Self { api }
    }

    /// Notes matching `filters`, in the order the backend returns them.
    pub async fn list_notes(&self, filters: &NoteFilters) -> Result<Vec<Note>> {
        let request = ApiRequest::get(NOTES_PATH).with_query(filters.to_query());
        let response = self.api.send_authorized(request).await?;
        let notes = decode::<Vec<Note>>(&response)?;
        tracing::debug!(count = notes.len(), ordering = %filters.ordering_param(), "Listed notes");
        Ok(notes)
    }

    pub async fn get_note(&self, slug: &NoteSlug) -> Result<Note> {
        let response = self
            .api
            .send_authorized(ApiRequest::get(note_path(slug)))
            .await?;
        decode(&response)
    }

    /// Creates a note; blank title or content is rejected before any request.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        draft.validate()?;
        let request = ApiRequest::post(NOTES_PATH).with_json(draft.to_payload());
        let response = self.api.send_authorized(request).await?;
        let note = decode::<Note>(&response)?;
        tracing::info!(slug = %note.slug, "Created note");
        Ok(note)
    }

    /// Replaces the editable fields of `note` with `patch` applied on top.
    pub async fn update_note(&self, note: &Note, patch: &NotePatch) -> Result<Note> {
        if patch.is_empty() {
            return Err(ApiError::field(
                crate::error::DETAIL_FIELD,
                "Nothing to update.",
            ));
        }
        let draft = patch.apply_to(note);
        draft.validate()?;

        let request = ApiRequest::put(note_path(&note.slug)).with_json(draft.to_payload());
        let response = self.api.send_authorized(request).await?;
        let updated = decode::<Note>(&response)?;
        tracing::info!(slug = %updated.slug, "Updated note");
        Ok(updated)
    }

    pub async fn delete_note(&self, slug: &NoteSlug) -> Result<()> {
        self.api
            .send_authorized(ApiRequest::delete(note_path(slug)))
            .await?;
        tracing::info!(%slug, "Deleted note");
        Ok(())
    }

    /// Sends the negation of `is_archived`; returns the note as stored afterwards.
    pub async fn toggle_archive(&self, slug: &NoteSlug, is_archived: bool) -> Result<Note> {
        let request = ApiRequest::put(format!("{}archive/", note_path(slug)))
            .with_json(json!({ "is_archived": !is_archived }));
        let response = self.api.send_authorized(request).await?;
        let note = decode::<Note>(&response)?;
        tracing::info!(%slug, is_archived = note.is_archived, "Toggled archive");
        Ok(note)
    }

    /// Sends the negation of `is_pinned`; returns the note as stored afterwards.
    pub async fn toggle_pin(&self, slug: &NoteSlug, is_pinned: bool) -> Result<Note> {
        let request = ApiRequest::put(format!("{}pin/", note_path(slug)))
            .with_json(json!({ "is_pinned": !is_pinned }));
        let response = self.api.send_authorized(request).await?;
        let note = decode::<Note>(&response)?;
        tracing::info!(%slug, is_pinned = note.is_pinned, "Toggled pin");
        Ok(note)
    }
}

fn note_path(slug: &NoteSlug) -> String {
    format!("{NOTES_PATH}{}/", urlencoding::encode(slug.as_str()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, PoisonError};

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tokio::sync::Barrier;

    use super::*;
    use crate::events::{Notice, Notifier};
    use crate::models::{SortDirection, SortField};
    use crate::session::{MemoryTokenStorage, SessionManager, TokenStorage, ACCESS_TOKEN_KEY};
    use crate::testing::{json_response, note_json, signed_in_client, FakeTransport};
    use crate::transport::{ApiResponse, Method};

    fn slug(raw: &str) -> NoteSlug {
        raw.parse().unwrap()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn list_keeps_server_order_for_newest_first() {
        let (client, _) = signed_in_client(FakeTransport::responding(|request| {
            assert_eq!(request.query_value("ordering"), Some("-created_at"));
            json_response(
                200,
                &json!([
                    note_json("t3", "Third", "2024-01-03T00:00:00Z"),
                    note_json("t2", "Second", "2024-01-02T00:00:00Z"),
                    note_json("t1", "First", "2024-01-01T00:00:00Z"),
                ]),
            )
        }));

        let filters =
            NoteFilters::default().ordered_by(SortField::CreatedAt, SortDirection::Desc);
        let notes = client.notes().list_notes(&filters).await.unwrap();

        let slugs = notes.iter().map(|note| note.slug.as_str()).collect::<Vec<_>>();
        assert_eq!(slugs, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn lone_access_token_sends_nothing() {
        let storage = MemoryTokenStorage::default();
        storage.write(ACCESS_TOKEN_KEY, "access-only").unwrap();
        let session = SessionManager::new(storage, Notifier::new());
        let client = ApiClient::new(
            FakeTransport::responding(|_| json_response(200, &json!([]))),
            Arc::new(session),
        );

        let error = client
            .notes()
            .list_notes(&NoteFilters::default())
            .await
            .unwrap_err();

        assert!(error.is_auth());
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_with_empty_title_makes_no_request() {
        let (client, _) = signed_in_client(FakeTransport::responding(|_| {
            json_response(201, &note_json("x", "x", "2024-01-01T00:00:00Z"))
        }));

        let error = client
            .notes()
            .create_note(&NoteDraft::new("", "hello"))
            .await
            .unwrap_err();

        assert!(error.field_error("title").is_some());
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_posts_draft_payload() {
        let (client, _) = signed_in_client(FakeTransport::responding(|request| {
            assert_eq!(request.method, Method::Post);
            assert_eq!(request.path, NOTES_PATH);
            json_response(201, &note_json("plan", "Plan", "2024-01-01T00:00:00Z"))
        }));

        let draft = NoteDraft::new("Plan", "Write it down").with_tags(["work"]);
        let note = client.notes().create_note(&draft).await.unwrap();

        assert_eq!(note.slug.as_str(), "plan");
        let sent = client.transport().requests();
        assert_eq!(
            sent[0].json(),
            Some(&json!({
                "title": "Plan",
                "content": "Write it down",
                "tags": [{"name": "work"}],
                "color": "#FFFFFF"
            }))
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_maps_backend_field_errors() {
        let (client, _) = signed_in_client(FakeTransport::responding(|_| {
            json_response(400, &json!({"color": ["Invalid color."]}))
        }));

        let error = client
            .notes()
            .create_note(&NoteDraft::new("Plan", "Body"))
            .await
            .unwrap_err();
        assert_eq!(error.field_error("color"), Some("Invalid color."));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn update_puts_merged_note() {
        let (client, _) = signed_in_client(FakeTransport::responding(|request| {
            assert_eq!(request.method, Method::Put);
            assert_eq!(request.path, "/api/notes/plan/");
            let mut note = note_json("plan", "Plan", "2024-01-01T00:00:00Z");
            note["content"] = request.json().unwrap()["content"].clone();
            json_response(200, &note)
        }));
        let original: Note =
            serde_json::from_value(note_json("plan", "Plan", "2024-01-01T00:00:00Z")).unwrap();

        let patch = NotePatch {
            content: Some("Revised".to_string()),
            ..NotePatch::default()
        };
        let updated = client.notes().update_note(&original, &patch).await.unwrap();

        assert_eq!(updated.content, "Revised");
        let sent = client.transport().requests();
        assert_eq!(sent[0].json().unwrap()["title"], json!("Plan"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_patch_is_rejected_locally() {
        let (client, _) =
            signed_in_client(FakeTransport::responding(|_| json_response(200, &json!({}))));
        let original: Note =
            serde_json::from_value(note_json("plan", "Plan", "2024-01-01T00:00:00Z")).unwrap();

        let error = client
            .notes()
            .update_note(&original, &NotePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Validation { .. }));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn delete_accepts_no_content() {
        let (client, _) = signed_in_client(FakeTransport::responding(|request| {
            assert_eq!(request.method, Method::Delete);
            Ok(ApiResponse::new(204, ""))
        }));

        client.notes().delete_note(&slug("plan")).await.unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_note_is_reported_with_detail() {
        let (client, _) = signed_in_client(FakeTransport::responding(|_| {
            json_response(404, &json!({"detail": "Not found."}))
        }));

        let error = client.notes().get_note(&slug("gone")).await.unwrap_err();
        assert_eq!(error.field_error("detail"), Some("Not found."));
    }

    /// Stores one note and applies archive/pin requests to it.
    fn stateful_backend() -> FakeTransport {
        let stored = Arc::new(Mutex::new(note_json(
            "plan",
            "Plan",
            "2024-01-01T00:00:00Z",
        )));
        FakeTransport::responding(move |request| {
            let mut note = stored.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(Value::Object(changes)) = request.json() {
                for (field, value) in changes {
                    note[field] = value.clone();
                }
            }
            json_response(200, &note)
        })
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggle_archive_sends_negated_state_and_round_trips() {
        let (client, _) = signed_in_client(stateful_backend());
        let notes = client.notes();

        let archived = notes.toggle_archive(&slug("plan"), false).await.unwrap();
        assert!(archived.is_archived);
        let restored = notes
            .toggle_archive(&slug("plan"), archived.is_archived)
            .await
            .unwrap();
        assert!(!restored.is_archived);

        let sent = client.transport().requests();
        assert_eq!(sent[0].path, "/api/notes/plan/archive/");
        assert_eq!(sent[0].json(), Some(&json!({"is_archived": true})));
        assert_eq!(sent[1].json(), Some(&json!({"is_archived": false})));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggle_pin_targets_pin_endpoint() {
        let (client, _) = signed_in_client(stateful_backend());

        let pinned = client.notes().toggle_pin(&slug("plan"), false).await.unwrap();
        assert!(pinned.is_pinned);

        let sent = client.transport().requests();
        assert_eq!(sent[0].path, "/api/notes/plan/pin/");
        assert_eq!(sent[0].json(), Some(&json!({"is_pinned": true})));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_unauthorized_responses_sign_out_once() {
        let barrier = Arc::new(Barrier::new(3));
        let (client, storage) = signed_in_client(FakeTransport::new(move |_| {
            let barrier = Arc::clone(&barrier);
            async move {
                barrier.wait().await;
                json_response(401, &json!({"detail": "Token is invalid or expired"}))
            }
        }));
        let mut notices = client.session().notifier().subscribe();
        let notes = client.notes();
        let filters = NoteFilters::default();

        let (first, second, third) = tokio::join!(
            notes.list_notes(&filters),
            notes.list_notes(&filters),
            notes.list_notes(&filters),
        );

        assert!(first.unwrap_err().is_auth());
        assert!(second.unwrap_err().is_auth());
        assert!(third.unwrap_err().is_auth());
        assert_eq!(client.transport().request_count(), 3);
        assert!(storage.is_empty());
        assert_eq!(notices.try_recv().unwrap(), Notice::LoginRequired);
        assert!(notices.try_recv().is_err());
    }
}
