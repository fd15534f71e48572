//! Scripted transport and fixtures for unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::events::Notifier;
use crate::session::{MemoryTokenStorage, SessionManager};
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, TransportError};

type Reply = Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + Send>>;
type Handler = Box<dyn Fn(ApiRequest) -> Reply + Send + Sync>;

/// Records every request and answers through a test-provided handler.
pub struct FakeTransport {
    requests: Mutex<Vec<ApiRequest>>,
    handler: Handler,
}

impl FakeTransport {
    /// Answers asynchronously, so handlers can wait on `Notify`/`Barrier`.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse, TransportError>> + Send + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            handler: Box::new(move |request| Box::pin(handler(request))),
        }
    }

    pub fn responding<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self::new(move |request| {
            let reply = handler(&request);
            async move { reply }
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ApiTransport for FakeTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        (self.handler)(request)
    }
}

pub fn json_response(status: u16, body: &Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, body.to_string()))
}

pub fn signed_out_client(
    transport: FakeTransport,
) -> ApiClient<FakeTransport, MemoryTokenStorage> {
    let session = SessionManager::new(MemoryTokenStorage::default(), Notifier::new());
    ApiClient::new(transport, Arc::new(session))
}

pub fn signed_in_client(
    transport: FakeTransport,
) -> (ApiClient<FakeTransport, MemoryTokenStorage>, MemoryTokenStorage) {
    let storage = MemoryTokenStorage::default();
    let session = SessionManager::new(storage.clone(), Notifier::new());
    session
        .set_session("access-token", "refresh-token")
        .expect("memory storage accepts writes");
    (ApiClient::new(transport, Arc::new(session)), storage)
}

/// Backend-shaped note JSON.
pub fn note_json(slug: &str, title: &str, created_at: &str) -> Value {
    json!({
        "id": 1,
        "slug": slug,
        "title": title,
        "content": format!("{title} body"),
        "tags": [],
        "color": "#FFFFFF",
        "is_archived": false,
        "is_pinned": false,
        "created_at": created_at,
        "updated_at": created_at,
    })
}
