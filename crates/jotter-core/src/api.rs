//! Authenticated request plumbing shared by the synchronizers.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::AuthClient;
use crate::error::{ApiError, Result};
use crate::notes::NotesSynchronizer;
use crate::profile::ProfileSynchronizer;
use crate::session::{SessionManager, TokenStorage};
use crate::tags::TagsSynchronizer;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport};
use crate::util::compact_text;

/// Couples a transport with the session whose token every request carries.
pub struct ApiClient<T: ApiTransport, S: TokenStorage> {
    transport: Arc<T>,
    session: Arc<SessionManager<S>>,
}

impl<T: ApiTransport, S: TokenStorage> Clone for ApiClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
        }
    }
}

impl<T: ApiTransport, S: TokenStorage> ApiClient<T, S> {
    pub fn new(transport: T, session: Arc<SessionManager<S>>) -> Self {
        Self {
            transport: Arc::new(transport),
            session,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn auth(&self) -> AuthClient<T, S> {
        AuthClient::new(self.clone())
    }

    pub fn notes(&self) -> NotesSynchronizer<T, S> {
        NotesSynchronizer::new(self.clone())
    }

    pub fn profile(&self) -> ProfileSynchronizer<T, S> {
        ProfileSynchronizer::new(self.clone())
    }

    pub fn tags(&self) -> TagsSynchronizer<T, S> {
        TagsSynchronizer::new(self.clone())
    }

    /// Sends a request without credentials (login, register, token refresh).
    pub(crate) async fn send_public(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.dispatch(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.body))
        }
    }

    /// Sends a request carrying the current access token.
    ///
    /// With no stored token the request is not sent. A 401/403 signs the
    /// session out, once per session epoch.
    pub(crate) async fn send_authorized(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let Some(credentials) = self.session.credentials() else {
            tracing::debug!(path = %request.path, "Skipping request: not signed in");
            return Err(ApiError::Auth("Not signed in".to_string()));
        };
        request.bearer = Some(credentials.access_token);

        let response = self.dispatch(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let error = ApiError::from_status(response.status, &response.body);
        if error.is_auth() {
            self.session.reject(credentials.epoch);
        }
        Err(error)
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
        let path = request.path.clone();
        match self.transport.send(request).await {
            Ok(response) => {
                if !response.is_success() {
                    tracing::debug!(%path, status = response.status, "API request rejected");
                }
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(%path, "API request failed: {error}");
                Err(ApiError::Network(error.0))
            }
        }
    }
}

/// Decodes a successful JSON body.
pub(crate) fn decode<D: DeserializeOwned>(response: &ApiResponse) -> Result<D> {
    serde_json::from_str(&response.body).map_err(|error| {
        tracing::warn!(status = response.status, "Unreadable response payload: {error}");
        ApiError::Server {
            status: response.status,
            message: format!(
                "Unexpected response payload ({error}): {}",
                compact_text(&response.body)
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing::{signed_in_client, signed_out_client, FakeTransport};
    use crate::transport::TransportError;

    #[tokio::test(flavor = "current_thread")]
    async fn authorized_requests_carry_bearer_token() {
        let (client, _) =
            signed_in_client(FakeTransport::responding(|_| Ok(ApiResponse::new(200, "[]"))));

        client
            .send_authorized(ApiRequest::get("/api/notes/"))
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].bearer.as_deref(), Some("access-token"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn signed_out_requests_fail_without_network() {
        let client = signed_out_client(FakeTransport::responding(|_| {
            Ok(ApiResponse::new(200, "[]"))
        }));
        let mut notices = client.session().notifier().subscribe();

        let error = client
            .send_authorized(ApiRequest::get("/api/notes/"))
            .await
            .unwrap_err();

        assert!(error.is_auth());
        assert_eq!(client.transport().request_count(), 0);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn transport_failure_is_a_network_error() {
        let (client, _) = signed_in_client(FakeTransport::responding(|_| {
            Err(TransportError("connection refused".to_string()))
        }));

        let error = client
            .send_authorized(ApiRequest::get("/api/notes/"))
            .await
            .unwrap_err();
        assert_eq!(error, ApiError::Network("connection refused".to_string()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn public_rejections_leave_the_session_alone() {
        let (client, _) = signed_in_client(FakeTransport::responding(|_| {
            Ok(ApiResponse::new(401, r#"{"detail":"No active account"}"#))
        }));

        let error = client
            .send_public(ApiRequest::post("/api/token/"))
            .await
            .unwrap_err();
        assert!(error.is_auth());
        assert!(client.session().is_authenticated());
    }

    #[test]
    fn decode_failure_is_a_server_error() {
        let error = decode::<Vec<u8>>(&ApiResponse::new(200, "<html>")).unwrap_err();
        assert!(matches!(error, ApiError::Server { status: 200, .. }));

        let value = decode::<serde_json::Value>(&ApiResponse::new(200, r#"{"a":1}"#)).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }
}
