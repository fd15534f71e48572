//! Login, registration, token refresh, and logout against the token endpoints.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;

use crate::api::{decode, ApiClient};
use crate::error::{check_fields, ApiError, Result};
use crate::session::{Session, TokenStorage};
use crate::transport::{ApiRequest, ApiTransport};

const TOKEN_PATH: &str = "/api/token/";
const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";
const REGISTER_PATH: &str = "/api/user/register/";

pub struct AuthClient<T: ApiTransport, S: TokenStorage> {
    api: ApiClient<T, S>,
}

impl<T: ApiTransport, S: TokenStorage> AuthClient<T, S> {
    pub const fn new(api: ApiClient<T, S>) -> Self {
        Self { api }
    }

    /// Exchanges credentials for a token pair and stores it.
    ///
    /// A storage failure is reported as a failed login.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        validate_credentials(username, password)?;

        let request = ApiRequest::post(TOKEN_PATH).with_json(json!({
            "username": username.trim(),
            "password": password,
        }));
        let response = self.api.send_public(request).await?;
        let tokens = decode::<TokenPairResponse>(&response)?;

        self.api
            .session()
            .set_session(&tokens.access, &tokens.refresh)?;
        tracing::info!(username = username.trim(), "Signed in");
        Ok(())
    }

    /// Creates an account. Any existing session is cleared first.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        validate_credentials(username, password)?;
        self.api.session().clear_session()?;

        let request = ApiRequest::post(REGISTER_PATH).with_json(json!({
            "username": username.trim(),
            "password": password,
        }));
        self.api.send_public(request).await?;
        tracing::info!(username = username.trim(), "Registered account");
        Ok(())
    }

    /// Trades the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<()> {
        let Some(Session { refresh_token, .. }) = self.api.session().session() else {
            return Err(ApiError::Auth("Not signed in".to_string()));
        };

        let request =
            ApiRequest::post(TOKEN_REFRESH_PATH).with_json(json!({ "refresh": refresh_token }));
        let response = match self.api.send_public(request).await {
            Ok(response) => response,
            Err(ApiError::Validation { .. } | ApiError::Auth(_)) => {
                tracing::warn!("Refresh token was rejected; signing out");
                self.api.session().clear_session()?;
                return Err(ApiError::Auth("Session expired".to_string()));
            }
            Err(error) => return Err(error),
        };
        let tokens = decode::<RefreshResponse>(&response)?;
        let refresh = tokens.refresh.unwrap_or(refresh_token);

        self.api.session().set_session(&tokens.access, &refresh)?;
        tracing::info!("Access token refreshed");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.api.session().clear_session()?;
        tracing::info!("Signed out");
        Ok(())
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    let mut field_errors = BTreeMap::new();
    if username.trim().is_empty() {
        field_errors.insert("username".to_string(), "Username is required.".to_string());
    }
    if password.is_empty() {
        field_errors.insert("password".to_string(), "Password is required.".to_string());
    }
    check_fields(field_errors)
}

#[derive(Debug, Deserialize)]
struct TokenPairResponse {
    access: String,
    refresh: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}
