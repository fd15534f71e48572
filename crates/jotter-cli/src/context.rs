//! Wires a profile's keychain and base URL into an API client.

use std::sync::Arc;

use jotter_core::config::ClientConfig;
use jotter_core::transport::HttpTransport;
use jotter_core::{ApiClient, Notice, Notifier, RouteDecision, SessionManager};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::config_profiles::{resolve_api_base_url, CliProfilesConfig, API_BASE_URL_ENV};
use crate::error::CliError;
use crate::keychain::KeyringTokenStorage;

pub type CliClient = ApiClient<HttpTransport, KeyringTokenStorage>;

pub struct AppContext {
    pub profile_name: String,
    pub client: CliClient,
    notices: broadcast::Receiver<Notice>,
}

impl AppContext {
    pub fn load(global_profile: Option<&str>, api_base_url: Option<String>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = config.resolve_profile_name(global_profile);
        let base_url = resolve_api_base_url(
            api_base_url,
            std::env::var(API_BASE_URL_ENV).ok(),
            config.profile(&profile_name),
        )
        .ok_or_else(|| CliError::MissingBaseUrl(profile_name.clone()))?;

        let transport = HttpTransport::new(ClientConfig::new(&base_url)?)?;
        let session = open_session(&profile_name);
        let notices = session.notifier().subscribe();
        tracing::debug!(profile = %profile_name, base_url = %base_url, "Loaded CLI context");

        Ok(Self {
            profile_name,
            client: ApiClient::new(transport, Arc::new(session)),
            notices,
        })
    }

    /// Fails fast when the profile holds no session, before any request.
    pub fn require_session(&self) -> Result<(), CliError> {
        match self.client.session().guard() {
            RouteDecision::Render => Ok(()),
            RouteDecision::RedirectToLogin => Err(CliError::NotSignedIn(self.profile_name.clone())),
        }
    }

    /// Notices raised while the command ran.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut drained = Vec::new();
        loop {
            match self.notices.try_recv() {
                Ok(notice) => drained.push(notice),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Dropped lagged notices");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        drained
    }
}

/// Session backed by the profile's keychain entries, without a transport.
pub fn open_session(profile_name: &str) -> SessionManager<KeyringTokenStorage> {
    SessionManager::new(KeyringTokenStorage::new(profile_name), Notifier::new())
}

/// Resolves the profile name the same way [`AppContext::load`] does.
pub fn resolve_profile(global_profile: Option<&str>) -> Result<String, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    Ok(config.resolve_profile_name(global_profile))
}

/// Prints what the user must act on; the rest only goes to the log.
pub fn report_notices(profile_name: &str, notices: &[Notice]) {
    for notice in notices {
        match notice {
            Notice::LoginRequired => eprintln!(
                "Session for profile '{profile_name}' was rejected and has been cleared. Run `jotter auth login` to sign in again."
            ),
            Notice::Failure { context, message } => {
                tracing::debug!(%context, %message, "Request failed");
            }
        }
    }
}
