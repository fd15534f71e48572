//! Client session: the persisted access/refresh token pair and the route guard.
//!
//! The [`SessionManager`] is the only writer of the token pair. It is handed
//! a [`TokenStorage`] so front ends can choose where tokens live (OS keychain
//! for the CLI, memory in tests).

mod memory;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use memory::MemoryTokenStorage;

use crate::error::StorageError;
use crate::events::{Notice, Notifier};

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "jotter.access_token";
/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "jotter.refresh_token";

/// Key/value persistence for session tokens.
pub trait TokenStorage: Send + Sync + 'static {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A complete token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Whether a protected view may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    RedirectToLogin,
}

/// Access token captured when a request was dispatched.
#[derive(Clone)]
pub struct Credentials {
    pub access_token: String,
    /// Session epoch at dispatch; see [`SessionManager::reject`].
    pub epoch: u64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("epoch", &self.epoch)
            .finish()
    }
}

/// Owns the persisted token pair.
///
/// Every read goes to storage, so a session cleared elsewhere (another
/// process sharing the keychain entry) is seen on the next call.
pub struct SessionManager<S: TokenStorage> {
    storage: S,
    epoch: AtomicU64,
    /// Held while the stored pair and the epoch change together, and while
    /// [`SessionManager::credentials`] reads them.
    pair_lock: Mutex<()>,
    notifier: Notifier,
}

impl<S: TokenStorage> SessionManager<S> {
    pub fn new(storage: S, notifier: Notifier) -> Self {
        Self {
            storage,
            epoch: AtomicU64::new(0),
            pair_lock: Mutex::new(()),
            notifier,
        }
    }

    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Stores both tokens, or neither.
    pub fn set_session(&self, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        let access_token = access_token.trim();
        let refresh_token = refresh_token.trim();
        if access_token.is_empty() || refresh_token.is_empty() {
            return Err(StorageError(
                "Refusing to store a session with a blank token".to_string(),
            ));
        }

        let _pair = self.lock_pair();
        self.storage.write(ACCESS_TOKEN_KEY, access_token)?;
        if let Err(error) = self.storage.write(REFRESH_TOKEN_KEY, refresh_token) {
            if let Err(rollback) = self.storage.remove(ACCESS_TOKEN_KEY) {
                tracing::warn!("Failed to roll back access token after storage error: {rollback}");
            }
            return Err(error);
        }

        self.epoch.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Session stored");
        Ok(())
    }

    /// Stored access token; storage failures read as signed out.
    pub fn access_token(&self) -> Option<String> {
        match self.storage.read(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.trim().is_empty()),
            Err(error) => {
                tracing::warn!("Failed to read access token: {error}");
                None
            }
        }
    }

    /// Both tokens, when the stored pair is complete.
    pub fn session(&self) -> Option<Session> {
        let access_token = self.access_token()?;
        let refresh_token = match self.storage.read(REFRESH_TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                tracing::warn!("Stored session is missing its refresh token");
                return None;
            }
            Err(error) => {
                tracing::warn!("Failed to read refresh token: {error}");
                return None;
            }
        };
        Some(Session {
            access_token,
            refresh_token,
        })
    }

    /// Presence of a complete pair; expiry is left to the backend.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn guard(&self) -> RouteDecision {
        if self.is_authenticated() {
            RouteDecision::Render
        } else {
            RouteDecision::RedirectToLogin
        }
    }

    /// Removes both tokens. Idempotent; both removals are attempted even if one fails.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let _pair = self.lock_pair();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.remove_tokens()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Token and epoch for an outgoing request, or `None` without a complete pair.
    ///
    /// Both are read under the pair lock, so the token always belongs to
    /// the returned epoch.
    pub fn credentials(&self) -> Option<Credentials> {
        let _pair = self.lock_pair();
        let epoch = self.epoch();
        self.session().map(|session| Credentials {
            access_token: session.access_token,
            epoch,
        })
    }

    /// Handles a 401/403 for a request dispatched at `epoch`.
    ///
    /// Only the first rejection per epoch clears the session and publishes
    /// [`Notice::LoginRequired`]; returns whether this call did so.
    pub fn reject(&self, epoch: u64) -> bool {
        {
            let _pair = self.lock_pair();
            if self
                .epoch
                .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                tracing::debug!(epoch, "Session rejection already handled");
                return false;
            }

            tracing::warn!("Backend rejected the session; signing out");
            if let Err(error) = self.remove_tokens() {
                tracing::warn!("Failed to clear rejected session: {error}");
            }
        }
        self.notifier.publish(Notice::LoginRequired);
        true
    }

    fn lock_pair(&self) -> MutexGuard<'_, ()> {
        self.pair_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_tokens(&self) -> Result<(), StorageError> {
        let access = self.storage.remove(ACCESS_TOKEN_KEY);
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }
}
