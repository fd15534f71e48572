use std::io;
use std::path::PathBuf;

use jotter_core::config::ConfigError;
use jotter_core::transport::TransportError;
use jotter_core::{ApiError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ClientConfig(#[from] ConfigError),
    #[error("Failed to set up HTTP client: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "No API base URL for profile '{0}'. Run `jotter config init --api-base-url <url>` or set JOTTER_API_BASE_URL."
    )]
    MissingBaseUrl(String),
    #[error("Profile '{0}' is not signed in. Run `jotter auth login --username <name> --password <password>`.")]
    NotSignedIn(String),
    #[error("Failed to read {}: {source}", path.display())]
    Attachment { path: PathBuf, source: io::Error },
}
