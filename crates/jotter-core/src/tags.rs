//! Tags synchronizer for `/api/tags/`.

use serde_json::json;

use crate::api::{decode, ApiClient};
use crate::error::{ApiError, Result};
use crate::models::Tag;
use crate::session::TokenStorage;
use crate::transport::{ApiRequest, ApiTransport};

const TAGS_PATH: &str = "/api/tags/";

pub struct TagsSynchronizer<T: ApiTransport, S: TokenStorage> {
    api: ApiClient<T, S>,
}

impl<T: ApiTransport, S: TokenStorage> TagsSynchronizer<T, S> {
    pub const fn new(api: ApiClient<T, S>) -> Self {
        Self { api }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let response = self.api.send_authorized(ApiRequest::get(TAGS_PATH)).await?;
        decode(&response)
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::field("name", "This field may not be blank."));
        }
        let request = ApiRequest::post(TAGS_PATH).with_json(json!({ "name": name }));
        let response = self.api.send_authorized(request).await?;
        let tag = decode::<Tag>(&response)?;
        tracing::info!(name = %tag.name, "Created tag");
        Ok(tag)
    }
}
