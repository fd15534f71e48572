//! Profile synchronizer for `/api/user/profile/`.

use crate::api::{decode, ApiClient};
use crate::error::{ApiError, Result, DETAIL_FIELD};
use crate::models::{Attachment, ProfilePatch, UserProfile};
use crate::session::TokenStorage;
use crate::transport::{ApiRequest, ApiTransport, FilePart};

const PROFILE_PATH: &str = "/api/user/profile/";
const PICTURE_FIELD: &str = "profile_picture";

pub struct ProfileSynchronizer<T: ApiTransport, S: TokenStorage> {
    api: ApiClient<T, S>,
}

impl<T: ApiTransport, S: TokenStorage> ProfileSynchronizer<T, S> {
    pub const fn new(api: ApiClient<T, S>) -> Self {
        Self { api }
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        let response = self
            .api
            .send_authorized(ApiRequest::get(PROFILE_PATH))
            .await?;
        decode(&response)
    }

    /// Sends `patch`, as multipart when a picture is attached.
    ///
    /// The backend acknowledges with a status message rather than the
    /// profile, so callers re-fetch to see the result.
    pub async fn update_profile(
        &self,
        patch: &ProfilePatch,
        attachment: Option<Attachment>,
    ) -> Result<()> {
        let request = match attachment {
            Some(attachment) => {
                if attachment.bytes.is_empty() {
                    return Err(ApiError::field(PICTURE_FIELD, "The submitted file is empty."));
                }
                ApiRequest::patch(PROFILE_PATH).with_multipart(
                    patch.form_fields(),
                    vec![FilePart {
                        name: PICTURE_FIELD.to_string(),
                        file_name: attachment.file_name,
                        content_type: attachment.content_type,
                        bytes: attachment.bytes,
                    }],
                )
            }
            None if patch.is_empty() => {
                return Err(ApiError::field(DETAIL_FIELD, "Nothing to update."));
            }
            None => {
                let body = patch
                    .form_fields()
                    .into_iter()
                    .map(|(field, value)| (field, serde_json::Value::String(value)))
                    .collect::<serde_json::Map<_, _>>();
                ApiRequest::patch(PROFILE_PATH).with_json(serde_json::Value::Object(body))
            }
        };

        self.api.send_authorized(request).await?;
        tracing::info!("Updated profile");
        Ok(())
    }
}
