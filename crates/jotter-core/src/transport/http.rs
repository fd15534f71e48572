//! `reqwest`-backed transport.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};

use super::{ApiRequest, ApiResponse, ApiTransport, Method, RequestBody, TransportError};
use crate::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| TransportError(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        self.config.api_base_url()
    }

    fn build(&self, request: ApiRequest) -> Result<RequestBuilder, TransportError> {
        let url = self.config.endpoint(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { fields, files } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for file in files {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|error| {
                            TransportError(format!("Invalid attachment content type: {error}"))
                        })?;
                    form = form.part(file.name, part);
                }
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = request.method;
        let path = request.path.clone();
        let builder = self.build(request)?;

        tracing::debug!(?method, %path, "Dispatching API request");
        let response = builder
            .send()
            .await
            .map_err(|error| TransportError(format!("Request to {path} failed: {error}")))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| {
            TransportError(format!("Failed to read response body from {path}: {error}"))
        })?;
        tracing::debug!(?method, %path, status, "API request completed");
        Ok(ApiResponse { status, body })
    }
}
