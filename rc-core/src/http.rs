//! reqwest implementation of [`Transport`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::credentials::{mask_token, Credentials};
use crate::decode;
use crate::error::{Result, RocketChatError};
use crate::transport::{ApiRequest, ByteStream, HttpMethod, RequestBody, Transport, UploadForm};

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const USER_ID_HEADER: &str = "X-User-Id";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Client-level limits. A hung request is bounded only by these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTransportOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpTransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Authenticated REST transport. Holds only the immutable credentials and reqwest's pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    credentials: Arc<Credentials>,
}

impl HttpTransport {
    pub fn new(credentials: Credentials, options: HttpTransportOptions) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| RocketChatError::Transport(format!("failed to build HTTP client: {e}")))?;

        info!(
            server_url = %credentials.server_url(),
            user_id = %credentials.user_id(),
            auth_token = %mask_token(credentials.auth_token()),
            "step: HTTP transport created"
        );

        Ok(Self {
            client,
            credentials: Arc::new(credentials),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTH_TOKEN_HEADER, self.credentials.auth_token())
            .header(USER_ID_HEADER, self.credentials.user_id())
    }

    async fn multipart(form: &UploadForm) -> Result<Form> {
        let file = tokio::fs::File::open(&form.file_path).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let mime = form.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE);
        let part = Part::stream_with_length(body, length)
            .file_name(form.file_name.clone())
            .mime_str(mime)
            .map_err(|e| RocketChatError::validation(format!("invalid MIME type {mime:?}: {e}")))?;

        let mut multipart = Form::new().part("file", part);
        if let Some(message) = &form.message {
            multipart = multipart.text("msg", message.clone());
        }
        if let Some(description) = &form.description {
            multipart = multipart.text("description", description.clone());
        }
        if let Some(thread_id) = &form.thread_id {
            multipart = multipart.text("tmid", thread_id.clone());
        }
        Ok(multipart)
    }
}

/// Maps a response to JSON, turning non-2xx or `success: false` into `Upstream`.
fn check_envelope(status: reqwest::StatusCode, text: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_str(text).ok();

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(decode::error_text)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(RocketChatError::Upstream(message));
    }

    let body = parsed.ok_or_else(|| {
        RocketChatError::Decode(format!("response is not JSON (status {status})"))
    })?;

    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = decode::error_text(&body).unwrap_or_else(|| "Request failed".to_string());
        return Err(RocketChatError::Upstream(message));
    }

    Ok(body)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, path: &str, request: ApiRequest) -> Result<Value> {
        let url = self.credentials.api_url(path);
        debug!(path = %path, method = ?request.method, query = ?request.query, "step: REST call");

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        let builder = self.authorize(builder).query(&request.query);
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(form) => builder.multipart(Self::multipart(form).await?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| RocketChatError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RocketChatError::Transport(e.to_string()))?;

        let result = check_envelope(status, &text);
        if let Err(err) = &result {
            debug!(path = %path, status = %status, error = %err, "step: REST call failed");
        }
        result
    }

    async fn download(&self, segments: Vec<String>) -> Result<ByteStream> {
        let mut url = Url::parse(self.credentials.server_url())
            .map_err(|e| RocketChatError::validation(format!("invalid server URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RocketChatError::validation("server URL cannot carry a path"))?
            .pop_if_empty()
            .extend(&segments);

        debug!(url = %url, "step: download started");
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| RocketChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "step: download rejected");
            return Err(RocketChatError::Upstream(format!(
                "Download failed with status {status}"
            )));
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| RocketChatError::Transport(e.to_string()));
        Ok(stream.boxed())
    }
}
