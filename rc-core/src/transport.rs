//! Transport abstraction between the core and the Rocket.Chat server.
//!
//! [`Transport`] is what resolver, search and client code talk to; [`crate::HttpTransport`]
//! implements it over reqwest and `testing::MockTransport` implements it for tests.

use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;

use crate::error::Result;

/// Streamed binary response body, one chunk per item.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Multipart upload: the file is streamed from disk, never read whole into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file_path: PathBuf,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub message: Option<String>,
    pub description: Option<String>,
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(UploadForm),
}

/// One REST call: method, query string pairs and body. Cloned as-is to every fallback candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get() -> Self {
        Self {
            method: HttpMethod::Get,
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            query: Vec::new(),
            body: RequestBody::Json(body),
        }
    }

    pub fn upload(form: UploadForm) -> Self {
        Self {
            method: HttpMethod::Post,
            query: Vec::new(),
            body: RequestBody::Multipart(form),
        }
    }

    /// Appends a query pair.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a query pair only when `value` is present.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends authenticated requests to the server.
///
/// Implementations attach the auth token and user id to every call and map a non-2xx status
/// or a `success: false` body to [`crate::RocketChatError::Upstream`] with the server's own
/// error text. They never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Calls `/api/v1/<path>` and returns the decoded JSON body.
    async fn call(&self, path: &str, request: ApiRequest) -> Result<Value>;

    /// Streams a binary resource addressed by server path segments (e.g. `file-upload/<id>/<name>`).
    async fn download(&self, segments: Vec<String>) -> Result<ByteStream>;
}
