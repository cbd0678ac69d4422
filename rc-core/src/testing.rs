//! Scripted [`Transport`] for tests (feature `test-util`).
//!
//! Routes are keyed by endpoint path and optionally by one `key=value` pair found in the query
//! string or the JSON body. Specific routes win over catch-all routes; an unscripted call fails
//! with an upstream error, like a 404 from the server. Every call is recorded for assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use serde_json::Value;

use crate::error::{Result, RocketChatError};
use crate::transport::{ApiRequest, ByteStream, RequestBody, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Failure(String),
}

#[derive(Debug, Clone)]
struct Route {
    path: String,
    matcher: Option<(String, String)>,
    reply: Reply,
}

#[derive(Debug, Default)]
struct State {
    routes: Vec<Route>,
    files: HashMap<String, Vec<u8>>,
    calls: Vec<(String, ApiRequest)>,
    downloads: Vec<String>,
}

/// In-memory transport with call recording. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

fn request_value(request: &ApiRequest, key: &str) -> Option<String> {
    if let Some(value) = request.query_value(key) {
        return Some(value.to_string());
    }
    match &request.body {
        RequestBody::Json(body) => body.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        _ => None,
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, matcher: Option<(&str, &str)>, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        state.routes.push(Route {
            path: path.to_string(),
            matcher: matcher.map(|(k, v)| (k.to_string(), v.to_string())),
            reply,
        });
    }

    /// Any call to `path` returns `body`.
    pub fn respond(&self, path: &str, body: Value) -> &Self {
        self.push(path, None, Reply::Json(body));
        self
    }

    /// Calls to `path` whose query or JSON body has `key == value` return `body`.
    pub fn respond_for(&self, path: &str, key: &str, value: &str, body: Value) -> &Self {
        self.push(path, Some((key, value)), Reply::Json(body));
        self
    }

    /// Any call to `path` fails with `Upstream(message)`.
    pub fn fail(&self, path: &str, message: &str) -> &Self {
        self.push(path, None, Reply::Failure(message.to_string()));
        self
    }

    pub fn fail_for(&self, path: &str, key: &str, value: &str, message: &str) -> &Self {
        self.push(path, Some((key, value)), Reply::Failure(message.to_string()));
        self
    }

    /// Serves `content` for `download(segments)`.
    pub fn serve_file(&self, segments: &[&str], content: &[u8]) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.files.insert(segments.join("/"), content.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<(String, ApiRequest)> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Endpoint paths in call order.
    pub fn called_paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|(path, _)| path).collect()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(p, _)| p == path)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.state.lock().unwrap().downloads.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, path: &str, request: ApiRequest) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((path.to_string(), request.clone()));

        let specific = state.routes.iter().find(|route| {
            route.path == path
                && route
                    .matcher
                    .as_ref()
                    .is_some_and(|(k, v)| request_value(&request, k).as_deref() == Some(v))
        });
        let route = specific.or_else(|| {
            state
                .routes
                .iter()
                .find(|route| route.path == path && route.matcher.is_none())
        });

        match route.map(|r| r.reply.clone()) {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Failure(message)) => Err(RocketChatError::Upstream(message)),
            None => Err(RocketChatError::Upstream(format!("no route for {path}"))),
        }
    }

    async fn download(&self, segments: Vec<String>) -> Result<ByteStream> {
        let key = segments.join("/");
        let mut state = self.state.lock().unwrap();
        state.downloads.push(key.clone());
        let content = state
            .files
            .get(&key)
            .cloned()
            .ok_or_else(|| RocketChatError::Upstream("Download failed with status 404 Not Found".to_string()))?;

        // Two chunks so consumers exercise their streaming loop.
        let split = content.len() / 2;
        let chunks = vec![
            Ok(Bytes::copy_from_slice(&content[..split])),
            Ok(Bytes::copy_from_slice(&content[split..])),
        ];
        Ok(futures::stream::iter(chunks).boxed())
    }
}
