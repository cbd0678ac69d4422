use anyhow::{Context, Result};
use rc_core::{log_file_from_env, mask_token, Credentials, HttpTransportOptions};
use std::env;
use std::fmt;
use std::time::Duration;

pub use rc_core::DEFAULT_LOG_FILE;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client configuration, loaded from environment variables.
#[derive(Clone)]
pub struct ClientConfig {
    server_url: String,
    user_id: String,
    auth_token: String,
    log_file: String,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
}

impl ClientConfig {
    /// Reads `ROCKETCHAT_URL`, `ROCKETCHAT_USER_ID` and `ROCKETCHAT_AUTH_TOKEN` (required),
    /// plus the optional log file and timeout variables.
    pub fn load() -> Result<Self> {
        let server_url = required("ROCKETCHAT_URL")?;
        let user_id = required("ROCKETCHAT_USER_ID")?;
        let auth_token = required("ROCKETCHAT_AUTH_TOKEN")?;
        let log_file = log_file_from_env();
        let connect_timeout_secs =
            secs("ROCKETCHAT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let request_timeout_secs =
            secs("ROCKETCHAT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            server_url,
            user_id,
            auth_token,
            log_file,
            connect_timeout_secs,
            request_timeout_secs,
        })
    }

    /// Explicit values with default log file and timeouts.
    pub fn new(
        server_url: impl Into<String>,
        user_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            user_id: user_id.into(),
            auth_token: auth_token.into(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.server_url)
            .with_context(|| format!("ROCKETCHAT_URL is not a valid URL: {}", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("ROCKETCHAT_URL must use http or https: {}", self.server_url);
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("ROCKETCHAT_REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.server_url, &self.user_id, &self.auth_token)
    }

    pub fn transport_options(&self) -> HttpTransportOptions {
        HttpTransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
    pub fn log_file(&self) -> &str {
        &self.log_file
    }
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
    }
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    pub fn with_log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = log_file.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("user_id", &self.user_id)
            .field("auth_token", &mask_token(&self.auth_token))
            .field("log_file", &self.log_file)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn required(key: &str) -> Result<String> {
    let value = env::var(key).with_context(|| format!("{key} not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{key} is empty");
    }
    Ok(value)
}

fn secs(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
