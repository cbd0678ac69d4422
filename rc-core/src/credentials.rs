//! Static credentials for the Rocket.Chat REST API.

use std::fmt;

/// Masks a token for safe logging: first 7 chars + "***" + last 4 chars.
/// Tokens of 11 characters or fewer become "***" so no part of them leaks.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// Server base URL, user id and personal access token.
///
/// Immutable once built; shared by `Arc` with the transport. `Debug` masks the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    server_url: String,
    user_id: String,
    auth_token: String,
}

impl Credentials {
    /// Trailing slashes are stripped from `server_url` so paths can be appended directly.
    pub fn new(
        server_url: impl Into<String>,
        user_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            server_url,
            user_id: user_id.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// REST endpoint URL, e.g. `https://chat.example.com/api/v1/channels.history`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.server_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server_url", &self.server_url)
            .field("user_id", &self.user_id)
            .field("auth_token", &mask_token(&self.auth_token))
            .finish()
    }
}
