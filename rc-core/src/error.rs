use thiserror::Error;

/// Every failure a public operation can report. `Display` is always a single human-readable line.
#[derive(Error, Debug)]
pub enum RocketChatError {
    /// Every candidate endpoint of a fallback chain failed. Candidate errors are not carried.
    #[error("Unable to {operation} - room not found or no access")]
    Resolution { operation: String },

    /// The server answered with a non-success response; its own error text is kept verbatim.
    #[error("{0}")]
    Upstream(String),

    /// Malformed caller input, detected before any request is sent.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Both the local-filter path and the server search endpoint failed.
    #[error("Search failed: local filtering: {local}; server search: {server}")]
    Search { local: String, server: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RocketChatError {
    pub fn resolution(operation: impl Into<String>) -> Self {
        Self::Resolution {
            operation: operation.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RocketChatError>;
