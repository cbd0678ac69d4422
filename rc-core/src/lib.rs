//! # rc-core
//!
//! Core pieces shared by every Rocket.Chat crate in the workspace: [`Credentials`], the domain
//! types ([`Message`], [`Room`], [`Member`], [`RoomFile`], ...), the [`RocketChatError`]
//! taxonomy, the [`Transport`] trait with its reqwest implementation [`HttpTransport`], and
//! tracing initialization.

pub mod credentials;
pub mod decode;
pub mod error;
pub mod http;
pub mod logger;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[cfg(test)]
mod http_test;

pub use credentials::{mask_token, Credentials};
pub use error::{Result, RocketChatError};
pub use http::{HttpTransport, HttpTransportOptions};
pub use logger::{init_tracing, log_file_from_env, DEFAULT_LOG_FILE};
pub use transport::{ApiRequest, ByteStream, HttpMethod, RequestBody, Transport, UploadForm};
pub use types::{
    download_path, download_segments, DateWindow, FileRef, FileUploader, Member, Mention, Message, MessageAuthor, Presence, Reaction, Room,
    RoomCounters, RoomFile, RoomKind, UploadedFile, User, SYSTEM_USERNAME,
};
