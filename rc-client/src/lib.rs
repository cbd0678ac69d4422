//! # rc-client
//!
//! [`RocketChatClient`] is the surface a tool-invocation layer calls: single-endpoint
//! message, room, user and file operations, plus delegation to the room resolver, search
//! and analytics crates. [`ClientConfig`] loads credentials and timeouts from the environment.

pub mod client;
pub mod config;
pub mod files;
pub mod messages;
pub mod rooms;

pub use client::RocketChatClient;
pub use config::ClientConfig;
pub use files::{guess_mime, DownloadedFile, UploadRequest};
pub use messages::normalize_emoji;
pub use rooms::{NewRoom, UserLookup};

pub use rc_analytics::{
    AnalysisKind, AnalysisRequest, RoomAnalyticsOptions, DEFAULT_MESSAGE_SAMPLE, DEFAULT_ROOM_SAMPLE,
};
pub use rc_core::{DateWindow, Result, RocketChatError};
pub use rc_search::{AdvancedSearchParams, MessageKindFilter, SortBy, SortOrder};
pub use room_resolver::{HistoryQuery, Page};
