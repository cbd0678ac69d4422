//! Chat messages as delivered by `*.history`, `chat.search` and `chat.getMessage`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Username of the platform's system account; its messages count as `system` in analytics.
pub const SYSTEM_USERNAME: &str = "rocket.cat";

/// Author reference carried on every message (`u`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// File attached to a message. Download needs both `id` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub usernames: Vec<String>,
}

/// A single chat message. The client only reads and filters copies of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "rid", default)]
    pub room_id: String,
    #[serde(rename = "msg", default)]
    pub text: String,
    #[serde(rename = "ts", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "u")]
    pub author: MessageAuthor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
    /// Parent message id when the message belongs to a thread.
    #[serde(rename = "tmid", default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reactions: BTreeMap<String, Reaction>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, deserialize_with = "timestamp::flag_or_list")]
    pub starred: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<Mention>,
    /// Server-side system message type (`uj`, `ru`, ...); absent for user messages.
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
}

impl Message {
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn is_from_system(&self) -> bool {
        self.author.username == SYSTEM_USERNAME
    }

    /// Case-insensitive substring match on the message text.
    pub fn text_contains(&self, needle_lowercase: &str) -> bool {
        self.text.to_lowercase().contains(needle_lowercase)
    }
}
