//! Rooms, room kinds and room counters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// The three endpoint families a room can live under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    PublicChannel,
    PrivateGroup,
    DirectMessage,
}

impl RoomKind {
    /// Maps the server's one-letter room type (`c`, `p`, `d`). Other types have no kind.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "c" => Some(Self::PublicChannel),
            "p" => Some(Self::PrivateGroup),
            "d" => Some(Self::DirectMessage),
            _ => None,
        }
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PublicChannel => "public channel",
            Self::PrivateGroup => "private group",
            Self::DirectMessage => "direct message",
        };
        f.write_str(label)
    }
}

/// Room as returned by `rooms.get`, `rooms.info`, `channels.info` and `groups.info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "fname", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// One-letter room type code.
    #[serde(rename = "t", default)]
    pub kind_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
    #[serde(rename = "usersCount", default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
    #[serde(rename = "msgs", default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
    #[serde(rename = "ro", default)]
    pub read_only: bool,
}

impl Room {
    pub fn kind(&self) -> Option<RoomKind> {
        RoomKind::from_code(&self.kind_code)
    }

    /// Best label for humans: display name, then name, then id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Case-sensitive exact match on name or display name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name) || self.display_name.as_deref() == Some(name)
    }

    /// Case-insensitive substring match on name, topic and description.
    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        [&self.name, &self.topic, &self.description]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

/// Unread/message counters for the calling user in one room (`*.counters`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCounters {
    #[serde(default, deserialize_with = "timestamp::null_as_default")]
    pub joined: bool,
    #[serde(default, deserialize_with = "timestamp::null_as_default")]
    pub members: u64,
    #[serde(default, deserialize_with = "timestamp::null_as_default")]
    pub unreads: u64,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub unreads_from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::null_as_default")]
    pub msgs: u64,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub latest: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::null_as_default")]
    pub user_mentions: u64,
}
