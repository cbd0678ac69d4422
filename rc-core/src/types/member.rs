//! Room members and user profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Presence buckets used by member analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Away,
    Busy,
    Offline,
}

impl Presence {
    /// Unknown or missing status is treated as offline.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("online") => Self::Online,
            Some("away") => Self::Away,
            Some("busy") => Self::Busy,
            _ => Self::Offline,
        }
    }
}

/// Entry of `*.members`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Used as the join date by member analysis.
    #[serde(
        rename = "createdAt",
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn presence(&self) -> Presence {
        Presence::from_status(self.status.as_deref())
    }
}

/// User as returned by `users.info`, `users.list` and `me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_offline() {
        assert_eq!(Presence::from_status(Some("online")), Presence::Online);
        assert_eq!(Presence::from_status(Some("busy")), Presence::Busy);
        assert_eq!(Presence::from_status(Some("invisible")), Presence::Offline);
        assert_eq!(Presence::from_status(None), Presence::Offline);
    }

    #[test]
    fn test_member_deserialize() {
        let member: Member = serde_json::from_str(
            r#"{"_id":"u1","username":"alice","status":"away","roles":["user","admin"],"createdAt":"2024-01-05T08:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(member.presence(), Presence::Away);
        assert_eq!(member.roles.len(), 2);
        assert!(member.created_at.is_some());
    }
}
