//! Single-endpoint room and user operations.

use rc_core::{decode, ApiRequest, Result, RocketChatError, Room, User};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::client::RocketChatClient;

/// Parameters of `channels.create` / `groups.create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub members: Vec<String>,
    pub read_only: bool,
    /// Private group instead of public channel.
    pub private: bool,
}

impl NewRoom {
    pub fn channel(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private: true,
            ..Self::default()
        }
    }
}

/// How a user is looked up by `users.info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookup<'a> {
    Id(&'a str),
    Username(&'a str),
}

#[derive(Deserialize)]
struct TopicResponse {
    #[serde(default)]
    topic: String,
}

impl RocketChatClient {
    /// Sets a public channel's topic and returns the topic the server stored.
    pub async fn set_topic(&self, room_id: &str, topic: &str) -> Result<String> {
        let body = json!({ "roomId": room_id, "topic": topic });
        let response = self.transport.call("channels.setTopic", ApiRequest::post(body)).await?;
        let stored: TopicResponse = decode::body(response)?;
        Ok(stored.topic)
    }

    #[instrument(skip(self), fields(name = %room.name))]
    pub async fn create_room(&self, room: &NewRoom) -> Result<Room> {
        if room.name.trim().is_empty() || room.name.contains(' ') {
            return Err(RocketChatError::validation(
                "room name must be non-empty and contain no spaces",
            ));
        }
        let (endpoint, field) = if room.private {
            ("groups.create", "group")
        } else {
            ("channels.create", "channel")
        };
        let body = json!({
            "name": room.name,
            "members": room.members,
            "readOnly": room.read_only,
        });
        let response = self.transport.call(endpoint, ApiRequest::post(body)).await?;
        let created: Room = decode::field(response, field)?;
        info!(room_id = %created.id, endpoint, "step: room created");
        Ok(created)
    }

    /// Opens (or returns the existing) direct-message room with `username`.
    pub async fn open_direct_message(&self, username: &str) -> Result<Room> {
        if username.trim().is_empty() {
            return Err(RocketChatError::validation("username must not be empty"));
        }
        let body = json!({ "username": username.trim_start_matches('@') });
        let response = self.transport.call("im.create", ApiRequest::post(body)).await?;
        decode::field(response, "room")
    }

    pub async fn user_info(&self, lookup: UserLookup<'_>) -> Result<User> {
        let request = match lookup {
            UserLookup::Id(id) => ApiRequest::get().query("userId", id),
            UserLookup::Username(name) => {
                ApiRequest::get().query("username", name.trim_start_matches('@'))
            }
        };
        let response = self.transport.call("users.info", request).await?;
        decode::field(response, "user")
    }

    /// The authenticated user.
    pub async fn me(&self) -> Result<User> {
        let response = self.transport.call("me", ApiRequest::get()).await?;
        decode::body(response)
    }
}
