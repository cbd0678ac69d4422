//! Single-endpoint message operations (`chat.*`).

use rc_core::{decode, ApiRequest, Message, Result, RocketChatError};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::client::RocketChatClient;

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RocketChatError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

impl RocketChatClient {
    /// Posts `text` to `room_id`, optionally as a reply in the thread `thread_id`.
    #[instrument(skip(self, text))]
    pub async fn send_message(
        &self,
        room_id: &str,
        text: &str,
        thread_id: Option<&str>,
    ) -> Result<Message> {
        require(room_id, "room id")?;
        require(text, "message text")?;
        let mut body = json!({ "roomId": room_id, "text": text });
        if let Some(tmid) = thread_id {
            body["tmid"] = Value::from(tmid);
        }
        let response = self
            .transport
            .call("chat.postMessage", ApiRequest::post(body))
            .await?;
        let message: Message = decode::field(response, "message")?;
        info!(room_id = %room_id, message_id = %message.id, "step: message sent");
        Ok(message)
    }

    pub async fn get_message(&self, message_id: &str) -> Result<Message> {
        require(message_id, "message id")?;
        let response = self
            .transport
            .call("chat.getMessage", ApiRequest::get().query("msgId", message_id))
            .await?;
        decode::field(response, "message")
    }

    pub async fn update_message(&self, room_id: &str, message_id: &str, text: &str) -> Result<Message> {
        require(message_id, "message id")?;
        require(text, "message text")?;
        let body = json!({ "roomId": room_id, "msgId": message_id, "text": text });
        let response = self.transport.call("chat.update", ApiRequest::post(body)).await?;
        decode::field(response, "message")
    }

    pub async fn delete_message(&self, room_id: &str, message_id: &str) -> Result<()> {
        require(message_id, "message id")?;
        let body = json!({ "roomId": room_id, "msgId": message_id });
        self.transport.call("chat.delete", ApiRequest::post(body)).await?;
        info!(room_id = %room_id, message_id = %message_id, "step: message deleted");
        Ok(())
    }

    /// Adds (`add = true`) or removes a reaction. `emoji` may be given with or without colons.
    pub async fn react(&self, message_id: &str, emoji: &str, add: bool) -> Result<()> {
        require(message_id, "message id")?;
        require(emoji, "emoji")?;
        let body = json!({
            "messageId": message_id,
            "emoji": normalize_emoji(emoji),
            "shouldReact": add,
        });
        self.transport.call("chat.react", ApiRequest::post(body)).await?;
        Ok(())
    }

    pub async fn pin_message(&self, message_id: &str) -> Result<()> {
        self.message_action("chat.pinMessage", message_id).await
    }

    pub async fn unpin_message(&self, message_id: &str) -> Result<()> {
        self.message_action("chat.unPinMessage", message_id).await
    }

    pub async fn star_message(&self, message_id: &str) -> Result<()> {
        self.message_action("chat.starMessage", message_id).await
    }

    pub async fn unstar_message(&self, message_id: &str) -> Result<()> {
        self.message_action("chat.unStarMessage", message_id).await
    }

    /// Replies of the thread started by `thread_id`.
    pub async fn thread_messages(&self, thread_id: &str, count: u32) -> Result<Vec<Message>> {
        require(thread_id, "thread id")?;
        let request = ApiRequest::get().query("tmid", thread_id).query("count", count);
        let response = self.transport.call("chat.getThreadMessages", request).await?;
        decode::field_or_default(response, "messages")
    }

    async fn message_action(&self, endpoint: &str, message_id: &str) -> Result<()> {
        require(message_id, "message id")?;
        self.transport
            .call(endpoint, ApiRequest::post(json!({ "messageId": message_id })))
            .await?;
        info!(endpoint, message_id = %message_id, "step: message action done");
        Ok(())
    }
}

/// `smile` and `:smile:` both become `:smile:`.
pub fn normalize_emoji(emoji: &str) -> String {
    let name = emoji.trim().trim_matches(':');
    format!(":{name}:")
}
