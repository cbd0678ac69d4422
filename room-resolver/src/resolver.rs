//! [`RoomResolver`]: room-scoped calls without knowing the room kind up front.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rc_core::{
    decode, ApiRequest, Member, Message, Result, RocketChatError, Room, RoomCounters, RoomFile,
    RoomKind, Transport,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::chain::FallbackChain;
use crate::operation::RoomOperation;

/// References without spaces and longer than this are tried as ids first.
const ID_LIKE_MIN_LEN: usize = 16;

/// A value produced by whichever candidate succeeded, with the room kind that candidate implies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    pub kind: RoomKind,
    pub value: T,
}

impl<T> Resolved<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            kind: self.kind,
            value: f(self.value),
        }
    }

    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U>) -> Result<Resolved<U>> {
        Ok(Resolved {
            kind: self.kind,
            value: f(self.value)?,
        })
    }
}

/// Window of a history fetch. `count` is passed to the server as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub count: u32,
    pub offset: Option<u32>,
    pub latest: Option<DateTime<Utc>>,
    pub oldest: Option<DateTime<Utc>>,
}

impl HistoryQuery {
    /// The `count` most recent messages.
    pub fn recent(count: u32) -> Self {
        Self {
            count,
            offset: None,
            latest: None,
            oldest: None,
        }
    }

    fn to_request(self, room_id: &str) -> ApiRequest {
        ApiRequest::get()
            .query("roomId", room_id)
            .query("count", self.count)
            .query_opt("offset", self.offset)
            .query_opt("latest", self.latest.map(|t| t.to_rfc3339()))
            .query_opt("oldest", self.oldest.map(|t| t.to_rfc3339()))
    }
}

/// Pagination for member and file listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub count: u32,
    pub offset: u32,
}

impl Page {
    pub fn first(count: u32) -> Self {
        Self { count, offset: 0 }
    }

    fn to_request(self, room_id: &str) -> ApiRequest {
        ApiRequest::get()
            .query("roomId", room_id)
            .query("count", self.count)
            .query("offset", self.offset)
    }
}

/// Whether a room reference should be tried as an id before being tried as a name.
pub fn looks_like_room_id(reference: &str) -> bool {
    !reference.contains(' ') && reference.chars().count() >= ID_LIKE_MIN_LEN
}

/// Stateless over a shared transport; cheap to clone.
#[derive(Clone)]
pub struct RoomResolver {
    transport: Arc<dyn Transport>,
}

impl RoomResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Sends `request` to each candidate of `operation` in order; first success wins.
    pub async fn resolve(
        &self,
        operation: RoomOperation,
        request: ApiRequest,
    ) -> Result<Resolved<Value>> {
        let mut chain = FallbackChain::new(operation.describe());
        for candidate in operation.candidates() {
            let transport = Arc::clone(&self.transport);
            let request = request.clone();
            chain = chain.attempt(*candidate, move || async move {
                transport.call(candidate.endpoint, request).await
            });
        }

        let (candidate, value) = chain.run().await?;
        Ok(Resolved {
            kind: candidate.kind,
            value,
        })
    }

    #[instrument(skip(self))]
    pub async fn history(&self, room_id: &str, query: HistoryQuery) -> Result<Resolved<Vec<Message>>> {
        self.resolve(RoomOperation::History, query.to_request(room_id))
            .await?
            .try_map(|body| decode::field(body, "messages"))
    }

    #[instrument(skip(self))]
    pub async fn members(&self, room_id: &str, page: Page) -> Result<Resolved<Vec<Member>>> {
        self.resolve(RoomOperation::Members, page.to_request(room_id))
            .await?
            .try_map(|body| decode::field(body, "members"))
    }

    #[instrument(skip(self))]
    pub async fn files(&self, room_id: &str, page: Page) -> Result<Resolved<Vec<RoomFile>>> {
        self.resolve(RoomOperation::Files, page.to_request(room_id))
            .await?
            .try_map(|body| decode::field(body, "files"))
    }

    #[instrument(skip(self))]
    pub async fn counters(&self, room_id: &str) -> Result<Resolved<RoomCounters>> {
        let request = ApiRequest::get().query("roomId", room_id);
        self.resolve(RoomOperation::Counters, request)
            .await?
            .try_map(decode::body)
    }

    #[instrument(skip(self))]
    pub async fn invite(&self, room_id: &str, user_id: &str) -> Result<RoomKind> {
        let request = ApiRequest::post(json!({ "roomId": room_id, "userId": user_id }));
        let resolved = self.resolve(RoomOperation::Invite, request).await?;
        info!(room_id = %room_id, user_id = %user_id, kind = %resolved.kind, "step: user invited");
        Ok(resolved.kind)
    }

    #[instrument(skip(self))]
    pub async fn kick(&self, room_id: &str, user_id: &str) -> Result<RoomKind> {
        let request = ApiRequest::post(json!({ "roomId": room_id, "userId": user_id }));
        let resolved = self.resolve(RoomOperation::Kick, request).await?;
        info!(room_id = %room_id, user_id = %user_id, kind = %resolved.kind, "step: user removed");
        Ok(resolved.kind)
    }

    #[instrument(skip(self, announcement))]
    pub async fn set_announcement(&self, room_id: &str, announcement: &str) -> Result<RoomKind> {
        let request = ApiRequest::post(json!({ "roomId": room_id, "announcement": announcement }));
        Ok(self.resolve(RoomOperation::SetAnnouncement, request).await?.kind)
    }

    #[instrument(skip(self, description))]
    pub async fn set_description(&self, room_id: &str, description: &str) -> Result<RoomKind> {
        let request = ApiRequest::post(json!({ "roomId": room_id, "description": description }));
        Ok(self.resolve(RoomOperation::SetDescription, request).await?.kind)
    }

    /// Rooms the caller belongs to (`rooms.get`).
    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        let body = self.transport.call("rooms.get", ApiRequest::get()).await?;
        decode::field_or_default(body, "update")
    }

    /// Finds a room by id or name.
    ///
    /// Id-shaped references go through `channels.info`, `groups.info` and `rooms.info` by id
    /// first. Then `channels.info` and `groups.info` by name, and finally an exact,
    /// case-sensitive match on name or display name in the room list.
    #[instrument(skip(self))]
    pub async fn room_info(&self, reference: &str) -> Result<Room> {
        let mut chain: FallbackChain<'_, &'static str, Room> = FallbackChain::new("find room");

        if looks_like_room_id(reference) {
            for (endpoint, field) in [
                ("channels.info", "channel"),
                ("groups.info", "group"),
                ("rooms.info", "room"),
            ] {
                chain = chain.attempt(endpoint, move || {
                    self.info_lookup(endpoint, "roomId", reference, field)
                });
            }
        }

        for (endpoint, field) in [("channels.info", "channel"), ("groups.info", "group")] {
            chain = chain.attempt(endpoint, move || {
                self.info_lookup(endpoint, "roomName", reference, field)
            });
        }

        chain = chain.attempt("rooms.get", move || async move {
            self.list_rooms()
                .await?
                .into_iter()
                .find(|room| room.is_named(reference))
                .ok_or_else(|| RocketChatError::Upstream(format!("no room named {reference}")))
        });

        let (source, room) = chain.run().await?;
        info!(reference = %reference, room_id = %room.id, source = %source, "step: room found");
        Ok(room)
    }

    async fn info_lookup(
        &self,
        endpoint: &str,
        key: &str,
        reference: &str,
        field: &str,
    ) -> Result<Room> {
        let body = self
            .transport
            .call(endpoint, ApiRequest::get().query(key, reference))
            .await?;
        decode::field(body, field)
    }
}
