//! [`MessageSearch`]: keyword and advanced search.
//!
//! Room-scoped searches filter a bounded history window locally and fall back to the server's
//! `chat.search`. Unscoped searches ask `chat.search` first and fall back to a bounded sweep of
//! the caller's first rooms.

use rc_core::{decode, ApiRequest, Message, Result, RocketChatError};
use room_resolver::{HistoryQuery, RoomResolver};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::filters::{apply_filters, apply_sort, AdvancedSearchParams, AppliedFilters};
use crate::local::{local_window, matching_text, sort_newest_first, validate};

/// Rooms visited by the cross-room fallback.
pub const CROSS_ROOM_LIMIT: usize = 5;
/// Messages fetched per room by the cross-room fallback.
pub const PER_ROOM_WINDOW: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub query: String,
    pub messages: Vec<Message>,
    /// Matches after filtering, before truncation to the limit.
    pub total: usize,
    pub filters: AppliedFilters,
    /// False when no sort was requested or the requested sort is not supported (relevance).
    pub sort_applied: bool,
}

#[derive(Clone)]
pub struct MessageSearch {
    resolver: RoomResolver,
}

impl MessageSearch {
    pub fn new(resolver: RoomResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RoomResolver {
        &self.resolver
    }

    /// Messages containing `query` (case-insensitive), at most `limit`.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        room_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Message>> {
        validate(query, limit)?;
        let mut messages = self.candidates(query, room_id, limit, limit).await?;
        messages.truncate(limit);
        info!(query = %query, results = messages.len(), "step: search done");
        Ok(messages)
    }

    /// Text match, then author, date and type filters, then optional timestamp sort.
    #[instrument(skip(self, params), fields(query = %params.query))]
    pub async fn advanced_search(&self, params: &AdvancedSearchParams) -> Result<SearchResultSet> {
        validate(&params.query, params.limit)?;
        let filters = params.applied();

        let candidates = self
            .candidates(
                &params.query,
                filters.room_id.as_deref(),
                params.limit,
                local_window(params.limit) as usize,
            )
            .await?;
        let mut messages = apply_filters(candidates, &filters);
        let sort_applied = apply_sort(&mut messages, params.sort_by, params.sort_order);
        let total = messages.len();
        messages.truncate(params.limit);

        info!(total, returned = messages.len(), sort_applied, "step: advanced search done");
        Ok(SearchResultSet {
            query: params.query.clone(),
            messages,
            total,
            filters,
            sort_applied,
        })
    }

    /// All text matches from the local window or its fallback, untruncated.
    async fn candidates(
        &self,
        query: &str,
        room_id: Option<&str>,
        limit: usize,
        server_count: usize,
    ) -> Result<Vec<Message>> {
        match room_id {
            Some(room_id) => self.scoped(query, room_id, limit, server_count).await,
            None => self.unscoped(query, server_count).await,
        }
    }

    async fn scoped(
        &self,
        query: &str,
        room_id: &str,
        limit: usize,
        server_count: usize,
    ) -> Result<Vec<Message>> {
        let window = HistoryQuery::recent(local_window(limit));
        let local_err = match self.resolver.history(room_id, window).await {
            Ok(history) => return Ok(matching_text(history.value, query)),
            Err(e) => e,
        };
        warn!(room_id = %room_id, error = %local_err, "step: history window failed, using server search");

        self.server_search(query, Some(room_id), server_count)
            .await
            .map_err(|server_err| RocketChatError::Search {
                local: local_err.to_string(),
                server: server_err.to_string(),
            })
    }

    async fn unscoped(&self, query: &str, server_count: usize) -> Result<Vec<Message>> {
        let server_err = match self.server_search(query, None, server_count).await {
            Ok(messages) => return Ok(messages),
            Err(e) => e,
        };
        warn!(error = %server_err, "step: server search failed, sweeping rooms");

        self.cross_room(query)
            .await
            .map_err(|local_err| RocketChatError::Search {
                local: local_err.to_string(),
                server: server_err.to_string(),
            })
    }

    async fn server_search(
        &self,
        query: &str,
        room_id: Option<&str>,
        count: usize,
    ) -> Result<Vec<Message>> {
        let request = ApiRequest::get()
            .query_opt("roomId", room_id)
            .query("searchText", query)
            .query("count", count);
        let body = self.resolver.transport().call("chat.search", request).await?;
        decode::field_or_default(body, "messages")
    }

    /// Text matches across the first rooms of the room list, newest first. Failing rooms are skipped.
    async fn cross_room(&self, query: &str) -> Result<Vec<Message>> {
        let rooms = self.resolver.list_rooms().await?;
        let mut found = Vec::new();
        for room in rooms.iter().take(CROSS_ROOM_LIMIT) {
            match self
                .resolver
                .history(&room.id, HistoryQuery::recent(PER_ROOM_WINDOW))
                .await
            {
                Ok(history) => found.extend(matching_text(history.value, query)),
                Err(e) => debug!(room_id = %room.id, error = %e, "step: room skipped"),
            }
        }
        sort_newest_first(&mut found);
        Ok(found)
    }
}
