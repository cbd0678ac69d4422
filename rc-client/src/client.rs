//! [`RocketChatClient`]: the single entry point a tool layer talks to.

use std::sync::Arc;

use rc_analytics::{
    build_analysis_prompt, AnalysisRequest, Analytics, RoomAnalytics, RoomAnalyticsOptions,
    UserActivity,
};
use rc_core::{
    DateWindow, HttpTransport, Member, Message, Result, Room, RoomCounters, RoomFile, RoomKind,
    Transport,
};
use rc_search::{AdvancedSearchParams, GlobalSearchResult, MessageSearch, SearchResultSet};
use room_resolver::{HistoryQuery, Page, Resolved, RoomResolver};
use tracing::info;

use crate::config::ClientConfig;

/// Cheap to clone; every clone shares the same transport.
#[derive(Clone)]
pub struct RocketChatClient {
    pub(crate) transport: Arc<dyn Transport>,
    resolver: RoomResolver,
    search: MessageSearch,
    analytics: Analytics,
}

impl RocketChatClient {
    /// Builds an HTTP-backed client from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.credentials(), config.transport_options())?;
        info!(server = %config.server_url(), "step: client ready");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let resolver = RoomResolver::new(Arc::clone(&transport));
        Self {
            transport,
            search: MessageSearch::new(resolver.clone()),
            analytics: Analytics::new(resolver.clone()),
            resolver,
        }
    }

    pub fn resolver(&self) -> &RoomResolver {
        &self.resolver
    }

    // --- Room-scoped operations (kind resolved by fallback) ---

    pub async fn room_messages(
        &self,
        room_id: &str,
        query: HistoryQuery,
    ) -> Result<Resolved<Vec<Message>>> {
        self.resolver.history(room_id, query).await
    }

    pub async fn room_members(&self, room_id: &str, page: Page) -> Result<Resolved<Vec<Member>>> {
        self.resolver.members(room_id, page).await
    }

    pub async fn room_files(&self, room_id: &str, page: Page) -> Result<Resolved<Vec<RoomFile>>> {
        self.resolver.files(room_id, page).await
    }

    pub async fn room_counters(&self, room_id: &str) -> Result<Resolved<RoomCounters>> {
        self.resolver.counters(room_id).await
    }

    pub async fn invite_user(&self, room_id: &str, user_id: &str) -> Result<RoomKind> {
        self.resolver.invite(room_id, user_id).await
    }

    pub async fn remove_user(&self, room_id: &str, user_id: &str) -> Result<RoomKind> {
        self.resolver.kick(room_id, user_id).await
    }

    pub async fn set_announcement(&self, room_id: &str, announcement: &str) -> Result<RoomKind> {
        self.resolver.set_announcement(room_id, announcement).await
    }

    pub async fn set_description(&self, room_id: &str, description: &str) -> Result<RoomKind> {
        self.resolver.set_description(room_id, description).await
    }

    pub async fn room_info(&self, reference: &str) -> Result<Room> {
        self.resolver.room_info(reference).await
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.resolver.list_rooms().await
    }

    // --- Search ---

    pub async fn search_messages(
        &self,
        query: &str,
        room_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Message>> {
        self.search.search(query, room_id, limit).await
    }

    pub async fn advanced_search(&self, params: &AdvancedSearchParams) -> Result<SearchResultSet> {
        self.search.advanced_search(params).await
    }

    pub async fn global_search(&self, query: &str, limit: usize) -> Result<GlobalSearchResult> {
        self.search.global_search(query, limit).await
    }

    // --- Analytics ---

    pub async fn room_analytics(
        &self,
        room_id: &str,
        options: RoomAnalyticsOptions,
    ) -> Result<RoomAnalytics> {
        self.analytics.room_analytics(room_id, options).await
    }

    pub async fn user_activity(
        &self,
        user: &str,
        window: DateWindow,
        per_room_sample: u32,
    ) -> Result<UserActivity> {
        self.analytics.user_activity(user, window, per_room_sample).await
    }

    /// Transcript of the room's recent history plus the analysis instruction.
    /// The request is validated before any history is fetched.
    pub async fn analysis_prompt(
        &self,
        room_id: &str,
        request: &AnalysisRequest,
        count: u32,
    ) -> Result<String> {
        request.validate()?;
        let history = self.resolver.history(room_id, HistoryQuery::recent(count)).await?;
        build_analysis_prompt(&history.value, request)
    }
}
