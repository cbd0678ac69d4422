//! Room analytics: counters, messages, files and members, each in its own failure domain.

use chrono::Utc;
use rc_core::{DateWindow, Result, RoomCounters, RoomKind};
use room_resolver::{HistoryQuery, Page};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::files::{analyze_files, FileAnalysis};
use crate::members::{analyze_members, MemberAnalysis};
use crate::messages::{analyze_messages, MessageAnalysis};
use crate::Analytics;

/// History window analyzed when the caller gives none.
pub const DEFAULT_MESSAGE_SAMPLE: u32 = 100;
/// Page size for the file and member listings.
pub const LISTING_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomAnalyticsOptions {
    pub message_sample: u32,
    pub window: DateWindow,
    pub include_messages: bool,
    pub include_files: bool,
    pub include_members: bool,
}

impl Default for RoomAnalyticsOptions {
    fn default() -> Self {
        Self {
            message_sample: DEFAULT_MESSAGE_SAMPLE,
            window: DateWindow::default(),
            include_messages: true,
            include_files: true,
            include_members: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAnalytics {
    /// False only when every attempted section failed.
    pub success: bool,
    pub room_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_kind: Option<RoomKind>,
    pub metrics: RoomMetrics,
}

/// Per-section results; a section that failed or was switched off is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<RoomCounters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<MessageAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FileAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<MemberAnalysis>,
}

/// Tracks which sections were attempted and which succeeded.
#[derive(Default)]
struct Sections {
    attempted: u32,
    succeeded: u32,
    kind: Option<RoomKind>,
}

impl Sections {
    fn keep<T>(&mut self, section: &str, room_id: &str, outcome: Result<(RoomKind, T)>) -> Option<T> {
        self.attempted += 1;
        match outcome {
            Ok((kind, value)) => {
                self.succeeded += 1;
                self.kind.get_or_insert(kind);
                Some(value)
            }
            Err(e) => {
                warn!(room_id = %room_id, section, error = %e, "step: section omitted");
                None
            }
        }
    }
}

impl Analytics {
    #[instrument(skip(self, options))]
    pub async fn room_analytics(
        &self,
        room_id: &str,
        options: RoomAnalyticsOptions,
    ) -> Result<RoomAnalytics> {
        let mut sections = Sections::default();

        let counters = self
            .resolver
            .counters(room_id)
            .await
            .map(|r| (r.kind, r.value));
        let counters = sections.keep("counters", room_id, counters);

        let messages = if options.include_messages {
            let outcome = self
                .resolver
                .history(room_id, HistoryQuery::recent(options.message_sample))
                .await
                .map(|r| (r.kind, analyze_messages(&r.value, options.window)));
            sections.keep("messages", room_id, outcome)
        } else {
            None
        };

        let files = if options.include_files {
            let outcome = self
                .resolver
                .files(room_id, Page::first(LISTING_PAGE))
                .await
                .map(|r| (r.kind, analyze_files(&r.value)));
            sections.keep("files", room_id, outcome)
        } else {
            None
        };

        let members = if options.include_members {
            let outcome = self
                .resolver
                .members(room_id, Page::first(LISTING_PAGE))
                .await
                .map(|r| (r.kind, analyze_members(&r.value, Utc::now())));
            sections.keep("members", room_id, outcome)
        } else {
            None
        };

        info!(
            room_id = %room_id,
            attempted = sections.attempted,
            succeeded = sections.succeeded,
            "step: room analytics done"
        );
        Ok(RoomAnalytics {
            success: sections.succeeded > 0,
            room_id: room_id.to_string(),
            room_kind: sections.kind,
            metrics: RoomMetrics {
                counters,
                messages,
                files,
                members,
            },
        })
    }
}
