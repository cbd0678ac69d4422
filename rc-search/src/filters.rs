//! Advanced search parameters and the predicate stages applied after text matching.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rc_core::{DateWindow, Message, RocketChatError};
use serde::{Deserialize, Serialize};

use crate::local::DEFAULT_LIMIT;

/// Message classifier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKindFilter {
    /// Has at least one mention.
    Mentions,
    Starred,
    Pinned,
}

impl MessageKindFilter {
    pub fn matches(self, message: &Message) -> bool {
        match self {
            Self::Mentions => !message.mentions.is_empty(),
            Self::Starred => message.starred,
            Self::Pinned => message.pinned,
        }
    }
}

impl FromStr for MessageKindFilter {
    type Err = RocketChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentions" => Ok(Self::Mentions),
            "starred" => Ok(Self::Starred),
            "pinned" => Ok(Self::Pinned),
            other => Err(RocketChatError::validation(format!(
                "unknown message type filter {other:?} (expected mentions, starred or pinned)"
            ))),
        }
    }
}

/// `Relevance` is accepted but there is no relevance scoring: results keep window order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Timestamp,
    Relevance,
}

impl FromStr for SortBy {
    type Err = RocketChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timestamp" => Ok(Self::Timestamp),
            "relevance" => Ok(Self::Relevance),
            other => Err(RocketChatError::validation(format!(
                "unknown sort {other:?} (expected timestamp or relevance)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = RocketChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(RocketChatError::validation(format!(
                "unknown sort order {other:?} (expected asc or desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSearchParams {
    pub query: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_type: Option<MessageKindFilter>,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl AdvancedSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            room_id: None,
            user_id: None,
            date_from: None,
            date_to: None,
            message_type: None,
            sort_by: None,
            sort_order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Echo of the filters that actually take effect; empty strings count as absent and a
    /// relevance sort, which is never applied, is left out.
    pub fn applied(&self) -> AppliedFilters {
        AppliedFilters {
            room_id: non_empty(&self.room_id),
            user_id: non_empty(&self.user_id),
            date_from: self.date_from,
            date_to: self.date_to,
            message_type: self.message_type,
            sort_by: self.sort_by.filter(|s| *s == SortBy::Timestamp),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageKindFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl AppliedFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Inclusive date bounds of the filter.
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.date_from, self.date_to)
    }
}

/// Runs the predicate stages in order: author, date from, date to, message type.
pub fn apply_filters(messages: Vec<Message>, filters: &AppliedFilters) -> Vec<Message> {
    let window = filters.window();
    messages
        .into_iter()
        .filter(|m| {
            filters
                .user_id
                .as_deref()
                .map_or(true, |user_id| m.author.id == user_id)
        })
        .filter(|m| window.contains(m.timestamp))
        .filter(|m| filters.message_type.map_or(true, |kind| kind.matches(m)))
        .collect()
}

/// Sorts by timestamp when asked to; returns whether a sort was applied.
pub fn apply_sort(messages: &mut [Message], sort_by: Option<SortBy>, order: SortOrder) -> bool {
    match sort_by {
        Some(SortBy::Timestamp) => {
            match order {
                SortOrder::Asc => messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
                SortOrder::Desc => messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            }
            true
        }
        Some(SortBy::Relevance) | None => false,
    }
}
