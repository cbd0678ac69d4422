//! Local filtering primitives: pure functions over an already-fetched message collection.

use rc_core::{Message, Result, RocketChatError};

/// Default number of results when the caller gives none.
pub const DEFAULT_LIMIT: usize = 20;
/// Over-fetch factor for the room-scoped window.
const WINDOW_FACTOR: usize = 5;
/// Upper bound of the room-scoped window.
const WINDOW_MAX: usize = 200;

/// Messages fetched from one room to answer a search for `limit` results: `min(limit * 5, 200)`.
pub fn local_window(limit: usize) -> u32 {
    limit.saturating_mul(WINDOW_FACTOR).min(WINDOW_MAX) as u32
}

/// Rejects input that would make a search meaningless, before any request is made.
pub fn validate(query: &str, limit: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(RocketChatError::validation("search query must not be empty"));
    }
    if limit == 0 {
        return Err(RocketChatError::validation("limit must be greater than zero"));
    }
    Ok(())
}

/// Keeps messages whose text contains `query` case-insensitively, in input order.
pub fn matching_text(messages: Vec<Message>, query: &str) -> Vec<Message> {
    let needle = query.to_lowercase();
    messages
        .into_iter()
        .filter(|message| message.text_contains(&needle))
        .collect()
}

/// [`matching_text`] truncated to `limit`.
pub fn filter_by_text(messages: Vec<Message>, query: &str, limit: usize) -> Vec<Message> {
    let mut matches = matching_text(messages, query);
    matches.truncate(limit);
    matches
}

/// Most recent first. Stable, so equal timestamps keep their input order.
pub fn sort_newest_first(messages: &mut [Message]) {
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rc_core::MessageAuthor;

    fn message(id: &str, text: &str, minute: u32) -> Message {
        Message {
            id: id.to_string(),
            room_id: "ROOM".to_string(),
            text: text.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap(),
            author: MessageAuthor {
                id: "u1".to_string(),
                username: "alice".to_string(),
                name: None,
            },
            file: None,
            thread_id: None,
            reactions: Default::default(),
            pinned: false,
            starred: false,
            mentions: Vec::new(),
            system_type: None,
        }
    }

    fn sample() -> Vec<Message> {
        vec![
            message("m1", "hello world", 3),
            message("m2", "goodbye", 2),
            message("m3", "Hello there", 1),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_and_keeps_order() {
        let ids: Vec<String> = filter_by_text(sample(), "hello", 20)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["m1", "m3"]);
    }

    #[test]
    fn test_filter_respects_limit() {
        let matches = filter_by_text(sample(), "HELLO", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "m1");
    }

    #[test]
    fn test_window_is_bounded() {
        assert_eq!(local_window(20), 100);
        assert_eq!(local_window(40), 200);
        assert_eq!(local_window(1000), 200);
        assert_eq!(local_window(usize::MAX), 200);
    }

    #[test]
    fn test_validate() {
        assert!(validate("hello", 10).is_ok());
        assert!(matches!(validate("  ", 10), Err(RocketChatError::Validation(_))));
        assert!(matches!(validate("hello", 0), Err(RocketChatError::Validation(_))));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut messages = vec![message("a", "x", 1), message("b", "x", 5), message("c", "x", 3)];
        sort_newest_first(&mut messages);
        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
