//! Global search: messages, rooms and users searched independently and merged.

use rc_core::{decode, ApiRequest, Message, Result, Room, User};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::local::validate;
use crate::search::MessageSearch;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalResults {
    pub messages: Vec<Message>,
    pub rooms: Vec<Room>,
    pub users: Vec<User>,
}

/// Items returned per category, counted after `limit` is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalTotals {
    pub messages: usize,
    pub rooms: usize,
    pub users: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSearchResult {
    /// False only when all three categories failed.
    pub success: bool,
    pub query: String,
    pub results: GlobalResults,
    pub totals: GlobalTotals,
}

/// `users.list` query matching username or display name, case-insensitively.
pub fn user_query(text: &str) -> String {
    let pattern = regex::escape(text);
    json!({
        "$or": [
            {"username": {"$regex": pattern, "$options": "i"}},
            {"name": {"$regex": pattern, "$options": "i"}}
        ]
    })
    .to_string()
}

/// Rooms whose name, topic or description contains `query`, in room-list order.
pub fn matching_rooms(rooms: Vec<Room>, query: &str) -> Vec<Room> {
    let needle = query.to_lowercase();
    rooms
        .into_iter()
        .filter(|room| room.matches_text(&needle))
        .collect()
}

impl MessageSearch {
    /// Each category runs in its own failure domain; a failure leaves it empty with a zero total.
    #[instrument(skip(self))]
    pub async fn global_search(&self, query: &str, limit: usize) -> Result<GlobalSearchResult> {
        validate(query, limit)?;
        let mut results = GlobalResults::default();
        let mut totals = GlobalTotals::default();
        let mut failures = 0;

        match self.search(query, None, limit).await {
            Ok(messages) => {
                totals.messages = messages.len();
                results.messages = messages;
            }
            Err(e) => {
                failures += 1;
                warn!(error = %e, "step: message search failed");
            }
        }

        match self.resolver().list_rooms().await {
            Ok(rooms) => {
                let mut rooms = matching_rooms(rooms, query);
                rooms.truncate(limit);
                totals.rooms = rooms.len();
                results.rooms = rooms;
            }
            Err(e) => {
                failures += 1;
                warn!(error = %e, "step: room search failed");
            }
        }

        match self.search_users(query, limit).await {
            Ok(users) => {
                totals.users = users.len();
                results.users = users;
            }
            Err(e) => {
                failures += 1;
                warn!(error = %e, "step: user search failed");
            }
        }

        info!(
            messages = totals.messages,
            rooms = totals.rooms,
            users = totals.users,
            "step: global search done"
        );
        Ok(GlobalSearchResult {
            success: failures < 3,
            query: query.to_string(),
            results,
            totals,
        })
    }

    async fn search_users(&self, query: &str, limit: usize) -> Result<Vec<User>> {
        let request = ApiRequest::get()
            .query("query", user_query(query))
            .query("count", limit);
        let body = self.resolver().transport().call("users.list", request).await?;
        let mut users: Vec<User> = decode::field_or_default(body, "users")?;
        users.truncate(limit);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_query_escapes_regex() {
        let query: serde_json::Value = serde_json::from_str(&user_query("a.b")).unwrap();
        assert_eq!(query["$or"][0]["username"]["$regex"], "a\\.b");
        assert_eq!(query["$or"][1]["name"]["$options"], "i");
    }

    #[test]
    fn test_matching_rooms_checks_topic() {
        let rooms: Vec<Room> = serde_json::from_value(serde_json::json!([
            {"_id": "r1", "name": "general", "t": "c"},
            {"_id": "r2", "name": "ops", "t": "c", "topic": "Deploy train"},
            {"_id": "r3", "name": "random", "t": "p", "description": "nothing"}
        ]))
        .unwrap();
        let found = matching_rooms(rooms, "deploy");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "r2");
    }
}
