//! Activity of one user across the caller's first rooms.

use chrono::{Local, Timelike};
use rc_core::{DateWindow, Message, Result};
use room_resolver::HistoryQuery;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::Analytics;

/// Rooms scanned for a user's activity.
pub const ACTIVITY_ROOM_LIMIT: usize = 10;
/// Messages sampled per room when the caller gives no sample size.
pub const DEFAULT_ROOM_SAMPLE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomActivity {
    pub room_id: String,
    pub room_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySplit {
    pub text: u64,
    pub file: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserActivity {
    pub user: String,
    #[serde(skip_serializing_if = "DateWindow::is_unbounded")]
    pub window: DateWindow,
    pub rooms_scanned: usize,
    pub total_messages: u64,
    /// Rooms where the user posted, in room-list order.
    pub rooms: Vec<RoomActivity>,
    pub by_type: ActivitySplit,
    /// Local hour of day.
    pub by_hour: [u64; 24],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_active_room: Option<RoomActivity>,
}

/// Matches on author id or username.
pub fn is_authored_by(message: &Message, user: &str) -> bool {
    message.author.id == user || message.author.username == user
}

impl Analytics {
    #[instrument(skip(self))]
    pub async fn user_activity(
        &self,
        user: &str,
        window: DateWindow,
        per_room_sample: u32,
    ) -> Result<UserActivity> {
        let rooms = self.resolver.list_rooms().await?;
        let mut activity = UserActivity {
            user: user.to_string(),
            window,
            rooms_scanned: 0,
            total_messages: 0,
            rooms: Vec::new(),
            by_type: ActivitySplit::default(),
            by_hour: [0; 24],
            most_active_room: None,
        };

        for room in rooms.iter().take(ACTIVITY_ROOM_LIMIT) {
            let history = match self
                .resolver
                .history(&room.id, HistoryQuery::recent(per_room_sample))
                .await
            {
                Ok(history) => history.value,
                Err(e) => {
                    debug!(room_id = %room.id, error = %e, "step: room skipped");
                    continue;
                }
            };
            activity.rooms_scanned += 1;

            let mut count = 0;
            for message in history
                .iter()
                .filter(|m| is_authored_by(m, user) && window.contains(m.timestamp))
            {
                count += 1;
                if message.file.is_some() {
                    activity.by_type.file += 1;
                } else {
                    activity.by_type.text += 1;
                }
                let hour = message.timestamp.with_timezone(&Local).hour();
                activity.by_hour[hour as usize] += 1;
            }

            if count > 0 {
                activity.total_messages += count;
                activity.rooms.push(RoomActivity {
                    room_id: room.id.clone(),
                    room_name: room.label().to_string(),
                    count,
                });
            }
        }

        activity.most_active_room = activity
            .rooms
            .iter()
            .fold(None, |best: Option<&RoomActivity>, room| match best {
                Some(b) if b.count >= room.count => Some(b),
                _ => Some(room),
            })
            .cloned();

        info!(
            user = %user,
            rooms_scanned = activity.rooms_scanned,
            total = activity.total_messages,
            "step: user activity done"
        );
        Ok(activity)
    }
}
