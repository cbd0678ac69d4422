//! Member analysis: presence buckets, roles and recent joins.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rc_core::{Member, Presence};
use serde::Serialize;

use crate::percentage;

/// Members whose join date falls within this many days before `now` count as recent.
pub const RECENT_JOIN_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PresenceCounts {
    pub online: u64,
    pub away: u64,
    pub busy: u64,
    pub offline: u64,
}

impl PresenceCounts {
    fn record(&mut self, presence: Presence) {
        match presence {
            Presence::Online => self.online += 1,
            Presence::Away => self.away += 1,
            Presence::Busy => self.busy += 1,
            Presence::Offline => self.offline += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAnalysis {
    pub total: u64,
    pub by_status: PresenceCounts,
    /// A member holding several roles is counted once per role.
    pub by_role: BTreeMap<String, u64>,
    pub recent_joins: u64,
    pub online_percentage: f64,
}

pub fn analyze_members(members: &[Member], now: DateTime<Utc>) -> MemberAnalysis {
    let since = now - Duration::days(RECENT_JOIN_DAYS);
    let mut by_status = PresenceCounts::default();
    let mut by_role = BTreeMap::new();
    let mut recent_joins = 0;

    for member in members {
        by_status.record(member.presence());
        for role in &member.roles {
            *by_role.entry(role.clone()).or_insert(0) += 1;
        }
        if member
            .created_at
            .is_some_and(|joined| joined >= since && joined <= now)
        {
            recent_joins += 1;
        }
    }

    let total = members.len() as u64;
    MemberAnalysis {
        total,
        by_status,
        by_role,
        recent_joins,
        online_percentage: percentage(by_status.online, total),
    }
}
