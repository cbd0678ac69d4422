//! # rc-analytics
//!
//! Client-side analytics for Rocket.Chat rooms. The analyses in [`messages`], [`files`] and
//! [`members`] are pure functions over fetched collections; [`Analytics`] fetches through the
//! [`RoomResolver`] and isolates failures per section or per room.

pub mod activity;
pub mod digest;
pub mod files;
pub mod members;
pub mod messages;
pub mod room;

use room_resolver::RoomResolver;

pub use activity::{is_authored_by, RoomActivity, UserActivity, DEFAULT_ROOM_SAMPLE};
pub use digest::{build_analysis_prompt, transcript, AnalysisKind, AnalysisRequest};
pub use files::{analyze_files, FileAnalysis, FileCategory};
pub use members::{analyze_members, MemberAnalysis, PresenceCounts};
pub use messages::{analyze_messages, analyze_messages_in, MessageAnalysis, MostActive};
pub use room::{RoomAnalytics, RoomAnalyticsOptions, RoomMetrics, DEFAULT_MESSAGE_SAMPLE};

/// Fetching side of the analytics; cheap to clone.
#[derive(Clone)]
pub struct Analytics {
    resolver: RoomResolver,
}

impl Analytics {
    pub fn new(resolver: RoomResolver) -> Self {
        Self { resolver }
    }
}

/// `part / whole` as a percentage with two decimals; 0 when `whole` is 0.
pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 10_000.0 / whole as f64).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(2, 2), 100.0);
    }
}
