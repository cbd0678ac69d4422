use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional inclusive time bounds used by search filters and analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Both ends inclusive.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bounds_are_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let window = DateWindow::new(Some(from), Some(to));
        assert!(window.contains(from));
        assert!(window.contains(to));
        assert!(!window.contains(to + chrono::Duration::seconds(1)));
        assert!(DateWindow::default().contains(from));
        assert!(DateWindow::default().is_unbounded());
    }
}
