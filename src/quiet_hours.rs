//! Night-mode window during which the board stays dark.

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Utc};
use serde::Deserialize;

/// A daily `[start, end)` window in board-local time. When `end` is earlier
/// than `start` the window wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuietHours {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: true,
            start: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(3, 30, 0).unwrap_or_default(),
        }
    }
}

impl QuietHours {
    /// Whether the local wall time `local` falls inside the window.
    /// Only hours and minutes are compared.
    pub fn contains(&self, local: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }

        let minute_of_day = |t: NaiveTime| t.hour() * 60 + t.minute();
        let (now, start, end) = (
            minute_of_day(local),
            minute_of_day(self.start),
            minute_of_day(self.end),
        );

        if start <= end {
            start <= now && now < end
        } else {
            now >= start || now < end
        }
    }

    /// [`contains`](Self::contains) for a UTC instant viewed at `offset`.
    pub fn contains_at(&self, now: DateTime<Utc>, offset: FixedOffset) -> bool {
        self.contains(now.with_timezone(&offset).time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_wrapping_window() {
        let q = QuietHours::default();
        assert!(q.contains(t(20, 0)));
        assert!(q.contains(t(23, 59)));
        assert!(q.contains(t(0, 0)));
        assert!(q.contains(t(3, 29)));
        assert!(!q.contains(t(3, 30)));
        assert!(!q.contains(t(12, 0)));
        assert!(!q.contains(t(19, 59)));
    }

    #[test]
    fn test_same_day_window() {
        let q = QuietHours {
            enabled: true,
            start: t(1, 0),
            end: t(5, 0),
        };
        assert!(q.contains(t(1, 0)));
        assert!(q.contains(t(4, 59)));
        assert!(!q.contains(t(5, 0)));
        assert!(!q.contains(t(0, 30)));
    }

    #[test]
    fn test_disabled_never_quiet() {
        let q = QuietHours {
            enabled: false,
            ..Default::default()
        };
        assert!(!q.contains(t(23, 0)));
    }

    #[test]
    fn test_contains_at_applies_offset() {
        let q = QuietHours::default();
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        // 02:00 UTC is 21:00 EST the previous evening
        let now = DateTime::from_timestamp(1_734_832_800, 0).unwrap();
        assert_eq!(now.time(), t(2, 0));
        assert!(q.contains_at(now, est));
        // 17:00 UTC is noon EST
        let noon = DateTime::from_timestamp(1_734_886_800, 0).unwrap();
        assert!(!q.contains_at(noon, est));
    }
}
