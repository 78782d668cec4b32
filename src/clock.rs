use chrono::{DateTime, Utc};

/// Source of the current time used for a refresh cycle.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as POSIX seconds.
    fn epoch_seconds(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall clock of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns `None` if `secs` is outside chrono's representable range.
    pub fn from_epoch_seconds(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_epoch_seconds() {
        let clock = FixedClock::from_epoch_seconds(1_734_835_126).unwrap();
        assert_eq!(clock.epoch_seconds(), 1_734_835_126);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.epoch_seconds() > 1_577_836_800);
    }
}
