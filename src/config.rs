//! Board configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "feed_url": "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fgtfs-l",
//!   "directions": [
//!     { "label": "City", "stop_id": "L16N" },
//!     { "label": "Bkln", "stop_id": "L16S" }
//!   ],
//!   "refresh_interval_secs": 30,
//!   "quiet_hours": { "enabled": true, "start": "20:00:00", "end": "03:30:00" }
//! }
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::clock::Clock;
use crate::display::Palette;
use crate::quiet_hours::QuietHours;

pub const ENV_FEED_URL: &str = "TRAIN_BOARD_FEED_URL";
pub const ENV_API_KEY: &str = "TRAIN_BOARD_API_KEY";

/// One line of the board: a label and the stop whose arrivals it shows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Direction {
    pub label: String,
    pub stop_id: String,
}

impl Direction {
    pub fn new(label: &str, stop_id: &str) -> Self {
        Self {
            label: label.to_string(),
            stop_id: stop_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub feed_url: String,
    /// Sent as the `x-api-key` header when set.
    pub api_key: Option<String>,
    pub directions: [Direction; 2],
    pub refresh_interval_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub request_timeout_secs: u64,
    /// Local offset from UTC, used only for quiet hours.
    pub utc_offset_hours: i32,
    pub quiet_hours: QuietHours,
    pub palette: Palette,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fgtfs-l"
                .to_string(),
            api_key: None,
            directions: [Direction::new("City", "L16N"), Direction::new("Bkln", "L16S")],
            refresh_interval_secs: 30,
            max_retries: 3,
            retry_delay_secs: 5,
            request_timeout_secs: 30,
            utc_offset_hours: -5,
            quiet_hours: QuietHours::default(),
            palette: Palette::default(),
        }
    }
}

impl BoardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads `path` if given, otherwise starts from defaults, then applies
    /// environment overrides.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overrides fields from the variables `lookup` can resolve. Empty values
    /// are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v: &String| !v.is_empty());

        if let Some(url) = lookup(ENV_FEED_URL) {
            self.feed_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether the board should stay dark at the time `clock` reports.
    pub fn is_quiet(&self, clock: &dyn Clock) -> bool {
        self.quiet_hours.contains_at(clock.now(), self.utc_offset())
    }

    /// The configured local offset, or UTC if it is out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}
