//! Upcoming-arrival extraction for a single stop.

use serde::Serialize;
use tracing::debug;

use crate::feed::FeedMessage;

/// Maximum number of arrivals shown per direction.
pub const MAX_ARRIVALS: usize = 3;

/// Trip id used when a trip update carries no descriptor or no trip id.
pub const UNKNOWN_TRIP: &str = "Unknown";

/// One upcoming train at the requested stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrival {
    pub trip_id: String,
    pub minutes_until: i64,
}

impl Arrival {
    pub fn new(trip_id: impl Into<String>, minutes_until: i64) -> Self {
        Self {
            trip_id: trip_id.into(),
            minutes_until,
        }
    }
}

/// Collects the next [`MAX_ARRIVALS`] trains calling at `stop_id`.
///
/// `stop_id` must match exactly. Departure time wins over arrival time;
/// updates with neither, and times before `now` (POSIX seconds), are dropped.
/// Results are ordered by minutes remaining, ties kept in feed order.
pub fn extract_arrivals(feed: &FeedMessage, stop_id: &str, now: i64) -> Vec<Arrival> {
    let mut arrivals = Vec::new();

    for trip_update in feed.entity.iter().filter_map(|e| e.trip_update.as_ref()) {
        let trip_id = trip_update.trip_id().unwrap_or(UNKNOWN_TRIP);

        for update in &trip_update.stop_time_update {
            if update.stop_id.as_deref() != Some(stop_id) {
                continue;
            }

            let Some(best_time) = update.best_time() else {
                continue;
            };

            if best_time < now {
                continue;
            }

            arrivals.push(Arrival::new(trip_id, best_time.saturating_sub(now).div_euclid(60)));
        }
    }

    debug!(stop_id, matched = arrivals.len(), "Arrivals collected");

    // stable: equal minutes keep encounter order
    arrivals.sort_by_key(|a| a.minutes_until);
    arrivals.truncate(MAX_ARRIVALS);
    arrivals
}
