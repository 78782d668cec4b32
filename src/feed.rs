//! Decoded GTFS-realtime feed tree.
//!
//! Only the fields the arrival board reads are kept. Every scalar that the
//! feed may leave out is an `Option`, so a missing value never collides with
//! a real zero.

use serde::Serialize;

/// Root of one decoded feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedMessage {
    pub header: FeedHeader,
    pub entity: Vec<FeedEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedHeader {
    pub gtfs_realtime_version: Option<String>,
    /// Feed creation time, POSIX seconds.
    pub timestamp: Option<u64>,
}

/// One entity of the feed. Entities without a trip update (vehicle-only,
/// alerts) are kept with `trip_update == None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedEntity {
    pub id: Option<String>,
    pub trip_update: Option<TripUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripUpdate {
    pub trip: Option<TripDescriptor>,
    pub stop_time_update: Vec<StopTimeUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripDescriptor {
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopTimeUpdate {
    pub stop_id: Option<String>,
    pub stop_sequence: Option<u32>,
    /// POSIX seconds, taken from the arrival event's `time` field.
    pub arrival_time: Option<i64>,
    /// POSIX seconds, taken from the departure event's `time` field.
    pub departure_time: Option<i64>,
}

impl TripUpdate {
    /// The trip id of the descriptor, if both are present.
    pub fn trip_id(&self) -> Option<&str> {
        self.trip.as_ref().and_then(|t| t.trip_id.as_deref())
    }
}

impl StopTimeUpdate {
    /// Departure time when known, otherwise arrival time.
    pub fn best_time(&self) -> Option<i64> {
        self.departure_time.or(self.arrival_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_time_prefers_departure() {
        let stu = StopTimeUpdate {
            arrival_time: Some(100),
            departure_time: Some(130),
            ..Default::default()
        };
        assert_eq!(stu.best_time(), Some(130));
    }

    #[test]
    fn test_best_time_falls_back_to_arrival() {
        let stu = StopTimeUpdate {
            arrival_time: Some(100),
            ..Default::default()
        };
        assert_eq!(stu.best_time(), Some(100));
        assert_eq!(StopTimeUpdate::default().best_time(), None);
    }

    #[test]
    fn test_zero_time_is_present() {
        let stu = StopTimeUpdate {
            departure_time: Some(0),
            ..Default::default()
        };
        assert_eq!(stu.best_time(), Some(0));
    }

    #[test]
    fn test_trip_id_requires_descriptor() {
        let mut tu = TripUpdate::default();
        assert_eq!(tu.trip_id(), None);
        tu.trip = Some(TripDescriptor {
            trip_id: Some("128400_L..S".to_string()),
            route_id: Some("L".to_string()),
        });
        assert_eq!(tu.trip_id(), Some("128400_L..S"));
    }
}
