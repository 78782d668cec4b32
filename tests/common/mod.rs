//! Feed fixtures encoded with prost.
//!
//! The messages mirror the GTFS-realtime shapes the board reads, plus vendor
//! extension and fixed-width fields the decoder has to step over.

#![allow(dead_code)]

use prost::Message;

pub const NOW: i64 = 1_734_835_000;

#[derive(Clone, PartialEq, prost::Message)]
pub struct FeedMessage {
    #[prost(message, optional, tag = "1")]
    pub header: Option<FeedHeader>,
    #[prost(message, repeated, tag = "2")]
    pub entity: Vec<FeedEntity>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FeedHeader {
    #[prost(string, optional, tag = "1")]
    pub gtfs_realtime_version: Option<String>,
    #[prost(uint32, optional, tag = "2")]
    pub incrementality: Option<u32>,
    #[prost(uint64, optional, tag = "3")]
    pub timestamp: Option<u64>,
    #[prost(message, optional, tag = "1001")]
    pub nyct: Option<NyctFeedHeader>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NyctFeedHeader {
    #[prost(string, optional, tag = "1")]
    pub nyct_subway_version: Option<String>,
    #[prost(fixed64, optional, tag = "2")]
    pub checksum: Option<u64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FeedEntity {
    #[prost(string, optional, tag = "1")]
    pub id: Option<String>,
    #[prost(bool, optional, tag = "2")]
    pub is_deleted: Option<bool>,
    #[prost(message, optional, tag = "3")]
    pub trip_update: Option<TripUpdate>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub vehicle: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TripUpdate {
    #[prost(message, optional, tag = "1")]
    pub trip: Option<TripDescriptor>,
    #[prost(message, repeated, tag = "2")]
    pub stop_time_update: Vec<StopTimeUpdate>,
    #[prost(uint64, optional, tag = "4")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TripDescriptor {
    #[prost(string, optional, tag = "1")]
    pub trip_id: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub start_date: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub route_id: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StopTimeUpdate {
    #[prost(uint32, optional, tag = "1")]
    pub stop_sequence: Option<u32>,
    #[prost(message, optional, tag = "2")]
    pub arrival: Option<StopTimeEvent>,
    #[prost(message, optional, tag = "3")]
    pub departure: Option<StopTimeEvent>,
    #[prost(string, optional, tag = "4")]
    pub stop_id: Option<String>,
    #[prost(sfixed32, optional, tag = "1001")]
    pub scheduled_track: Option<i32>,
    #[prost(double, optional, tag = "1002")]
    pub dwell: Option<f64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StopTimeEvent {
    #[prost(int32, optional, tag = "1")]
    pub delay: Option<i32>,
    #[prost(int64, optional, tag = "2")]
    pub time: Option<i64>,
    #[prost(int32, optional, tag = "3")]
    pub uncertainty: Option<i32>,
}

pub fn event(time: i64) -> StopTimeEvent {
    StopTimeEvent {
        delay: Some(0),
        time: Some(time),
        uncertainty: Some(0),
    }
}

/// A stop visit `arrive_in`/`depart_in` seconds after [`NOW`].
pub fn stop(stop_id: &str, arrive_in: Option<i64>, depart_in: Option<i64>) -> StopTimeUpdate {
    StopTimeUpdate {
        stop_sequence: Some(12),
        arrival: arrive_in.map(|s| event(NOW + s)),
        departure: depart_in.map(|s| event(NOW + s)),
        stop_id: Some(stop_id.to_string()),
        scheduled_track: Some(2),
        dwell: Some(30.0),
    }
}

pub fn trip(id: &str, trip_id: &str, stops: Vec<StopTimeUpdate>) -> FeedEntity {
    FeedEntity {
        id: Some(id.to_string()),
        is_deleted: Some(false),
        trip_update: Some(TripUpdate {
            trip: Some(TripDescriptor {
                trip_id: Some(trip_id.to_string()),
                start_date: Some("20241221".to_string()),
                route_id: Some("L".to_string()),
            }),
            stop_time_update: stops,
            timestamp: Some(NOW as u64),
        }),
        vehicle: None,
    }
}

pub fn header() -> FeedHeader {
    FeedHeader {
        gtfs_realtime_version: Some("1.0".to_string()),
        incrementality: Some(0),
        timestamp: Some(NOW as u64),
        nyct: Some(NyctFeedHeader {
            nyct_subway_version: Some("1.0".to_string()),
            checksum: Some(0xDEAD_BEEF),
        }),
    }
}

/// A small L-line feed with trains in both directions and a vehicle-only entity.
pub fn sample_feed() -> FeedMessage {
    FeedMessage {
        header: Some(header()),
        entity: vec![
            trip(
                "1",
                "128400_L..N",
                vec![
                    stop("L14N", Some(-300), Some(-270)),
                    stop("L16N", Some(400), Some(430)),
                ],
            ),
            FeedEntity {
                id: Some("2".to_string()),
                vehicle: Some(vec![0x0A, 0x02, 0x08, 0x01]),
                ..Default::default()
            },
            trip("3", "129000_L..S", vec![stop("L16S", Some(90), None)]),
            trip("4", "129500_L..N", vec![stop("L16N", Some(150), Some(180))]),
            trip("5", "130000_L..S", vec![stop("L16S", None, Some(-10))]),
        ],
    }
}

/// Encodes the header and each entity as separate top-level fields and
/// returns the bytes with the offset of every field boundary.
pub fn encode_with_boundaries(feed: &FeedMessage) -> (Vec<u8>, Vec<usize>) {
    let mut bytes = Vec::new();
    let mut boundaries = vec![0];

    if let Some(header) = &feed.header {
        let part = FeedMessage {
            header: Some(header.clone()),
            entity: vec![],
        };
        bytes.extend(part.encode_to_vec());
        boundaries.push(bytes.len());
    }

    for entity in &feed.entity {
        let part = FeedMessage {
            header: None,
            entity: vec![entity.clone()],
        };
        bytes.extend(part.encode_to_vec());
        boundaries.push(bytes.len());
    }

    (bytes, boundaries)
}
