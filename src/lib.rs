//! Arrival board for a GTFS-realtime subway feed.
//!
//! Raw feed bytes are decoded by a small fixed-schema reader ([`parser`]),
//! searched for the next trains at a stop ([`arrivals`]) and turned into a
//! colored text line per direction ([`display`]).

pub mod arrivals;
pub mod board;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod quiet_hours;
pub mod wire;
