//! Fixed-schema decoder for GTFS-realtime trip-update feeds.
//!
//! One function per message shape. Each walks its slice tag by tag, decodes
//! the fields it knows when they arrive with the expected wire type, and skips
//! everything else, vendor extensions included.

use tracing::trace;

use crate::error::Result;
use crate::feed::{FeedEntity, FeedHeader, FeedMessage, StopTimeUpdate, TripDescriptor, TripUpdate};
use crate::wire::{WireType, read_length_delimited, read_string, read_tag, read_varint, skip_field};

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`] from raw bytes.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedInput`](crate::error::DecodeError) if any
/// length or varint runs past the end of its buffer, and
/// [`DecodeError::MalformedString`](crate::error::DecodeError) if a text field
/// is not UTF-8. No partial feed is returned in either case.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedMessage> {
    let mut feed = FeedMessage::default();

    for_each_field(bytes, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (1, WireType::LengthDelimited) => {
                let (header, next) = read_message(bytes, pos, parse_header)?;
                feed.header = header;
                Some(next)
            }
            (2, WireType::LengthDelimited) => {
                let (entity, next) = read_message(bytes, pos, parse_entity)?;
                feed.entity.push(entity);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(feed)
}

fn parse_header(buf: &[u8]) -> Result<FeedHeader> {
    let mut header = FeedHeader::default();

    for_each_field(buf, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (1, WireType::LengthDelimited) => {
                let (version, next) = read_string(buf, pos)?;
                header.gtfs_realtime_version = Some(version);
                Some(next)
            }
            (3, WireType::Varint) => {
                let (timestamp, next) = read_varint(buf, pos)?;
                header.timestamp = Some(timestamp);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(header)
}

fn parse_entity(buf: &[u8]) -> Result<FeedEntity> {
    let mut entity = FeedEntity::default();

    for_each_field(buf, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (1, WireType::LengthDelimited) => {
                let (id, next) = read_string(buf, pos)?;
                entity.id = Some(id);
                Some(next)
            }
            (3, WireType::LengthDelimited) => {
                let (trip_update, next) = read_message(buf, pos, parse_trip_update)?;
                entity.trip_update = Some(trip_update);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(entity)
}

fn parse_trip_update(buf: &[u8]) -> Result<TripUpdate> {
    let mut trip_update = TripUpdate::default();

    for_each_field(buf, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (1, WireType::LengthDelimited) => {
                let (descriptor, next) = read_message(buf, pos, parse_trip_descriptor)?;
                trip_update.trip = Some(descriptor);
                Some(next)
            }
            (2, WireType::LengthDelimited) => {
                let (update, next) = read_message(buf, pos, parse_stop_time_update)?;
                trip_update.stop_time_update.push(update);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(trip_update)
}

fn parse_trip_descriptor(buf: &[u8]) -> Result<TripDescriptor> {
    let mut descriptor = TripDescriptor::default();

    for_each_field(buf, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (1, WireType::LengthDelimited) => {
                let (trip_id, next) = read_string(buf, pos)?;
                descriptor.trip_id = Some(trip_id);
                Some(next)
            }
            (5, WireType::LengthDelimited) => {
                let (route_id, next) = read_string(buf, pos)?;
                descriptor.route_id = Some(route_id);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(descriptor)
}

fn parse_stop_time_update(buf: &[u8]) -> Result<StopTimeUpdate> {
    let mut update = StopTimeUpdate::default();

    for_each_field(buf, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (1, WireType::Varint) => {
                let (sequence, next) = read_varint(buf, pos)?;
                update.stop_sequence = Some(sequence as u32);
                Some(next)
            }
            (2, WireType::LengthDelimited) => {
                let (time, next) = read_message(buf, pos, parse_stop_time_event)?;
                update.arrival_time = time;
                Some(next)
            }
            (3, WireType::LengthDelimited) => {
                let (time, next) = read_message(buf, pos, parse_stop_time_event)?;
                update.departure_time = time;
                Some(next)
            }
            (4, WireType::LengthDelimited) => {
                let (stop_id, next) = read_string(buf, pos)?;
                update.stop_id = Some(stop_id);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(update)
}

/// Arrival/departure event: `delay` (1), `time` (2), `uncertainty` (3).
/// Only `time` is kept.
fn parse_stop_time_event(buf: &[u8]) -> Result<Option<i64>> {
    let mut time = None;

    for_each_field(buf, |field, wire_type, pos| {
        Ok(match (field, wire_type) {
            (2, WireType::Varint) => {
                let (value, next) = read_varint(buf, pos)?;
                // int64 travels as its two's-complement bit pattern
                time = Some(value as i64);
                Some(next)
            }
            _ => None,
        })
    })?;

    Ok(time)
}

/// Decodes the embedded message at `pos` with `decode`. Errors are reported
/// against `buf`, not the message's own slice.
fn read_message<T>(
    buf: &[u8],
    pos: usize,
    decode: impl FnOnce(&[u8]) -> Result<T>,
) -> Result<(T, usize)> {
    let (body, next) = read_length_delimited(buf, pos)?;
    let start = next - body.len();
    let value = decode(body).map_err(|e| e.offset_by(start))?;
    Ok((value, next))
}

/// Drives the tag loop shared by every message decoder.
///
/// `decode` receives the field number, wire type and the cursor just past
/// the tag. It returns the cursor after the value when it consumed the field,
/// or `None` to have the field skipped.
fn for_each_field<F>(buf: &[u8], mut decode: F) -> Result<()>
where
    F: FnMut(u32, WireType, usize) -> Result<Option<usize>>,
{
    let mut pos = 0;

    while pos < buf.len() {
        let (field, wire_type, value_pos) = read_tag(buf, pos)?;
        pos = match decode(field, wire_type, value_pos)? {
            Some(next) => next,
            None => {
                trace!(field, ?wire_type, "skipping unrecognized field");
                skip_field(buf, wire_type, value_pos)?
            }
        };
    }

    Ok(())
}
