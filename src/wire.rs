//! Primitive protobuf wire-format reader.
//!
//! Every function takes the buffer and a cursor and hands back the value
//! together with the advanced cursor. Nothing here allocates; length-delimited
//! payloads are returned as sub-slices of the input.

use tracing::trace;

use crate::error::{DecodeError, Result};

/// The wire types that may appear in a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
    /// Values 6 and 7 are not assigned by the wire format.
    Reserved(u8),
}

impl From<u8> for WireType {
    fn from(value: u8) -> Self {
        match value {
            0 => WireType::Varint,
            1 => WireType::Fixed64,
            2 => WireType::LengthDelimited,
            3 => WireType::StartGroup,
            4 => WireType::EndGroup,
            5 => WireType::Fixed32,
            other => WireType::Reserved(other),
        }
    }
}

/// Decode a base-128 varint starting at `pos`.
///
/// Payload bits past the 64th are dropped. The only failure is running off
/// the end of `buf` before a byte without the continuation bit.
#[inline]
pub fn read_varint(buf: &[u8], pos: usize) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;
    let mut cursor = pos;

    loop {
        let Some(&byte) = buf.get(cursor) else {
            return Err(DecodeError::TruncatedInput { offset: cursor });
        };
        cursor += 1;

        if shift < 64 {
            result |= u64::from(byte & 0x7F) << shift;
        }

        if byte & 0x80 == 0 {
            return Ok((result, cursor));
        }

        shift = shift.saturating_add(7);
    }
}

/// Decode a field key into `(field_number, wire_type)`.
///
/// Field numbers that do not fit in a `u32` come back as `u32::MAX`, which
/// no message defines.
#[inline]
pub fn read_tag(buf: &[u8], pos: usize) -> Result<(u32, WireType, usize)> {
    let (key, pos) = read_varint(buf, pos)?;
    let field_number = u32::try_from(key >> 3).unwrap_or(u32::MAX);
    let wire_type = WireType::from((key & 0x07) as u8);
    Ok((field_number, wire_type, pos))
}

/// Read a varint length prefix and return the payload it announces.
#[inline]
pub fn read_length_delimited(buf: &[u8], pos: usize) -> Result<(&[u8], usize)> {
    let (len, start) = read_varint(buf, pos)?;
    let end = advance(buf, start, len)?;
    Ok((&buf[start..end], end))
}

/// Read a length-delimited payload as UTF-8 text.
pub fn read_string(buf: &[u8], pos: usize) -> Result<(String, usize)> {
    let (bytes, next) = read_length_delimited(buf, pos)?;
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok((text.to_owned(), next)),
        Err(_) => Err(DecodeError::MalformedString { offset: pos }),
    }
}

/// Move past the value of one field without decoding it.
///
/// Group markers and the unassigned wire types carry no payload the reader
/// can size, so they advance by zero bytes.
pub fn skip_field(buf: &[u8], wire_type: WireType, pos: usize) -> Result<usize> {
    match wire_type {
        WireType::Varint => read_varint(buf, pos).map(|(_, next)| next),
        WireType::Fixed64 => advance(buf, pos, 8),
        WireType::LengthDelimited => read_length_delimited(buf, pos).map(|(_, next)| next),
        WireType::Fixed32 => advance(buf, pos, 4),
        WireType::StartGroup | WireType::EndGroup | WireType::Reserved(_) => {
            trace!(?wire_type, pos, "ignoring field with no sizable payload");
            Ok(pos)
        }
    }
}

/// Bounds-checked `pos + len`.
fn advance(buf: &[u8], pos: usize, len: u64) -> Result<usize> {
    usize::try_from(len)
        .ok()
        .and_then(|len| pos.checked_add(len))
        .filter(|&end| end <= buf.len())
        .ok_or(DecodeError::TruncatedInput { offset: buf.len() })
}
