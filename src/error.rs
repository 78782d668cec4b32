//! Error types for feed decoding.

use thiserror::Error;

/// Failures produced while decoding a feed buffer.
///
/// Offsets count from the start of the buffer handed to
/// [`parse_feed`](crate::parser::parse_feed). Both kinds abort the whole decode; there is no partial feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ended before a varint, fixed-width value or declared length did.
    #[error("truncated input at byte offset {offset}")]
    TruncatedInput { offset: usize },
    /// A string field did not contain valid UTF-8.
    #[error("malformed UTF-8 string at byte offset {offset}")]
    MalformedString { offset: usize },
}

impl DecodeError {
    /// Moves the offset from a nested message slice into its parent's frame.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            DecodeError::TruncatedInput { offset } => DecodeError::TruncatedInput {
                offset: offset + base,
            },
            DecodeError::MalformedString { offset } => DecodeError::MalformedString {
                offset: offset + base,
            },
        }
    }
}

/// Result type alias for decoding operations
pub type Result<T> = core::result::Result<T, DecodeError>;
