//! Codec error type.

use thiserror::Error;
use viewstate_buffers::BufferError;

/// Error type for decoding, encoding and patching view-state buffers.
///
/// Every decode failure aborts the whole decode; there is no partial tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewStateError {
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("unknown tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },
    #[error("nesting deeper than {limit} levels at offset {offset}")]
    DepthExceeded { limit: usize, offset: usize },
    #[error("offset {offset} is out of range for a {len}-byte buffer")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("span {start}..{end} is invalid for a {len}-byte buffer")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("invalid 7-bit encoded integer at offset {offset}")]
    InvalidVarInt { offset: usize },
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("unknown array element type 0x{code:02x} at offset {offset}")]
    UnknownElementType { code: u8, offset: usize },
    #[error("tag 0x{tag:02x} cannot encode a {kind} value")]
    TagMismatch { tag: u8, kind: &'static str },
    #[error("length {len} does not fit a 32-bit prefix")]
    LengthOverflow { len: usize },
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

impl From<BufferError> for ViewStateError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer {
                offset,
                needed,
                remaining,
            } => ViewStateError::TruncatedInput {
                offset,
                needed,
                remaining,
            },
            BufferError::InvalidUtf8 { offset } => ViewStateError::InvalidUtf8 { offset },
            BufferError::InvalidVarInt { offset } => ViewStateError::InvalidVarInt { offset },
        }
    }
}
