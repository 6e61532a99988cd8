//! Binary buffer utilities for the viewstate codec.
//!
//! The wire format is little-endian and length-prefixed with 7-bit encoded
//! integers, so this crate provides exactly that:
//!
//! - [`Reader`] - reads from a byte slice with cursor tracking; every read is
//!   bounds-checked and reports the offset it failed at
//! - [`Writer`] - writes to an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use viewstate_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x05);
//! writer.vu32(5);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.try_u8(), Ok(0x05));
//! assert_eq!(reader.try_vu32(), Ok(5));
//! assert_eq!(reader.try_utf8(5), Ok("hello"));
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Maximum number of bytes a 7-bit encoded `u32` may occupy.
pub const MAX_VU32_LEN: usize = 5;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// Invalid UTF-8 sequence starting at `offset`.
    InvalidUtf8 { offset: usize },
    /// Over-long, non-canonical or overflowing 7-bit integer at `offset`.
    InvalidVarInt { offset: usize },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "end of buffer at offset {offset}: needed {needed} bytes, {remaining} remaining"
            ),
            BufferError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 sequence at offset {offset}")
            }
            BufferError::InvalidVarInt { offset } => {
                write!(f, "invalid 7-bit encoded integer at offset {offset}")
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Number of bytes `value` occupies when 7-bit encoded.
pub fn vu32_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0x0fff_ffff => 4,
        _ => 5,
    }
}
