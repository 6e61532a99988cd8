//! Wire tags of the standard node kinds.
//!
//! Values follow the originating framework's token table so that captured
//! blobs decode without remapping.

pub const TAG_INT16: u8 = 0x01;
pub const TAG_INT32: u8 = 0x02;
pub const TAG_BYTE: u8 = 0x03;
pub const TAG_CHAR: u8 = 0x04;
pub const TAG_STRING: u8 = 0x05;
pub const TAG_DATE_TIME: u8 = 0x06;
pub const TAG_DOUBLE: u8 = 0x07;
pub const TAG_SINGLE: u8 = 0x08;
pub const TAG_PAIR: u8 = 0x0f;
pub const TAG_TRIPLE: u8 = 0x10;
pub const TAG_ARRAY: u8 = 0x14;
pub const TAG_STRING_ARRAY: u8 = 0x15;
pub const TAG_LIST: u8 = 0x16;
pub const TAG_INDEXED_STRING: u8 = 0x1e;
pub const TAG_INDEXED_STRING_ADD: u8 = 0x1f;
pub const TAG_NULL: u8 = 0x64;
pub const TAG_EMPTY_STRING: u8 = 0x65;
pub const TAG_ZERO_INT32: u8 = 0x66;
pub const TAG_TRUE: u8 = 0x67;
pub const TAG_FALSE: u8 = 0x68;

/// Two bytes preceding the root node in a captured blob.
pub const PREAMBLE: [u8; 2] = [0xff, 0x01];

/// Default nesting limit for the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 256;
