//! Transport envelope: base64 text and the format preamble.
//!
//! A captured blob is base64 text. Once decoded, the root node usually sits
//! behind the two-byte [`PREAMBLE`]; anything after the root (a MAC, for
//! instance) is left alone and reported through the trailing offset.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::constants::PREAMBLE;
use crate::decoder::decode;
use crate::error::ViewStateError;
use crate::node::Node;

/// Decodes base64 text, ignoring surrounding whitespace.
pub fn from_base64(text: &str) -> Result<Vec<u8>, ViewStateError> {
    Ok(STANDARD.decode(text.trim())?)
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn has_preamble(bytes: &[u8]) -> bool {
    bytes.starts_with(&PREAMBLE)
}

/// Offset of the root node: past the preamble when there is one.
pub fn payload_offset(bytes: &[u8]) -> usize {
    if has_preamble(bytes) {
        PREAMBLE.len()
    } else {
        0
    }
}

/// Decodes the root node of a raw blob. Spans are absolute offsets into
/// `bytes`, preamble included.
pub fn parse_blob(bytes: &[u8]) -> Result<(Node, usize), ViewStateError> {
    decode(bytes, payload_offset(bytes))
}
