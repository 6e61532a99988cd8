//! Byte-offset patch engine.
//!
//! A patch replaces the bytes of one node with the encoding of another and
//! copies everything else through untouched. Enclosing counts and declared
//! sizes are never rewritten, and the input buffer is never mutated.
//!
//! When the replacement has a different length, every offset at or after the
//! edit point moves by [`Patch::delta`]. Re-decode the new buffer before
//! issuing another patch.

use viewstate_buffers::Writer;

use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::ViewStateError;
use crate::node::{Node, Span};

/// Result of a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// The patched buffer.
    pub buffer: Vec<u8>,
    /// Span of the displaced node in the original buffer.
    pub replaced: Span,
    /// Span of the replacement in the patched buffer.
    pub inserted: Span,
}

impl Patch {
    /// How far offsets after the edit point moved.
    pub fn delta(&self) -> isize {
        self.inserted.len() as isize - self.replaced.len() as isize
    }
}

/// Replaces the node starting at `offset` with `node`.
///
/// `offset` must be a node boundary previously reported by the decoder; the
/// node found there is decoded to learn where it ends.
pub fn replace(buffer: &[u8], offset: usize, node: &Node) -> Result<Vec<u8>, ViewStateError> {
    Ok(replace_with_report(buffer, offset, node)?.buffer)
}

pub fn replace_with_report(
    buffer: &[u8],
    offset: usize,
    node: &Node,
) -> Result<Patch, ViewStateError> {
    if offset >= buffer.len() {
        return Err(ViewStateError::OffsetOutOfRange {
            offset,
            len: buffer.len(),
        });
    }
    let (_, end) = decode(buffer, offset)?;
    splice(buffer, Span::new(offset, end), node)
}

/// Replaces the bytes covered by `span` with `node`, without decoding.
pub fn replace_span(buffer: &[u8], span: Span, node: &Node) -> Result<Vec<u8>, ViewStateError> {
    Ok(splice(buffer, span, node)?.buffer)
}

fn splice(buffer: &[u8], span: Span, node: &Node) -> Result<Patch, ViewStateError> {
    if span.start > span.end || span.end > buffer.len() {
        return Err(ViewStateError::InvalidSpan {
            start: span.start,
            end: span.end,
            len: buffer.len(),
        });
    }
    let bytes = encode(node)?;
    let mut writer = Writer::with_alloc_size(buffer.len() - span.len() + bytes.len());
    writer.buf(&buffer[..span.start]);
    writer.buf(&bytes);
    writer.buf(&buffer[span.end..]);
    Ok(Patch {
        buffer: writer.flush(),
        replaced: span,
        inserted: Span::new(span.start, span.start + bytes.len()),
    })
}
