//! Span-tracking codec for serialized view-state blobs.
//!
//! A blob is a tree of tagged nodes. [`parse`] decodes it while recording the
//! absolute byte span of every node, [`leaves`] walks the tree in document
//! order, [`encode`] writes a node back out byte for byte, and [`replace`]
//! splices a new node over an old one without touching the bytes around it.
//!
//! ```
//! use viewstate::{encode, leaves, parse, replace, Node};
//!
//! let blob = encode(&Node::pair(Node::string("hi"), Node::boolean(false))).unwrap();
//! let (root, _) = parse(&blob).unwrap();
//! let flag = leaves(&root).nth(1).unwrap();
//! let start = flag.span.unwrap().start;
//! let patched = replace(&blob, start, &Node::boolean(true)).unwrap();
//! assert_eq!(parse(&patched).unwrap().0, Node::pair(Node::string("hi"), Node::boolean(true)));
//! ```

pub mod cli;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod envelope;
mod error;
pub mod node;
pub mod patch;
pub mod registry;
pub mod traverse;

pub use decoder::{decode, decode_with, Decoder, DecoderOptions};
pub use encoder::{encode, encoded_len, Encoder};
pub use envelope::{from_base64, parse_blob, payload_offset, to_base64};
pub use error::ViewStateError;
pub use node::{ElementType, Node, Span, TypedArray, Value};
pub use patch::{replace, replace_span, replace_with_report, Patch};
pub use registry::{Codec, Registry};
pub use traverse::{find_leaf, find_string_containing, leaves, walk, Leaves, Walk};

/// Decodes the node at the start of `buffer`.
///
/// Returns the root and the offset just past it; trailing bytes are not an
/// error.
pub fn parse(buffer: &[u8]) -> Result<(Node, usize), ViewStateError> {
    decode(buffer, 0)
}

/// Decodes the node starting at `offset`. Spans stay absolute.
pub fn parse_at(buffer: &[u8], offset: usize) -> Result<(Node, usize), ViewStateError> {
    decode(buffer, offset)
}

pub fn parse_with(
    buffer: &[u8],
    offset: usize,
    options: DecoderOptions,
) -> Result<(Node, usize), ViewStateError> {
    decode_with(buffer, offset, options)
}
