//! Encoder: the inverse of the decoder, tag by tag.

use viewstate_buffers::{vu32_len, Writer};

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::ViewStateError;
use crate::node::{Node, Value};
use crate::registry::Registry;
use crate::traverse::walk;

pub struct Encoder<'r> {
    pub writer: Writer,
    registry: &'r Registry,
    max_depth: usize,
    depth: usize,
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<'static> {
    pub fn new() -> Self {
        Self::with_registry(Registry::standard())
    }
}

impl<'r> Encoder<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            writer: Writer::new(),
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Nesting limit, matching the decoder's so that anything encoded here
    /// decodes with the same options.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Encodes `node` and returns its bytes. Nothing is kept on failure.
    pub fn encode(&mut self, node: &Node) -> Result<Vec<u8>, ViewStateError> {
        self.writer.reset();
        self.depth = 0;
        if let Err(err) = self.write_node(node) {
            self.writer.reset();
            self.depth = 0;
            return Err(err);
        }
        Ok(self.writer.flush())
    }

    /// Writes the tag byte followed by the payload routine registered for it.
    pub fn write_node(&mut self, node: &Node) -> Result<(), ViewStateError> {
        let encode = self
            .registry
            .lookup_encoder(node.tag)
            .ok_or(ViewStateError::UnknownTag {
                tag: node.tag,
                offset: self.writer.len(),
            })?;
        if self.depth >= self.max_depth {
            return Err(ViewStateError::DepthExceeded {
                limit: self.max_depth,
                offset: self.writer.len(),
            });
        }
        self.writer.u8(node.tag);
        self.depth += 1;
        let res = encode(self, node.tag, &node.value);
        self.depth -= 1;
        res
    }

    pub fn write_nodes(&mut self, nodes: &[Node]) -> Result<(), ViewStateError> {
        for node in nodes {
            self.write_node(node)?;
        }
        Ok(())
    }

    /// Writes a 7-bit encoded length or count.
    pub fn write_len(&mut self, len: usize) -> Result<(), ViewStateError> {
        let len = u32::try_from(len).map_err(|_| ViewStateError::LengthOverflow { len })?;
        self.writer.vu32(len);
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) -> Result<(), ViewStateError> {
        self.write_len(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }
}

/// Encodes `node` with the standard registry.
pub fn encode(node: &Node) -> Result<Vec<u8>, ViewStateError> {
    Encoder::new().encode(node)
}

/// Number of bytes `node` encodes to, without encoding it.
///
/// Assumes every tag in the tree carries a value its routine accepts; use
/// [`encode`] to validate. Walks the tree without recursing, so it has no
/// depth limit.
pub fn encoded_len(node: &Node) -> usize {
    walk(node).map(|(_, n)| own_len(n)).sum()
}

/// Tag plus payload of one node, children excluded.
fn own_len(node: &Node) -> usize {
    let payload = match &node.value {
        Value::Null | Value::Bool(_) => 0,
        Value::Int32(0) if node.tag == crate::constants::TAG_ZERO_INT32 => 0,
        Value::String(s) if s.is_empty() && node.tag == crate::constants::TAG_EMPTY_STRING => 0,
        Value::Int16(_) => 2,
        Value::Int32(n) => vu32_len(*n as u32),
        Value::Byte(_) | Value::IndexedString(_) => 1,
        Value::Char(c) => c.len_utf8(),
        Value::String(s) => str_len(s),
        Value::DateTime(_) | Value::Double(_) => 8,
        Value::Single(_) => 4,
        Value::Pair(_) | Value::Triple(_) => 0,
        Value::List(items) => vu32_len(items.len() as u32),
        Value::Array(arr) => 1 + vu32_len(arr.declared_size) + vu32_len(arr.data.len() as u32),
        Value::StringArray(items) => {
            vu32_len(items.len() as u32) + items.iter().map(|s| str_len(s)).sum::<usize>()
        }
    };
    1 + payload
}

fn str_len(s: &str) -> usize {
    vu32_len(s.len() as u32) + s.len()
}

// ---------------------------------------------------------------- routines

fn mismatch(tag: u8, value: &Value) -> ViewStateError {
    ViewStateError::TagMismatch {
        tag,
        kind: value.kind(),
    }
}

pub fn encode_null(_e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Null => Ok(()),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_true(_e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Bool(true) => Ok(()),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_false(_e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Bool(false) => Ok(()),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_zero_int32(
    _e: &mut Encoder<'_>,
    tag: u8,
    value: &Value,
) -> Result<(), ViewStateError> {
    match value {
        Value::Int32(0) => Ok(()),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_empty_string(
    _e: &mut Encoder<'_>,
    tag: u8,
    value: &Value,
) -> Result<(), ViewStateError> {
    match value {
        Value::String(s) if s.is_empty() => Ok(()),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_int16(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Int16(n) => {
            e.writer.i16(*n);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_int32(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Int32(n) => {
            e.writer.vu32(*n as u32);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_byte(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Byte(n) => {
            e.writer.u8(*n);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_char(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Char(c) => {
            e.writer.char(*c);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_string(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::String(s) => e.write_str(s),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_indexed_string(
    e: &mut Encoder<'_>,
    tag: u8,
    value: &Value,
) -> Result<(), ViewStateError> {
    match value {
        Value::IndexedString(i) => {
            e.writer.u8(*i);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_date_time(
    e: &mut Encoder<'_>,
    tag: u8,
    value: &Value,
) -> Result<(), ViewStateError> {
    match value {
        Value::DateTime(t) => {
            e.writer.i64(*t);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_double(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Double(x) => {
            e.writer.f64(*x);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_single(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Single(x) => {
            e.writer.f32(*x);
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_pair(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Pair(pair) => e.write_nodes(&pair[..]),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_triple(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Triple(triple) => e.write_nodes(&triple[..]),
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_list(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::List(items) => {
            e.write_len(items.len())?;
            e.write_nodes(items)
        }
        _ => Err(mismatch(tag, value)),
    }
}

/// Writes `declared_size` as given; it is never derived from the data.
pub fn encode_array(e: &mut Encoder<'_>, tag: u8, value: &Value) -> Result<(), ViewStateError> {
    match value {
        Value::Array(arr) => {
            e.writer.u8(arr.element_type.code());
            e.writer.vu32(arr.declared_size);
            e.write_len(arr.data.len())?;
            e.write_nodes(&arr.data)
        }
        _ => Err(mismatch(tag, value)),
    }
}

pub fn encode_string_array(
    e: &mut Encoder<'_>,
    tag: u8,
    value: &Value,
) -> Result<(), ViewStateError> {
    match value {
        Value::StringArray(items) => {
            e.write_len(items.len())?;
            for s in items {
                e.write_str(s)?;
            }
            Ok(())
        }
        _ => Err(mismatch(tag, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::node::ElementType;

    #[test]
    fn writes_tag_then_payload() {
        assert_eq!(encode(&Node::string("abc")).unwrap(), [TAG_STRING, 3, b'a', b'b', b'c']);
        assert_eq!(encode(&Node::int16(-2)).unwrap(), [TAG_INT16, 0xfe, 0xff]);
        assert_eq!(encode(&Node::int32(300)).unwrap(), [TAG_INT32, 0xac, 0x02]);
        assert_eq!(encode(&Node::int32(0)).unwrap(), [TAG_ZERO_INT32]);
        assert_eq!(encode(&Node::boolean(false)).unwrap(), [TAG_FALSE]);
    }

    #[test]
    fn array_keeps_declared_size() {
        let node = Node::array(
            ElementType::Boolean,
            10,
            vec![Node::boolean(false), Node::boolean(true)],
        );
        assert_eq!(
            encode(&node).unwrap(),
            [TAG_ARRAY, 0x09, 10, 2, TAG_FALSE, TAG_TRUE]
        );
    }

    #[test]
    fn mismatched_tag_is_rejected() {
        let node = Node::with_tag(TAG_TRUE, Value::Bool(false));
        assert_eq!(
            encode(&node).unwrap_err(),
            ViewStateError::TagMismatch { tag: TAG_TRUE, kind: "Bool" }
        );
        let node = Node::with_tag(TAG_ZERO_INT32, Value::Int32(4));
        assert!(matches!(encode(&node), Err(ViewStateError::TagMismatch { .. })));
    }

    #[test]
    fn unknown_tag_is_rejected_and_output_discarded() {
        let mut e = Encoder::new();
        let bad = Node::pair(Node::null(), Node::with_tag(0xee, Value::Null));
        assert_eq!(
            e.encode(&bad).unwrap_err(),
            ViewStateError::UnknownTag { tag: 0xee, offset: 2 }
        );
        assert_eq!(e.encode(&Node::null()).unwrap(), [TAG_NULL]);
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let mut node = Node::null();
        for _ in 0..5 {
            node = Node::list(vec![node]);
        }
        assert_eq!(encode(&node).unwrap().len(), 11);
        let mut e = Encoder::new().with_max_depth(5);
        assert_eq!(
            e.encode(&node).unwrap_err(),
            ViewStateError::DepthExceeded { limit: 5, offset: 10 }
        );
        assert_eq!(e.encode(&Node::list(vec![Node::null()])).unwrap(), [TAG_LIST, 1, TAG_NULL]);

        let mut deep = Node::null();
        for _ in 0..DEFAULT_MAX_DEPTH {
            deep = Node::list(vec![deep]);
        }
        assert!(matches!(encode(&deep), Err(ViewStateError::DepthExceeded { .. })));
        assert_eq!(encoded_len(&deep), 2 * DEFAULT_MAX_DEPTH + 1);
    }

    #[test]
    fn encoded_len_agrees_with_encode() {
        let node = Node::triple(
            Node::list(vec![Node::string("x".repeat(200)), Node::int32(-1), Node::char('€')]),
            Node::array(ElementType::String, 3, vec![Node::string("")]),
            Node::string_array(vec!["a".into(), "bc".into()]),
        );
        assert_eq!(encoded_len(&node), encode(&node).unwrap().len());
        let alias = Node::with_tag(TAG_INDEXED_STRING_ADD, Value::String(String::new()));
        assert_eq!(encoded_len(&alias), encode(&alias).unwrap().len());
    }
}
