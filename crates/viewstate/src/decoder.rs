//! Recursive-descent decoder with span tracking.
//!
//! One call to [`Decoder::read_node`] consumes exactly the bytes of one node,
//! dispatching on its tag through a [`Registry`]. Every read is bounds-checked
//! before it happens and counts are checked against the remaining input
//! before anything is allocated for them.

use viewstate_buffers::Reader;

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::ViewStateError;
use crate::node::{ElementType, Node, Span, TypedArray, Value};
use crate::registry::Registry;

/// Upper bound on elements reserved up front for one collection; the rest
/// grow as they are decoded.
const PREALLOC_LIMIT: usize = 1024;

/// Decoder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum number of nested nodes along any root-to-leaf path.
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub struct Decoder<'a> {
    reader: Reader<'a>,
    registry: &'a Registry,
    options: DecoderOptions,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Decoder over `buffer` using the standard registry, positioned at 0.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_registry(buffer, Registry::standard())
    }

    pub fn with_registry(buffer: &'a [u8], registry: &'a Registry) -> Self {
        Self {
            reader: Reader::new(buffer),
            registry,
            options: DecoderOptions::default(),
            depth: 0,
        }
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Current cursor position.
    pub fn offset(&self) -> usize {
        self.reader.x
    }

    /// Moves the cursor to `offset`.
    pub fn seek(&mut self, offset: usize) -> Result<(), ViewStateError> {
        let len = self.reader.uint8.len();
        if offset > len {
            return Err(ViewStateError::OffsetOutOfRange { offset, len });
        }
        self.reader.x = offset;
        Ok(())
    }

    /// Decodes the node starting at the cursor and leaves the cursor right
    /// after it.
    pub fn read_node(&mut self) -> Result<Node, ViewStateError> {
        let start = self.reader.x;
        if self.depth >= self.options.max_depth {
            return Err(ViewStateError::DepthExceeded {
                limit: self.options.max_depth,
                offset: start,
            });
        }
        let tag = self.reader.try_u8()?;
        let decode = self
            .registry
            .lookup_decoder(tag)
            .ok_or(ViewStateError::UnknownTag { tag, offset: start })?;
        self.depth += 1;
        let value = decode(self, tag);
        self.depth -= 1;
        Ok(Node {
            tag,
            value: value?,
            span: Some(Span::new(start, self.reader.x)),
        })
    }

    /// Decodes `n` consecutive nodes.
    pub fn read_nodes(&mut self, n: usize) -> Result<Vec<Node>, ViewStateError> {
        let mut nodes = Vec::with_capacity(n.min(PREALLOC_LIMIT));
        for _ in 0..n {
            nodes.push(self.read_node()?);
        }
        Ok(nodes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ViewStateError> {
        Ok(self.reader.try_u8()?)
    }

    pub fn read_i16(&mut self) -> Result<i16, ViewStateError> {
        Ok(self.reader.try_i16()?)
    }

    pub fn read_i64(&mut self) -> Result<i64, ViewStateError> {
        Ok(self.reader.try_i64()?)
    }

    pub fn read_f32(&mut self) -> Result<f32, ViewStateError> {
        Ok(self.reader.try_f32()?)
    }

    pub fn read_f64(&mut self) -> Result<f64, ViewStateError> {
        Ok(self.reader.try_f64()?)
    }

    pub fn read_vu32(&mut self) -> Result<u32, ViewStateError> {
        Ok(self.reader.try_vu32()?)
    }

    pub fn read_char(&mut self) -> Result<char, ViewStateError> {
        Ok(self.reader.try_char()?)
    }

    /// Reads a 7-bit length prefix followed by that many UTF-8 bytes.
    pub fn read_str(&mut self) -> Result<String, ViewStateError> {
        let len = self.reader.try_vu32()? as usize;
        Ok(self.reader.try_utf8(len)?.to_owned())
    }

    /// Reads an element count and checks that the remaining input could hold
    /// that many elements of at least one byte each.
    pub fn read_count(&mut self) -> Result<usize, ViewStateError> {
        let count = self.reader.try_vu32()? as usize;
        let remaining = self.reader.size();
        if count > remaining {
            return Err(ViewStateError::TruncatedInput {
                offset: self.reader.x,
                needed: count,
                remaining,
            });
        }
        Ok(count)
    }
}

/// Decodes one node of `buffer` starting at `offset`, returning it with the
/// offset immediately after it.
pub fn decode(buffer: &[u8], offset: usize) -> Result<(Node, usize), ViewStateError> {
    decode_with(buffer, offset, DecoderOptions::default())
}

pub fn decode_with(
    buffer: &[u8],
    offset: usize,
    options: DecoderOptions,
) -> Result<(Node, usize), ViewStateError> {
    let mut d = Decoder::new(buffer).with_options(options);
    d.seek(offset)?;
    let node = d.read_node()?;
    Ok((node, d.offset()))
}

// ---------------------------------------------------------------- routines

pub fn decode_null(_d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Null)
}

pub fn decode_true(_d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Bool(true))
}

pub fn decode_false(_d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Bool(false))
}

pub fn decode_zero_int32(_d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Int32(0))
}

pub fn decode_empty_string(_d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::String(String::new()))
}

pub fn decode_int16(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Int16(d.read_i16()?))
}

/// Int32 is written as its 7-bit encoded two's-complement bits.
pub fn decode_int32(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Int32(d.read_vu32()? as i32))
}

pub fn decode_byte(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Byte(d.read_u8()?))
}

pub fn decode_char(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Char(d.read_char()?))
}

pub fn decode_string(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::String(d.read_str()?))
}

pub fn decode_indexed_string(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::IndexedString(d.read_u8()?))
}

pub fn decode_date_time(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::DateTime(d.read_i64()?))
}

pub fn decode_double(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Double(d.read_f64()?))
}

pub fn decode_single(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    Ok(Value::Single(d.read_f32()?))
}

pub fn decode_pair(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    let first = d.read_node()?;
    let second = d.read_node()?;
    Ok(Value::Pair(Box::new([first, second])))
}

pub fn decode_triple(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    let first = d.read_node()?;
    let second = d.read_node()?;
    let third = d.read_node()?;
    Ok(Value::Triple(Box::new([first, second, third])))
}

pub fn decode_list(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    let count = d.read_count()?;
    Ok(Value::List(d.read_nodes(count)?))
}

/// Element type, declared size, actual count, elements. The declared size is
/// not compared with the count.
pub fn decode_array(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    let at = d.offset();
    let code = d.read_u8()?;
    let element_type = ElementType::from_code(code)
        .ok_or(ViewStateError::UnknownElementType { code, offset: at })?;
    let declared_size = d.read_vu32()?;
    let count = d.read_count()?;
    let data = d.read_nodes(count)?;
    Ok(Value::Array(TypedArray {
        element_type,
        declared_size,
        data,
    }))
}

pub fn decode_string_array(d: &mut Decoder<'_>, _tag: u8) -> Result<Value, ViewStateError> {
    let count = d.read_count()?;
    let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        items.push(d.read_str()?);
    }
    Ok(Value::StringArray(items))
}
