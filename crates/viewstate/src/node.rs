//! [`Node`]: the decoded (or hand-built) unit of a view-state tree.

use std::fmt;

use crate::constants::*;

/// Half-open byte range `[start, end)` a node was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Bytes of `buffer` covered by this span, or `None` if it does not fit.
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        buffer.get(self.start..self.end)
    }

    /// Moves the span by `delta` bytes, saturating at zero.
    pub fn shift(&self, delta: isize) -> Span {
        let move_by = |x: usize| {
            if delta >= 0 {
                x.saturating_add(delta as usize)
            } else {
                x.saturating_sub(delta.unsigned_abs())
            }
        };
        Span::new(move_by(self.start), move_by(self.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

/// Scalar kinds a [`TypedArray`] may declare for its elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Object,
    Int16,
    Int32,
    Byte,
    Char,
    String,
    DateTime,
    Double,
    Single,
    Boolean,
}

impl ElementType {
    pub const ALL: [ElementType; 10] = [
        ElementType::Object,
        ElementType::Int16,
        ElementType::Int32,
        ElementType::Byte,
        ElementType::Char,
        ElementType::String,
        ElementType::DateTime,
        ElementType::Double,
        ElementType::Single,
        ElementType::Boolean,
    ];

    /// The one-byte code written on the wire.
    pub const fn code(self) -> u8 {
        match self {
            ElementType::Object => 0x00,
            ElementType::Int16 => 0x01,
            ElementType::Int32 => 0x02,
            ElementType::Byte => 0x03,
            ElementType::Char => 0x04,
            ElementType::String => 0x05,
            ElementType::DateTime => 0x06,
            ElementType::Double => 0x07,
            ElementType::Single => 0x08,
            ElementType::Boolean => 0x09,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Object => "Object",
            ElementType::Int16 => "Int16",
            ElementType::Int32 => "Int32",
            ElementType::Byte => "Byte",
            ElementType::Char => "Char",
            ElementType::String => "String",
            ElementType::DateTime => "DateTime",
            ElementType::Double => "Double",
            ElementType::Single => "Single",
            ElementType::Boolean => "Boolean",
        }
    }

    pub fn from_code(code: u8) -> Option<ElementType> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn from_name(name: &str) -> Option<ElementType> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// An array with an explicit element type and a declared size that is stored
/// independently of the element count.
///
/// `declared_size` may differ from `data.len()`. The codec keeps both as they
/// are, in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArray {
    pub element_type: ElementType,
    pub declared_size: u32,
    pub data: Vec<Node>,
}

/// Payload of a [`Node`].
///
/// Floats compare by bit pattern, so NaN payloads equal themselves.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Byte(u8),
    Char(char),
    String(String),
    /// Back-reference into the blob's string table.
    IndexedString(u8),
    /// Raw 64-bit date/time value, kept uninterpreted.
    DateTime(i64),
    Double(f64),
    Single(f32),
    Pair(Box<[Node; 2]>),
    Triple(Box<[Node; 3]>),
    /// Variable-length ordered collection.
    List(Vec<Node>),
    Array(TypedArray),
    StringArray(Vec<String>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::IndexedString(a), Value::IndexedString(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Single(a), Value::Single(b)) => a.to_bits() == b.to_bits(),
            (Value::Pair(a), Value::Pair(b)) => a == b,
            (Value::Triple(a), Value::Triple(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::StringArray(a), Value::StringArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Static name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Byte(_) => "Byte",
            Value::Char(_) => "Char",
            Value::String(_) => "String",
            Value::IndexedString(_) => "IndexedString",
            Value::DateTime(_) => "DateTime",
            Value::Double(_) => "Double",
            Value::Single(_) => "Single",
            Value::Pair(_) => "Pair",
            Value::Triple(_) => "Triple",
            Value::List(_) => "List",
            Value::Array(_) => "Array",
            Value::StringArray(_) => "StringArray",
        }
    }

    /// The tag a freshly built node of this value is written under.
    ///
    /// Zero and the empty string use their dedicated payload-free tags.
    pub fn default_tag(&self) -> u8 {
        match self {
            Value::Null => TAG_NULL,
            Value::Bool(true) => TAG_TRUE,
            Value::Bool(false) => TAG_FALSE,
            Value::Int16(_) => TAG_INT16,
            Value::Int32(0) => TAG_ZERO_INT32,
            Value::Int32(_) => TAG_INT32,
            Value::Byte(_) => TAG_BYTE,
            Value::Char(_) => TAG_CHAR,
            Value::String(s) if s.is_empty() => TAG_EMPTY_STRING,
            Value::String(_) => TAG_STRING,
            Value::IndexedString(_) => TAG_INDEXED_STRING,
            Value::DateTime(_) => TAG_DATE_TIME,
            Value::Double(_) => TAG_DOUBLE,
            Value::Single(_) => TAG_SINGLE,
            Value::Pair(_) => TAG_PAIR,
            Value::Triple(_) => TAG_TRIPLE,
            Value::List(_) => TAG_LIST,
            Value::Array(_) => TAG_ARRAY,
            Value::StringArray(_) => TAG_STRING_ARRAY,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int16(n) => write!(f, "{n}"),
            Value::Int32(n) => write!(f, "{n}"),
            Value::Byte(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::IndexedString(i) => write!(f, "#{i}"),
            Value::DateTime(t) => write!(f, "{t}"),
            Value::Double(x) => write!(f, "{x}"),
            Value::Single(x) => write!(f, "{x}"),
            Value::Pair(_) => f.write_str("(2)"),
            Value::Triple(_) => f.write_str("(3)"),
            Value::List(items) => write!(f, "[{}]", items.len()),
            Value::Array(arr) => write!(
                f,
                "{}[{}] declared={}",
                arr.element_type.name(),
                arr.data.len(),
                arr.declared_size
            ),
            Value::StringArray(items) => write!(f, "{items:?}"),
        }
    }
}

/// One unit of the serialized format: its tag, its value and, for decoded
/// nodes, the byte range it came from.
///
/// Equality is structural: tags and values are compared recursively and
/// spans are ignored, so a decoded tree equals the tree it was encoded from.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: u8,
    pub value: Value,
    pub span: Option<Span>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value == other.value
    }
}

impl Node {
    /// Builds a node under the value's default tag.
    pub fn new(value: Value) -> Self {
        let tag = value.default_tag();
        Self {
            tag,
            value,
            span: None,
        }
    }

    /// Builds a node under an explicit tag. Whether the tag can carry the
    /// value is checked when the node is encoded.
    pub fn with_tag(tag: u8, value: Value) -> Self {
        Self {
            tag,
            value,
            span: None,
        }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(Value::Bool(b))
    }

    pub fn int16(n: i16) -> Self {
        Self::new(Value::Int16(n))
    }

    pub fn int32(n: i32) -> Self {
        Self::new(Value::Int32(n))
    }

    pub fn byte(n: u8) -> Self {
        Self::new(Value::Byte(n))
    }

    pub fn char(c: char) -> Self {
        Self::new(Value::Char(c))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::new(Value::String(s.into()))
    }

    pub fn double(x: f64) -> Self {
        Self::new(Value::Double(x))
    }

    pub fn pair(first: Node, second: Node) -> Self {
        Self::new(Value::Pair(Box::new([first, second])))
    }

    pub fn triple(first: Node, second: Node, third: Node) -> Self {
        Self::new(Value::Triple(Box::new([first, second, third])))
    }

    pub fn list(items: Vec<Node>) -> Self {
        Self::new(Value::List(items))
    }

    pub fn array(element_type: ElementType, declared_size: u32, data: Vec<Node>) -> Self {
        Self::new(Value::Array(TypedArray {
            element_type,
            declared_size,
            data,
        }))
    }

    pub fn string_array(items: Vec<String>) -> Self {
        Self::new(Value::StringArray(items))
    }

    pub fn kind(&self) -> &'static str {
        self.value.kind()
    }

    /// Child nodes of a container, left to right; `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.value {
            Value::Pair(pair) => Some(&pair[..]),
            Value::Triple(triple) => Some(&triple[..]),
            Value::List(items) => Some(items),
            Value::Array(arr) => Some(&arr.data),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Integer value of any integral scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            Value::Int16(n) => Some(n as i64),
            Value::Int32(n) => Some(n as i64),
            Value::Byte(n) => Some(n as i64),
            Value::DateTime(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x} {}", self.tag, self.kind())?;
        if let Some(span) = self.span {
            write!(f, " {span}")?;
        }
        write!(f, " {}", self.value)
    }
}

impl From<&Node> for serde_json::Value {
    fn from(node: &Node) -> Self {
        let mut obj = serde_json::Map::new();
        obj.insert("tag".into(), format!("0x{:02x}", node.tag).into());
        obj.insert("kind".into(), node.kind().into());
        if let Some(span) = node.span {
            obj.insert("span".into(), serde_json::json!([span.start, span.end]));
        }
        let value = match &node.value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::json!(b),
            Value::Int16(n) => serde_json::json!(n),
            Value::Int32(n) => serde_json::json!(n),
            Value::Byte(n) => serde_json::json!(n),
            Value::Char(c) => serde_json::json!(c.to_string()),
            Value::String(s) => serde_json::json!(s),
            Value::IndexedString(i) => serde_json::json!(i),
            Value::DateTime(t) => serde_json::json!(t),
            Value::Double(x) => serde_json::json!(x),
            Value::Single(x) => serde_json::json!(x),
            Value::StringArray(items) => serde_json::json!(items),
            Value::Array(arr) => {
                obj.insert("element_type".into(), arr.element_type.name().into());
                obj.insert("declared_size".into(), arr.declared_size.into());
                children_json(&arr.data)
            }
            Value::Pair(_) | Value::Triple(_) | Value::List(_) => {
                children_json(node.children().unwrap_or(&[]))
            }
        };
        obj.insert("value".into(), value);
        serde_json::Value::Object(obj)
    }
}

fn children_json(children: &[Node]) -> serde_json::Value {
    serde_json::Value::Array(children.iter().map(serde_json::Value::from).collect())
}
