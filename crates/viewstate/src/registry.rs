//! Type tag registry: one-byte discriminator → decode/encode routine pair.

use std::sync::OnceLock;

use crate::constants::*;
use crate::decoder::{self, Decoder};
use crate::encoder::{self, Encoder};
use crate::error::ViewStateError;
use crate::node::Value;

/// Reads the payload that follows `tag` (already consumed).
pub type DecodeFn = fn(&mut Decoder<'_>, u8) -> Result<Value, ViewStateError>;

/// Writes the payload of a value that goes under `tag` (already written).
pub type EncodeFn = fn(&mut Encoder<'_>, u8, &Value) -> Result<(), ViewStateError>;

/// A named decode/encode pair registered under one tag.
#[derive(Clone, Copy)]
pub struct Codec {
    pub name: &'static str,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

impl Codec {
    pub const fn new(name: &'static str, decode: DecodeFn, encode: EncodeFn) -> Self {
        Self {
            name,
            decode,
            encode,
        }
    }
}

/// Tag table consulted by [`Decoder`] and [`Encoder`].
///
/// Build one with [`Registry::with_standard`] to extend it, or share the
/// read-only [`Registry::standard`] instance.
#[derive(Clone)]
pub struct Registry {
    codecs: [Option<Codec>; 256],
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_standard()
    }
}

impl Registry {
    /// A registry with no tags at all.
    pub fn empty() -> Self {
        Self {
            codecs: [None; 256],
        }
    }

    /// A fresh registry holding every standard node kind.
    pub fn with_standard() -> Self {
        let mut r = Self::empty();
        r.register(TAG_NULL, Codec::new("Null", decoder::decode_null, encoder::encode_null));
        r.register(TAG_TRUE, Codec::new("True", decoder::decode_true, encoder::encode_true));
        r.register(TAG_FALSE, Codec::new("False", decoder::decode_false, encoder::encode_false));
        r.register(
            TAG_ZERO_INT32,
            Codec::new("ZeroInt32", decoder::decode_zero_int32, encoder::encode_zero_int32),
        );
        r.register(
            TAG_EMPTY_STRING,
            Codec::new("EmptyString", decoder::decode_empty_string, encoder::encode_empty_string),
        );
        r.register(TAG_INT16, Codec::new("Int16", decoder::decode_int16, encoder::encode_int16));
        r.register(TAG_INT32, Codec::new("Int32", decoder::decode_int32, encoder::encode_int32));
        r.register(TAG_BYTE, Codec::new("Byte", decoder::decode_byte, encoder::encode_byte));
        r.register(TAG_CHAR, Codec::new("Char", decoder::decode_char, encoder::encode_char));
        r.register(TAG_STRING, Codec::new("String", decoder::decode_string, encoder::encode_string));
        r.register(
            TAG_INDEXED_STRING_ADD,
            Codec::new("IndexedStringAdd", decoder::decode_string, encoder::encode_string),
        );
        r.register(
            TAG_INDEXED_STRING,
            Codec::new(
                "IndexedString",
                decoder::decode_indexed_string,
                encoder::encode_indexed_string,
            ),
        );
        r.register(
            TAG_DATE_TIME,
            Codec::new("DateTime", decoder::decode_date_time, encoder::encode_date_time),
        );
        r.register(TAG_DOUBLE, Codec::new("Double", decoder::decode_double, encoder::encode_double));
        r.register(TAG_SINGLE, Codec::new("Single", decoder::decode_single, encoder::encode_single));
        r.register(TAG_PAIR, Codec::new("Pair", decoder::decode_pair, encoder::encode_pair));
        r.register(TAG_TRIPLE, Codec::new("Triple", decoder::decode_triple, encoder::encode_triple));
        r.register(TAG_LIST, Codec::new("ArrayList", decoder::decode_list, encoder::encode_list));
        r.register(TAG_ARRAY, Codec::new("Array", decoder::decode_array, encoder::encode_array));
        r.register(
            TAG_STRING_ARRAY,
            Codec::new("StringArray", decoder::decode_string_array, encoder::encode_string_array),
        );
        r
    }

    /// The shared standard registry, built on first use.
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(Registry::with_standard)
    }

    /// Registers (or replaces) the codec for `tag`.
    pub fn register(&mut self, tag: u8, codec: Codec) {
        self.codecs[tag as usize] = Some(codec);
    }

    pub fn lookup(&self, tag: u8) -> Option<&Codec> {
        self.codecs[tag as usize].as_ref()
    }

    pub fn lookup_decoder(&self, tag: u8) -> Option<DecodeFn> {
        self.lookup(tag).map(|c| c.decode)
    }

    pub fn lookup_encoder(&self, tag: u8) -> Option<EncodeFn> {
        self.lookup(tag).map(|c| c.encode)
    }

    /// Registered name of `tag`, for diagnostics.
    pub fn name(&self, tag: u8) -> Option<&'static str> {
        self.lookup(tag).map(|c| c.name)
    }

    pub fn is_registered(&self, tag: u8) -> bool {
        self.lookup(tag).is_some()
    }
}
