use viewstate::constants::*;
use viewstate::{
    encode, encoded_len, parse, parse_at, parse_with, walk, DecoderOptions, ElementType, Node,
    Value, ViewStateError,
};

fn samples() -> Vec<(&'static str, Node)> {
    vec![
        ("null", Node::null()),
        ("true", Node::boolean(true)),
        ("false", Node::boolean(false)),
        ("int16", Node::int16(-12345)),
        ("int32_zero", Node::int32(0)),
        ("int32_small", Node::int32(42)),
        ("int32_wide", Node::int32(1 << 20)),
        ("int32_negative", Node::int32(-1)),
        ("byte", Node::byte(0xab)),
        ("char_ascii", Node::char('x')),
        ("char_multibyte", Node::char('é')),
        ("string_empty", Node::string("")),
        ("string", Node::string("hello")),
        ("string_long", Node::string("x".repeat(300))),
        ("indexed_string", Node::new(Value::IndexedString(7))),
        ("date_time", Node::new(Value::DateTime(638_000_000_000_000_000))),
        ("double", Node::double(3.25)),
        ("single", Node::new(Value::Single(-0.5))),
        ("pair", Node::pair(Node::string("k"), Node::int32(9))),
        (
            "triple",
            Node::triple(Node::null(), Node::boolean(true), Node::int16(1)),
        ),
        ("list_empty", Node::list(vec![])),
        (
            "list",
            Node::list(vec![Node::int32(1), Node::string("two"), Node::null()]),
        ),
        (
            "array",
            Node::array(
                ElementType::Int32,
                3,
                vec![Node::int32(1), Node::int32(2), Node::int32(3)],
            ),
        ),
        (
            "string_array",
            Node::string_array(vec!["a".into(), String::new(), "ccc".into()]),
        ),
        (
            "nested",
            Node::pair(
                Node::triple(
                    Node::list(vec![Node::pair(Node::null(), Node::string("deep"))]),
                    Node::array(ElementType::Boolean, 2, vec![Node::boolean(false)]),
                    Node::with_tag(TAG_INDEXED_STRING_ADD, Value::String("added".into())),
                ),
                Node::new(Value::IndexedString(0)),
            ),
        ),
    ]
}

#[test]
fn every_variant_roundtrips() {
    for (name, node) in samples() {
        let bytes = encode(&node).unwrap_or_else(|e| panic!("{name}: encode failed: {e}"));
        assert_eq!(bytes.len(), encoded_len(&node), "{name}: encoded_len");
        let (decoded, end) = parse(&bytes).unwrap_or_else(|e| panic!("{name}: parse failed: {e}"));
        assert_eq!(decoded, node, "{name}: structure");
        assert_eq!(decoded.tag, node.tag, "{name}: tag");
        assert_eq!(end, bytes.len(), "{name}: end");
    }
}

#[test]
fn nan_floats_roundtrip_to_equal_nodes() {
    for node in [
        Node::double(f64::NAN),
        Node::new(Value::Single(f32::NAN)),
        Node::double(f64::from_bits(0x7ff8_0000_dead_beef)),
        Node::double(f64::NEG_INFINITY),
    ] {
        let bytes = encode(&node).unwrap();
        let (decoded, _) = parse(&bytes).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }
}

#[test]
fn decoded_buffers_reencode_byte_identically() {
    let buffers: Vec<Vec<u8>> = vec![
        // Zero and empty string under their general tags, not the constant ones.
        vec![TAG_INT32, 0x00],
        vec![TAG_STRING, 0x00],
        vec![TAG_INDEXED_STRING_ADD, 2, b'o', b'k'],
        vec![TAG_INT32, 0xff, 0xff, 0xff, 0xff, 0x0f],
        vec![TAG_ARRAY, 0x09, 10, 2, TAG_FALSE, TAG_TRUE],
        vec![TAG_TRIPLE, TAG_NULL, TAG_ZERO_INT32, TAG_EMPTY_STRING],
        vec![TAG_STRING_ARRAY, 2, 1, b'a', 0],
        // Trailing bytes after the root are left alone.
        vec![TAG_PAIR, TAG_BYTE, 5, TAG_CHAR, b'z', 0xde, 0xad, 0xbe, 0xef],
    ];
    for buf in buffers {
        let (node, end) = parse(&buf).unwrap();
        assert_eq!(encode(&node).unwrap(), &buf[..end], "buffer {buf:02x?}");
    }
}

#[test]
fn every_span_covers_exactly_its_encoding() {
    for (name, node) in samples() {
        let mut buf = vec![0xaa, 0xbb];
        buf.extend(encode(&node).unwrap());
        let (decoded, end) = parse_at(&buf, 2).unwrap();
        assert_eq!(end, buf.len());
        for (depth, n) in walk(&decoded) {
            let span = n.span.unwrap_or_else(|| panic!("{name}: node without span"));
            let bytes = encode(n).unwrap();
            assert_eq!(span.len(), bytes.len(), "{name}: depth {depth} span length");
            assert_eq!(span.slice(&buf), Some(&bytes[..]), "{name}: depth {depth} span bytes");
        }
    }
}

#[test]
fn declared_size_and_actual_count_are_independent() {
    let node = Node::array(ElementType::Boolean, 10, vec![Node::boolean(false); 60]);
    let bytes = encode(&node).unwrap();
    assert_eq!(&bytes[..4], &[TAG_ARRAY, 0x09, 10, 60]);
    let (decoded, _) = parse(&bytes).unwrap();
    match &decoded.value {
        Value::Array(arr) => {
            assert_eq!(arr.declared_size, 10);
            assert_eq!(arr.data.len(), 60);
            assert_eq!(arr.element_type, ElementType::Boolean);
        }
        other => panic!("expected array, got {other:?}"),
    }
    assert_eq!(encode(&decoded).unwrap(), bytes);
}

#[test]
fn truncated_fields_report_truncated_input() {
    let cases: Vec<Vec<u8>> = vec![
        vec![TAG_STRING, 5, b'a', b'b'],
        vec![TAG_INT16, 0x01],
        vec![TAG_DOUBLE, 0, 0, 0],
        vec![TAG_PAIR, TAG_NULL],
        vec![TAG_LIST, 3, TAG_NULL],
        vec![TAG_STRING],
    ];
    for buf in cases {
        assert!(
            matches!(parse(&buf), Err(ViewStateError::TruncatedInput { .. })),
            "buffer {buf:02x?} gave {:?}",
            parse(&buf)
        );
    }
}

#[test]
fn unknown_leading_tag_reports_tag_and_offset() {
    assert_eq!(
        parse(&[0xff, 0x01, TAG_NULL]).unwrap_err(),
        ViewStateError::UnknownTag { tag: 0xff, offset: 0 }
    );
    assert_eq!(
        parse(&[TAG_PAIR, TAG_NULL, 0x42]).unwrap_err(),
        ViewStateError::UnknownTag { tag: 0x42, offset: 2 }
    );
}

#[test]
fn unknown_element_type_is_rejected() {
    assert_eq!(
        parse(&[TAG_ARRAY, 0x7e, 0, 0]).unwrap_err(),
        ViewStateError::UnknownElementType { code: 0x7e, offset: 1 }
    );
}

#[test]
fn nesting_deeper_than_the_limit_fails() {
    let mut buf = vec![TAG_PAIR; 10];
    buf.extend([TAG_NULL; 11]);
    assert!(parse(&buf).is_ok());
    let opts = DecoderOptions { max_depth: 5 };
    assert!(matches!(
        parse_with(&buf, 0, opts),
        Err(ViewStateError::DepthExceeded { limit: 5, offset: 5 })
    ));
}

#[test]
fn parse_past_the_end_is_out_of_range() {
    let buf = [TAG_NULL];
    assert!(matches!(
        parse_at(&buf, 2),
        Err(ViewStateError::OffsetOutOfRange { offset: 2, len: 1 })
    ));
    assert!(matches!(
        parse_at(&buf, 1),
        Err(ViewStateError::TruncatedInput { .. })
    ));
}

#[test]
fn mismatched_tag_and_value_do_not_encode() {
    let bad = Node::with_tag(TAG_INT16, Value::String("no".into()));
    assert!(matches!(
        encode(&bad),
        Err(ViewStateError::TagMismatch { tag: TAG_INT16, kind: "String" })
    ));
    let unknown = Node::with_tag(0xee, Value::Null);
    assert!(matches!(encode(&unknown), Err(ViewStateError::UnknownTag { tag: 0xee, .. })));
}
