use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;

use viewstate::{encode, encoded_len, leaves, parse, replace, walk, ElementType, Node, Value};

// ── Strategies ──────────────────────────────────────────────────────────

fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::null()),
        any::<bool>().prop_map(Node::boolean),
        any::<i16>().prop_map(Node::int16),
        any::<i32>().prop_map(Node::int32),
        any::<u8>().prop_map(Node::byte),
        any::<char>().prop_map(Node::char),
        ".{0,40}".prop_map(|s| Node::string(s)),
        any::<u8>().prop_map(|i| Node::new(Value::IndexedString(i))),
        any::<i64>().prop_map(|t| Node::new(Value::DateTime(t))),
        any::<f64>().prop_map(Node::double),
        any::<f32>().prop_map(|x| Node::new(Value::Single(x))),
        vec(".{0,8}", 0..5).prop_map(Node::string_array),
    ]
}

fn arb_element_type() -> impl Strategy<Value = ElementType> {
    prop::sample::select(ElementType::ALL.to_vec())
}

fn arb_node() -> impl Strategy<Value = Node> {
    arb_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Node::pair(a, b)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, c)| Node::triple(a, b, c)),
            vec(inner.clone(), 0..6).prop_map(Node::list),
            (arb_element_type(), 0u32..100, vec(inner, 0..6))
                .prop_map(|(t, declared, data)| Node::array(t, declared, data)),
        ]
    })
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn encode_then_parse_is_identity(node in arb_node()) {
        let bytes = encode(&node).unwrap();
        prop_assert_eq!(bytes.len(), encoded_len(&node));
        let (decoded, end) = parse(&bytes).unwrap();
        prop_assert_eq!(end, bytes.len());
        prop_assert_eq!(&decoded, &node);
        prop_assert_eq!(encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn spans_slice_out_each_node_encoding(node in arb_node(), pad in vec(any::<u8>(), 0..8)) {
        let mut buf = pad.clone();
        buf.extend(encode(&node).unwrap());
        let (decoded, _) = viewstate::parse_at(&buf, pad.len()).unwrap();
        for (_, n) in walk(&decoded) {
            let span = n.span.unwrap();
            prop_assert_eq!(span.slice(&buf), Some(&encode(n).unwrap()[..]));
        }
    }

    #[test]
    fn replacing_a_leaf_is_local(node in arb_node(), with in arb_leaf(), pick in any::<Index>()) {
        let blob = encode(&node).unwrap();
        let (root, _) = parse(&blob).unwrap();
        let found: Vec<&Node> = leaves(&root).collect();
        prop_assume!(!found.is_empty());
        let i = pick.index(found.len());
        let old = found[i].span.unwrap();

        let out = replace(&blob, old.start, &with).unwrap();
        let new_len = encode(&with).unwrap().len();
        prop_assert_eq!(&out[..old.start], &blob[..old.start]);
        prop_assert_eq!(&out[old.start + new_len..], &blob[old.end..]);

        let (patched, end) = parse(&out).unwrap();
        prop_assert_eq!(end, out.len());
        let swapped = leaves(&patched).nth(i);
        prop_assert_eq!(swapped, Some(&with));
    }
}
