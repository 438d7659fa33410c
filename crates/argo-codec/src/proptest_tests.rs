//! Property-based round-trip tests.

use argo_core::{IndexMap, Value};
use argo_wire::{Field, ScalarKind, WireType};
use proptest::prelude::*;

use crate::{CodecOptions, decode_desc, decode_value, encode_desc, encode_value};

/// Arbitrary JSON-shaped value, bytes included.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        // NaN != NaN
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(Value::Float),
        ".{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ];

    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
            prop::collection::vec(("[a-d]{1,3}", inner), 0..8)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<IndexMap<_, _>>())),
        ]
    })
}

/// Small wire type trees, empty records and omittable fields included.
fn arb_wire_type() -> impl Strategy<Value = WireType> {
    let leaf = prop_oneof![
        Just(WireType::INT32),
        Just(WireType::INT64),
        Just(WireType::STRING),
        Just(WireType::ID),
        Just(WireType::BYTES),
        Just(WireType::BOOLEAN),
        Just(WireType::DESC),
        Just(WireType::Record(Vec::new())),
    ];

    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(WireType::array),
            inner.clone().prop_map(WireType::nullable),
            inner.clone().prop_map(WireType::block),
            prop::collection::vec((inner, any::<bool>()), 0..4).prop_map(|fields| {
                WireType::record(
                    fields
                        .into_iter()
                        .enumerate()
                        .map(|(i, (of, omittable))| Field::new(format!("f{i}"), of).omittable(omittable)),
                )
            }),
        ]
    })
}

/// Values that fit `ty`. Strings come from a tiny alphabet so dictionaries get hits.
fn arb_value_of(ty: &WireType) -> BoxedStrategy<Value> {
    match ty {
        WireType::Scalar(ScalarKind::Int32) => any::<i32>().prop_map(|n| Value::Int(n.into())).boxed(),
        WireType::Scalar(ScalarKind::Int64) => any::<i64>().prop_map(Value::Int).boxed(),
        WireType::Scalar(ScalarKind::Float64) => any::<f64>()
            .prop_filter("not NaN", |f| !f.is_nan())
            .prop_map(Value::Float)
            .boxed(),
        WireType::Scalar(ScalarKind::String | ScalarKind::Id) => "[ab]{0,2}".prop_map(Value::String).boxed(),
        WireType::Scalar(ScalarKind::Bytes) => prop::collection::vec(0u8..2, 0..2).prop_map(Value::Bytes).boxed(),
        WireType::Scalar(ScalarKind::Boolean) => any::<bool>().prop_map(Value::Bool).boxed(),
        WireType::SelfDescribing => arb_value().boxed(),
        WireType::Nullable(inner) => prop_oneof![Just(Value::Null), arb_value_of(inner)].boxed(),
        WireType::Array(element) => prop::collection::vec(arb_value_of(element), 0..4)
            .prop_map(Value::List)
            .boxed(),
        WireType::Block(inner) => arb_value_of(inner),
        WireType::Record(fields) => {
            let entries: Vec<BoxedStrategy<Option<(String, Value)>>> = fields
                .iter()
                .map(|field| {
                    let name = field.name.clone();
                    let present = arb_value_of(&field.of).prop_map(move |v| Some((name.clone(), v)));
                    if field.omittable {
                        prop_oneof![Just(None), present].boxed()
                    } else {
                        present.boxed()
                    }
                })
                .collect();
            entries
                .prop_map(|entries| Value::Object(entries.into_iter().flatten().collect()))
                .boxed()
        }
    }
}

fn typed_roundtrip(ty: &WireType, v: &Value, options: CodecOptions) -> Value {
    let mut buf = encode_value(ty, v, options).expect("encoding should succeed");
    buf.compact().expect("compact once");
    let bytes = buf.into_bytes().expect("compacted");
    decode_value(ty, &bytes, options).expect("decoding should succeed")
}

proptest! {
    #[test]
    fn desc_roundtrip(v in arb_value(), dedup in any::<bool>()) {
        let options = CodecOptions::new().deduplicate(dedup);
        let bytes = encode_desc(&v, options).expect("encoding should succeed");
        let decoded = decode_desc(&bytes, options).expect("decoding should succeed");
        prop_assert_eq!(v, decoded);
    }

    #[test]
    fn nullable_string_list_roundtrip(items in prop::collection::vec(prop::option::of("[a-c]{0,3}"), 0..32)) {
        let ty = WireType::array(WireType::nullable(WireType::STRING));
        let v = Value::List(items.into_iter().map(|s| s.map_or(Value::Null, Value::String)).collect());
        prop_assert_eq!(typed_roundtrip(&ty, &v, CodecOptions::default()), v);
    }

    #[test]
    fn int_record_roundtrip(a in any::<i32>(), b in prop::option::of(any::<i64>()), c in any::<f64>().prop_filter("not NaN", |f| !f.is_nan())) {
        let ty = WireType::record([
            argo_wire::Field::new("a", WireType::INT32),
            argo_wire::Field::new("b", WireType::nullable(WireType::INT64)),
            argo_wire::Field::new("c", WireType::FLOAT64).omittable(true),
        ]);
        let v = Value::object([
            ("a", Value::Int(a.into())),
            ("b", b.map_or(Value::Null, Value::Int)),
            ("c", Value::Float(c)),
        ]);
        prop_assert_eq!(typed_roundtrip(&ty, &v, CodecOptions::default()), v);
    }

    #[test]
    fn repeats_cost_one_byte_each(s in "[a-z]{1,20}", n in 1usize..50) {
        let ty = WireType::array(WireType::STRING);
        let v = Value::List(vec![Value::String(s.clone()); n]);
        let mut buf = encode_value(&ty, &v, CodecOptions::default()).expect("encoding should succeed");
        buf.compact().expect("compact once");
        let count_len = argo_wire::varint::varint_len(n as i64);
        // header, count, one literal, n - 1 single-byte back-references
        prop_assert_eq!(buf.len(), 4 + count_len + 1 + s.len() + (n - 1));
    }

    #[test]
    fn arbitrary_wire_type_roundtrip(
        (ty, v) in arb_wire_type().prop_flat_map(|ty| {
            let values = arb_value_of(&ty);
            (Just(ty), values)
        }),
        dedup in any::<bool>(),
    ) {
        let options = CodecOptions::new().deduplicate(dedup);
        prop_assert_eq!(typed_roundtrip(&ty, &v, options), v);
    }
}
