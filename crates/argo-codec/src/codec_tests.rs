use argo_core::{ExecutionResult, FieldError, Value};
use argo_wire::{BufferError, Field, WireType};
use indoc::indoc;
use serde_json::json;

use crate::{CodecOptions, DecodeError, EncodeError, ExecutionResultCodec, decode_value, encode_value};

const SCHEMA: &str = indoc! {r#"
    scalar Json
    scalar Blob @ArgoCodec(codec: BYTES)

    type Item { id: ID!, label: String }

    type Query {
      a: Int!
      b: String
      big: Float
      items: [Item]
      blob: Blob
      meta: Json
    }
"#};

fn codec(query: &str) -> ExecutionResultCodec {
    ExecutionResultCodec::from_text(SCHEMA, query, None).unwrap()
}

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn roundtrip(codec: &ExecutionResultCodec, result: &ExecutionResult) -> ExecutionResult {
    let bytes = codec.encode_to_vec(result).unwrap();
    codec.decode(&bytes).unwrap()
}

fn encode_plain(ty: &WireType, v: &Value) -> Vec<u8> {
    let mut buf = encode_value(ty, v, CodecOptions::default()).unwrap();
    buf.compact().unwrap();
    buf.into_bytes().unwrap()
}

#[test]
fn scalar_fields_roundtrip_with_nulls() {
    let codec = codec("{ a b }");
    let result = ExecutionResult::new(value(json!({"a": 3, "b": null})));
    let bytes = codec.encode_to_vec(&result).unwrap();

    // header, NON_NULL for data, a = 3, b = NULL
    assert_eq!(bytes, [b'A', b'R', 1, 0, 0x00, 0x06, 0x01]);

    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded.data, result.data);
    assert!(decoded.errors.is_empty());
    assert_eq!(decoded.extensions, None);
}

#[test]
fn null_data_roundtrip() {
    let codec = codec("{ a }");
    let result = ExecutionResult::new(Value::Null);
    assert_eq!(roundtrip(&codec, &result), result);
}

#[test]
fn repeated_strings_are_written_once() {
    let ty = WireType::array(WireType::STRING);
    let v = value(json!(["x", "x", "y"]));
    let bytes = encode_plain(&ty, &v);

    // count 3, literal "x", back-reference to id 0, literal "y"
    assert_eq!(&bytes[4..], [0x06, 0x02, b'x', 0x07, 0x02, b'y']);
    assert_eq!(decode_value(&ty, &bytes, CodecOptions::default()), Ok(v.clone()));

    let plain = encode_value(&ty, &v, CodecOptions::new().deduplicate(false)).unwrap();
    assert!(plain.total_len() > bytes.len());
}

#[test]
fn dictionaries_are_per_kind() {
    let ty = WireType::record([
        Field::new("s", WireType::STRING),
        Field::new("i", WireType::ID),
        Field::new("again", WireType::STRING),
    ]);
    let v = value(json!({"s": "k", "i": "k", "again": "k"}));
    let bytes = encode_plain(&ty, &v);
    // ID does not reuse the STRING entry; the second STRING does
    assert_eq!(&bytes[4..], [0x02, b'k', 0x02, b'k', 0x07]);
    assert_eq!(decode_value(&ty, &bytes, CodecOptions::default()), Ok(v));
}

#[test]
fn no_dedup_sets_header_flag_and_decodes() {
    let ty = WireType::array(WireType::STRING);
    let v = value(json!(["x", "x"]));
    let mut buf = encode_value(&ty, &v, CodecOptions::new().deduplicate(false)).unwrap();
    buf.compact().unwrap();
    let bytes = buf.into_bytes().unwrap();
    assert_eq!(bytes[3], argo_wire::header::flags::NO_DEDUP);
    assert_eq!(&bytes[4..], [0x04, 0x02, b'x', 0x02, b'x']);
    assert_eq!(decode_value(&ty, &bytes, CodecOptions::default()), Ok(v));
}

#[test]
fn back_reference_to_unassigned_id_is_corrupt() {
    let ty = WireType::array(WireType::STRING);
    let bytes = [b'A', b'R', 1, 0, 0x02, 0x07];
    assert_eq!(
        decode_value(&ty, &bytes, CodecOptions::default()),
        Err(DecodeError::DictionaryMiss { kind: "STRING", id: 0 })
    );
}

#[test]
fn record_fields_follow_query_order() {
    let codec = codec("{ b a }");
    let result = ExecutionResult::new(value(json!({"a": 1, "b": "x"})));
    let decoded = roundtrip(&codec, &result);
    let keys: Vec<_> = decoded.data.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["b", "a"]);
}

#[test]
fn nested_lists_and_records() {
    let codec = codec("{ items { id label } }");
    let result = ExecutionResult::new(value(json!({
        "items": [
            {"id": "1", "label": "one"},
            null,
            {"id": "2", "label": null},
        ]
    })));
    assert_eq!(roundtrip(&codec, &result), result);

    let empty = ExecutionResult::new(value(json!({"items": []})));
    assert_eq!(roundtrip(&codec, &empty), empty);
}

#[test]
fn omittable_fields_roundtrip_absent_and_present() {
    let codec = codec("query ($x: Boolean!) { a @include(if: $x) b @skip(if: $x) }");
    let absent = ExecutionResult::new(value(json!({})));
    assert_eq!(roundtrip(&codec, &absent), absent);

    let present = ExecutionResult::new(value(json!({"a": 7, "b": null})));
    assert_eq!(roundtrip(&codec, &present), present);
}

#[test]
fn custom_scalars_and_floats() {
    let codec = codec("{ big blob meta }");
    let result = ExecutionResult::new(value(json!({
        "big": 2.5,
        "blob": "aGVsbG8=",
        "meta": {"nested": [1, "two", 3.0, true, null]},
    })));
    let decoded = roundtrip(&codec, &result);
    assert_eq!(decoded.data.get("big"), Some(&Value::Float(2.5)));
    assert_eq!(decoded.data.get("blob"), Some(&Value::Bytes(b"hello".to_vec())));
    assert_eq!(decoded.data.get("meta"), result.data.get("meta"));
}

#[test]
fn integer_accepted_at_float_position() {
    let codec = codec("{ big }");
    let decoded = roundtrip(&codec, &ExecutionResult::new(value(json!({"big": 4}))));
    assert_eq!(decoded.data.get("big"), Some(&Value::Float(4.0)));
}

#[test]
fn extensions_roundtrip() {
    let codec = codec("{ a }");
    let result = ExecutionResult::new(value(json!({"a": 1})))
        .with_extensions(value(json!({"cost": 12, "trace": ["x", "x"]})));
    assert_eq!(roundtrip(&codec, &result), result);
}

#[test]
fn encode_leaves_buffer_uncompacted() {
    let codec = codec("{ a }");
    let mut buf = codec
        .encode(&ExecutionResult::new(value(json!({"a": 1}))))
        .unwrap();
    assert!(!buf.is_compacted());
    assert_eq!(buf.as_bytes(), Err(BufferError::NotCompacted));
    buf.compact().unwrap();
    assert_eq!(buf.compact(), Err(BufferError::AlreadyCompacted));
}

#[test]
fn value_shape_mismatches() {
    let codec = codec("{ a b }");
    let encode = |json: serde_json::Value| codec.encode(&ExecutionResult::new(value(json))).err();

    assert_eq!(
        encode(json!({"a": "3", "b": null})),
        Some(EncodeError::Mismatch {
            path: "a".into(),
            expected: "INT32",
            found: "string"
        })
    );
    assert_eq!(
        encode(json!([1])),
        Some(EncodeError::Mismatch {
            path: "$".into(),
            expected: "RECORD",
            found: "list"
        })
    );
    assert_eq!(
        encode(json!({"b": null})),
        Some(EncodeError::MissingField { path: "a".into() })
    );
    assert_eq!(
        encode(json!({"a": 1, "b": null, "c": 2})),
        Some(EncodeError::UnexpectedField {
            path: "$".into(),
            field: "c".into()
        })
    );
    assert_eq!(
        encode(json!({"a": 5_000_000_000i64, "b": null})),
        Some(EncodeError::OutOfRange {
            path: "a".into(),
            value: 5_000_000_000
        })
    );
}

#[test]
fn error_messages() {
    let codec = codec("{ a b }");
    let encode = |json: serde_json::Value| {
        codec
            .encode(&ExecutionResult::new(value(json)))
            .unwrap_err()
            .to_string()
    };
    let decode = decode_value(&WireType::BOOLEAN, &[b'A', b'R', 1, 0, 0x04], CodecOptions::default())
        .unwrap_err()
        .to_string();

    let messages = [
        encode(json!({"a": "3", "b": null})),
        encode(json!({"a": 1, "b": null, "c": 2})),
        encode(json!({"a": 5_000_000_000i64, "b": null})),
        decode,
    ];
    insta::assert_snapshot!(messages.join("\n"), @r"
    at a: expected INT32, found string
    at $: unexpected field `c`
    at a: 5000000000 does not fit in INT32
    unexpected label 2 at offset 4, expected BOOLEAN
    ");
}

#[test]
fn invalid_base64_is_rejected() {
    let codec = codec("{ blob }");
    let err = codec
        .encode(&ExecutionResult::new(value(json!({"blob": "not base64!"}))))
        .unwrap_err();
    assert_eq!(err, EncodeError::InvalidBytes { path: "blob".into() });
}

#[test]
fn truncated_message_is_corrupt() {
    let codec = codec("{ a b }");
    let bytes = codec
        .encode_to_vec(&ExecutionResult::new(value(json!({"a": 3, "b": "hello"}))))
        .unwrap();
    // header, NON_NULL and `a`; the label of `b` is cut off
    let err = codec.decode(&bytes[..6]).unwrap_err();
    assert!(matches!(err, DecodeError::Buffer(BufferError::UnexpectedEnd { .. })), "{err:?}");
}

#[test]
fn bad_header_is_corrupt() {
    let codec = codec("{ a }");
    assert!(matches!(
        codec.decode(b"XY\x01\x00\x00"),
        Err(DecodeError::Header(argo_wire::HeaderError::BadMagic(_)))
    ));
}

#[test]
fn unexpected_label_at_boolean() {
    let ty = WireType::BOOLEAN;
    let bytes = [b'A', b'R', 1, 0, 0x04];
    assert_eq!(
        decode_value(&ty, &bytes, CodecOptions::default()),
        Err(DecodeError::UnexpectedLabel {
            expected: "BOOLEAN",
            label: 2,
            offset: 4
        })
    );
}

#[test]
fn oversized_count_is_corrupt() {
    let ty = WireType::array(WireType::INT64);
    // count 1000 with no elements behind it
    let bytes = [b'A', b'R', 1, 0, 0xD0, 0x0F];
    assert_eq!(
        decode_value(&ty, &bytes, CodecOptions::default()),
        Err(DecodeError::LengthOverflow {
            len: 1000,
            remaining: 0
        })
    );
}

#[test]
fn block_wire_type_roundtrip() {
    let ty = WireType::record([
        Field::new("head", WireType::STRING),
        Field::new("body", WireType::block(WireType::array(WireType::STRING))),
        Field::new("tail", WireType::STRING),
    ]);
    let v = value(json!({"head": "x", "body": ["x", "y"], "tail": "x"}));
    let bytes = encode_plain(&ty, &v);
    assert_eq!(decode_value(&ty, &bytes, CodecOptions::default()), Ok(v));
}

#[test]
fn arrays_of_empty_records_roundtrip() {
    let ty = WireType::array(WireType::Record(Vec::new()));
    let v = value(json!([{}, {}, {}]));
    let bytes = encode_plain(&ty, &v);
    // header and the count; the elements take no bytes
    assert_eq!(bytes, [b'A', b'R', 1, 0, 0x06]);
    assert_eq!(decode_value(&ty, &bytes, CodecOptions::default()), Ok(v));

    let nested = WireType::record([
        Field::new("empty", WireType::Record(Vec::new())),
        Field::new("grid", WireType::array(WireType::array(WireType::Record(Vec::new())))),
        Field::new("n", WireType::INT32),
    ]);
    let v = value(json!({"empty": {}, "grid": [[{}, {}], [], [{}]], "n": 7}));
    let bytes = encode_plain(&nested, &v);
    assert_eq!(decode_value(&nested, &bytes, CodecOptions::default()), Ok(v));
}

#[test]
fn field_error_detached_when_not_at_null() {
    let codec = codec("{ a b }");
    let result = ExecutionResult::new(value(json!({"a": 1, "b": "ok"}))).with_errors(vec![
        FieldError::new("request failed"),
        FieldError::new("deep").with_path(["a"]),
    ]);
    assert_eq!(roundtrip(&codec, &result), result);
}
