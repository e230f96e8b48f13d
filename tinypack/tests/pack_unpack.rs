//! End-to-end tests for the pack/unpack envelope

use proptest::prelude::*;
use serde_json::json;
use tinypack::bridge::decode_database;
use tinypack::{
    pack, unpack, unpack_value, Envelope, FnLeafCodec, Leaf, PackError, PackOptions, StringDatabase,
    UnpackOptions, Value,
};
use tinypack_codec::{deserialize, serialize, with_bytes_codec, SerializeOptions};
use tinypack_format::varint::{decode_zigzag_i64, write_zigzag_i64};
use tinypack_test_utils::{
    arb_string_free_value, arb_value, sample_document, string_free_values, ObjectBuilder,
    Timestamp,
};

fn timestamp_codec() -> FnLeafCodec {
    FnLeafCodec::new(
        0x40,
        "timestamp",
        |value| {
            value.downcast_leaf::<Timestamp>().map(|ts| {
                let mut out = Vec::new();
                write_zigzag_i64(&mut out, ts.0);
                Ok(out)
            })
        },
        |payload| {
            let (millis, _) = decode_zigzag_i64(payload)?;
            Ok(Value::Leaf(Leaf::new(Timestamp(millis))))
        },
    )
}

fn roundtrip(value: &Value) -> Value {
    let packed = pack(value.clone(), &PackOptions::default()).expect("pack");
    unpack(&packed, &UnpackOptions::default()).expect("unpack")
}

/// Split a framed payload into its rebuilt database and raw value bytes
fn open_envelope(packed: &[u8]) -> (StringDatabase, Vec<u8>) {
    let de = UnpackOptions::default().deserialize_options();
    match Envelope::inspect(deserialize(packed, &de).expect("outer")) {
        Envelope::Framed { database, payload } => (
            decode_database(&database, &de).expect("database"),
            payload.to_vec(),
        ),
        Envelope::Bare(value) => panic!("expected framed payload, got {value:?}"),
    }
}

#[test]
fn nested_object_round_trips() {
    let value = ObjectBuilder::new()
        .string("name", "test")
        .value("nested", ObjectBuilder::new().int("number", 42).build())
        .build();

    assert_eq!(roundtrip(&value), value);

    let packed = pack(value, &PackOptions::default()).unwrap();
    let (db, _) = open_envelope(&packed);
    assert_eq!(db.as_slice(), ["name", "test", "nested", "number"]);
}

#[test]
fn string_free_values_pack_to_plain_serialization() {
    let direct_opts = SerializeOptions {
        serializers: with_bytes_codec(&[]),
        ..SerializeOptions::default()
    };

    for value in string_free_values() {
        let packed = pack(value.clone(), &PackOptions::default()).unwrap();
        let direct = serialize(&value, &direct_opts).unwrap().bytes;
        assert_eq!(packed, direct, "{value:?}");
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn strings_are_framed_as_two_buffers() {
    let packed = pack(Value::object([("a", "hello")]), &PackOptions::default()).unwrap();

    let outer = deserialize(&packed, &UnpackOptions::default().deserialize_options()).unwrap();
    let items = outer.as_array().expect("array envelope");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(Value::is_bytes));

    let (db, payload) = open_envelope(&packed);
    assert_eq!(db.as_slice(), ["a", "hello"]);
    // {StringRef 0: StringRef 1}
    assert_eq!(payload, vec![9, 1, 7, 0, 7, 1]);
}

#[test]
fn key_only_strings_still_frame() {
    let value = Value::object([("count", Value::Int(3))]);
    let packed = pack(value.clone(), &PackOptions::default()).unwrap();
    let (db, _) = open_envelope(&packed);
    assert_eq!(db.as_slice(), ["count"]);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn caller_codec_claims_bytes_first() {
    const TAGGED_BYTES_ID: u64 = 0x50;

    let tagged_bytes = || {
        FnLeafCodec::new(
            TAGGED_BYTES_ID,
            "tagged-bytes",
            |value| {
                value.as_bytes().map(|b| {
                    let mut out = vec![0xAB];
                    out.extend_from_slice(b);
                    Ok(out)
                })
            },
            |payload| match payload.split_first() {
                Some((0xAB, rest)) => Ok(Value::from(rest.to_vec())),
                _ => Err(PackError::CorruptPayload("missing marker".to_string())),
            },
        )
    };

    let value = Value::array([Value::from(vec![1u8, 2]), Value::Int(0)]);
    let packed = pack(value.clone(), &PackOptions::default().with_serializer(tagged_bytes()))
        .unwrap();

    assert!(matches!(
        unpack_value(&packed, &UnpackOptions::default()),
        Err(PackError::UnknownLeafCodec(TAGGED_BYTES_ID))
    ));
    let back = unpack_value(
        &packed,
        &UnpackOptions::default().with_deserializer(tagged_bytes()),
    )
    .unwrap();
    assert_eq!(back, value);
}

#[test]
fn repeated_strings_are_stored_once() {
    let value = Value::array(["alpha", "beta", "alpha", "alpha", "beta"]);
    let packed = pack(value.clone(), &PackOptions::default()).unwrap();
    let (db, _) = open_envelope(&packed);
    assert_eq!(db.as_slice(), ["alpha", "beta"]);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn repacking_is_idempotent() {
    let doc = sample_document();
    let first = pack(doc, &PackOptions::default()).unwrap();
    let back: Value = unpack(&first, &UnpackOptions::default()).unwrap();
    let second = pack(back, &PackOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn seeded_database_is_extended() {
    let opts =
        PackOptions::default().with_string_database(StringDatabase::from_strings(["x", "y"]));
    let value = Value::object([("a", "hello")]);
    let packed = pack(value.clone(), &opts).unwrap();

    let (db, _) = open_envelope(&packed);
    assert_eq!(db.as_slice(), ["x", "y", "a", "hello"]);

    // The envelope carries the whole database, seed included.
    let back: Value = unpack(&packed, &UnpackOptions::default()).unwrap();
    assert_eq!(back, value);
}

#[test]
fn seeded_database_frames_string_free_values() {
    let opts = PackOptions::default().with_string_database(StringDatabase::from_strings(["x"]));
    let value = Value::array([1, 2]);
    let packed = pack(value.clone(), &opts).unwrap();
    let (db, _) = open_envelope(&packed);
    assert_eq!(db.len(), 1);
    assert_eq!(unpack_value(&packed, &UnpackOptions::default()).unwrap(), value);
}

#[test]
fn carried_database_wins_over_caller_database() {
    let value = Value::object([("a", "hello")]);
    let packed = pack(value.clone(), &PackOptions::default()).unwrap();

    let opts = UnpackOptions::default()
        .with_string_database(StringDatabase::from_strings(["wrong", "strings"]));
    let back: Value = unpack(&packed, &opts).unwrap();
    assert_eq!(back, value);
}

#[test]
fn envelope_shaped_value_round_trips() {
    let value = Value::array([Value::from(vec![1u8, 2, 3]), Value::from(vec![4u8])]);
    assert_eq!(roundtrip(&value), value);

    let empty = Value::array([Value::from(Vec::<u8>::new()), Value::from(Vec::<u8>::new())]);
    assert_eq!(roundtrip(&empty), empty);
}

#[test]
fn plain_text_packs_bare() {
    let value = sample_document();
    let packed = pack(value.clone(), &PackOptions::default().with_plain_text(true)).unwrap();

    let outer = deserialize(&packed, &UnpackOptions::default().deserialize_options()).unwrap();
    assert_eq!(outer, value);
    assert_eq!(
        unpack_value(&packed, &UnpackOptions::default()).unwrap(),
        value
    );
}

#[test]
fn shared_composites_shrink_output() {
    let address = ObjectBuilder::new()
        .string("street", "Rua Augusta")
        .int("number", 12)
        .build();
    let value = Value::array(vec![address; 8]);

    let shared = pack(value.clone(), &PackOptions::default()).unwrap();
    let plain = pack(value.clone(), &PackOptions::default().with_plain_object(true)).unwrap();
    assert!(shared.len() < plain.len());

    assert_eq!(unpack_value(&shared, &UnpackOptions::default()).unwrap(), value);
    assert_eq!(unpack_value(&plain, &UnpackOptions::default()).unwrap(), value);
}

#[test]
fn custom_leaf_codec_round_trips() {
    let value = ObjectBuilder::new()
        .string("event", "login")
        .value("at", Leaf::new(Timestamp(1_700_000_000_000)))
        .build();

    let packed = pack(
        value.clone(),
        &PackOptions::default().with_serializer(timestamp_codec()),
    )
    .unwrap();
    let back: Value = unpack(
        &packed,
        &UnpackOptions::default().with_deserializer(timestamp_codec()),
    )
    .unwrap();

    assert_eq!(back, value);
    assert_eq!(
        back.get("at").and_then(Value::downcast_leaf::<Timestamp>),
        Some(&Timestamp(1_700_000_000_000))
    );
}

#[test]
fn json_documents_round_trip() {
    let doc = json!({
        "id": 7,
        "name": "widget",
        "tags": ["a", "b", "a"],
        "price": 9.5,
        "meta": {"active": true, "owner": null},
    });

    let packed = pack(doc.clone(), &PackOptions::default()).unwrap();
    let back: serde_json::Value = unpack(&packed, &UnpackOptions::default()).unwrap();
    assert_eq!(back, doc);
}

proptest! {
    #[test]
    fn prop_pack_round_trips(value in arb_value()) {
        prop_assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn prop_repacking_is_idempotent(value in arb_value()) {
        let first = pack(value, &PackOptions::default()).unwrap();
        let back = unpack_value(&first, &UnpackOptions::default()).unwrap();
        let second = pack(back, &PackOptions::default()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_string_free_values_round_trip(value in arb_string_free_value()) {
        prop_assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn prop_unpack_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = unpack_value(&bytes, &UnpackOptions::default());
    }
}
