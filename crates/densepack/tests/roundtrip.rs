// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end round trips through the public facade: typed fast path,
// dynamic model-driven path, nested composites, nullable slots, wrapper
// registration, and randomized integer grids.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;

use densepack::{
    decode, decode_value, encode, encode_value, register_wrapper, Bytes, CodecError, Decimal,
    EnumRepr, ModelBuilder, ModelRegistry, Packable, Record, Result, SerialDate, TypeKind, Value,
};

fn round_trip<T: Packable + std::any::Any + PartialEq + std::fmt::Debug>(value: T) {
    let bytes = encode(&value).expect("encode should succeed");
    let back: T = decode(&bytes).expect("decode should succeed");
    assert_eq!(back, value);
}

#[test]
fn typed_primitives_round_trip() {
    round_trip(true);
    round_trip(false);
    round_trip(0u8);
    round_trip(255u8);
    round_trip(-128i8);
    round_trip(u16::MAX);
    round_trip(i16::MIN);
    round_trip(u32::MAX);
    round_trip(i32::MIN);
    round_trip(u64::MAX);
    round_trip(i64::MIN);
    round_trip(3.5f32);
    round_trip(-0.25f64);
    round_trip('A');
    round_trip('语');
    round_trip(Decimal::from_bits([7; 16]));
    round_trip(SerialDate::from_days(45_000.5));
}

#[test]
fn typed_strings_and_containers_round_trip() {
    round_trip(String::new());
    round_trip(String::from("héllo wörld"));
    round_trip(Bytes(vec![0u8, 1, 2, 255]));
    round_trip(vec![1u32, 100, 10_000, 1_000_000]);
    round_trip(vec![String::from("a"), String::new(), String::from("c")]);

    let mut map = HashMap::new();
    map.insert(String::from("one"), 1i64);
    map.insert(String::from("minus"), -1i64);
    round_trip(map);
}

#[test]
fn typed_nullable_slots_round_trip() {
    round_trip(Some(String::from("present")));
    round_trip(None::<String>);
    round_trip(Some(vec![1u8, 2]));
    round_trip(None::<Vec<u8>>);
    round_trip(None::<Bytes>);
}

#[test]
fn large_string_survives_outer_pass() {
    // Forces buffer growth past one block and gives deflate real work.
    let value = "densepack ".repeat(10_000);
    let bytes = encode(&value).expect("encode should succeed");
    assert!(bytes.len() < value.len());
    let back: String = decode(&bytes).expect("decode should succeed");
    assert_eq!(back, value);
}

#[test]
fn scalar_payloads_are_not_deflated() {
    // Width-compressed form only: one tag byte plus the narrowed value.
    assert_eq!(encode(&100u32).expect("encode"), vec![0, 100]);
    assert_eq!(encode(&-5i32).expect("encode"), vec![1, 0xFB]);
    assert_eq!(encode(&true).expect("encode"), vec![1]);
}

#[test]
fn randomized_integer_grid_round_trips() {
    fastrand::seed(0xD15EA5E);
    for _ in 0..2_000 {
        round_trip(fastrand::u64(..));
        round_trip(fastrand::i64(..));
        round_trip(fastrand::u32(..));
        round_trip(fastrand::i32(..));
        // Small magnitudes hit the narrow cascade arms.
        round_trip(fastrand::i64(-300..300));
        round_trip(fastrand::u64(0..70_000));
    }
}

#[test]
fn custom_struct_fast_path() {
    #[derive(Debug, Clone, PartialEq)]
    struct Telemetry {
        seq: u64,
        source: String,
        samples: Vec<f64>,
    }

    impl Packable for Telemetry {
        fn pack(&self, writer: &mut densepack::wire::Writer) -> Result<()> {
            self.seq.pack(writer)?;
            self.source.pack(writer)?;
            self.samples.pack(writer)
        }

        fn unpack(reader: &mut densepack::wire::Reader<'_>) -> Result<Self> {
            Ok(Self {
                seq: u64::unpack(reader)?,
                source: String::unpack(reader)?,
                samples: Vec::unpack(reader)?,
            })
        }
    }

    round_trip(Telemetry {
        seq: 42,
        source: String::from("probe-7"),
        samples: vec![0.0, -1.5, 2.25],
    });
}

#[test]
fn registered_wrapper_takes_over() {
    #[derive(Debug, PartialEq)]
    struct Fahrenheit(i32);

    register_wrapper::<Fahrenheit, _, _>(
        "roundtrip-fahrenheit",
        |v, w| w.compress_write_i32(v.0),
        |r| Ok(Fahrenheit(r.decompress_read_signed()? as i32)),
    );

    impl Packable for Fahrenheit {
        fn pack(&self, _: &mut densepack::wire::Writer) -> Result<()> {
            panic!("wrapper must take priority");
        }
        fn unpack(_: &mut densepack::wire::Reader<'_>) -> Result<Self> {
            panic!("wrapper must take priority");
        }
    }

    let bytes = encode(&Fahrenheit(451)).expect("encode should succeed");
    let back: Fahrenheit = decode(&bytes).expect("decode should succeed");
    assert_eq!(back, Fahrenheit(451));
}

fn register_sensor_models() {
    ModelRegistry::global().register(
        ModelBuilder::new("roundtrip::Reading")
            .member(0, "channel", TypeKind::U8)
            .member(1, "value", TypeKind::F64)
            .build()
            .expect("model should build"),
    );
    ModelRegistry::global().register(
        ModelBuilder::new("roundtrip::Sensor")
            .member(0, "id", TypeKind::U32)
            .member(1, "label", TypeKind::Str)
            .member(2, "readings", TypeKind::Seq(Box::new(TypeKind::Record("roundtrip::Reading".into()))))
            .member(3, "attrs", TypeKind::Map(Box::new(TypeKind::Str), Box::new(TypeKind::Str)))
            .member(5, "state", TypeKind::Enum(EnumRepr::U8))
            .build()
            .expect("model should build"),
    );
}

#[test]
fn dynamic_object_graph_round_trip() {
    register_sensor_models();

    let reading_model = ModelRegistry::global()
        .resolve("roundtrip::Reading")
        .expect("model should resolve");
    let sensor_model = ModelRegistry::global()
        .resolve("roundtrip::Sensor")
        .expect("model should resolve");

    let mut readings = Vec::new();
    for (channel, value) in [(0u8, 21.5f64), (1, -3.25), (2, 0.0)] {
        let mut rec = Record::new(reading_model.clone());
        rec.set("channel", Value::U8(channel)).expect("set");
        rec.set("value", Value::F64(value)).expect("set");
        readings.push(Value::Record(rec));
    }

    let mut sensor = Record::new(sensor_model);
    sensor.set("id", Value::U32(9001)).expect("set");
    sensor
        .set("label", Value::Str("rooftop/north".into()))
        .expect("set");
    sensor.set("readings", Value::Seq(readings)).expect("set");
    sensor
        .set(
            "attrs",
            Value::Map(vec![(
                Value::Str("unit".into()),
                Value::Str("celsius".into()),
            )]),
        )
        .expect("set");
    sensor
        .set("state", Value::Enum { repr: EnumRepr::U8, value: 2 })
        .expect("set");

    let bytes = encode_value(&Value::Record(sensor)).expect("encode should succeed");
    let back = decode_value(&bytes, &TypeKind::Record("roundtrip::Sensor".into()))
        .expect("decode should succeed");

    let back = back.as_record().expect("record expected");
    assert_eq!(back.get("id"), &Value::U32(9001));
    assert_eq!(back.get("label"), &Value::Str("rooftop/north".into()));
    assert_eq!(
        back.get("state"),
        &Value::Enum { repr: EnumRepr::U8, value: 2 }
    );
    let readings = back.get("readings").as_seq().expect("seq expected");
    assert_eq!(readings.len(), 3);
    let first = readings[0].as_record().expect("record expected");
    assert_eq!(first.get("channel"), &Value::U8(0));
    assert_eq!(first.get("value"), &Value::F64(21.5));
}

#[test]
fn dynamic_null_policy() {
    ModelRegistry::global().register(
        ModelBuilder::new("roundtrip::Note")
            .member(0, "body", TypeKind::Str)
            .member(1, "priority", TypeKind::U8)
            .build()
            .expect("model should build"),
    );
    let model = ModelRegistry::global()
        .resolve("roundtrip::Note")
        .expect("model should resolve");

    // Nullable slot left unset encodes as empty; non-nullable unset fails.
    let mut rec = Record::new(model.clone());
    rec.set("priority", Value::U8(1)).expect("set");
    let bytes = encode_value(&Value::Record(rec)).expect("encode should succeed");
    let back = decode_value(&bytes, &TypeKind::Record("roundtrip::Note".into()))
        .expect("decode should succeed");
    assert_eq!(
        back.as_record().expect("record").get("body"),
        &Value::Str(String::new())
    );

    let rec = Record::new(model);
    let err = encode_value(&Value::Record(rec)).unwrap_err();
    assert!(matches!(err, CodecError::NullField { .. }));
}

#[test]
fn truncated_payload_is_rejected() {
    let bytes = encode(&String::from("this will be cut short")).expect("encode should succeed");
    let err = decode::<String>(&bytes[..bytes.len() / 2]).unwrap_err();
    match err {
        CodecError::Compress { .. } | CodecError::ReadFailed { .. } => {}
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn typed_and_dynamic_paths_agree_on_the_wire() {
    // Same logical payload through both paths must produce identical bytes.
    let typed = encode(&vec![10u32, 20, 30]).expect("encode should succeed");
    let dynamic = encode_value(&Value::Seq(vec![
        Value::U32(10),
        Value::U32(20),
        Value::U32(30),
    ]))
    .expect("encode should succeed");
    assert_eq!(typed, dynamic);
}
