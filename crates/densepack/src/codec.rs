// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Top-level encode/decode entry points.
//!
//! Two paths exist on both sides:
//! - the typed path ([`encode`]/[`decode`]) dispatches through the wrapper
//!   manifest first, falling back to the type's [`Packable`] impl;
//! - the dynamic path ([`encode_value`]/[`decode_value`]) walks a [`Value`]
//!   tree against registered [`TypeModel`]s.
//!
//! Both finish with the outer byte-compression pass, skipped for the fixed
//! set of primitive scalar types.

use std::any::Any;

use crate::compress;
use crate::error::{CodecError, Result};
use crate::manifest::{Packable, WrapperManifest};
use crate::model::{EnumRepr, MemberDescriptor, ModelRegistry, TypeKind};
use crate::value::{Record, Value};
use crate::wire::{Reader, Writer};

/// Install or replace the custom wrapper for `T`.
///
/// A registered wrapper takes priority over the type's own [`Packable`]
/// impl for every later [`encode`]/[`decode`] call on exactly this type.
pub fn register_wrapper<T, S, D>(type_name: &'static str, ser: S, de: D)
where
    T: Any,
    S: Fn(&T, &mut Writer) -> Result<()> + Send + Sync + 'static,
    D: Fn(&mut Reader<'_>) -> Result<T> + Send + Sync + 'static,
{
    WrapperManifest::global().register::<T, _, _>(type_name, ser, de);
}

/// Encode a typed value to its finished wire bytes.
pub fn encode<T: Packable + Any>(value: &T) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    match WrapperManifest::global().lookup::<T>() {
        Some(wrapper) => wrapper.serialize(value, &mut writer)?,
        None => value.pack(&mut writer)?,
    }
    if T::NO_COMPRESSION {
        Ok(writer.into_bytes())
    } else {
        writer.into_compressed_bytes()
    }
}

/// Decode a typed value from finished wire bytes.
pub fn decode<T: Packable + Any>(input: &[u8]) -> Result<T> {
    if T::NO_COMPRESSION {
        let mut reader = Reader::new(input);
        decode_from(&mut reader)
    } else {
        let bytes = compress::global().decompress(input)?;
        let mut reader = Reader::new(&bytes);
        decode_from(&mut reader)
    }
}

fn decode_from<T: Packable + Any>(reader: &mut Reader<'_>) -> Result<T> {
    match WrapperManifest::global().lookup::<T>() {
        Some(wrapper) => {
            let name = wrapper.type_name();
            let boxed = wrapper.deserialize(reader)?;
            match boxed.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(CodecError::InvalidOperation {
                    reason: format!("wrapper {} produced a value of the wrong type", name),
                }),
            }
        }
        None => T::unpack(reader),
    }
}

/// Encode a dynamic value to its finished wire bytes.
///
/// A record whose model has zero included members produces no bytes at all.
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    if let Value::Record(rec) = value {
        if !rec.model().valid() {
            log::debug!("[codec] skipping invalid model {}", rec.type_name());
            return Ok(Vec::new());
        }
    }
    let mut writer = Writer::new();
    write_value(&mut writer, value)?;
    if value.is_non_compressible_scalar() {
        Ok(writer.into_bytes())
    } else {
        writer.into_compressed_bytes()
    }
}

/// Decode a dynamic value of the given declared type from finished wire
/// bytes. Composite types must have their models registered first.
pub fn decode_value(input: &[u8], kind: &TypeKind) -> Result<Value> {
    if kind_skips_outer_pass(kind) {
        let mut reader = Reader::new(input);
        return read_value(&mut reader, kind);
    }
    // A zero-member record encoded to nothing; reconstruct it without
    // touching the decompressor.
    if input.is_empty() {
        if let TypeKind::Record(name) = kind {
            let model = ModelRegistry::global().resolve(name)?;
            if !model.valid() {
                return Ok(Value::Record(Record::new(model)));
            }
        }
    }
    let bytes = compress::global().decompress(input)?;
    let mut reader = Reader::new(&bytes);
    read_value(&mut reader, kind)
}

/// Types exempt from the outer pass. Mirrors
/// [`Value::is_non_compressible_scalar`]; enums count via their underlying
/// integer representation.
fn kind_skips_outer_pass(kind: &TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Bool
            | TypeKind::U8
            | TypeKind::I8
            | TypeKind::U16
            | TypeKind::I16
            | TypeKind::U32
            | TypeKind::I32
            | TypeKind::U64
            | TypeKind::I64
            | TypeKind::F32
            | TypeKind::F64
            | TypeKind::Char
            | TypeKind::Decimal
            | TypeKind::SerialDate
            | TypeKind::Enum(_)
    )
}

fn write_value(writer: &mut Writer, value: &Value) -> Result<()> {
    match value {
        Value::Bool(v) => writer.write_bool(*v),
        Value::U8(v) => writer.write_u8(*v),
        Value::I8(v) => writer.write_i8(*v),
        Value::U16(v) => writer.write_u16(*v),
        Value::I16(v) => writer.write_i16(*v),
        Value::U32(v) => writer.compress_write_u32(*v),
        Value::I32(v) => writer.compress_write_i32(*v),
        Value::U64(v) => writer.compress_write_u64(*v),
        Value::I64(v) => writer.compress_write_i64(*v),
        Value::F32(v) => writer.write_f32(*v),
        Value::F64(v) => writer.write_f64(*v),
        Value::Char(v) => writer.write_char(*v),
        Value::Str(v) => writer.write_str(v),
        Value::Decimal(v) => writer.write_decimal(*v),
        Value::SerialDate(v) => writer.write_serial_date(*v),
        Value::Bytes(v) => writer.write_byte_slice(v),
        Value::Seq(items) => {
            writer.write_length(items.len())?;
            for item in items {
                write_value(writer, item)?;
            }
            Ok(())
        }
        Value::Map(entries) => {
            writer.write_length(entries.len())?;
            for (key, val) in entries {
                write_value(writer, key)?;
                write_value(writer, val)?;
            }
            Ok(())
        }
        Value::Enum { repr, value } => write_enum(writer, *repr, *value),
        Value::Record(rec) => write_record(writer, rec),
        // Null outside a member slot has no declared type; it takes the
        // zero-count form shared by every nullable slot.
        Value::Null => writer.write_length(0),
    }
}

fn write_enum(writer: &mut Writer, repr: EnumRepr, value: i64) -> Result<()> {
    match repr {
        EnumRepr::U8 => writer.write_u8(value as u8),
        EnumRepr::I8 => writer.write_i8(value as i8),
        EnumRepr::U16 => writer.write_u16(value as u16),
        EnumRepr::I16 => writer.write_i16(value as i16),
        EnumRepr::U32 => writer.compress_write_u32(value as u32),
        EnumRepr::I32 => writer.compress_write_i32(value as i32),
        EnumRepr::U64 => writer.compress_write_u64(value as u64),
        EnumRepr::I64 => writer.compress_write_i64(value),
    }
}

fn write_record(writer: &mut Writer, rec: &Record) -> Result<()> {
    let model = rec.model().clone();
    if !model.valid() {
        return Ok(());
    }
    if model.include_all() {
        writer.write_length(model.member_count())?;
        for (_, member) in model.members() {
            writer.write_str(&member.name)?;
            writer.write_str(&member.kind.type_name())?;
            write_member(writer, rec, member)?;
        }
    } else {
        for index in model.min_index()..=model.max_index() {
            if let Some(member) = model.member(index) {
                write_member(writer, rec, member)?;
            }
        }
    }
    Ok(())
}

fn write_member(writer: &mut Writer, rec: &Record, member: &MemberDescriptor) -> Result<()> {
    let value = rec.get(&member.name);
    if value.is_null() {
        if member.kind.nullable() {
            return writer.write_length(0);
        }
        return Err(CodecError::NullField {
            type_name: rec.type_name().to_owned(),
            member: member.name.clone(),
        });
    }
    if !value_matches_kind(value, &member.kind) {
        return Err(CodecError::InvalidArgument {
            reason: format!(
                "member {} of {} is declared {} but holds a different value",
                member.name,
                rec.type_name(),
                member.kind.type_name()
            ),
        });
    }
    write_value(writer, value)
}

/// Shallow agreement check between a held value and its declared type.
/// Container elements are checked as they are written.
fn value_matches_kind(value: &Value, kind: &TypeKind) -> bool {
    match (value, kind) {
        (Value::Bool(_), TypeKind::Bool)
        | (Value::U8(_), TypeKind::U8)
        | (Value::I8(_), TypeKind::I8)
        | (Value::U16(_), TypeKind::U16)
        | (Value::I16(_), TypeKind::I16)
        | (Value::U32(_), TypeKind::U32)
        | (Value::I32(_), TypeKind::I32)
        | (Value::U64(_), TypeKind::U64)
        | (Value::I64(_), TypeKind::I64)
        | (Value::F32(_), TypeKind::F32)
        | (Value::F64(_), TypeKind::F64)
        | (Value::Char(_), TypeKind::Char)
        | (Value::Str(_), TypeKind::Str)
        | (Value::Decimal(_), TypeKind::Decimal)
        | (Value::SerialDate(_), TypeKind::SerialDate)
        | (Value::Bytes(_), TypeKind::Bytes)
        | (Value::Seq(_), TypeKind::Seq(_))
        | (Value::Map(_), TypeKind::Map(_, _)) => true,
        (Value::Enum { repr, .. }, TypeKind::Enum(declared)) => repr == declared,
        (Value::Record(rec), TypeKind::Record(name)) => rec.type_name() == &**name,
        _ => false,
    }
}

fn read_value(reader: &mut Reader<'_>, kind: &TypeKind) -> Result<Value> {
    Ok(match kind {
        TypeKind::Bool => Value::Bool(reader.read_bool()?),
        TypeKind::U8 => Value::U8(reader.read_u8()?),
        TypeKind::I8 => Value::I8(reader.read_i8()?),
        TypeKind::U16 => Value::U16(reader.read_u16()?),
        TypeKind::I16 => Value::I16(reader.read_i16()?),
        TypeKind::U32 => Value::U32(reader.decompress_read()? as u32),
        TypeKind::I32 => Value::I32(reader.decompress_read_signed()? as i32),
        TypeKind::U64 => Value::U64(reader.decompress_read()?),
        TypeKind::I64 => Value::I64(reader.decompress_read_signed()?),
        TypeKind::F32 => Value::F32(reader.read_f32()?),
        TypeKind::F64 => Value::F64(reader.read_f64()?),
        TypeKind::Char => Value::Char(reader.read_char()?),
        TypeKind::Decimal => Value::Decimal(reader.read_decimal()?),
        TypeKind::SerialDate => Value::SerialDate(reader.read_serial_date()?),
        // Null and empty share the zero-count wire form; both decode as the
        // empty value.
        TypeKind::Str => Value::Str(reader.read_str()?),
        TypeKind::Bytes => Value::Bytes(reader.read_byte_slice()?.to_vec()),
        TypeKind::Seq(elem) => {
            let len = reader.read_length()?;
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(read_value(reader, elem)?);
            }
            Value::Seq(items)
        }
        TypeKind::Map(key_kind, val_kind) => {
            let len = reader.read_length()?;
            let mut entries = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                let key = read_value(reader, key_kind)?;
                let val = read_value(reader, val_kind)?;
                entries.push((key, val));
            }
            Value::Map(entries)
        }
        TypeKind::Enum(repr) => Value::Enum {
            repr: *repr,
            value: read_enum(reader, *repr)?,
        },
        TypeKind::Record(name) => {
            let model = ModelRegistry::global().resolve(name)?;
            let mut rec = Record::new(model.clone());
            if !model.valid() {
                return Ok(Value::Record(rec));
            }
            if model.include_all() {
                let count = reader.read_length()?;
                for _ in 0..count {
                    let member_name = reader.read_str()?;
                    // Declared-type metadata travels for self-description;
                    // decode trusts the registered model.
                    let _declared = reader.read_str()?;
                    let member = model
                        .members()
                        .find(|(_, m)| m.name == member_name)
                        .map(|(_, m)| m)
                        .ok_or_else(|| CodecError::InvalidOperation {
                            reason: format!(
                                "unknown member {} for type {}",
                                member_name, name
                            ),
                        })?;
                    let value = read_value(reader, &member.kind)?;
                    rec.set(member_name, value)?;
                }
            } else {
                for index in model.min_index()..=model.max_index() {
                    if let Some(member) = model.member(index) {
                        let value = read_value(reader, &member.kind)?;
                        rec.set(member.name.clone(), value)?;
                    }
                }
            }
            Value::Record(rec)
        }
    })
}

fn read_enum(reader: &mut Reader<'_>, repr: EnumRepr) -> Result<i64> {
    Ok(match repr {
        EnumRepr::U8 => i64::from(reader.read_u8()?),
        EnumRepr::I8 => i64::from(reader.read_i8()?),
        EnumRepr::U16 => i64::from(reader.read_u16()?),
        EnumRepr::I16 => i64::from(reader.read_i16()?),
        EnumRepr::U32 => reader.decompress_read()? as u32 as i64,
        EnumRepr::I32 => reader.decompress_read_signed()?,
        EnumRepr::U64 => reader.decompress_read()? as i64,
        EnumRepr::I64 => reader.decompress_read_signed()?,
    })
}
