// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fast-path serialization contract and the wrapper dispatch table.
//!
//! [`Packable`] is the precompiled per-type codec contract: built-in
//! primitive and container impls live here, and hosts implement it (by hand
//! or through generated code) for their composite types. The
//! [`WrapperManifest`] layers runtime-registered custom wrappers on top:
//! exactly one wrapper is authoritative per type, and registering a new one
//! replaces the prior binding for all future lookups.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::error::{CodecError, Result};
use crate::scalar::{Decimal, SerialDate};
use crate::wire::{Reader, Writer};

/// Per-type encode/decode fast path.
///
/// `NO_COMPRESSION` marks the fixed set of primitive types exempt from the
/// facade's outer byte-compression pass: their compression is already
/// implicit in the width-selection scheme, so an extra pass is not worth its
/// overhead.
pub trait Packable: Sized {
    const NO_COMPRESSION: bool = false;

    fn pack(&self, writer: &mut Writer) -> Result<()>;
    fn unpack(reader: &mut Reader<'_>) -> Result<Self>;
}

// ---- fixed-width primitives ----

macro_rules! impl_packable_fixed {
    ($type:ty, $write:ident, $read:ident) => {
        impl Packable for $type {
            const NO_COMPRESSION: bool = true;

            fn pack(&self, writer: &mut Writer) -> Result<()> {
                writer.$write(*self)
            }

            fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
                reader.$read()
            }
        }
    };
}

impl_packable_fixed!(bool, write_bool, read_bool);
impl_packable_fixed!(u8, write_u8, read_u8);
impl_packable_fixed!(i8, write_i8, read_i8);
impl_packable_fixed!(u16, write_u16, read_u16);
impl_packable_fixed!(i16, write_i16, read_i16);
impl_packable_fixed!(char, write_char, read_char);
impl_packable_fixed!(f32, write_f32, read_f32);
impl_packable_fixed!(f64, write_f64, read_f64);
impl_packable_fixed!(Decimal, write_decimal, read_decimal);
impl_packable_fixed!(SerialDate, write_serial_date, read_serial_date);

// ---- compressed integers ----

macro_rules! impl_packable_compressed {
    ($type:ty, $write:ident, $cast:ty) => {
        impl Packable for $type {
            const NO_COMPRESSION: bool = true;

            fn pack(&self, writer: &mut Writer) -> Result<()> {
                writer.$write(*self)
            }

            fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
                Ok(reader.decompress_read()? as $cast as $type)
            }
        }
    };
}

impl_packable_compressed!(u32, compress_write_u32, u64);
impl_packable_compressed!(u64, compress_write_u64, u64);
impl_packable_compressed!(i32, compress_write_i32, i64);
impl_packable_compressed!(i64, compress_write_i64, i64);

// ---- strings, containers, nullable slots ----

impl Packable for String {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_str(self)
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_str()
    }
}

/// Raw byte buffer with the bulk-copy wire fast path.
///
/// Wire-compatible with `Vec<u8>` (a count prefix followed by the raw
/// bytes), but copied in one block instead of element by element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl Packable for Bytes {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_byte_slice(&self.0)
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Bytes(reader.read_byte_slice()?.to_vec()))
    }
}

impl<T: Packable> Packable for Vec<T> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_length(self.len())?;
        for item in self {
            item.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        let mut out = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            out.push(T::unpack(reader)?);
        }
        Ok(out)
    }
}

impl<T: Packable, const N: usize> Packable for [T; N] {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_length(N)?;
        for item in self {
            item.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        if len != N {
            return Err(CodecError::InvalidOperation {
                reason: format!("array length mismatch: expected {}, got {}", N, len),
            });
        }
        let mut out = Vec::with_capacity(N);
        for _ in 0..N {
            out.push(T::unpack(reader)?);
        }
        out.try_into().map_err(|_| CodecError::InvalidOperation {
            reason: "array length mismatch after decode".into(),
        })
    }
}

impl<K: Packable + Eq + Hash, V: Packable> Packable for HashMap<K, V> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_length(self.len())?;
        for (key, value) in self {
            key.pack(writer)?;
            value.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        let mut out = HashMap::with_capacity(len.min(4096));
        for _ in 0..len {
            let key = K::unpack(reader)?;
            let value = V::unpack(reader)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

impl<K: Packable + Ord, V: Packable> Packable for BTreeMap<K, V> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_length(self.len())?;
        for (key, value) in self {
            key.pack(writer)?;
            value.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        let mut out = BTreeMap::new();
        for _ in 0..len {
            let key = K::unpack(reader)?;
            let value = V::unpack(reader)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

// Nullable slots share the zero-count wire form with their empty
// counterparts: `None` and an empty value are indistinguishable after a
// round trip and decode as `None`.

impl Packable for Option<String> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Some(s) => writer.write_str(s),
            None => writer.write_length(0),
        }
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        if len == 0 {
            return Ok(None);
        }
        let bytes = reader.read_bytes(len)?;
        Ok(Some(std::str::from_utf8(bytes)?.to_owned()))
    }
}

impl Packable for Option<Bytes> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Some(b) => b.pack(writer),
            None => writer.write_length(0),
        }
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(Bytes(reader.read_bytes(len)?.to_vec())))
    }
}

impl<T: Packable> Packable for Option<Vec<T>> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Some(v) => v.pack(writer),
            None => writer.write_length(0),
        }
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        if len == 0 {
            return Ok(None);
        }
        let mut out = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            out.push(T::unpack(reader)?);
        }
        Ok(Some(out))
    }
}

impl<K: Packable + Eq + Hash, V: Packable> Packable for Option<HashMap<K, V>> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Some(m) => m.pack(writer),
            None => writer.write_length(0),
        }
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.read_length()?;
        if len == 0 {
            return Ok(None);
        }
        let mut out = HashMap::with_capacity(len.min(4096));
        for _ in 0..len {
            let key = K::unpack(reader)?;
            let value = V::unpack(reader)?;
            out.insert(key, value);
        }
        Ok(Some(out))
    }
}

// ---- wrapper manifest ----

/// Type-erased wrapper: serialize/deserialize for exactly one concrete type.
pub struct ErasedWrapper {
    type_name: &'static str,
    ser: Box<dyn Fn(&dyn Any, &mut Writer) -> Result<()> + Send + Sync>,
    de: Box<dyn Fn(&mut Reader<'_>) -> Result<Box<dyn Any>> + Send + Sync>,
}

impl ErasedWrapper {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn serialize(&self, value: &dyn Any, writer: &mut Writer) -> Result<()> {
        (self.ser)(value, writer)
    }

    pub fn deserialize(&self, reader: &mut Reader<'_>) -> Result<Box<dyn Any>> {
        (self.de)(reader)
    }
}

enum WrapperSlot {
    Present(Arc<ErasedWrapper>),
    /// Cached negative lookup: the type has no wrapper and dispatch should
    /// not probe again.
    Missing,
}

static GLOBAL_MANIFEST: OnceLock<WrapperManifest> = OnceLock::new();

/// Process-wide dispatch table from type identity to wrapper.
///
/// Populated from built-ins at initialization and mutated by registration
/// calls; entries are replaced, never removed.
pub struct WrapperManifest {
    entries: DashMap<TypeId, WrapperSlot>,
}

impl WrapperManifest {
    fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// The process-wide manifest, seeded with the built-in primitive
    /// wrappers.
    pub fn global() -> &'static WrapperManifest {
        GLOBAL_MANIFEST.get_or_init(|| {
            let manifest = WrapperManifest::new();
            manifest.seed_builtin::<bool>("bool");
            manifest.seed_builtin::<u8>("u8");
            manifest.seed_builtin::<i8>("i8");
            manifest.seed_builtin::<u16>("u16");
            manifest.seed_builtin::<i16>("i16");
            manifest.seed_builtin::<u32>("u32");
            manifest.seed_builtin::<i32>("i32");
            manifest.seed_builtin::<u64>("u64");
            manifest.seed_builtin::<i64>("i64");
            manifest.seed_builtin::<f32>("f32");
            manifest.seed_builtin::<f64>("f64");
            manifest.seed_builtin::<char>("char");
            manifest.seed_builtin::<String>("string");
            manifest.seed_builtin::<Decimal>("decimal");
            manifest.seed_builtin::<SerialDate>("serial-date");
            manifest.seed_builtin::<Bytes>("bytes");
            manifest
        })
    }

    fn seed_builtin<T: Packable + Any>(&self, name: &'static str) {
        self.entries.insert(
            TypeId::of::<T>(),
            WrapperSlot::Present(Arc::new(Self::erase::<T, _, _>(
                name,
                |v: &T, w: &mut Writer| v.pack(w),
                T::unpack,
            ))),
        );
    }

    fn erase<T, S, D>(name: &'static str, ser: S, de: D) -> ErasedWrapper
    where
        T: Any,
        S: Fn(&T, &mut Writer) -> Result<()> + Send + Sync + 'static,
        D: Fn(&mut Reader<'_>) -> Result<T> + Send + Sync + 'static,
    {
        ErasedWrapper {
            type_name: name,
            ser: Box::new(move |value, writer| {
                let concrete = value.downcast_ref::<T>().ok_or_else(|| {
                    CodecError::InvalidOperation {
                        reason: format!("wrapper for {} received a foreign value", name),
                    }
                })?;
                ser(concrete, writer)
            }),
            de: Box::new(move |reader| Ok(Box::new(de(reader)?) as Box<dyn Any>)),
        }
    }

    /// Install or replace the wrapper for `T`. The new binding takes
    /// priority over built-in and fast-path dispatch for all future
    /// lookups of exactly this type.
    pub fn register<T, S, D>(&self, type_name: &'static str, ser: S, de: D)
    where
        T: Any,
        S: Fn(&T, &mut Writer) -> Result<()> + Send + Sync + 'static,
        D: Fn(&mut Reader<'_>) -> Result<T> + Send + Sync + 'static,
    {
        log::debug!("[manifest] registered custom wrapper for {}", type_name);
        self.entries.insert(
            TypeId::of::<T>(),
            WrapperSlot::Present(Arc::new(Self::erase::<T, _, _>(type_name, ser, de))),
        );
    }

    /// Look up the authoritative wrapper for `T`. A miss is cached so later
    /// lookups for the same type skip discovery.
    pub fn lookup<T: Any>(&self) -> Option<Arc<ErasedWrapper>> {
        let id = TypeId::of::<T>();
        if let Some(slot) = self.entries.get(&id) {
            return match slot.value() {
                WrapperSlot::Present(w) => Some(w.clone()),
                WrapperSlot::Missing => None,
            };
        }
        self.entries.insert(id, WrapperSlot::Missing);
        None
    }
}
