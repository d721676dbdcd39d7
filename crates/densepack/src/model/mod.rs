// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type member-layout models for the generic (reflective) codec path.
//!
//! A [`TypeModel`] is the cached answer to "which members does this composite
//! type serialize, in what order, as what types". Models are declared through
//! [`ModelBuilder`] and cached process-wide by the
//! [`registry`](crate::model::registry) — built once, never invalidated.

pub mod registry;

pub use registry::ModelRegistry;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CodecError, Result};

/// Underlying integer representation of an enum.
///
/// Narrow reprs are written at their natural width; 32- and 64-bit reprs go
/// through the integer compression cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRepr {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
}

/// Declared type of a member, driving both encode dispatch and decode
/// reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Char,
    Decimal,
    SerialDate,
    Str,
    /// Raw byte slice, bulk-copied on the wire.
    Bytes,
    /// Dynamic sequence of one element type.
    Seq(Box<TypeKind>),
    /// Key/value map.
    Map(Box<TypeKind>, Box<TypeKind>),
    /// Enum resolved to its underlying integer representation.
    Enum(EnumRepr),
    /// Nested composite, resolved by type name through the registry.
    Record(Arc<str>),
}

impl TypeKind {
    /// Display name used for include-all member metadata.
    pub fn type_name(&self) -> String {
        match self {
            TypeKind::Bool => "bool".into(),
            TypeKind::U8 => "u8".into(),
            TypeKind::I8 => "i8".into(),
            TypeKind::U16 => "u16".into(),
            TypeKind::I16 => "i16".into(),
            TypeKind::U32 => "u32".into(),
            TypeKind::I32 => "i32".into(),
            TypeKind::U64 => "u64".into(),
            TypeKind::I64 => "i64".into(),
            TypeKind::F32 => "f32".into(),
            TypeKind::F64 => "f64".into(),
            TypeKind::Char => "char".into(),
            TypeKind::Decimal => "decimal".into(),
            TypeKind::SerialDate => "serial-date".into(),
            TypeKind::Str => "string".into(),
            TypeKind::Bytes => "bytes".into(),
            TypeKind::Seq(elem) => format!("seq<{}>", elem.type_name()),
            TypeKind::Map(k, v) => format!("map<{}, {}>", k.type_name(), v.type_name()),
            TypeKind::Enum(_) => "enum".into(),
            TypeKind::Record(name) => name.to_string(),
        }
    }

    /// True for slots that may hold a null value on the wire (encoded as a
    /// zero-count marker).
    pub fn nullable(&self) -> bool {
        matches!(
            self,
            TypeKind::Str | TypeKind::Bytes | TypeKind::Seq(_) | TypeKind::Map(_, _)
        )
    }
}

/// One serializable member of a composite type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub name: String,
    pub kind: TypeKind,
}

/// Cached member layout of one composite type.
///
/// Indices are unique; iteration for encode/decode always proceeds from
/// `min` to `max`, skipping indices with no descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeModel {
    type_name: Arc<str>,
    members: BTreeMap<u16, MemberDescriptor>,
    min: u16,
    max: u16,
    valid: bool,
    include_all: bool,
}

impl TypeModel {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// False for a type with zero included members; the facade skips invalid
    /// models, producing no encoded bytes.
    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn include_all(&self) -> bool {
        self.include_all
    }

    pub fn min_index(&self) -> u16 {
        self.min
    }

    pub fn max_index(&self) -> u16 {
        self.max
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, index: u16) -> Option<&MemberDescriptor> {
        self.members.get(&index)
    }

    /// Members in ascending index order.
    pub fn members(&self) -> impl Iterator<Item = (u16, &MemberDescriptor)> {
        self.members.iter().map(|(idx, m)| (*idx, m))
    }
}

/// Declarative construction of a [`TypeModel`].
///
/// This replaces the original attribute-driven reflection: hosts declare the
/// member set explicitly, in declaration order.
///
/// Two inclusion modes exist:
/// - explicit-index (default): only members given an index are included, at
///   that index;
/// - include-all: every non-skipped member is included, with sequential
///   indices assigned in declaration order.
pub struct ModelBuilder {
    type_name: Arc<str>,
    include_all: bool,
    specs: Vec<MemberSpec>,
}

struct MemberSpec {
    name: String,
    kind: TypeKind,
    index: Option<u16>,
    skip: bool,
}

impl ModelBuilder {
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            include_all: false,
            specs: Vec::new(),
        }
    }

    /// Switch to include-all mode.
    pub fn include_all(mut self) -> Self {
        self.include_all = true;
        self
    }

    /// Declare a member with an explicit index.
    pub fn member(mut self, index: u16, name: impl Into<String>, kind: TypeKind) -> Self {
        self.specs.push(MemberSpec {
            name: name.into(),
            kind,
            index: Some(index),
            skip: false,
        });
        self
    }

    /// Declare a member without an index (included only in include-all mode).
    pub fn auto_member(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.specs.push(MemberSpec {
            name: name.into(),
            kind,
            index: None,
            skip: false,
        });
        self
    }

    /// Declare a member excluded from serialization.
    pub fn skipped_member(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.specs.push(MemberSpec {
            name: name.into(),
            kind,
            index: None,
            skip: true,
        });
        self
    }

    pub fn build(self) -> Result<TypeModel> {
        let mut members = BTreeMap::new();
        let mut min = u16::MAX;
        let mut max = u16::MIN;

        for spec in self.specs {
            let index = if self.include_all {
                if spec.skip {
                    continue;
                }
                members.len() as u16
            } else {
                match spec.index {
                    Some(idx) => idx,
                    // No index outside include-all mode: member not serialized.
                    None => continue,
                }
            };
            if members.contains_key(&index) {
                return Err(CodecError::InvalidOperation {
                    reason: format!(
                        "duplicate member index {} in type {}",
                        index, self.type_name
                    ),
                });
            }
            members.insert(
                index,
                MemberDescriptor {
                    name: spec.name,
                    kind: spec.kind,
                },
            );
            min = min.min(index);
            max = max.max(index);
        }

        let valid = !members.is_empty();
        if !valid {
            min = 0;
            max = 0;
        }
        Ok(TypeModel {
            type_name: self.type_name,
            members,
            min,
            max,
            valid,
            include_all: self.include_all,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_index_mode_skips_unindexed() {
        let model = ModelBuilder::new("Player")
            .member(0, "id", TypeKind::U32)
            .auto_member("scratch", TypeKind::U8)
            .member(5, "name", TypeKind::Str)
            .build()
            .expect("model should build");

        assert!(model.valid());
        assert!(!model.include_all());
        assert_eq!(model.member_count(), 2);
        assert_eq!(model.min_index(), 0);
        assert_eq!(model.max_index(), 5);
        assert!(model.member(1).is_none());
        assert_eq!(model.member(5).expect("member 5").name, "name");
    }

    #[test]
    fn test_include_all_assigns_sequential_indices() {
        let model = ModelBuilder::new("Stats")
            .include_all()
            .auto_member("hits", TypeKind::U64)
            .skipped_member("cache", TypeKind::Bytes)
            .auto_member("misses", TypeKind::U64)
            .build()
            .expect("model should build");

        assert!(model.include_all());
        assert_eq!(model.member_count(), 2);
        assert_eq!(model.member(0).expect("member 0").name, "hits");
        assert_eq!(model.member(1).expect("member 1").name, "misses");
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let err = ModelBuilder::new("Broken")
            .member(3, "a", TypeKind::U8)
            .member(3, "b", TypeKind::U8)
            .build()
            .unwrap_err();
        match err {
            CodecError::InvalidOperation { reason } => {
                assert!(reason.contains("duplicate member index 3"), "{}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_zero_members_marks_invalid() {
        let model = ModelBuilder::new("Empty").build().expect("model should build");
        assert!(!model.valid());
    }

    #[test]
    fn test_type_names() {
        let kind = TypeKind::Map(Box::new(TypeKind::Str), Box::new(TypeKind::Seq(Box::new(TypeKind::I32))));
        assert_eq!(kind.type_name(), "map<string, seq<i32>>");
        assert!(TypeKind::Str.nullable());
        assert!(!TypeKind::U8.nullable());
    }
}
