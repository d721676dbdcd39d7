// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values for the generic (reflective) codec path.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CodecError, Result};
use crate::model::{EnumRepr, TypeModel};
use crate::scalar::{Decimal, SerialDate};

/// A dynamic value that can hold anything the wire format expresses.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Primitives
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    Decimal(Decimal),
    SerialDate(SerialDate),

    // Composites
    /// Raw bytes, bulk-copied on the wire.
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    /// Key/value pairs in iteration order. Encode/decode order must simply
    /// match; no further ordering guarantee is imposed.
    Map(Vec<(Value, Value)>),
    Enum { repr: EnumRepr, value: i64 },
    Record(Record),

    /// Absent value; legal only in string/bytes/sequence/map slots.
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for the fixed set of primitive scalars exempt from the outer
    /// byte-compression pass — their compression is already implicit in the
    /// width-selection scheme.
    pub fn is_non_compressible_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::U8(_)
                | Value::I8(_)
                | Value::U16(_)
                | Value::I16(_)
                | Value::U32(_)
                | Value::I32(_)
                | Value::U64(_)
                | Value::I64(_)
                | Value::F32(_)
                | Value::F64(_)
                | Value::Char(_)
                | Value::Decimal(_)
                | Value::SerialDate(_)
                | Value::Enum { .. }
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(v) => Some(u64::from(*v)),
            Value::U16(v) => Some(u64::from(*v)),
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(v) => Some(v),
            _ => None,
        }
    }
}

/// A composite value bound to its [`TypeModel`].
///
/// Decoded records are returned owned, by move; there is no pooled holder to
/// hand back.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: Arc<TypeModel>,
    fields: HashMap<String, Value>,
}

impl Record {
    /// Create a record with no fields set. Absent members encode as null
    /// (legal only for nullable slots).
    pub fn new(model: Arc<TypeModel>) -> Self {
        Self {
            model,
            fields: HashMap::new(),
        }
    }

    pub fn model(&self) -> &Arc<TypeModel> {
        &self.model
    }

    pub fn type_name(&self) -> &str {
        self.model.type_name()
    }

    /// Set a member value by name. The member must exist in the model.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        if !self.model.members().any(|(_, m)| m.name == name) {
            return Err(CodecError::InvalidArgument {
                reason: format!("no member {} in type {}", name, self.model.type_name()),
            });
        }
        self.fields.insert(name, value);
        Ok(())
    }

    /// Fetch a member value by name, or [`Value::Null`] if unset.
    pub fn get(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelBuilder, TypeKind};

    fn point_model() -> Arc<TypeModel> {
        Arc::new(
            ModelBuilder::new("value::Point")
                .member(0, "x", TypeKind::I32)
                .member(1, "y", TypeKind::I32)
                .build()
                .expect("model should build"),
        )
    }

    #[test]
    fn test_record_set_get() {
        let mut rec = Record::new(point_model());
        rec.set("x", Value::I32(3)).expect("set should succeed");
        assert_eq!(rec.get("x").as_i64(), Some(3));
        assert!(rec.get("y").is_null());
    }

    #[test]
    fn test_record_rejects_unknown_member() {
        let mut rec = Record::new(point_model());
        let err = rec.set("z", Value::I32(1)).unwrap_err();
        match err {
            CodecError::InvalidArgument { reason } => {
                assert!(reason.contains("no member z"), "{}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_scalar_classification() {
        assert!(Value::U32(1).is_non_compressible_scalar());
        assert!(Value::SerialDate(SerialDate::from_days(1.0)).is_non_compressible_scalar());
        assert!(!Value::Str("x".into()).is_non_compressible_scalar());
        assert!(!Value::Seq(vec![]).is_non_compressible_scalar());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::U16(9).as_u64(), Some(9));
        assert_eq!(Value::I8(-3).as_i64(), Some(-3));
        assert_eq!(Value::Str("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
    }
}
