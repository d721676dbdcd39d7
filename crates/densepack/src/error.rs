// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by the buffer, wire codec, model registry and facade.

use std::fmt;

/// Failure raised by any encode/decode operation.
///
/// Every failure is immediate and fatal to the current call: there is no
/// retry, no partial result, and no silent coercion. Decoding bytes against
/// the wrong target type is undefined by contract, not a handled error class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Protocol violation: unknown width tag, advancing a buffer past its
    /// free capacity, writing through a read-only buffer, an unresolved type
    /// model, or a duplicate member index.
    InvalidOperation { reason: String },
    /// Write cursor ran out of committed space.
    WriteFailed { offset: usize, reason: String },
    /// Read cursor ran past the end of the input.
    ReadFailed { offset: usize, reason: String },
    /// A required non-nullable member was null at encode time.
    NullField { type_name: String, member: String },
    /// Value cannot be represented on the wire (e.g. a `char` outside the
    /// Basic Multilingual Plane).
    Unsupported { reason: String },
    /// Caller-supplied size or count is out of range.
    InvalidArgument { reason: String },
    /// Decoded string bytes are not valid UTF-8.
    Utf8 { reason: String },
    /// The byte-compression collaborator failed.
    Compress { reason: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidOperation { reason } => {
                write!(f, "invalid operation: {}", reason)
            }
            CodecError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            CodecError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            CodecError::NullField { type_name, member } => {
                write!(f, "{}.{} is null, cannot serialize", type_name, member)
            }
            CodecError::Unsupported { reason } => write!(f, "unsupported: {}", reason),
            CodecError::InvalidArgument { reason } => write!(f, "invalid argument: {}", reason),
            CodecError::Utf8 { reason } => write!(f, "invalid utf-8: {}", reason),
            CodecError::Compress { reason } => write!(f, "compression failed: {}", reason),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::str::Utf8Error> for CodecError {
    fn from(e: std::str::Utf8Error) -> Self {
        CodecError::Utf8 {
            reason: e.to_string(),
        }
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        CodecError::Utf8 {
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = core::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_variants() {
        let err = CodecError::WriteFailed {
            offset: 12,
            reason: "advanced too far".into(),
        };
        assert_eq!(err.to_string(), "write failed at offset 12: advanced too far");

        let err = CodecError::ReadFailed {
            offset: 4,
            reason: "unexpected end of buffer".into(),
        };
        assert_eq!(err.to_string(), "read failed at offset 4: unexpected end of buffer");

        let err = CodecError::NullField {
            type_name: "Player".into(),
            member: "name".into(),
        };
        assert_eq!(err.to_string(), "Player.name is null, cannot serialize");

        let err = CodecError::InvalidOperation {
            reason: "invalid compress type tag 0x09".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid operation: invalid compress type tag 0x09"
        );
    }

    #[test]
    fn test_utf8_conversion() {
        let bad = vec![0xFF, 0xFE];
        let err: CodecError = String::from_utf8(bad).unwrap_err().into();
        match err {
            CodecError::Utf8 { .. } => {}
            other => panic!("unexpected error {:?}", other),
        }
    }
}
