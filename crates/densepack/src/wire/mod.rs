// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire format primitives: width tags, writer, reader.
//!
//! All multi-byte values are little-endian on the wire, regardless of host
//! byte order. Streams produced on any host decode on any other.
//!
//! Format summary:
//!
//! | Element | Encoding |
//! |---------|----------|
//! | fixed primitives | natural width, no tag |
//! | compressed unsigned int | 1 tag byte + {1,2,4,8} value bytes, narrowest that fits |
//! | compressed signed int | 1 tag byte + {1,2,4,8} value bytes, magnitude-bucketed |
//! | string | compressed length + UTF-8 bytes (empty = `[Byte, 0]`) |
//! | byte slice | compressed length + raw bytes |
//! | sequence | compressed count + elements |
//! | map | compressed count + interleaved key/value pairs |

pub mod reader;
pub mod writer;

pub use reader::Reader;
pub use writer::Writer;

use crate::error::{CodecError, Result};

/// One-byte discriminator written before every variable-width integer,
/// selecting the narrowest representation that losslessly holds the value.
///
/// Decode must branch on the tag, never infer width from context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WidthTag {
    Byte = 0,
    SByte = 1,
    UInt16 = 2,
    Int16 = 3,
    UInt32 = 4,
    Int32 = 5,
    UInt64 = 6,
    Int64 = 7,
}

impl WidthTag {
    /// Decode a tag byte. Any value outside the known set is fatal.
    pub fn from_byte(b: u8) -> Result<WidthTag> {
        match b {
            0 => Ok(WidthTag::Byte),
            1 => Ok(WidthTag::SByte),
            2 => Ok(WidthTag::UInt16),
            3 => Ok(WidthTag::Int16),
            4 => Ok(WidthTag::UInt32),
            5 => Ok(WidthTag::Int32),
            6 => Ok(WidthTag::UInt64),
            7 => Ok(WidthTag::Int64),
            other => Err(CodecError::InvalidOperation {
                reason: format!("invalid compress type tag 0x{:02X}", other),
            }),
        }
    }

    /// Width in bytes of the value that follows the tag.
    pub fn value_width(self) -> usize {
        match self {
            WidthTag::Byte | WidthTag::SByte => 1,
            WidthTag::UInt16 | WidthTag::Int16 => 2,
            WidthTag::UInt32 | WidthTag::Int32 => 4,
            WidthTag::UInt64 | WidthTag::Int64 => 8,
        }
    }
}
