// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Write cursor over a pooled buffer with minimal-width integer compression.

use crate::buffer::BufferLease;
use crate::error::{CodecError, Result};
use crate::scalar::{Decimal, SerialDate};

use super::WidthTag;

/// Generate fixed-width little-endian write methods.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> Result<()> {
            self.put(&value.to_le_bytes())
        }
    };
}

/// Encodes values into a pooled [`ExtensibleBuffer`] using a deterministic,
/// minimal-width scheme.
///
/// The buffer lease is held for the lifetime of the writer and returned to
/// the pool when the writer is dropped or consumed by
/// [`Writer::into_bytes`].
///
/// [`ExtensibleBuffer`]: crate::buffer::ExtensibleBuffer
pub struct Writer {
    buf: BufferLease,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Acquire a writer backed by a pooled buffer.
    pub fn new() -> Self {
        Writer {
            buf: BufferLease::from_global(),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The encoded bytes so far.
    pub fn written(&self) -> &[u8] {
        self.buf.written()
    }

    /// Snapshot the encoded bytes and release the pooled buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.written().to_vec()
    }

    /// Like [`Writer::into_bytes`] but runs the encoded buffer through the
    /// process-wide byte-compression collaborator.
    pub fn into_compressed_bytes(self) -> Result<Vec<u8>> {
        crate::compress::global().compress(self.buf.written())
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        let span = self.buf.request_span(bytes.len())?;
        span[..bytes.len()].copy_from_slice(bytes);
        self.buf.advance(bytes.len())
    }

    // ---- fixed-width primitives (no tag) ----

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_i8, i8);
    impl_write_le!(write_u16, u16);
    impl_write_le!(write_i16, i16);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_i32, i32);
    impl_write_le!(write_u64, u64);
    impl_write_le!(write_i64, i64);

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// A `char` occupies one UTF-16 code unit on the wire. Scalars outside
    /// the Basic Multilingual Plane cannot be represented.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        let cp = value as u32;
        if cp > u32::from(u16::MAX) {
            return Err(CodecError::Unsupported {
                reason: format!("char U+{:04X} does not fit one UTF-16 code unit", cp),
            });
        }
        self.write_u16(cp as u16)
    }

    pub fn write_decimal(&mut self, value: Decimal) -> Result<()> {
        self.put(&value.to_bits())
    }

    pub fn write_serial_date(&mut self, value: SerialDate) -> Result<()> {
        self.write_f64(value.days())
    }

    fn write_tag(&mut self, tag: WidthTag) -> Result<()> {
        self.write_u8(tag as u8)
    }

    // ---- compressed unsigned integers ----
    //
    // Selection cascades top-down from the requested width to a byte when
    // the value fits.

    pub fn compress_write_u64(&mut self, num: u64) -> Result<()> {
        if num <= u64::from(u32::MAX) {
            return self.compress_write_u32(num as u32);
        }
        self.write_tag(WidthTag::UInt64)?;
        self.write_u64(num)
    }

    pub fn compress_write_u32(&mut self, num: u32) -> Result<()> {
        if num <= u32::from(u16::MAX) {
            return self.compress_write_u16(num as u16);
        }
        self.write_tag(WidthTag::UInt32)?;
        self.write_u32(num)
    }

    pub fn compress_write_u16(&mut self, num: u16) -> Result<()> {
        if num <= u16::from(u8::MAX) {
            return self.compress_write_u8(num as u8);
        }
        self.write_tag(WidthTag::UInt16)?;
        self.write_u16(num)
    }

    pub fn compress_write_u8(&mut self, num: u8) -> Result<()> {
        self.write_tag(WidthTag::Byte)?;
        self.write_u8(num)
    }

    /// Compressed length/count prefix.
    pub fn write_length(&mut self, len: usize) -> Result<()> {
        let len = u64::try_from(len).map_err(|_| CodecError::InvalidArgument {
            reason: format!("count {} exceeds u64 range", len),
        })?;
        self.compress_write_u64(len)
    }

    // ---- compressed signed integers ----
    //
    // Magnitude-bucketed, not zig-zag: negative values cascade through
    // successively wider signed widths; non-negative values try the sbyte
    // range, then the byte range, before falling back to a wider signed tag.

    pub fn compress_write_i64(&mut self, num: i64) -> Result<()> {
        if num < 0 {
            return self.compress_write_i64_neg(num);
        }
        if num <= i64::from(i32::MAX) {
            return self.compress_write_i32(num as i32);
        }
        self.write_tag(WidthTag::Int64)?;
        self.write_i64(num)
    }

    fn compress_write_i64_neg(&mut self, num: i64) -> Result<()> {
        if num >= i64::from(i32::MIN) {
            return self.compress_write_i32_neg(num as i32);
        }
        self.write_tag(WidthTag::Int64)?;
        self.write_i64(num)
    }

    pub fn compress_write_i32(&mut self, num: i32) -> Result<()> {
        if num < 0 {
            return self.compress_write_i32_neg(num);
        }
        if num <= i32::from(i16::MAX) {
            return self.compress_write_i16(num as i16);
        }
        self.write_tag(WidthTag::Int32)?;
        self.write_i32(num)
    }

    fn compress_write_i32_neg(&mut self, num: i32) -> Result<()> {
        if num >= i32::from(i16::MIN) {
            return self.compress_write_i16_neg(num as i16);
        }
        self.write_tag(WidthTag::Int32)?;
        self.write_i32(num)
    }

    pub fn compress_write_i16(&mut self, num: i16) -> Result<()> {
        if num < 0 {
            return self.compress_write_i16_neg(num);
        }
        if num <= i16::from(i8::MAX) {
            return self.compress_write_i8(num as i8);
        }
        if num <= i16::from(u8::MAX) {
            return self.compress_write_u8(num as u8);
        }
        self.write_tag(WidthTag::Int16)?;
        self.write_i16(num)
    }

    fn compress_write_i16_neg(&mut self, num: i16) -> Result<()> {
        if num >= i16::from(i8::MIN) {
            return self.compress_write_i8(num as i8);
        }
        self.write_tag(WidthTag::Int16)?;
        self.write_i16(num)
    }

    pub fn compress_write_i8(&mut self, num: i8) -> Result<()> {
        self.write_tag(WidthTag::SByte)?;
        self.write_i8(num)
    }

    // ---- strings and bulk bytes ----

    /// Compressed UTF-8 byte length followed by the raw bytes. The empty
    /// string shortens to the canonical two-byte form `[Byte, 0]`.
    pub fn write_str(&mut self, val: &str) -> Result<()> {
        if val.is_empty() {
            return self.compress_write_u8(0);
        }
        self.write_length(val.len())?;
        self.put(val.as_bytes())
    }

    /// Compressed length followed by a raw bulk copy, with no per-element
    /// tagging.
    pub fn write_byte_slice(&mut self, data: &[u8]) -> Result<()> {
        self.write_length(data.len())?;
        self.put(data)
    }
}
