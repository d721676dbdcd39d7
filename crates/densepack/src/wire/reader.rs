// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read cursor mirroring [`Writer`](super::Writer).

use crate::error::{CodecError, Result};
use crate::scalar::{Decimal, SerialDate};

use super::WidthTag;

/// Generate fixed-width little-endian read methods.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.take($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Bounds-checked borrowing cursor over an encoded byte stream.
///
/// The reader trusts the encoded counts: it never speculates or
/// resynchronizes on malformed input. Any tag outside the known set is a
/// fatal [`CodecError::InvalidOperation`].
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, position: 0 }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True exactly when the cursor equals the total decodable length.
    pub fn end_of_reader(&self) -> bool {
        self.position == self.data.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.position + len > self.data.len() {
            return Err(CodecError::ReadFailed {
                offset: self.position,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    // ---- fixed-width primitives ----

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_u16, u16, 2);
    impl_read_le!(read_i16, i16, 2);
    impl_read_le!(read_u32, u32, 4);
    impl_read_le!(read_i32, i32, 4);
    impl_read_le!(read_u64, u64, 8);
    impl_read_le!(read_i64, i64, 8);

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_char(&mut self) -> Result<char> {
        let unit = self.read_u16()?;
        char::from_u32(u32::from(unit)).ok_or_else(|| CodecError::InvalidOperation {
            reason: format!("0x{:04X} is not a valid char code unit", unit),
        })
    }

    pub fn read_decimal(&mut self) -> Result<Decimal> {
        let mut bits = [0u8; 16];
        bits.copy_from_slice(self.take(16)?);
        Ok(Decimal::from_bits(bits))
    }

    pub fn read_serial_date(&mut self) -> Result<SerialDate> {
        Ok(SerialDate::from_days(self.read_f64()?))
    }

    // ---- compressed integers ----

    /// Decode one tag-directed variable-width integer. Signed widths
    /// sign-extend before the bit-cast, mirroring the writer's cascade.
    pub fn decompress_read(&mut self) -> Result<u64> {
        let tag = WidthTag::from_byte(self.read_u8()?)?;
        match tag {
            WidthTag::Byte => Ok(u64::from(self.read_u8()?)),
            WidthTag::SByte => Ok(i64::from(self.read_i8()?) as u64),
            WidthTag::UInt16 => Ok(u64::from(self.read_u16()?)),
            WidthTag::Int16 => Ok(i64::from(self.read_i16()?) as u64),
            WidthTag::UInt32 => Ok(u64::from(self.read_u32()?)),
            WidthTag::Int32 => Ok(i64::from(self.read_i32()?) as u64),
            WidthTag::UInt64 => self.read_u64(),
            WidthTag::Int64 => Ok(self.read_i64()? as u64),
        }
    }

    /// Signed view of [`Reader::decompress_read`].
    pub fn decompress_read_signed(&mut self) -> Result<i64> {
        Ok(self.decompress_read()? as i64)
    }

    /// Decode a count/length prefix.
    pub fn read_length(&mut self) -> Result<usize> {
        let raw = self.decompress_read()?;
        usize::try_from(raw).map_err(|_| CodecError::InvalidArgument {
            reason: format!("count {} exceeds usize range", raw),
        })
    }

    // ---- strings and bulk bytes ----

    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_length()?;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.take(len)?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    /// Borrow `len` raw bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Length-prefixed bulk byte slice, mirroring
    /// [`Writer::write_byte_slice`](super::Writer::write_byte_slice).
    pub fn read_byte_slice(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length()?;
        self.take(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Writer;

    #[test]
    fn test_end_of_reader_before_and_after() {
        let reader = Reader::new(&[]);
        assert!(reader.end_of_reader());

        let mut w = Writer::new();
        w.compress_write_u32(300).expect("write should succeed");
        let bytes = w.into_bytes();

        let mut reader = Reader::new(&bytes);
        assert!(!reader.end_of_reader());
        assert_eq!(reader.decompress_read().expect("read should succeed"), 300);
        assert!(reader.end_of_reader());
    }

    #[test]
    fn test_decompress_round_trip_boundaries() {
        let values: &[u64] = &[0, 127, 128, 255, 256, 32_767, 65_535, 65_536, u64::MAX];
        for &v in values {
            let mut w = Writer::new();
            w.compress_write_u64(v).expect("write should succeed");
            let bytes = w.into_bytes();
            let mut r = Reader::new(&bytes);
            assert_eq!(r.decompress_read().expect("read should succeed"), v);
            assert!(r.end_of_reader());
        }
    }

    #[test]
    fn test_signed_round_trip() {
        let values: &[i64] = &[0, -1, -5, -128, -129, 200, 300, -32_769, i64::MIN, i64::MAX];
        for &v in values {
            let mut w = Writer::new();
            w.compress_write_i64(v).expect("write should succeed");
            let bytes = w.into_bytes();
            let mut r = Reader::new(&bytes);
            assert_eq!(
                r.decompress_read_signed().expect("read should succeed"),
                v,
                "value {}",
                v
            );
        }
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        let mut r = Reader::new(&[0x0A, 0x00]);
        let err = r.decompress_read().unwrap_err();
        match err {
            CodecError::InvalidOperation { reason } => {
                assert!(reason.contains("invalid compress type tag"), "{}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_read_past_end_reports_offset() {
        let mut r = Reader::new(&[1]);
        r.read_u8().expect("read should succeed");
        let err = r.read_u16().unwrap_err();
        match err {
            CodecError::ReadFailed { offset, reason } => {
                assert_eq!(offset, 1);
                assert_eq!(reason, "unexpected end of buffer");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_string_round_trip() {
        for s in ["", "a", "héllo wörld", "長い文字列のテスト"] {
            let mut w = Writer::new();
            w.write_str(s).expect("write should succeed");
            let bytes = w.into_bytes();
            let mut r = Reader::new(&bytes);
            assert_eq!(r.read_str().expect("read should succeed"), s);
            assert!(r.end_of_reader());
        }
    }

    #[test]
    fn test_fixed_primitives_round_trip() {
        let mut w = Writer::new();
        w.write_bool(true).expect("write should succeed");
        w.write_char('中').expect("write should succeed");
        w.write_f32(3.5).expect("write should succeed");
        w.write_f64(-0.25).expect("write should succeed");
        w.write_decimal(crate::scalar::Decimal::from_bits([3; 16]))
            .expect("write should succeed");
        w.write_serial_date(crate::scalar::SerialDate::from_days(45_000.5))
            .expect("write should succeed");
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        assert!(r.read_bool().expect("read should succeed"));
        assert_eq!(r.read_char().expect("read should succeed"), '中');
        assert!((r.read_f32().expect("read should succeed") - 3.5).abs() < f32::EPSILON);
        assert!((r.read_f64().expect("read should succeed") + 0.25).abs() < f64::EPSILON);
        assert_eq!(r.read_decimal().expect("read should succeed").to_bits(), [3; 16]);
        assert!(
            (r.read_serial_date().expect("read should succeed").days() - 45_000.5).abs()
                < f64::EPSILON
        );
        assert!(r.end_of_reader());
    }
}
