// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Carrier types for fixed-width scalars without a native Rust shape.

/// 128-bit high-precision decimal, carried as its raw little-endian scaled
/// bit pattern (sign, 96-bit integer mantissa, scale factor).
///
/// The codec moves the 16 bytes verbatim; interpretation is the host's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decimal(pub [u8; 16]);

impl Decimal {
    pub fn from_bits(bits: [u8; 16]) -> Self {
        Decimal(bits)
    }

    pub fn to_bits(self) -> [u8; 16] {
        self.0
    }
}

/// Timestamp stored as a fixed-width floating-point day count relative to
/// the serial-date epoch (1899-12-30 00:00 UTC), fractional days included.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SerialDate(f64);

/// Days between 1899-12-30 and 1970-01-01.
const UNIX_EPOCH_DAYS: f64 = 25_569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

impl SerialDate {
    /// Construct from a raw day count.
    pub fn from_days(days: f64) -> Self {
        SerialDate(days)
    }

    /// Construct from seconds since the Unix epoch.
    pub fn from_unix_seconds(secs: f64) -> Self {
        SerialDate(UNIX_EPOCH_DAYS + secs / SECONDS_PER_DAY)
    }

    /// Raw day count.
    pub fn days(self) -> f64 {
        self.0
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix_seconds(self) -> f64 {
        (self.0 - UNIX_EPOCH_DAYS) * SECONDS_PER_DAY
    }
}
