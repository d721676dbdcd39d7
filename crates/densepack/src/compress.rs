// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Outer byte-compression pass over finished payloads.
//!
//! The codec runs every finished payload through one whole-buffer
//! compression pass, except for the fixed set of primitive types whose
//! width-selection scheme already keeps them small. The pass is
//! unconditional: the wire carries no compressed/uncompressed flag, so both
//! sides must agree on the configured algorithm up front.
//!
//! # Wire Format
//!
//! ```text
//! payload = deflate(encoded_bytes)    // Deflate (default)
//! payload = encoded_bytes             // None
//! ```
//!
//! Deflate streams are self-terminating; no original-length prefix is
//! written.

use std::io::{Read, Write};
use std::sync::OnceLock;

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{CodecError, Result};

/// Compression algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionAlgo {
    /// Deflate via flate2 (default).
    #[default]
    Deflate,
    /// No outer pass: payload bytes go out as encoded.
    None,
}

/// Outer-pass configuration.
#[derive(Debug, Clone)]
pub struct CompressConfig {
    /// Algorithm to use.
    pub algo: CompressionAlgo,
    /// Deflate compression level (1-9, default: 6).
    pub deflate_level: u32,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            algo: CompressionAlgo::Deflate,
            deflate_level: 6,
        }
    }
}

/// Whole-buffer compressor/decompressor for the outer pass.
#[derive(Debug)]
pub struct Compressor {
    config: CompressConfig,
}

impl Compressor {
    /// Create a compressor with the given configuration.
    pub fn new(config: CompressConfig) -> Self {
        Self { config }
    }

    /// Create a compressor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CompressConfig::default())
    }

    /// Compress a finished payload.
    pub fn compress(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match self.config.algo {
            CompressionAlgo::None => Ok(payload.to_vec()),
            CompressionAlgo::Deflate => {
                let mut encoder = DeflateEncoder::new(
                    Vec::with_capacity(payload.len() / 2 + 16),
                    Compression::new(self.config.deflate_level),
                );
                encoder.write_all(payload).map_err(|e| CodecError::Compress {
                    reason: format!("deflate write failed: {}", e),
                })?;
                encoder.finish().map_err(|e| CodecError::Compress {
                    reason: format!("deflate finish failed: {}", e),
                })
            }
        }
    }

    /// Reverse the outer pass on an incoming payload.
    pub fn decompress(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match self.config.algo {
            CompressionAlgo::None => Ok(payload.to_vec()),
            CompressionAlgo::Deflate => {
                let mut decoder = DeflateDecoder::new(payload);
                let mut output = Vec::with_capacity(payload.len() * 2);
                decoder
                    .read_to_end(&mut output)
                    .map_err(|e| CodecError::Compress {
                        reason: format!("inflate failed: {}", e),
                    })?;
                Ok(output)
            }
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &CompressConfig {
        &self.config
    }
}

static GLOBAL_COMPRESSOR: OnceLock<Compressor> = OnceLock::new();

/// Install the process-wide outer-pass configuration.
///
/// The first call wins; returns `false` if a compressor was already
/// installed (by an earlier call or by first use of the defaults).
pub fn init_compression(config: CompressConfig) -> bool {
    let mut fresh = false;
    GLOBAL_COMPRESSOR.get_or_init(|| {
        fresh = true;
        log::debug!("[compress] outer pass configured: {:?}", config.algo);
        Compressor::new(config)
    });
    fresh
}

/// The process-wide compressor, defaulting to Deflate level 6.
pub fn global() -> &'static Compressor {
    GLOBAL_COMPRESSOR.get_or_init(Compressor::with_defaults)
}
