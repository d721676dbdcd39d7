// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # densepack - compact binary object-graph codec
//!
//! A pure Rust codec for object graphs, tuned for payload size: integers
//! shrink to their narrowest usable width on the wire, member layouts are
//! declared once and cached process-wide, and finished payloads go through
//! a whole-buffer compression pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use densepack::{decode, encode, Result};
//!
//! fn main() -> Result<()> {
//!     let payload = encode(&vec![1u32, 2, 3])?;
//!     let back: Vec<u32> = decode(&payload)?;
//!     assert_eq!(back, vec![1, 2, 3]);
//!     Ok(())
//! }
//! ```
//!
//! Composite types without a [`Packable`] impl go through the dynamic path:
//! declare a [`model::TypeModel`] for them, build a [`Value::Record`], and
//! use [`encode_value`]/[`decode_value`].
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                        Facade (codec)                        |
//! |   encode/decode  |  encode_value/decode_value  |  wrappers   |
//! +--------------------------------------------------------------+
//! |                     Dispatch & Models                        |
//! |   WrapperManifest  |  ModelRegistry  |  Packable fast path   |
//! +--------------------------------------------------------------+
//! |                        Wire Layer                            |
//! |   Writer / Reader  |  width-compressed ints  |  outer pass   |
//! +--------------------------------------------------------------+
//! |                       Buffer Layer                           |
//! |   ExtensibleBuffer (block-growing)  |  global BufferPool     |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Packable`] | Per-type encode/decode fast path |
//! | [`Value`] | Dynamic value tree for model-driven serialization |
//! | [`model::TypeModel`] | Cached member layout of one composite type |
//! | [`wire::Writer`] | Append-only write cursor over a pooled buffer |
//! | [`wire::Reader`] | Borrowing read cursor over finished wire bytes |
//!
//! ## Modules Overview
//!
//! - [`codec`] - encode/decode entry points (start here)
//! - [`model`] - member-layout declaration and the model registry
//! - [`manifest`] - the `Packable` contract and wrapper dispatch
//! - [`wire`] - cursors and the integer width-compression scheme
//! - [`compress`] - the outer byte-compression pass
//! - [`buffer`] - block-growing buffers and their global pool

pub mod buffer;
pub mod codec;
pub mod compress;
pub mod error;
pub mod manifest;
pub mod model;
pub mod scalar;
pub mod value;
pub mod wire;

pub use codec::{decode, decode_value, encode, encode_value, register_wrapper};
pub use error::{CodecError, Result};
pub use manifest::{Bytes, Packable, WrapperManifest};
pub use model::{EnumRepr, ModelBuilder, ModelRegistry, TypeKind, TypeModel};
pub use scalar::{Decimal, SerialDate};
pub use value::{Record, Value};
