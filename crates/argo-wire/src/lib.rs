#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wire-level building blocks for the Argo format.
//!
//! This crate contains:
//! - Variable-length integer codec and the label vocabulary built on it
//! - `ByteBuffer`: primary stream plus out-of-band block regions
//! - `Header`: the fixed message preamble
//! - `WireType`: the closed set of shapes a value can take on the wire

pub mod buffer;
pub mod header;
pub mod label;
pub mod varint;
pub mod wire_type;

#[cfg(test)]
mod label_tests;

pub use buffer::{BLOCK_REF_SIZE, BlockHandle, BlockRef, BufferError, ByteBuffer};
pub use header::{HEADER_SIZE, Header, HeaderError, MAGIC, VERSION};
pub use label::{DescTag, Label};
pub use wire_type::{Field, ScalarKind, WireType};
