#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Encoder and decoder for Argo messages.
//!
//! A message is typed by the `WireType` of a resolved query
//! (`ExecutionResultCodec`, `encode_value`) or carries inline type tags
//! (`encode_desc`). Dictionaries and block tables live for one call only, so
//! independent calls can run in parallel.

mod codec;
mod decoder;
mod encoder;
mod error;
mod options;
mod scope;

#[cfg(test)]
mod codec_tests;
#[cfg(test)]
mod proptest_tests;

pub use codec::{
    ExecutionResultCodec, decode_desc, decode_value, encode_desc, encode_value,
};
pub use error::{DecodeError, EncodeError};
pub use options::CodecOptions;
