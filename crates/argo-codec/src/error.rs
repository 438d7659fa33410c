//! Encode and decode failures.
//!
//! Field errors carried inside a message are data and never show up here.

use argo_core::FieldErrorShape;
use argo_wire::{BufferError, HeaderError};

/// The value does not fit the wire type it is encoded against.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("at {path}: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("at {path}: required field is missing")]
    MissingField { path: String },

    #[error("at {path}: unexpected field `{field}`")]
    UnexpectedField { path: String, field: String },

    #[error("at {path}: {value} does not fit in INT32")]
    OutOfRange { path: String, value: i64 },

    #[error("at {path}: string is not valid base64")]
    InvalidBytes { path: String },

    #[error("value nesting exceeds depth limit {0}")]
    DepthLimit(usize),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// The message is corrupt or does not match the wire type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("unexpected label {label} at offset {offset}, expected {expected}")]
    UnexpectedLabel {
        expected: &'static str,
        label: i64,
        offset: usize,
    },

    #[error("back-reference to unassigned {kind} dictionary id {id}")]
    DictionaryMiss { kind: &'static str, id: u64 },

    #[error("unknown self-describing tag {0}")]
    UnknownTag(i64),

    #[error("invalid UTF-8 in string at offset {0}")]
    InvalidUtf8(usize),

    #[error("INT32 value {0} out of range")]
    OutOfRange(i64),

    #[error("length {len} exceeds the {remaining} bytes left")]
    LengthOverflow { len: u64, remaining: usize },

    #[error("message nesting exceeds depth limit {0}")]
    DepthLimit(usize),

    #[error("malformed field error: {0}")]
    MalformedError(#[source] FieldErrorShape),

    #[error("message is not self-describing")]
    NotSelfDescribing,
}
