#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Argo workspace.
//!
//! - `Value`: the JSON-shaped result tree (ordered objects, lists, scalars, null)
//! - `FieldError` / `ExecutionResult`: GraphQL response envelope
//! - `Dictionary`: first-seen-order value deduplication table

mod dictionary;
mod field_error;
mod result;
mod value;


pub use dictionary::{Dictionary, EntryId};
pub use field_error::{FieldError, FieldErrorShape, Location, PathSegment, display_path};
pub use result::ExecutionResult;
pub use value::Value;

pub use indexmap::IndexMap;
