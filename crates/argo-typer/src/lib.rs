#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Static typing for the Argo codec.
//!
//! Lowers GraphQL schema and query text into a small structural model and
//! resolves an operation into the `WireType` tree its results are encoded with.

pub mod document;
pub mod parse;
pub mod resolver;
pub mod schema;

#[cfg(test)]
mod parse_tests;
#[cfg(test)]
mod schema_tests;

pub use document::{Document, FieldSelection, Fragment, Operation, OperationKind, Selection};
pub use parse::{SchemaError, parse_query, parse_schema};
pub use resolver::{ResolveError, resolve};
pub use schema::{FieldDef, ObjectDef, Schema, TypeDef, TypeRef};

/// Parse schema and query text and resolve one operation.
pub fn resolve_text(
    schema: &str,
    query: &str,
    operation: Option<&str>,
) -> Result<argo_wire::WireType, TypeError> {
    let schema = parse_schema(schema)?;
    let document = parse_query(query)?;
    Ok(resolve(&schema, &document, operation)?)
}

/// Failure of `resolve_text`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error(transparent)]
    Parse(#[from] SchemaError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
