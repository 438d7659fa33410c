//! Per-field execution errors carried alongside a result value.

use std::fmt::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// One step of a response path: an object key or a list index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Render a path as `a.b[2].c` for diagnostics. The empty path renders as `$`.
pub fn display_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "$".to_owned();
    }
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
        }
    }
    out
}

/// Source location of an error in the query document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A field that failed during upstream execution.
///
/// This is data, not a fault: it travels through the binary format and comes
/// back out of the decoder next to the value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// The value handed to `FieldError::from_value` did not look like an error object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldErrorShape {
    #[error("field error must be an object, found {0}")]
    NotAnObject(&'static str),
    #[error("field error is missing a string `message`")]
    MissingMessage,
    #[error("field error `{0}` entry is malformed")]
    Malformed(&'static str),
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.locations.push(Location { line, column });
        self
    }

    pub fn with_extensions(mut self, extensions: Value) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Object form used for self-describing storage. Empty parts are omitted.
    pub fn to_value(&self) -> Value {
        let mut map = IndexMap::new();
        map.insert("message".to_owned(), Value::String(self.message.clone()));
        if !self.locations.is_empty() {
            let locations = self
                .locations
                .iter()
                .map(|loc| {
                    Value::object([
                        ("line", Value::Int(loc.line.into())),
                        ("column", Value::Int(loc.column.into())),
                    ])
                })
                .collect();
            map.insert("locations".to_owned(), Value::List(locations));
        }
        if !self.path.is_empty() {
            let path = self
                .path
                .iter()
                .map(|segment| match segment {
                    PathSegment::Key(key) => Value::String(key.clone()),
                    PathSegment::Index(index) => Value::Int(*index as i64),
                })
                .collect();
            map.insert("path".to_owned(), Value::List(path));
        }
        if let Some(extensions) = &self.extensions {
            map.insert("extensions".to_owned(), extensions.clone());
        }
        Value::Object(map)
    }

    /// Inverse of `to_value`.
    pub fn from_value(value: Value) -> Result<Self, FieldErrorShape> {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Err(FieldErrorShape::NotAnObject(other.kind_name())),
        };
        let message = match map.shift_remove("message") {
            Some(Value::String(message)) => message,
            _ => return Err(FieldErrorShape::MissingMessage),
        };

        let mut error = FieldError::new(message);
        if let Some(locations) = map.shift_remove("locations") {
            let Value::List(items) = locations else {
                return Err(FieldErrorShape::Malformed("locations"));
            };
            for item in &items {
                let line = location_part(item, "line")?;
                let column = location_part(item, "column")?;
                error.locations.push(Location { line, column });
            }
        }
        if let Some(path) = map.shift_remove("path") {
            let Value::List(items) = path else {
                return Err(FieldErrorShape::Malformed("path"));
            };
            for item in items {
                let segment = match item {
                    Value::String(key) => PathSegment::Key(key),
                    Value::Int(index) if index >= 0 => PathSegment::Index(index as usize),
                    _ => return Err(FieldErrorShape::Malformed("path")),
                };
                error.path.push(segment);
            }
        }
        error.extensions = map.shift_remove("extensions");
        Ok(error)
    }
}

fn location_part(item: &Value, key: &'static str) -> Result<u32, FieldErrorShape> {
    match item.get(key) {
        Some(Value::Int(n)) => u32::try_from(*n).map_err(|_| FieldErrorShape::Malformed("locations")),
        _ => Err(FieldErrorShape::Malformed("locations")),
    }
}
