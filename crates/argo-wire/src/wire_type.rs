//! Wire type model.
//!
//! A `WireType` tree describes the exact binary shape of every position a
//! result can take for one query. Trees are built once by the resolver and
//! shared read-only by every encode and decode against that query.

use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Leaf scalar kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScalarKind {
    String,
    Int32,
    Int64,
    Float64,
    Boolean,
    Id,
    Bytes,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 7] = [
        Self::String,
        Self::Int32,
        Self::Int64,
        Self::Float64,
        Self::Boolean,
        Self::Id,
        Self::Bytes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::Boolean => "BOOLEAN",
            Self::Id => "ID",
            Self::Bytes => "BYTES",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Whether the encoding starts with a label.
    ///
    /// Unlabeled kinds need a `NON_NULL` marker at nullable positions.
    pub fn is_labeled(self) -> bool {
        matches!(self, Self::String | Self::Id | Self::Bytes | Self::Boolean)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One record entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Field {
    /// Response key: alias if present, else the field name.
    pub name: String,
    pub of: WireType,
    /// May be missing from the result (`@skip`/`@include`, conditional fragment).
    pub omittable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, of: WireType) -> Self {
        Self {
            name: name.into(),
            of,
            omittable: false,
        }
    }

    pub fn omittable(mut self, omittable: bool) -> Self {
        self.omittable = omittable;
        self
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WireType {
    Scalar(ScalarKind),
    /// Fixed-shape record; field order is fixed by the query.
    Record(Vec<Field>),
    Array(Box<WireType>),
    Nullable(Box<WireType>),
    /// Value stored out of band in its own block region.
    Block(Box<WireType>),
    /// Value carries inline type tags.
    SelfDescribing,
}

impl WireType {
    /// Whole-document self-describing root.
    pub const DESC: WireType = WireType::SelfDescribing;

    pub const STRING: WireType = WireType::Scalar(ScalarKind::String);
    pub const INT32: WireType = WireType::Scalar(ScalarKind::Int32);
    pub const INT64: WireType = WireType::Scalar(ScalarKind::Int64);
    pub const FLOAT64: WireType = WireType::Scalar(ScalarKind::Float64);
    pub const BOOLEAN: WireType = WireType::Scalar(ScalarKind::Boolean);
    pub const ID: WireType = WireType::Scalar(ScalarKind::Id);
    pub const BYTES: WireType = WireType::Scalar(ScalarKind::Bytes);

    pub fn nullable(inner: WireType) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn array(element: WireType) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn block(inner: WireType) -> Self {
        Self::Block(Box::new(inner))
    }

    pub fn record(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Record(fields.into_iter().collect())
    }

    /// Whether an encoded value of this type starts with a label that cannot
    /// be mistaken for `NULL`, `ABSENT` or `ERROR`.
    pub fn is_labeled(&self) -> bool {
        match self {
            Self::Scalar(kind) => kind.is_labeled(),
            Self::Array(_) | Self::Nullable(_) | Self::SelfDescribing => true,
            Self::Record(_) | Self::Block(_) => false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Record(_) => "RECORD",
            Self::Array(_) => "ARRAY",
            Self::Nullable(_) => "NULLABLE",
            Self::Block(_) => "BLOCK",
            Self::SelfDescribing => "DESC",
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.name()),
            Self::SelfDescribing => f.write_str("DESC"),
            Self::Nullable(inner) => {
                inner.fmt_indented(f, indent)?;
                f.write_str("?")
            }
            Self::Array(element) => {
                f.write_str("[")?;
                element.fmt_indented(f, indent)?;
                f.write_str("]")
            }
            Self::Block(inner) => {
                f.write_str("BLOCK<")?;
                inner.fmt_indented(f, indent)?;
                f.write_str(">")
            }
            Self::Record(fields) if fields.is_empty() => f.write_str("{}"),
            Self::Record(fields) => {
                writeln!(f, "{{")?;
                let pad = "  ".repeat(indent + 1);
                for field in fields {
                    let mark = if field.omittable { "?" } else { "" };
                    write!(f, "{pad}{}{mark}: ", field.name)?;
                    field.of.fmt_indented(f, indent + 1)?;
                    writeln!(f)?;
                }
                write!(f, "{}}}", "  ".repeat(indent))
            }
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Serialize for WireType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(_) | Self::SelfDescribing => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", self.kind_name())?;
                map.end()
            }
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "RECORD")?;
                map.serialize_entry("fields", fields)?;
                map.end()
            }
            Self::Array(inner) | Self::Nullable(inner) | Self::Block(inner) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", self.kind_name())?;
                map.serialize_entry("of", inner.as_ref())?;
                map.end()
            }
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Field", 3)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("of", &self.of)?;
        s.serialize_field("omittable", &self.omittable)?;
        s.end()
    }
}
