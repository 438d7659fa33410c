//! Structural schema model.
//!
//! Only what the resolver needs: output types, their fields with type
//! modifiers, interface implementations and union membership. Arguments,
//! descriptions and input types beyond their names are not kept.

use argo_wire::{ScalarKind, WireType};
use indexmap::IndexMap;

use crate::document::OperationKind;

/// Declared field type with list and non-null modifiers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Object or interface type.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ObjectDef {
    pub name: String,
    pub fields: IndexMap<String, FieldDef>,
    /// Interfaces this type implements.
    pub interfaces: Vec<String>,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        let field = FieldDef::new(name, ty);
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeDef {
    /// Scalar with an optional wire encoding override.
    Scalar { name: String, codec: Option<WireType> },
    Enum(String),
    Object(ObjectDef),
    Interface(ObjectDef),
    Union { name: String, members: Vec<String> },
    InputObject(String),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::Enum(name) | Self::InputObject(name) => name,
            Self::Object(def) | Self::Interface(def) => &def.name,
            Self::Union { name, .. } => name,
        }
    }

    /// Object, interface or union.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union { .. })
    }

    pub fn fields(&self) -> Option<&IndexMap<String, FieldDef>> {
        match self {
            Self::Object(def) | Self::Interface(def) => Some(&def.fields),
            _ => None,
        }
    }
}

/// Built-in scalars and their wire kinds.
pub const BUILTIN_SCALARS: [(&str, ScalarKind); 5] = [
    ("Int", ScalarKind::Int32),
    ("Float", ScalarKind::Float64),
    ("String", ScalarKind::String),
    ("Boolean", ScalarKind::Boolean),
    ("ID", ScalarKind::Id),
];

#[derive(Clone, Debug)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Schema holding only the built-in scalars.
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        for (name, kind) in BUILTIN_SCALARS {
            types.insert(
                name.to_string(),
                TypeDef::Scalar {
                    name: name.to_string(),
                    codec: Some(WireType::Scalar(kind)),
                },
            );
        }
        Self {
            types,
            query: None,
            mutation: None,
            subscription: None,
        }
    }

    /// Add or replace a type; returns the previous definition.
    pub fn add_type(&mut self, def: TypeDef) -> Option<TypeDef> {
        self.types.insert(def.name().to_string(), def)
    }

    pub fn with_type(mut self, def: TypeDef) -> Self {
        self.add_type(def);
        self
    }

    pub fn set_root(&mut self, kind: OperationKind, type_name: impl Into<String>) {
        let slot = match kind {
            OperationKind::Query => &mut self.query,
            OperationKind::Mutation => &mut self.mutation,
            OperationKind::Subscription => &mut self.subscription,
        };
        *slot = Some(type_name.into());
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Root type name for an operation kind.
    ///
    /// Falls back to `Query`/`Mutation`/`Subscription` when the schema block
    /// does not name one.
    pub fn root_type(&self, kind: OperationKind) -> &str {
        let explicit = match kind {
            OperationKind::Query => &self.query,
            OperationKind::Mutation => &self.mutation,
            OperationKind::Subscription => &self.subscription,
        };
        explicit.as_deref().unwrap_or(kind.default_root())
    }

    /// Whether every value of type `parent` is also of type `condition`.
    ///
    /// Decides if a fragment on `condition` always contributes its fields when
    /// spread inside a selection on `parent`.
    pub fn always_applies(&self, condition: &str, parent: &str) -> bool {
        if condition == parent {
            return true;
        }
        match self.get(parent) {
            Some(TypeDef::Object(def)) | Some(TypeDef::Interface(def)) => {
                if def.interfaces.iter().any(|i| i == condition) {
                    return true;
                }
            }
            _ => {}
        }
        matches!(
            self.get(condition),
            Some(TypeDef::Union { members, .. })
                if matches!(self.get(parent), Some(TypeDef::Object(_)))
                    && members.iter().any(|m| m == parent)
        )
    }
}
