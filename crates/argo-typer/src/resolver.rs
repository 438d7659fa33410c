//! Derives the wire type of a query's result.
//!
//! Resolution is static: it walks the operation's selection set against the
//! schema, inlines fragments, merges fields by response key and maps each
//! declared field type to a `WireType`. No result value is consulted.

use argo_wire::{Field, WireType};
use indexmap::IndexMap;

use crate::document::{Document, Operation, OperationKind, Selection, is_conditional};
use crate::schema::{Schema, TypeDef, TypeRef};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("document contains no operation")]
    NoOperation,

    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("document contains {0} operations; an operation name is required")]
    AmbiguousOperation(usize),

    #[error("schema has no {kind} root type `{name}`")]
    MissingRootType { kind: OperationKind, name: String },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("type `{0}` cannot appear in a result")]
    NotOutputType(String),

    #[error("field `{field}` not found on type `{type_name}`")]
    UnknownField { type_name: String, field: String },

    #[error("unknown fragment `{0}`")]
    UnknownFragment(String),

    #[error("fragment `{0}` spreads itself")]
    FragmentCycle(String),

    #[error("fragment condition `{0}` is not an object, interface or union")]
    InvalidFragmentType(String),

    #[error("leaf field `{type_name}.{field}` cannot have a selection set")]
    LeafSelection { type_name: String, field: String },

    #[error("field `{type_name}.{field}` of composite type needs a selection set")]
    MissingSelection { type_name: String, field: String },

    #[error("selections of `{field}` on `{type_name}` have incompatible shapes")]
    ConflictingShapes { type_name: String, field: String },
}

/// Resolve the root wire type of an operation.
///
/// `operation` selects by name; with `None` the document must hold exactly
/// one operation. The result is the record type of `data` (the codec adds
/// the outer nullability).
pub fn resolve(
    schema: &Schema,
    document: &Document,
    operation: Option<&str>,
) -> Result<WireType, ResolveError> {
    let op = select_operation(document, operation)?;
    let root = schema.root_type(op.kind);
    if !matches!(schema.get(root), Some(TypeDef::Object(_))) {
        return Err(ResolveError::MissingRootType {
            kind: op.kind,
            name: root.to_string(),
        });
    }

    let resolver = Resolver { schema, document };
    let scope = Scope {
        selections: &op.selection_set,
        fragments: Vec::new(),
    };
    let ty = resolver.record(root, std::slice::from_ref(&scope))?;

    if let WireType::Record(fields) = &ty {
        tracing::debug!(
            operation = op.name.as_deref().unwrap_or("<anonymous>"),
            kind = %op.kind,
            root,
            fields = fields.len(),
            "resolved operation"
        );
    }
    Ok(ty)
}

fn select_operation<'a>(
    document: &'a Document,
    name: Option<&str>,
) -> Result<&'a Operation, ResolveError> {
    match name {
        Some(name) => document
            .operations
            .iter()
            .find(|op| op.name.as_deref() == Some(name))
            .ok_or_else(|| ResolveError::UnknownOperation(name.to_string())),
        None => match document.operations.as_slice() {
            [] => Err(ResolveError::NoOperation),
            [op] => Ok(op),
            ops => Err(ResolveError::AmbiguousOperation(ops.len())),
        },
    }
}

/// A selection set together with the fragment spreads that led to it.
#[derive(Clone, Debug)]
struct Scope<'a> {
    selections: &'a [Selection],
    fragments: Vec<&'a str>,
}

/// A response key collected from one or more selections.
struct Collected<'a> {
    omittable: bool,
    /// One entry per distinct declared field type.
    occurrences: Vec<Occurrence<'a>>,
}

/// Selections of one response key that share a declared field type.
struct Occurrence<'a> {
    /// Type the field was looked up on.
    parent: &'a str,
    name: &'a str,
    /// `None` for `__typename`.
    ty: Option<&'a TypeRef>,
    /// Nested selection sets, all resolved against `ty`.
    subs: Vec<Scope<'a>>,
}

impl Occurrence<'_> {
    fn has_selections(&self) -> bool {
        self.subs.iter().any(|s| !s.selections.is_empty())
    }

    fn leaf_selection(&self) -> ResolveError {
        ResolveError::LeafSelection {
            type_name: self.parent.to_string(),
            field: self.name.to_string(),
        }
    }
}

struct Resolver<'a> {
    schema: &'a Schema,
    document: &'a Document,
}

impl<'a> Resolver<'a> {
    fn record(&self, parent: &'a str, scopes: &[Scope<'a>]) -> Result<WireType, ResolveError> {
        let mut collected = IndexMap::new();
        for scope in scopes {
            self.collect(parent, scope, false, &mut collected)?;
        }

        let mut fields = Vec::with_capacity(collected.len());
        for (key, entry) in collected {
            let mut types = entry.occurrences.iter().map(|occ| self.occurrence_type(occ));
            let Some(first) = types.next() else {
                continue;
            };
            let mut of = first?;
            for ty in types {
                of = merge_shapes(of, ty?).ok_or_else(|| ResolveError::ConflictingShapes {
                    type_name: parent.to_string(),
                    field: key.to_string(),
                })?;
            }
            fields.push(Field::new(key, of).omittable(entry.omittable));
        }
        Ok(WireType::Record(fields))
    }

    fn occurrence_type(&self, occ: &Occurrence<'a>) -> Result<WireType, ResolveError> {
        match occ.ty {
            None if occ.has_selections() => Err(occ.leaf_selection()),
            None => Ok(WireType::STRING),
            Some(ty) => self.field_type(ty, occ),
        }
    }

    fn collect(
        &self,
        parent: &'a str,
        scope: &Scope<'a>,
        omittable: bool,
        out: &mut IndexMap<&'a str, Collected<'a>>,
    ) -> Result<(), ResolveError> {
        for selection in scope.selections {
            match selection {
                Selection::Field(field) => {
                    let field_omittable = omittable || is_conditional(&field.directives);
                    let ty = if field.name == "__typename" {
                        None
                    } else {
                        Some(self.lookup_field(parent, &field.name)?)
                    };
                    let sub = Scope {
                        selections: &field.selection_set,
                        fragments: scope.fragments.clone(),
                    };
                    let entry = out.entry(field.response_key()).or_insert_with(|| Collected {
                        omittable: field_omittable,
                        occurrences: Vec::new(),
                    });
                    entry.omittable &= field_omittable;
                    match entry.occurrences.iter_mut().find(|occ| occ.ty == ty) {
                        Some(occ) => occ.subs.push(sub),
                        None => entry.occurrences.push(Occurrence {
                            parent,
                            name: &field.name,
                            ty,
                            subs: vec![sub],
                        }),
                    }
                }
                Selection::FragmentSpread { name, directives } => {
                    if scope.fragments.contains(&name.as_str()) {
                        return Err(ResolveError::FragmentCycle(name.clone()));
                    }
                    let fragment = self
                        .document
                        .fragments
                        .get(name)
                        .ok_or_else(|| ResolveError::UnknownFragment(name.clone()))?;
                    let condition = fragment.type_condition.as_str();
                    let omittable =
                        omittable || is_conditional(directives) || !self.applies(condition, parent)?;
                    let mut fragments = scope.fragments.clone();
                    fragments.push(name);
                    let inner = Scope {
                        selections: &fragment.selection_set,
                        fragments,
                    };
                    self.collect(condition, &inner, omittable, out)?;
                }
                Selection::InlineFragment {
                    type_condition,
                    directives,
                    selection_set,
                } => {
                    let condition = type_condition.as_deref().unwrap_or(parent);
                    let omittable =
                        omittable || is_conditional(directives) || !self.applies(condition, parent)?;
                    let inner = Scope {
                        selections: selection_set,
                        fragments: scope.fragments.clone(),
                    };
                    self.collect(condition, &inner, omittable, out)?;
                }
            }
        }
        Ok(())
    }

    /// Check the fragment condition exists and report whether it always applies.
    fn applies(&self, condition: &str, parent: &str) -> Result<bool, ResolveError> {
        match self.schema.get(condition) {
            None => Err(ResolveError::UnknownType(condition.to_string())),
            Some(def) if !def.is_composite() => {
                Err(ResolveError::InvalidFragmentType(condition.to_string()))
            }
            Some(_) => Ok(self.schema.always_applies(condition, parent)),
        }
    }

    fn lookup_field(&self, parent: &str, field: &str) -> Result<&'a TypeRef, ResolveError> {
        let def = self
            .schema
            .get(parent)
            .ok_or_else(|| ResolveError::UnknownType(parent.to_string()))?;
        def.fields()
            .and_then(|fields| fields.get(field))
            .map(|f| &f.ty)
            .ok_or_else(|| ResolveError::UnknownField {
                type_name: parent.to_string(),
                field: field.to_string(),
            })
    }

    /// Nullable unless wrapped in `NonNull`.
    fn field_type(&self, ty: &'a TypeRef, occ: &Occurrence<'a>) -> Result<WireType, ResolveError> {
        match ty {
            TypeRef::NonNull(inner) => self.non_null_type(inner, occ),
            other => Ok(WireType::nullable(self.non_null_type(other, occ)?)),
        }
    }

    fn non_null_type(&self, ty: &'a TypeRef, occ: &Occurrence<'a>) -> Result<WireType, ResolveError> {
        match ty {
            TypeRef::NonNull(inner) => self.non_null_type(inner, occ),
            TypeRef::List(element) => Ok(WireType::array(self.field_type(element, occ)?)),
            TypeRef::Named(name) => self.named_type(name, occ),
        }
    }

    fn named_type(&self, name: &'a str, occ: &Occurrence<'a>) -> Result<WireType, ResolveError> {
        let def = self
            .schema
            .get(name)
            .ok_or_else(|| ResolveError::UnknownType(name.to_string()))?;
        match def {
            TypeDef::Scalar { .. } | TypeDef::Enum(_) if occ.has_selections() => {
                Err(occ.leaf_selection())
            }
            TypeDef::Scalar { codec, .. } => Ok(codec.clone().unwrap_or(WireType::DESC)),
            TypeDef::Enum(_) => Ok(WireType::STRING),
            TypeDef::Object(_) | TypeDef::Interface(_) | TypeDef::Union { .. } => {
                if !occ.has_selections() {
                    return Err(ResolveError::MissingSelection {
                        type_name: occ.parent.to_string(),
                        field: occ.name.to_string(),
                    });
                }
                self.record(name, &occ.subs)
            }
            TypeDef::InputObject(_) => Err(ResolveError::NotOutputType(name.to_string())),
        }
    }
}

/// Combine the wire types of one response key reached through different
/// concrete types. Fields known to only one side become omittable.
///
/// `None` when the shapes cannot share an encoding.
fn merge_shapes(left: WireType, right: WireType) -> Option<WireType> {
    if left == right {
        return Some(left);
    }
    match (left, right) {
        (WireType::Nullable(l), WireType::Nullable(r)) => Some(WireType::nullable(merge_shapes(*l, *r)?)),
        (WireType::Nullable(l), other) | (other, WireType::Nullable(l)) => {
            Some(WireType::nullable(merge_shapes(*l, other)?))
        }
        (WireType::Array(l), WireType::Array(r)) => Some(WireType::array(merge_shapes(*l, *r)?)),
        (WireType::Record(l), WireType::Record(r)) => Some(WireType::Record(merge_fields(l, r)?)),
        _ => None,
    }
}

fn merge_fields(left: Vec<Field>, right: Vec<Field>) -> Option<Vec<Field>> {
    let mut right: IndexMap<String, Field> = right.into_iter().map(|f| (f.name.clone(), f)).collect();
    let mut merged = Vec::with_capacity(left.len() + right.len());
    for field in left {
        match right.shift_remove(&field.name) {
            Some(other) => {
                let omittable = field.omittable || other.omittable;
                let of = merge_shapes(field.of, other.of)?;
                merged.push(Field::new(field.name, of).omittable(omittable));
            }
            None => merged.push(field.omittable(true)),
        }
    }
    merged.extend(right.into_values().map(|f| f.omittable(true)));
    Some(merged)
}
