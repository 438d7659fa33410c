//! Lowering of GraphQL SDL and query text into the structural model.
//!
//! Syntax is handled by `graphql-parser`; this module only copies out what
//! the resolver needs and reads the `@ArgoCodec` scalar directive.

use argo_wire::{ScalarKind, WireType};
use graphql_parser::query as q;
use graphql_parser::schema as s;
use indexmap::IndexMap;

use crate::document::{Document, FieldSelection, Fragment, Operation, OperationKind, Selection};
use crate::schema::{FieldDef, ObjectDef, Schema, TypeDef, TypeRef};

/// Directive that picks the wire encoding of a custom scalar.
pub const CODEC_DIRECTIVE: &str = "ArgoCodec";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema syntax error: {0}")]
    SchemaSyntax(String),

    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("fragment `{0}` is defined more than once")]
    DuplicateFragment(String),

    #[error("scalar `{scalar}` has unknown codec `{codec}`")]
    UnknownCodec { scalar: String, codec: String },
}

/// Parse SDL text into a `Schema`.
pub fn parse_schema(source: &str) -> Result<Schema, SchemaError> {
    let ast = s::parse_schema::<String>(source)
        .map_err(|e| SchemaError::SchemaSyntax(e.to_string().trim_end().to_string()))?;

    let mut schema = Schema::new();
    for definition in ast.definitions {
        match definition {
            s::Definition::SchemaDefinition(def) => {
                let roots = [
                    (OperationKind::Query, def.query),
                    (OperationKind::Mutation, def.mutation),
                    (OperationKind::Subscription, def.subscription),
                ];
                for (kind, name) in roots {
                    if let Some(name) = name {
                        schema.set_root(kind, name);
                    }
                }
            }
            s::Definition::TypeDefinition(def) => {
                let def = lower_type(def)?;
                let name = def.name().to_string();
                if schema.add_type(def).is_some() {
                    return Err(SchemaError::DuplicateType(name));
                }
            }
            s::Definition::TypeExtension(ext) => extend_type(&mut schema, ext),
            s::Definition::DirectiveDefinition(_) => {}
        }
    }

    tracing::debug!(types = schema.types().count(), "parsed schema");
    Ok(schema)
}

fn lower_type(def: s::TypeDefinition<'_, String>) -> Result<TypeDef, SchemaError> {
    Ok(match def {
        s::TypeDefinition::Scalar(scalar) => {
            let codec = scalar_codec(&scalar.name, &scalar.directives)?;
            TypeDef::Scalar {
                name: scalar.name,
                codec,
            }
        }
        s::TypeDefinition::Object(object) => TypeDef::Object(ObjectDef {
            name: object.name,
            fields: lower_fields(object.fields),
            interfaces: object.implements_interfaces,
        }),
        s::TypeDefinition::Interface(interface) => TypeDef::Interface(ObjectDef {
            name: interface.name,
            fields: lower_fields(interface.fields),
            interfaces: interface.implements_interfaces,
        }),
        s::TypeDefinition::Union(union) => TypeDef::Union {
            name: union.name,
            members: union.types,
        },
        s::TypeDefinition::Enum(e) => TypeDef::Enum(e.name),
        s::TypeDefinition::InputObject(input) => TypeDef::InputObject(input.name),
    })
}

/// Merge `extend type` fields and interfaces into the base definition.
///
/// Extensions of types that were not (yet) defined are ignored.
fn extend_type(schema: &mut Schema, ext: s::TypeExtension<'_, String>) {
    let (name, fields, interfaces) = match ext {
        s::TypeExtension::Object(object) => (object.name, object.fields, object.implements_interfaces),
        s::TypeExtension::Interface(interface) => (interface.name, interface.fields, Vec::new()),
        s::TypeExtension::Union(union) => {
            if let Some(TypeDef::Union { name, members }) = schema.get(&union.name).cloned() {
                let mut members = members;
                members.extend(union.types);
                schema.add_type(TypeDef::Union { name, members });
            }
            return;
        }
        _ => return,
    };
    let Some(existing) = schema.get(&name).cloned() else {
        return;
    };
    let extended = match existing {
        TypeDef::Object(mut def) => {
            def.fields.extend(lower_fields(fields));
            def.interfaces.extend(interfaces);
            TypeDef::Object(def)
        }
        TypeDef::Interface(mut def) => {
            def.fields.extend(lower_fields(fields));
            TypeDef::Interface(def)
        }
        _ => return,
    };
    schema.add_type(extended);
}

fn lower_fields(fields: Vec<s::Field<'_, String>>) -> IndexMap<String, FieldDef> {
    fields
        .into_iter()
        .map(|f| {
            let def = FieldDef::new(f.name, lower_type_ref(f.field_type));
            (def.name.clone(), def)
        })
        .collect()
}

fn lower_type_ref(ty: s::Type<'_, String>) -> TypeRef {
    match ty {
        s::Type::NamedType(name) => TypeRef::Named(name),
        s::Type::ListType(inner) => TypeRef::list(lower_type_ref(*inner)),
        s::Type::NonNullType(inner) => TypeRef::non_null(lower_type_ref(*inner)),
    }
}

/// Read `@ArgoCodec(codec: KIND)`; `None` means self-describing.
fn scalar_codec(
    scalar: &str,
    directives: &[s::Directive<'_, String>],
) -> Result<Option<WireType>, SchemaError> {
    let Some(directive) = directives.iter().find(|d| d.name == CODEC_DIRECTIVE) else {
        return Ok(None);
    };
    let codec = directive
        .arguments
        .iter()
        .find(|(name, _)| name == "codec")
        .and_then(|(_, value)| match value {
            s::Value::Enum(v) | s::Value::String(v) => Some(v.as_str()),
            _ => None,
        });
    let unknown = |codec: &str| SchemaError::UnknownCodec {
        scalar: scalar.to_string(),
        codec: codec.to_string(),
    };
    match codec {
        None => Err(unknown("")),
        Some("DESC") => Ok(Some(WireType::DESC)),
        Some(name) => ScalarKind::from_name(name)
            .map(|kind| Some(WireType::Scalar(kind)))
            .ok_or_else(|| unknown(name)),
    }
}

/// Parse query text into a `Document`.
pub fn parse_query(source: &str) -> Result<Document, SchemaError> {
    let ast = q::parse_query::<String>(source)
        .map_err(|e| SchemaError::QuerySyntax(e.to_string().trim_end().to_string()))?;

    let mut document = Document::default();
    for definition in ast.definitions {
        match definition {
            q::Definition::Operation(op) => document.operations.push(lower_operation(op)),
            q::Definition::Fragment(fragment) => {
                let q::TypeCondition::On(type_condition) = fragment.type_condition;
                let lowered = Fragment {
                    name: fragment.name,
                    type_condition,
                    selection_set: lower_selection_set(fragment.selection_set),
                };
                if document.fragments.contains_key(&lowered.name) {
                    return Err(SchemaError::DuplicateFragment(lowered.name));
                }
                document.fragments.insert(lowered.name.clone(), lowered);
            }
        }
    }
    Ok(document)
}

fn lower_operation(op: q::OperationDefinition<'_, String>) -> Operation {
    let (name, kind, selection_set) = match op {
        q::OperationDefinition::SelectionSet(set) => (None, OperationKind::Query, set),
        q::OperationDefinition::Query(op) => (op.name, OperationKind::Query, op.selection_set),
        q::OperationDefinition::Mutation(op) => (op.name, OperationKind::Mutation, op.selection_set),
        q::OperationDefinition::Subscription(op) => {
            (op.name, OperationKind::Subscription, op.selection_set)
        }
    };
    Operation {
        name,
        kind,
        selection_set: lower_selection_set(selection_set),
    }
}

fn lower_selection_set(set: q::SelectionSet<'_, String>) -> Vec<Selection> {
    set.items.into_iter().map(lower_selection).collect()
}

fn lower_selection(selection: q::Selection<'_, String>) -> Selection {
    match selection {
        q::Selection::Field(field) => Selection::Field(FieldSelection {
            alias: field.alias,
            name: field.name,
            directives: directive_names(field.directives),
            selection_set: lower_selection_set(field.selection_set),
        }),
        q::Selection::FragmentSpread(spread) => Selection::FragmentSpread {
            name: spread.fragment_name,
            directives: directive_names(spread.directives),
        },
        q::Selection::InlineFragment(inline) => Selection::InlineFragment {
            type_condition: inline.type_condition.map(|q::TypeCondition::On(name)| name),
            directives: directive_names(inline.directives),
            selection_set: lower_selection_set(inline.selection_set),
        },
    }
}

fn directive_names(directives: Vec<q::Directive<'_, String>>) -> Vec<String> {
    directives.into_iter().map(|d| d.name).collect()
}
