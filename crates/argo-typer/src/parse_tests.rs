use argo_wire::WireType;
use indoc::indoc;

use crate::document::{OperationKind, Selection};
use crate::parse::*;
use crate::schema::{TypeDef, TypeRef};

#[test]
fn schema_block_sets_roots() {
    let schema = parse_schema(indoc! {r#"
        schema { query: Root mutation: Writes }
        type Root { a: Int }
        type Writes { b: Int }
    "#})
    .unwrap();
    assert_eq!(schema.root_type(OperationKind::Query), "Root");
    assert_eq!(schema.root_type(OperationKind::Mutation), "Writes");
    assert_eq!(schema.root_type(OperationKind::Subscription), "Subscription");
}

#[test]
fn field_type_modifiers() {
    let schema = parse_schema("type Query { xs: [Int!]! }").unwrap();
    let fields = schema.get("Query").unwrap().fields().unwrap();
    assert_eq!(
        fields["xs"].ty,
        TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Int"))))
    );
}

#[test]
fn codec_directive() {
    let schema = parse_schema(indoc! {r#"
        scalar Plain
        scalar Big @ArgoCodec(codec: INT64)
        scalar Raw @ArgoCodec(codec: "BYTES")
        scalar Json @ArgoCodec(codec: DESC)
    "#})
    .unwrap();
    let codec = |name: &str| match schema.get(name) {
        Some(TypeDef::Scalar { codec, .. }) => codec.clone(),
        other => panic!("{name}: {other:?}"),
    };
    assert_eq!(codec("Plain"), None);
    assert_eq!(codec("Big"), Some(WireType::INT64));
    assert_eq!(codec("Raw"), Some(WireType::BYTES));
    assert_eq!(codec("Json"), Some(WireType::DESC));
}

#[test]
fn unknown_codec() {
    assert_eq!(
        parse_schema("scalar Odd @ArgoCodec(codec: INT8)").unwrap_err(),
        SchemaError::UnknownCodec {
            scalar: "Odd".into(),
            codec: "INT8".into()
        }
    );
}

#[test]
fn duplicate_type() {
    assert_eq!(
        parse_schema("type A { x: Int } type A { y: Int }").unwrap_err(),
        SchemaError::DuplicateType("A".into())
    );
}

#[test]
fn type_extensions_merge() {
    let schema = parse_schema(indoc! {r#"
        type Query { a: Int }
        extend type Query { b: String }
        union U = Query
        type Other { c: Int }
        extend union U = Other
    "#})
    .unwrap();
    let fields = schema.get("Query").unwrap().fields().unwrap();
    assert_eq!(fields.keys().collect::<Vec<_>>(), ["a", "b"]);
    assert!(matches!(
        schema.get("U"),
        Some(TypeDef::Union { members, .. }) if members == &["Query", "Other"]
    ));
}

#[test]
fn schema_syntax_error() {
    assert!(matches!(
        parse_schema("type {"),
        Err(SchemaError::SchemaSyntax(_))
    ));
}

#[test]
fn query_lowering() {
    let doc = parse_query(indoc! {r#"
        query Named { x: a @skip(if: true) ...F ... on T { b } }
        mutation { m }
        fragment F on Query { c }
    "#})
    .unwrap();
    assert_eq!(doc.operations.len(), 2);
    assert_eq!(doc.operations[0].name.as_deref(), Some("Named"));
    assert_eq!(doc.operations[1].kind, OperationKind::Mutation);
    assert_eq!(doc.fragments["F"].type_condition, "Query");

    let Selection::Field(field) = &doc.operations[0].selection_set[0] else {
        panic!("expected field");
    };
    assert_eq!(field.response_key(), "x");
    assert_eq!(field.directives, ["skip"]);
    assert!(matches!(
        &doc.operations[0].selection_set[2],
        Selection::InlineFragment { type_condition: Some(t), .. } if t == "T"
    ));
}

#[test]
fn duplicate_fragment() {
    assert_eq!(
        parse_query("{ a } fragment F on Q { a } fragment F on Q { b }").unwrap_err(),
        SchemaError::DuplicateFragment("F".into())
    );
}

#[test]
fn query_syntax_error() {
    assert!(matches!(parse_query("{ a "), Err(SchemaError::QuerySyntax(_))));
}
