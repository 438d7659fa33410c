use crate::document::OperationKind;
use crate::schema::*;

fn schema() -> Schema {
    Schema::new()
        .with_type(TypeDef::Interface(ObjectDef::new("Node")))
        .with_type(TypeDef::Interface(ObjectDef::new("Entity").implements("Node")))
        .with_type(TypeDef::Object(ObjectDef::new("User").implements("Node")))
        .with_type(TypeDef::Object(ObjectDef::new("Post")))
        .with_type(TypeDef::Union {
            name: "Result".into(),
            members: vec!["User".into(), "Post".into()],
        })
}

#[test]
fn builtin_scalars_present() {
    let s = Schema::new();
    for name in ["Int", "Float", "String", "Boolean", "ID"] {
        assert!(matches!(s.get(name), Some(TypeDef::Scalar { codec: Some(_), .. })));
    }
}

#[test]
fn root_types_default_and_override() {
    let mut s = Schema::new();
    assert_eq!(s.root_type(OperationKind::Query), "Query");
    assert_eq!(s.root_type(OperationKind::Mutation), "Mutation");
    s.set_root(OperationKind::Query, "Root");
    assert_eq!(s.root_type(OperationKind::Query), "Root");
}

#[test]
fn always_applies() {
    let s = schema();
    assert!(s.always_applies("User", "User"));
    assert!(s.always_applies("Node", "User"));
    assert!(s.always_applies("Node", "Entity"));
    assert!(s.always_applies("Result", "User"));

    assert!(!s.always_applies("User", "Node"));
    assert!(!s.always_applies("Post", "Result"));
    assert!(!s.always_applies("Node", "Post"));
    assert!(!s.always_applies("User", "Post"));
}

#[test]
fn type_ref_base_name() {
    let t = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("User"))));
    assert_eq!(t.base_name(), "User");
}

#[test]
fn composite_kinds() {
    let s = schema();
    assert!(s.get("User").unwrap().is_composite());
    assert!(s.get("Result").unwrap().is_composite());
    assert!(!s.get("Int").unwrap().is_composite());
    assert!(s.get("Result").unwrap().fields().is_none());
}
