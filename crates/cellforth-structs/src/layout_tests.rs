use std::rc::Rc;

use cellforth_core::{CELL_SIZE, POINTER_SIZE};

use crate::{
    FieldKind, Initializer, LayoutCompiler, StructDecl, StructError, TypeRegistry, TypeToken,
};

fn registry_with_bar() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    let bar = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("bar").scalar("x").scalar("y").scalar("z"))
        .unwrap();
    registry.define(Rc::new(bar)).unwrap();
    registry
}

#[test]
fn scalar_fields_are_packed_in_declaration_order() {
    let registry = TypeRegistry::new();
    let bar = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("bar").scalar("x").scalar("y").scalar("z"))
        .unwrap();

    let offsets: Vec<_> = bar.fields.iter().map(|f| (f.name.as_str(), f.offset)).collect();
    assert_eq!(offsets, vec![("x", 0), ("y", 8), ("z", 16)]);
    assert_eq!(bar.total_size, 3 * CELL_SIZE);
}

#[test]
fn nested_field_takes_pointer_width() {
    let registry = registry_with_bar();
    let foo = LayoutCompiler::new(&registry)
        .compile(
            &StructDecl::new("foo")
                .scalar("a")
                .scalar("b")
                .nested("c", "bar", true),
        )
        .unwrap();

    let c = foo.field("c").unwrap();
    assert_eq!(c.offset, 2 * CELL_SIZE);
    assert_eq!(c.size, POINTER_SIZE);
    assert_eq!(c.kind, FieldKind::Nested("bar".into()));
    assert_eq!(c.initializer, Some(Initializer::Construct));
    assert_eq!(foo.total_size, 2 * CELL_SIZE + POINTER_SIZE);
}

#[test]
fn nested_field_without_construct_has_no_initializer() {
    let registry = registry_with_bar();
    let foo = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("foo").nested("c", "bar", false))
        .unwrap();

    assert_eq!(foo.fields[0].initializer, None);
    assert!(foo.fields[0].is_nested());
}

#[test]
fn offsets_chain_and_total_matches_last_field() {
    let registry = registry_with_bar();
    let decl = StructDecl::new("mixed")
        .nested("head", "bar", false)
        .scalar("a")
        .nested("tail", "bar", true)
        .scalar("b");
    let ty = LayoutCompiler::new(&registry).compile(&decl).unwrap();

    assert_eq!(ty.fields[0].offset, 0);
    for pair in ty.fields.windows(2) {
        assert_eq!(pair[1].offset, pair[0].offset + pair[0].size);
    }
    let last = ty.fields.last().unwrap();
    assert_eq!(ty.total_size, last.offset + last.size);
}

#[test]
fn empty_struct_has_zero_size() {
    let registry = TypeRegistry::new();
    let ty = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("unit"))
        .unwrap();

    assert!(ty.is_empty());
    assert_eq!(ty.total_size, 0);
}

#[test]
fn duplicate_field_is_rejected() {
    let registry = TypeRegistry::new();
    let err = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("point").scalar("x").scalar("y").scalar("x"))
        .unwrap_err();

    assert_eq!(
        err,
        StructError::DuplicateField {
            struct_name: "point".into(),
            field: "x".into(),
        }
    );
}

#[test]
fn duplicate_field_is_reported_before_unknown_type() {
    let registry = TypeRegistry::new();
    let err = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("s").nested("a", "missing", false).scalar("a"))
        .unwrap_err();

    assert!(matches!(err, StructError::DuplicateField { .. }));
}

#[test]
fn unknown_nested_type_is_rejected() {
    let registry = TypeRegistry::new();
    let err = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("foo").nested("c", "bar", true))
        .unwrap_err();

    assert_eq!(err, StructError::UnknownType { name: "bar".into() });
}

#[test]
fn self_reference_is_unknown() {
    let registry = TypeRegistry::new();
    let err = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("node").scalar("value").nested("next", "node", false))
        .unwrap_err();

    assert_eq!(err, StructError::UnknownType { name: "node".into() });
}

#[test]
fn type_names_are_case_sensitive() {
    let registry = registry_with_bar();
    let err = LayoutCompiler::new(&registry)
        .compile(&StructDecl::new("foo").nested("c", "Bar", false))
        .unwrap_err();

    assert_eq!(err, StructError::UnknownType { name: "Bar".into() });
}

#[test]
fn builder_produces_plain_and_struct_tokens() {
    let decl = StructDecl::new("foo").scalar("a").nested("c", "bar", true);

    assert_eq!(decl.fields[0].ty, TypeToken::Plain);
    assert_eq!(
        decl.fields[1].ty,
        TypeToken::Struct {
            name: "bar".into(),
            construct: true,
        }
    );
}
