use cellforth_core::{CELL_SIZE, Value};

use crate::test_utils::{Words, bar_decl, bar_foo, foo_decl};
use crate::{CellHeap, Heap, InstanceAllocator, StructDecl, StructError, TypeRegistry, declare};

#[test]
fn declare_registers_and_returns_accessors() {
    let mut registry = TypeRegistry::new();

    let declared = declare(&mut registry, &Words::default(), &bar_decl()).unwrap();

    assert_eq!(declared.struct_type.total_size, 3 * CELL_SIZE);
    // new, a getter and setter per field, and the whole-instance words
    assert_eq!(declared.accessors.len(), 1 + 3 * 2 + 6);
    assert!(registry.contains("bar"));
}

#[test]
fn unknown_nested_type_leaves_registry_unchanged() {
    let mut registry = TypeRegistry::new();

    let err = declare(&mut registry, &Words::default(), &foo_decl()).unwrap_err();

    assert_eq!(err, StructError::UnknownType { name: "bar".into() });
    assert!(registry.is_empty());
}

#[test]
fn duplicate_type_is_rejected_before_compiling() {
    let (mut registry, words) = bar_foo();

    // the body would also fail, but the name check comes first
    let decl = StructDecl::new("bar").scalar("x").scalar("x");
    let err = declare(&mut registry, &words, &decl).unwrap_err();

    assert_eq!(err, StructError::DuplicateType { name: "bar".into() });
    assert_eq!(registry.len(), 2);
}

#[test]
fn duplicate_field_is_rejected() {
    let mut registry = TypeRegistry::new();
    let decl = StructDecl::new("pair").scalar("x").nested("x", "pair", true);

    let err = declare(&mut registry, &Words::default(), &decl).unwrap_err();

    assert_eq!(
        err,
        StructError::DuplicateField {
            struct_name: "pair".into(),
            field: "x".into(),
        }
    );
    assert!(registry.is_empty());
}

#[test]
fn self_reference_is_unknown_type() {
    let mut registry = TypeRegistry::new();
    let decl = StructDecl::new("node").scalar("v").nested("next", "node", false);

    let err = declare(&mut registry, &Words::default(), &decl).unwrap_err();

    assert_eq!(err, StructError::UnknownType { name: "node".into() });
}

#[test]
fn accessor_conflict_registers_nothing() {
    let mut registry = TypeRegistry::new();
    let words = Words::with(&["bar.new"]);

    let err = declare(&mut registry, &words, &bar_decl()).unwrap_err();

    assert_eq!(
        err,
        StructError::AccessorNameConflict {
            name: "bar.new".into()
        }
    );
    assert!(!registry.contains("bar"));
}

/// `bar{x,y,z}`, `foo{a,b,c:bar.new}`, then the classic store/fetch sequence.
#[test]
fn end_to_end_through_the_accessors() {
    let (registry, _) = bar_foo();
    let foo = registry.lookup("foo").unwrap();
    let ops = crate::synthesize(&foo, &Words::default()).unwrap();
    let bar = registry.lookup("bar").unwrap();
    let bar_ops = crate::synthesize(&bar, &Words::default()).unwrap();
    let word = |name: &str| {
        ops.iter()
            .chain(bar_ops.iter())
            .find(|op| op.name() == name)
            .unwrap()
            .clone()
    };

    let mut heap = CellHeap::new();
    let f = Value::Addr(InstanceAllocator::new(&registry).allocate(&mut heap, "foo").unwrap());
    let text = Value::Str(cellforth_core::Interner::new().intern("Hello world!"));

    word("foo.a!").write(&mut heap, f, Value::Int(1024)).unwrap();
    word("foo.b!").write(&mut heap, f, text).unwrap();
    let c = word("foo.c@@").read(&heap, f).unwrap();
    word("bar.x!").write(&mut heap, c, Value::Int(150)).unwrap();
    word("bar.y!").write(&mut heap, c, Value::Int(250)).unwrap();
    word("bar.z!").write(&mut heap, c, Value::Int(350)).unwrap();

    assert_eq!(word("foo.a@").read(&heap, f).unwrap(), Value::Int(1024));
    assert_eq!(word("foo.b@").read(&heap, f).unwrap(), text);
    let c = word("foo.c@@").read(&heap, f).unwrap();
    let xyz: Vec<_> = ["bar.x@", "bar.y@", "bar.z@"]
        .iter()
        .map(|w| word(w).read(&heap, c).unwrap())
        .collect();
    assert_eq!(xyz, vec![Value::Int(150), Value::Int(250), Value::Int(350)]);
    assert_eq!(heap.block_count(), 2);
    assert!(heap.load(c.as_address().unwrap()).is_ok());
}
