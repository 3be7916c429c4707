use std::rc::Rc;

use cellforth_core::{Address, Value};

use crate::test_utils::{Words, bar_foo};
use crate::{
    AccessorKind, AccessorOp, CellHeap, Heap, InstanceAllocator, LayoutCompiler, StructDecl,
    StructError, TypeRegistry, synthesize,
};

fn ops_for(decl: StructDecl, registry: &TypeRegistry) -> Vec<AccessorOp> {
    let ty = Rc::new(LayoutCompiler::new(registry).compile(&decl).unwrap());
    synthesize(&ty, &Words::default()).unwrap()
}

fn find<'a>(ops: &'a [AccessorOp], name: &str) -> &'a AccessorOp {
    ops.iter()
        .find(|op| op.name() == name)
        .unwrap_or_else(|| panic!("no accessor named {name}"))
}

#[test]
fn scalar_struct_gets_new_and_slot_accessors() {
    let ops = ops_for(
        StructDecl::new("bar").scalar("x").scalar("y"),
        &TypeRegistry::new(),
    );

    let names: Vec<_> = ops.iter().map(|op| op.name()).collect();
    assert_eq!(
        names,
        vec![
            "bar.new",
            "bar.x!",
            "bar.x@",
            "bar.y!",
            "bar.y@",
            "bar.@",
            "bar.!",
            "bar.=",
            "bar.field-exists?",
            "bar.iterate",
            "bar.show",
        ]
    );
}

#[test]
fn nested_field_gets_doubled_accessors() {
    let (registry, _) = bar_foo();
    let foo = registry.lookup("foo").unwrap();
    let ops = synthesize(&foo, &Words::default()).unwrap();

    let names: Vec<_> = ops.iter().map(|op| op.name()).take(9).collect();
    assert_eq!(
        names,
        vec![
            "foo.new", "foo.a!", "foo.a@", "foo.b!", "foo.b@", "foo.c!", "foo.c@", "foo.c!!",
            "foo.c@@",
        ]
    );
    assert_eq!(find(&ops, "foo.c!!").kind(), AccessorKind::NestedSet);
    assert_eq!(find(&ops, "foo.c@@").kind(), AccessorKind::NestedGet);
    assert_eq!(find(&ops, "foo.c@@").offset(), 16);
}

#[test]
fn empty_struct_gets_no_field_accessors() {
    let ops = ops_for(StructDecl::new("unit"), &TypeRegistry::new());

    assert_eq!(ops[0].kind(), AccessorKind::New);
    assert!(ops.iter().all(|op| op.field().is_none()));
    let kinds: Vec<_> = ops[1..].iter().map(|op| op.kind()).collect();
    assert_eq!(kinds, AccessorKind::WHOLE_INSTANCE);
}

#[test]
fn name_conflict_is_reported() {
    let registry = TypeRegistry::new();
    let ty = Rc::new(
        LayoutCompiler::new(&registry)
            .compile(&StructDecl::new("bar").scalar("x"))
            .unwrap(),
    );

    let err = synthesize(&ty, &Words::with(&["bar.x@"])).unwrap_err();
    assert_eq!(
        err,
        StructError::AccessorNameConflict {
            name: "bar.x@".into()
        }
    );
}

#[test]
fn scalar_write_read_roundtrip() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();
    let bar = registry.lookup("bar").unwrap();
    let ops = synthesize(&bar, &Words::default()).unwrap();
    let p = Value::Addr(InstanceAllocator::new(&registry).allocate(&mut heap, "bar").unwrap());

    find(&ops, "bar.y!").write(&mut heap, p, Value::Int(250)).unwrap();

    assert_eq!(find(&ops, "bar.y@").read(&heap, p).unwrap(), Value::Int(250));
    assert_eq!(find(&ops, "bar.x@").read(&heap, p).unwrap(), Value::ZERO);
    assert_eq!(find(&ops, "bar.z@").read(&heap, p).unwrap(), Value::ZERO);
}

#[test]
fn nested_set_writes_through_the_stored_address() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();
    let foo = registry.lookup("foo").unwrap();
    let ops = synthesize(&foo, &Words::default()).unwrap();
    let p = Value::Addr(InstanceAllocator::new(&registry).allocate(&mut heap, "foo").unwrap());

    find(&ops, "foo.c!!").write(&mut heap, p, Value::Int(7)).unwrap();

    let q = find(&ops, "foo.c@@").read(&heap, p).unwrap();
    let q_addr = q.as_address().unwrap();
    assert_eq!(heap.load(q_addr).unwrap(), Value::Int(7));
    // the slot itself still holds the handle
    assert_eq!(find(&ops, "foo.c@").read(&heap, p).unwrap(), q);
}

#[test]
fn nested_set_through_empty_slot_is_null_reference() {
    let mut registry = TypeRegistry::new();
    let mut words = Words::default();
    for decl in [
        StructDecl::new("bar").scalar("x"),
        StructDecl::new("holder").nested("inner", "bar", false),
    ] {
        let declared = crate::declare(&mut registry, &words, &decl).unwrap();
        words.install(&declared);
    }
    let holder = registry.lookup("holder").unwrap();
    let ops = synthesize(&holder, &Words::default()).unwrap();
    let mut heap = CellHeap::new();
    let p = Value::Addr(
        InstanceAllocator::new(&registry)
            .allocate(&mut heap, "holder")
            .unwrap(),
    );

    let err = find(&ops, "holder.inner!!")
        .write(&mut heap, p, Value::Int(1))
        .unwrap_err();
    assert_eq!(err, StructError::NullReference);
    assert_eq!(find(&ops, "holder.inner@@").read(&heap, p).unwrap(), Value::ZERO);
}

#[test]
fn raw_slot_set_replaces_the_handle() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();
    let foo = registry.lookup("foo").unwrap();
    let ops = synthesize(&foo, &Words::default()).unwrap();
    let alloc = InstanceAllocator::new(&registry);
    let p = Value::Addr(alloc.allocate(&mut heap, "foo").unwrap());
    let other = Value::Addr(alloc.allocate(&mut heap, "bar").unwrap());

    find(&ops, "foo.c!").write(&mut heap, p, other).unwrap();

    assert_eq!(find(&ops, "foo.c@@").read(&heap, p).unwrap(), other);
}

#[test]
fn accessors_reject_non_address_base() {
    let (registry, _) = bar_foo();
    let bar = registry.lookup("bar").unwrap();
    let ops = synthesize(&bar, &Words::default()).unwrap();
    let heap = CellHeap::new();

    let get = find(&ops, "bar.x@");

    assert_eq!(
        get.read(&heap, Value::Int(8)).unwrap_err(),
        StructError::NotAnAddress { found: "integer" }
    );
    assert_eq!(
        get.read(&heap, Value::Addr(Address::NULL)).unwrap_err(),
        StructError::NullReference
    );
    assert_eq!(get.read(&heap, Value::ZERO).unwrap_err(), StructError::NullReference);
}

#[test]
fn signatures_and_display() {
    let (registry, _) = bar_foo();
    let foo = registry.lookup("foo").unwrap();
    let ops = synthesize(&foo, &Words::default()).unwrap();

    insta::assert_snapshot!(find(&ops, "foo.new"), @"foo.new ( -- addr )");
    insta::assert_snapshot!(find(&ops, "foo.a!"), @"foo.a! ( value addr -- )");
    insta::assert_snapshot!(find(&ops, "foo.c@@"), @"foo.c@@ ( addr -- nested-addr )");
    assert_eq!(
        find(&ops, "foo.c!!").description(),
        "Write through the instance held by field c of a foo."
    );
}

#[test]
fn kind_arity_matches_signature() {
    for kind in [
        AccessorKind::New,
        AccessorKind::ScalarGet,
        AccessorKind::ScalarSet,
        AccessorKind::NestedGet,
        AccessorKind::NestedSet,
    ]
    .into_iter()
    .chain(AccessorKind::WHOLE_INSTANCE)
    {
        let inputs = kind.signature().split("--").next().unwrap();
        assert_eq!(inputs.split_whitespace().count(), kind.arity(), "{kind:?}");
    }
}

#[test]
fn accessor_stays_inside_its_own_instance() {
    let mut registry = TypeRegistry::new();
    let mut words = Words::default();
    for decl in [
        StructDecl::new("a").scalar("x"),
        StructDecl::new("b").scalar("p").scalar("q"),
    ] {
        let declared = crate::declare(&mut registry, &words, &decl).unwrap();
        words.install(&declared);
    }
    let b = registry.lookup("b").unwrap();
    let ops = synthesize(&b, &Words::default()).unwrap();
    let mut heap = CellHeap::new();
    let alloc = InstanceAllocator::new(&registry);
    let small = alloc.allocate(&mut heap, "a").unwrap();
    let big = Value::Addr(alloc.allocate(&mut heap, "b").unwrap());

    // `b.q` lies past the end of the one-cell `a` block, right on `b.p`
    let err = find(&ops, "b.q!")
        .write(&mut heap, Value::Addr(small), Value::Int(99))
        .unwrap_err();

    assert_eq!(
        err,
        StructError::NotAnInstance {
            struct_name: "b".into(),
            address: small
        }
    );
    assert_eq!(find(&ops, "b.p@").read(&heap, big).unwrap(), Value::ZERO);
    // the first field still fits the smaller block
    assert_eq!(
        find(&ops, "b.p@").read(&heap, Value::Addr(small)).unwrap(),
        Value::ZERO
    );
}

#[test]
fn accessor_base_must_start_a_block() {
    let (registry, _) = bar_foo();
    let bar = registry.lookup("bar").unwrap();
    let ops = synthesize(&bar, &Words::default()).unwrap();
    let mut heap = CellHeap::new();
    let p = InstanceAllocator::new(&registry).allocate(&mut heap, "bar").unwrap();
    let inside = p.offset(8).unwrap();

    let err = find(&ops, "bar.x@").read(&heap, Value::Addr(inside)).unwrap_err();

    assert!(matches!(err, StructError::NotAnInstance { address, .. } if address == inside));
}

#[test]
fn indexed_access_follows_declaration_order() {
    let (registry, _) = bar_foo();
    let bar = registry.lookup("bar").unwrap();
    let ops = synthesize(&bar, &Words::default()).unwrap();
    let mut heap = CellHeap::new();
    let p = Value::Addr(InstanceAllocator::new(&registry).allocate(&mut heap, "bar").unwrap());

    find(&ops, "bar.!").write_index(&mut heap, p, 2, Value::Int(350)).unwrap();

    assert_eq!(find(&ops, "bar.z@").read(&heap, p).unwrap(), Value::Int(350));
    assert_eq!(find(&ops, "bar.@").read_index(&heap, p, 2).unwrap(), Value::Int(350));
    assert_eq!(find(&ops, "bar.@").read_index(&heap, p, 0).unwrap(), Value::ZERO);
}

#[test]
fn indexed_access_is_range_checked() {
    let (registry, _) = bar_foo();
    let bar = registry.lookup("bar").unwrap();
    let ops = synthesize(&bar, &Words::default()).unwrap();
    let mut heap = CellHeap::new();
    let p = Value::Addr(InstanceAllocator::new(&registry).allocate(&mut heap, "bar").unwrap());

    for index in [3, -1] {
        assert_eq!(
            find(&ops, "bar.@").read_index(&heap, p, index).unwrap_err(),
            StructError::FieldIndexOutOfRange {
                struct_name: "bar".into(),
                index
            }
        );
    }
    let err = find(&ops, "bar.!")
        .write_index(&mut heap, p, 3, Value::Int(1))
        .unwrap_err();
    assert!(matches!(err, StructError::FieldIndexOutOfRange { index: 3, .. }));
}

#[test]
fn field_exists_checks_names() {
    let (registry, _) = bar_foo();
    let foo = registry.lookup("foo").unwrap();
    let ops = synthesize(&foo, &Words::default()).unwrap();
    let exists = find(&ops, "foo.field-exists?");

    assert!(exists.field_exists("c"));
    assert!(!exists.field_exists("x"));
    assert_eq!(exists.description(), "Check if foo has a field with the given name.");
}
