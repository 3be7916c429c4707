use cellforth_core::{Address, CELL_SIZE, Value};

use crate::test_utils::{Words, bar_foo};
use crate::{CellHeap, Heap, InstanceAllocator, StructDecl, StructError, TypeRegistry, declare};

fn cells(heap: &CellHeap, base: Address, count: u32) -> Vec<Value> {
    (0..count)
        .map(|i| heap.load(base.offset(i * CELL_SIZE).unwrap()).unwrap())
        .collect()
}

#[test]
fn scalar_instance_is_zeroed() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();

    let p = InstanceAllocator::new(&registry).allocate(&mut heap, "bar").unwrap();

    assert!(!p.is_null());
    assert_eq!(cells(&heap, p, 3), vec![Value::ZERO; 3]);
}

#[test]
fn instances_are_isolated() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();
    let alloc = InstanceAllocator::new(&registry);
    let p = alloc.allocate(&mut heap, "bar").unwrap();
    let q = alloc.allocate(&mut heap, "bar").unwrap();

    heap.store(p, Value::Int(1)).unwrap();

    assert_ne!(p, q);
    assert_eq!(heap.load(q).unwrap(), Value::ZERO);
}

#[test]
fn nested_field_is_auto_constructed() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();

    let p = InstanceAllocator::new(&registry).allocate(&mut heap, "foo").unwrap();

    let slot = heap.load(p.offset(16).unwrap()).unwrap();
    let child = slot.as_address().expect("c should hold a bar");
    assert_ne!(child, p);
    assert_eq!(heap.block_len(child), Some(3 * CELL_SIZE));
    assert_eq!(cells(&heap, child, 3), vec![Value::ZERO; 3]);
    // a and b stay zero
    assert_eq!(cells(&heap, p, 2), vec![Value::ZERO; 2]);
}

#[test]
fn each_owner_gets_its_own_nested_instance() {
    let (registry, _) = bar_foo();
    let mut heap = CellHeap::new();
    let alloc = InstanceAllocator::new(&registry);

    let p = alloc.allocate(&mut heap, "foo").unwrap();
    let q = alloc.allocate(&mut heap, "foo").unwrap();

    let pc = heap.load(p.offset(16).unwrap()).unwrap();
    let qc = heap.load(q.offset(16).unwrap()).unwrap();
    assert_ne!(pc, qc);
}

#[test]
fn nested_without_initializer_stays_null() {
    let mut registry = TypeRegistry::new();
    let mut words = Words::default();
    for decl in [
        StructDecl::new("bar").scalar("x"),
        StructDecl::new("holder").nested("inner", "bar", false),
    ] {
        let declared = declare(&mut registry, &words, &decl).unwrap();
        words.install(&declared);
    }
    let mut heap = CellHeap::new();

    let p = InstanceAllocator::new(&registry)
        .allocate(&mut heap, "holder")
        .unwrap();

    assert_eq!(heap.load(p).unwrap(), Value::ZERO);
    assert_eq!(heap.block_count(), 1);
}

#[test]
fn construction_recurses_through_levels() {
    let (mut registry, mut words) = bar_foo();
    let declared = declare(
        &mut registry,
        &words,
        &StructDecl::new("top").nested("f", "foo", true),
    )
    .unwrap();
    words.install(&declared);
    let mut heap = CellHeap::new();

    let top = InstanceAllocator::new(&registry).allocate(&mut heap, "top").unwrap();

    let foo = heap.load(top).unwrap().as_address().unwrap();
    let bar = heap.load(foo.offset(16).unwrap()).unwrap();
    assert!(bar.as_address().is_some());
    assert_eq!(heap.block_count(), 3);
}

#[test]
fn empty_struct_gets_unique_addresses() {
    let mut registry = TypeRegistry::new();
    declare(&mut registry, &Words::default(), &StructDecl::new("unit")).unwrap();
    let mut heap = CellHeap::new();
    let alloc = InstanceAllocator::new(&registry);

    let a = alloc.allocate(&mut heap, "unit").unwrap();
    let b = alloc.allocate(&mut heap, "unit").unwrap();

    assert!(!a.is_null());
    assert_ne!(a, b);
}

#[test]
fn unknown_type_is_rejected() {
    let registry = TypeRegistry::new();
    let mut heap = CellHeap::new();

    let err = InstanceAllocator::new(&registry)
        .allocate(&mut heap, "ghost")
        .unwrap_err();

    assert_eq!(
        err,
        StructError::UnknownType {
            name: "ghost".into()
        }
    );
    assert_eq!(heap.used(), 0);
}

#[test]
fn exhausted_heap_is_out_of_memory() {
    let (registry, _) = bar_foo();
    // room for foo itself but not for its bar
    let mut heap = CellHeap::with_capacity(4 * CELL_SIZE as usize);

    let err = InstanceAllocator::new(&registry)
        .allocate(&mut heap, "foo")
        .unwrap_err();

    assert_eq!(
        err,
        StructError::OutOfMemory {
            requested: 24,
            available: 8,
        }
    );
}
