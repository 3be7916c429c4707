//! Whole-instance operations.
//!
//! Accessors only know a field and a base value. The helpers here check that
//! the base really names a block big enough for what is about to be touched,
//! then walk a type's fields for indexed access, equality and printing.

use cellforth_core::{Address, Value};

use crate::{FieldSpec, Heap, Result, StructError, StructType, TypeRegistry};

/// Interpret `value` as an instance address.
///
/// A null address and the zero cell are null references; any other
/// non-address value is a type error.
pub fn address_of(value: Value) -> Result<Address> {
    match value {
        Value::Addr(addr) if !addr.is_null() => Ok(addr),
        Value::Addr(_) | Value::Int(0) => Err(StructError::NullReference),
        other => Err(StructError::NotAnAddress {
            found: other.kind_name(),
        }),
    }
}

/// Base address of a `ty` instance, checked against the heap's block table.
pub fn instance_base<H: Heap + ?Sized>(heap: &H, ty: &StructType, base: Value) -> Result<Address> {
    let addr = address_of(base)?;
    match heap.block_len(addr) {
        Some(len) if len >= ty.total_size => Ok(addr),
        _ => Err(not_an_instance(ty, addr)),
    }
}

/// Address of the `size`-byte slot at `offset` inside the `ty` instance at `base`.
///
/// The slot must lie inside the block that starts at `base`, so an accessor
/// applied to a smaller instance never reaches into its neighbour.
pub(crate) fn field_slot<H: Heap + ?Sized>(
    heap: &H,
    ty: &StructType,
    offset: u32,
    size: u32,
    base: Value,
) -> Result<Address> {
    let addr = address_of(base)?;
    let end = offset.checked_add(size);
    let fits = matches!((heap.block_len(addr), end), (Some(len), Some(end)) if end <= len);
    if !fits {
        return Err(not_an_instance(ty, addr));
    }
    addr.offset(offset)
        .ok_or(StructError::InvalidAddress { address: addr })
}

/// Field at position `index`, in declaration order.
pub fn field_at(ty: &StructType, index: i64) -> Result<&FieldSpec> {
    usize::try_from(index)
        .ok()
        .and_then(|i| ty.fields.get(i))
        .ok_or_else(|| StructError::FieldIndexOutOfRange {
            struct_name: ty.name.clone(),
            index,
        })
}

/// Every field of the instance at `base` with its current value.
pub fn field_values<'t, H: Heap + ?Sized>(
    heap: &H,
    ty: &'t StructType,
    base: Value,
) -> Result<Vec<(&'t FieldSpec, Value)>> {
    let addr = instance_base(heap, ty, base)?;
    ty.fields
        .iter()
        .map(|field| {
            let slot = addr
                .offset(field.offset)
                .ok_or(StructError::InvalidAddress { address: addr })?;
            Ok((field, heap.load(slot)?))
        })
        .collect()
}

/// Field-by-field equality of two `ty` instances.
///
/// Nested fields holding instance addresses are compared by content, one
/// type level down. Nested types are always declared before their owner, so
/// the recursion ends.
pub fn instances_equal<H: Heap + ?Sized>(
    registry: &TypeRegistry,
    heap: &H,
    ty: &StructType,
    a: Value,
    b: Value,
) -> Result<bool> {
    let left = field_values(heap, ty, a)?;
    let right = field_values(heap, ty, b)?;

    for ((field, x), (_, y)) in left.into_iter().zip(right) {
        if x == y {
            continue;
        }
        let equal = match (field.nested_type(), x, y) {
            (Some(nested), Value::Addr(p), Value::Addr(q)) if !p.is_null() && !q.is_null() => {
                let nested = registry.lookup(nested)?;
                instances_equal(registry, heap, &nested, x, y)?
            }
            _ => false,
        };
        if !equal {
            return Ok(false);
        }
    }
    Ok(true)
}

/// `# foo a -> 1 , b -> 2 , c -> # bar x -> 0 ;` with nested instances
/// expanded in place. `scalar` renders every other cell.
pub fn render_instance<H: Heap + ?Sized>(
    registry: &TypeRegistry,
    heap: &H,
    ty: &StructType,
    base: Value,
    scalar: &dyn Fn(Value) -> String,
) -> Result<String> {
    let mut out = format!("# {}", ty.name);

    for (i, (field, value)) in field_values(heap, ty, base)?.into_iter().enumerate() {
        if i > 0 {
            out.push_str(" ,");
        }
        out.push_str(&format!(" {} -> ", field.name));
        match (field.nested_type(), value) {
            (Some(nested), Value::Addr(addr)) if !addr.is_null() => {
                let nested = registry.lookup(nested)?;
                out.push_str(&render_instance(registry, heap, &nested, value, scalar)?);
            }
            _ => out.push_str(&scalar(value)),
        }
    }

    out.push_str(" ;");
    Ok(out)
}

fn not_an_instance(ty: &StructType, address: Address) -> StructError {
    StructError::NotAnInstance {
        struct_name: ty.name.clone(),
        address,
    }
}
