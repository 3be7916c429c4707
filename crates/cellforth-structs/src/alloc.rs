//! Instance allocation.

use cellforth_core::{Address, Value};

use crate::{Heap, Initializer, Result, StructError, StructType, TypeRegistry};

/// Allocates instances of registered types and runs their initializers.
pub struct InstanceAllocator<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> InstanceAllocator<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Allocate an instance of the struct named `name`.
    pub fn allocate<H: Heap + ?Sized>(&self, heap: &mut H, name: &str) -> Result<Address> {
        let ty = self.registry.lookup(name)?;
        self.allocate_type(heap, &ty)
    }

    /// Allocate an instance of `ty`.
    ///
    /// Initializers run in field order, so a later initializer may rely on
    /// earlier slots being filled. If one fails the error propagates as is;
    /// the block and any sub-instances built so far stay allocated, since
    /// nothing is ever freed.
    pub fn allocate_type<H: Heap + ?Sized>(&self, heap: &mut H, ty: &StructType) -> Result<Address> {
        let base = heap.acquire(ty.total_size)?;

        for field in ty.initialized_fields() {
            let (Some(Initializer::Construct), Some(nested)) = (field.initializer, field.nested_type())
            else {
                continue;
            };
            let child = self.allocate(heap, nested)?;
            let slot = base
                .offset(field.offset)
                .ok_or(StructError::InvalidAddress { address: base })?;
            heap.store(slot, Value::Addr(child))?;
        }

        Ok(base)
    }
}
