#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Struct layouts and the instance memory model.
//!
//! A declaration flows through the [`LayoutCompiler`] (offsets, sizes, nested
//! type resolution), then the accessor synthesizer (named field operations),
//! and is committed to the [`TypeRegistry`] by [`declare`]. Instances are
//! carved out of a [`Heap`] by the [`InstanceAllocator`], which also runs the
//! auto-construct initializers of nested fields. Every access goes through
//! the block table, so a base address only reaches its own instance.

mod accessors;
mod alloc;
mod declare;
pub mod dump;
mod error;
mod heap;
mod instance;
mod layout;
mod registry;
mod types;

#[cfg(test)]
mod accessors_tests;
#[cfg(test)]
mod alloc_tests;
#[cfg(test)]
mod declare_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod layout_tests;
#[cfg(test)]
mod test_utils;

pub use accessors::{AccessorKind, AccessorOp, WordLookup, synthesize};
pub use alloc::InstanceAllocator;
pub use declare::{Declared, declare};
pub use error::StructError;
pub use heap::{CellHeap, DEFAULT_HEAP_CAPACITY, Heap};
pub use instance::{
    address_of, field_at, field_values, instance_base, instances_equal, render_instance,
};
pub use layout::{FieldDecl, LayoutCompiler, StructDecl, TypeToken};
pub use registry::TypeRegistry;
pub use types::{FieldKind, FieldSpec, Initializer, StructType};

pub type Result<T> = std::result::Result<T, StructError>;
