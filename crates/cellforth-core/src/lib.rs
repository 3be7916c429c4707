#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by every cellforth crate.
//!
//! - **Symbols**: interned handles for string values
//! - **Cells**: the uniform `Value` token carried on the data stack and stored in the heap
//! - **Addresses**: byte addresses into the instance heap

mod colors;
mod interner;
mod value;


pub use colors::Colors;
pub use interner::{Interner, Symbol};
pub use value::{Address, CELL_SIZE, POINTER_SIZE, Value, ValueDisplay};
