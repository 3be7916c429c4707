//! Runtime engine for executing parsed scripts.
//!
//! The VM walks a [`cellforth_compiler::Script`] item by item: declarations
//! go through the struct layer and install accessors, literals are pushed,
//! words are looked up in the dictionary and dispatched.

mod dictionary;
mod error;
mod natives;
mod stack;
mod trace;
mod variables;
mod vm;


pub use dictionary::{Dictionary, NativeFn, Word, WordEntry};
pub use error::{ErrorKind, RuntimeError};
pub use natives::{FALSE, TRUE};
pub use stack::DataStack;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use variables::Variables;
pub use vm::{Limits, VM, VMBuilder};
