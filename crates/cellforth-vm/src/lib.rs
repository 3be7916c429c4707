#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Host interpreter for cellforth scripts.
//!
//! A deliberately small stack machine: straight-line scripts of literals,
//! words, `variable` declarations and struct declarations. Struct semantics
//! live in `cellforth-structs`; this crate only wires them into a dictionary
//! and a data stack.

pub mod engine;

pub use engine::{
    Dictionary, ErrorKind, Limits, NoopTracer, PrintTracer, RuntimeError, Tracer, VM, VMBuilder,
    Verbosity, Word, WordEntry,
};
