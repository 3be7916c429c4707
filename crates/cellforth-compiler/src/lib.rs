#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Front end for cellforth scripts: lexing, parsing and diagnostics.
//!
//! ```text
//! # bar x y z ;
//! # foo a b c:bar.new ;
//! foo.new dup 1024 swap foo.a!
//! ```
//!
//! [`parse`] turns source text into a [`Script`] plus [`Diagnostics`]. The
//! script is only meaningful when no error was reported.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
mod parser;
mod syntax;


pub use ast::{Declaration, Item, ItemKind, Script};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use parser::{Parse, is_identifier, parse};
pub use syntax::SyntaxKind;
