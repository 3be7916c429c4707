//! Parsed script.

use cellforth_structs::StructDecl;
use rowan::TextRange;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub items: Vec<Item>,
}

impl Script {
    pub fn declarations(&self) -> impl Iterator<Item = (&Declaration, TextRange)> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Declare(decl) => Some((decl, item.span)),
            _ => None,
        })
    }
}

/// One top-level element, executed in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// `# name fields... ;`
    Declare(Declaration),
    Int(i64),
    /// Unescaped contents of a string literal.
    Str(String),
    Word(String),
    /// `variable NAME`
    Variable(String),
}

/// A struct declaration with the spans of its parts, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub decl: StructDecl,
    pub name_span: TextRange,
    /// Parallel to `decl.fields`.
    pub field_spans: Vec<TextRange>,
}
