//! Errors that can occur while running a script.

use cellforth_structs::StructError;
use rowan::TextRange;

/// A failure together with the source span of the item that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: ErrorKind,
    pub span: TextRange,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Declaration, allocation or accessor failure from the struct layer.
    #[error(transparent)]
    Struct(#[from] StructError),

    #[error("stack underflow: needs {needed} value(s), found {found}")]
    StackUnderflow { needed: usize, found: usize },

    #[error("stack overflow: limit is {limit} values")]
    StackOverflow { limit: usize },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown word `{name}`")]
    UnknownWord { name: String },

    #[error("division by zero")]
    DivisionByZero,

    /// `variable` reusing a name the dictionary already holds.
    #[error("`{name}` is already defined")]
    WordRedefined { name: String },

    #[error("output failed: {message}")]
    Output { message: String },
}

impl From<std::io::Error> for ErrorKind {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}
