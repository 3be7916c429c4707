//! Bounded data stack.

use cellforth_core::{Symbol, Value};

use super::error::ErrorKind;

#[derive(Debug, Clone)]
pub struct DataStack {
    values: Vec<Value>,
    limit: usize,
}

impl DataStack {
    pub fn new(limit: usize) -> Self {
        Self {
            values: Vec::new(),
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn push(&mut self, value: Value) -> Result<(), ErrorKind> {
        if self.values.len() >= self.limit {
            return Err(ErrorKind::StackOverflow { limit: self.limit });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, ErrorKind> {
        self.values.pop().ok_or(ErrorKind::StackUnderflow {
            needed: 1,
            found: 0,
        })
    }

    /// Fails unless at least `n` values are present, so a word can check its
    /// whole arity before popping anything.
    pub fn require(&self, n: usize) -> Result<(), ErrorKind> {
        if self.values.len() < n {
            return Err(ErrorKind::StackUnderflow {
                needed: n,
                found: self.values.len(),
            });
        }
        Ok(())
    }

    /// Value `depth` positions below the top (0 is the top).
    pub fn peek(&self, depth: usize) -> Result<Value, ErrorKind> {
        self.require(depth + 1)?;
        Ok(self.values[self.values.len() - 1 - depth])
    }

    pub fn pop_int(&mut self) -> Result<i64, ErrorKind> {
        let value = self.pop()?;
        value.as_int().ok_or(ErrorKind::TypeMismatch {
            expected: "integer",
            found: value.kind_name(),
        })
    }

    pub fn pop_str(&mut self) -> Result<Symbol, ErrorKind> {
        match self.pop()? {
            Value::Str(sym) => Ok(sym),
            other => Err(ErrorKind::TypeMismatch {
                expected: "string",
                found: other.kind_name(),
            }),
        }
    }
}
