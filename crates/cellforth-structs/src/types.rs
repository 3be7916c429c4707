//! Compiled struct types.

use cellforth_core::{CELL_SIZE, POINTER_SIZE};

/// What a field slot holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// One cell-sized value stored inline.
    Scalar,
    /// The address of an instance of the named struct.
    Nested(String),
}

impl FieldKind {
    pub fn size(&self) -> u32 {
        match self {
            Self::Scalar => CELL_SIZE,
            Self::Nested(_) => POINTER_SIZE,
        }
    }
}

/// Work run on a nested field when its owner is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Initializer {
    /// Allocate a fresh instance of the field's nested type (`T.new`) and
    /// store its address in the slot.
    Construct,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Only ever set on `Nested` fields.
    pub initializer: Option<Initializer>,
    pub offset: u32,
    pub size: u32,
}

impl FieldSpec {
    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested(_))
    }

    pub fn nested_type(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Nested(name) => Some(name),
            FieldKind::Scalar => None,
        }
    }

    /// Name of the allocation word the initializer runs, e.g. `bar.new`.
    pub fn initializer_word(&self) -> Option<String> {
        match (self.initializer, self.nested_type()) {
            (Some(Initializer::Construct), Some(ty)) => Some(format!("{ty}.new")),
            _ => None,
        }
    }
}

/// A registered record type. Immutable once compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub name: String,
    /// Declaration order, which is also memory order.
    pub fields: Vec<FieldSpec>,
    pub total_size: u32,
}

impl StructType {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields that carry an initializer, in the order they run.
    pub fn initialized_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.initializer.is_some())
    }
}
