//! Accessor synthesis.
//!
//! Each declared struct `S` gets an allocation word `S.new` plus, per field
//! `f`, a family of named operations:
//!
//! | word      | stack effect          | fields  |
//! |-----------|-----------------------|---------|
//! | `S.f!`    | `value addr --`       | all     |
//! | `S.f@`    | `addr -- value`       | all     |
//! | `S.f!!`   | `value addr --`       | nested  |
//! | `S.f@@`   | `addr -- nested-addr` | nested  |
//!
//! The single operator reads or writes the slot itself. The doubled operator
//! treats the slot as a handle and acts one level through it, which lets a
//! caller chain into the nested instance's own accessors.
//!
//! Every struct also gets words that act on a whole instance:
//!
//! | word              | stack effect             |
//! |-------------------|--------------------------|
//! | `S.@`             | `index addr -- value`    |
//! | `S.!`             | `value index addr --`    |
//! | `S.=`             | `a b -- flag`            |
//! | `S.field-exists?` | `name -- flag`           |
//! | `S.iterate`       | `word addr --`           |
//! | `S.show`          | `addr --`                |
//!
//! A field access must stay inside the block its base address starts, so an
//! accessor applied to an instance of a smaller struct fails instead of
//! touching whatever block follows.
//!
//! Operations are plain data ([`AccessorOp`]); the host dispatches them by
//! name instead of generating code.

use std::fmt;
use std::rc::Rc;

use cellforth_core::{Address, Value};

use crate::instance::{self, field_slot};
use crate::{FieldSpec, Heap, Result, StructError, StructType, TypeRegistry};

/// Dictionary view used to detect name collisions before anything is installed.
pub trait WordLookup {
    fn contains_word(&self, name: &str) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// `S.new`
    New,
    /// `S.f@`: read the slot as a plain cell.
    ScalarGet,
    /// `S.f!`: write the slot as a plain cell.
    ScalarSet,
    /// `S.f@@`: push the nested instance address stored in the slot.
    NestedGet,
    /// `S.f!!`: write through the stored address, at offset 0 of the nested instance.
    NestedSet,
    /// `S.@`: read a field chosen by its declaration index.
    IndexGet,
    /// `S.!`: write a field chosen by its declaration index.
    IndexSet,
    /// `S.=`: compare two instances field by field.
    Equal,
    /// `S.field-exists?`
    FieldExists,
    /// `S.iterate`: call a word with each field name and value.
    Iterate,
    /// `S.show`: print an instance.
    Show,
}

impl AccessorKind {
    /// Suffix appended to `S.f` to form the word name.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::ScalarGet => "@",
            Self::ScalarSet => "!",
            Self::NestedGet => "@@",
            Self::NestedSet => "!!",
            Self::IndexGet => "@",
            Self::IndexSet => "!",
            Self::Equal => "=",
            Self::FieldExists => "field-exists?",
            Self::Iterate => "iterate",
            Self::Show => "show",
        }
    }

    /// Stack effect in the host's `before -- after` notation.
    pub fn signature(self) -> &'static str {
        match self {
            Self::New => " -- addr",
            Self::ScalarGet => "addr -- value",
            Self::ScalarSet | Self::NestedSet => "value addr -- ",
            Self::NestedGet => "addr -- nested-addr",
            Self::IndexGet => "index addr -- value",
            Self::IndexSet => "value index addr -- ",
            Self::Equal => "a b -- flag",
            Self::FieldExists => "name -- flag",
            Self::Iterate => "word addr -- ",
            Self::Show => "addr -- ",
        }
    }

    /// Number of cells popped from the data stack.
    pub fn arity(self) -> usize {
        match self {
            Self::New => 0,
            Self::ScalarGet | Self::NestedGet | Self::FieldExists | Self::Show => 1,
            Self::ScalarSet | Self::NestedSet | Self::IndexGet | Self::Equal | Self::Iterate => 2,
            Self::IndexSet => 3,
        }
    }

    /// Kinds every struct gets regardless of its fields, in install order.
    pub const WHOLE_INSTANCE: [Self; 6] = [
        Self::IndexGet,
        Self::IndexSet,
        Self::Equal,
        Self::FieldExists,
        Self::Iterate,
        Self::Show,
    ];

    pub fn is_read(self) -> bool {
        matches!(self, Self::ScalarGet | Self::NestedGet)
    }

    pub fn is_write(self) -> bool {
        matches!(self, Self::ScalarSet | Self::NestedSet)
    }
}

/// A synthesized, named operation bound to one struct (and one field,
/// except for `New`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessorOp {
    name: String,
    kind: AccessorKind,
    struct_type: Rc<StructType>,
    field: Option<usize>,
}

impl AccessorOp {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    pub fn struct_type(&self) -> &Rc<StructType> {
        &self.struct_type
    }

    pub fn field(&self) -> Option<&FieldSpec> {
        self.field.map(|i| &self.struct_type.fields[i])
    }

    pub fn offset(&self) -> u32 {
        self.field().map_or(0, |f| f.offset)
    }

    pub fn description(&self) -> String {
        let s = &self.struct_type.name;
        let f = self.field().map_or("", |f| f.name.as_str());
        match self.kind {
            AccessorKind::New => format!("Allocate a new {s} instance."),
            AccessorKind::ScalarGet => format!("Read field {f} of a {s}."),
            AccessorKind::ScalarSet => format!("Write field {f} of a {s}."),
            AccessorKind::NestedGet => format!("Get the instance held by field {f} of a {s}."),
            AccessorKind::NestedSet => {
                format!("Write through the instance held by field {f} of a {s}.")
            }
            AccessorKind::IndexGet => format!("Read the field at an index of a {s}."),
            AccessorKind::IndexSet => format!("Write the field at an index of a {s}."),
            AccessorKind::Equal => format!("Check if two {s} instances hold equal fields."),
            AccessorKind::FieldExists => format!("Check if {s} has a field with the given name."),
            AccessorKind::Iterate => {
                format!("Call a word with the name and value of each field of a {s}.")
            }
            AccessorKind::Show => format!("Print a {s} instance with its field values."),
        }
    }

    /// Slot of the op's own field; `New` and the whole-instance kinds have
    /// none and resolve to the zero-width slot at the base.
    fn slot<H: Heap + ?Sized>(&self, heap: &H, base: Value) -> Result<Address> {
        let (offset, size) = self.field().map_or((0, 0), |f| (f.offset, f.size));
        field_slot(heap, &self.struct_type, offset, size, base)
    }

    /// Execute a read accessor against the instance at `base`.
    pub fn read<H: Heap + ?Sized>(&self, heap: &H, base: Value) -> Result<Value> {
        debug_assert!(self.kind.is_read(), "{} is not a read accessor", self.name);
        heap.load(self.slot(heap, base)?)
    }

    /// Execute a write accessor against the instance at `base`.
    pub fn write<H: Heap + ?Sized>(&self, heap: &mut H, base: Value, value: Value) -> Result<()> {
        debug_assert!(self.kind.is_write(), "{} is not a write accessor", self.name);
        let slot = self.slot(heap, base)?;
        match self.kind {
            AccessorKind::NestedSet => {
                let target = instance::address_of(heap.load(slot)?)?;
                heap.store(target, value)
            }
            _ => heap.store(slot, value),
        }
    }

    /// `S.@`: read the field at declaration position `index`.
    pub fn read_index<H: Heap + ?Sized>(&self, heap: &H, base: Value, index: i64) -> Result<Value> {
        let field = instance::field_at(&self.struct_type, index)?;
        heap.load(field_slot(heap, &self.struct_type, field.offset, field.size, base)?)
    }

    /// `S.!`: write the field at declaration position `index`.
    pub fn write_index<H: Heap + ?Sized>(
        &self,
        heap: &mut H,
        base: Value,
        index: i64,
        value: Value,
    ) -> Result<()> {
        let field = instance::field_at(&self.struct_type, index)?;
        let slot = field_slot(heap, &self.struct_type, field.offset, field.size, base)?;
        heap.store(slot, value)
    }

    /// `S.=`
    pub fn equal<H: Heap + ?Sized>(
        &self,
        registry: &TypeRegistry,
        heap: &H,
        a: Value,
        b: Value,
    ) -> Result<bool> {
        instance::instances_equal(registry, heap, &self.struct_type, a, b)
    }

    /// `S.field-exists?`
    pub fn field_exists(&self, name: &str) -> bool {
        self.struct_type.field(name).is_some()
    }

    /// Field names and values of the instance at `base`, for `S.iterate`.
    pub fn entries<H: Heap + ?Sized>(&self, heap: &H, base: Value) -> Result<Vec<(&str, Value)>> {
        let values = instance::field_values(heap, &self.struct_type, base)?;
        Ok(values
            .into_iter()
            .map(|(field, value)| (field.name.as_str(), value))
            .collect())
    }

    /// Text printed by `S.show`.
    pub fn show<H: Heap + ?Sized>(
        &self,
        registry: &TypeRegistry,
        heap: &H,
        base: Value,
        scalar: &dyn Fn(Value) -> String,
    ) -> Result<String> {
        instance::render_instance(registry, heap, &self.struct_type, base, scalar)
    }
}

impl fmt::Display for AccessorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ( {} )", self.name, self.kind.signature().trim())
    }
}

/// Build the full accessor set of a compiled type.
///
/// Fails with `AccessorNameConflict` on the first name `words` already
/// knows; nothing is returned in that case, so the caller installs all or
/// nothing.
pub fn synthesize(ty: &Rc<StructType>, words: &impl WordLookup) -> Result<Vec<AccessorOp>> {
    let mut ops = vec![op(ty, AccessorKind::New, None)];

    for (index, field) in ty.fields.iter().enumerate() {
        ops.push(op(ty, AccessorKind::ScalarSet, Some(index)));
        ops.push(op(ty, AccessorKind::ScalarGet, Some(index)));
        if field.is_nested() {
            ops.push(op(ty, AccessorKind::NestedSet, Some(index)));
            ops.push(op(ty, AccessorKind::NestedGet, Some(index)));
        }
    }
    ops.extend(
        AccessorKind::WHOLE_INSTANCE
            .into_iter()
            .map(|kind| op(ty, kind, None)),
    );

    if let Some(clash) = ops.iter().find(|op| words.contains_word(&op.name)) {
        return Err(StructError::AccessorNameConflict {
            name: clash.name.clone(),
        });
    }

    Ok(ops)
}

fn op(ty: &Rc<StructType>, kind: AccessorKind, field: Option<usize>) -> AccessorOp {
    let name = match field {
        None => format!("{}.{}", ty.name, kind.suffix()),
        Some(i) => format!("{}.{}{}", ty.name, ty.fields[i].name, kind.suffix()),
    };
    AccessorOp {
        name,
        kind,
        struct_type: Rc::clone(ty),
        field,
    }
}
