//! Cells and addresses.
//!
//! A cell is the unit of storage on the data stack and in the instance heap.
//! Whatever it holds (integer, interned string, heap address) it occupies
//! exactly one slot, so `Value` is a small tagged union.

use std::fmt;

use crate::{Interner, Symbol};

/// Width of one scalar cell in bytes.
pub const CELL_SIZE: u32 = 8;

/// Width of a stored instance address in bytes.
pub const POINTER_SIZE: u32 = 8;

/// Byte address into the instance heap.
///
/// Address 0 is reserved as the null address and is never handed out.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Address(u32);

impl Address {
    pub const NULL: Self = Self(0);

    #[inline]
    pub fn new(byte: u32) -> Self {
        Self(byte)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Address `bytes` past this one, or `None` on overflow.
    #[inline]
    pub fn offset(self, bytes: u32) -> Option<Self> {
        self.0.checked_add(bytes).map(Self)
    }

    #[inline]
    pub fn is_cell_aligned(self) -> bool {
        self.0 % CELL_SIZE == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@0x{:04x}", self.0)
    }
}

/// One cell: the uniform token on the data stack and in heap slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Value {
    Int(i64),
    Str(Symbol),
    Addr(Address),
}

impl Default for Value {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<Address> for Value {
    fn from(addr: Address) -> Self {
        Self::Addr(addr)
    }
}

impl Value {
    /// Content of every cell of a freshly acquired block.
    pub const ZERO: Self = Self::Int(0);

    /// Non-null address held by this cell, if any.
    pub fn as_address(self) -> Option<Address> {
        match self {
            Self::Addr(addr) if !addr.is_null() => Some(addr),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Short name of the variant, used in type mismatch messages.
    pub fn kind_name(self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Addr(_) => "address",
        }
    }

    /// Display adapter resolving interned strings.
    pub fn display<'a>(&self, interner: &'a Interner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: *self,
            interner,
        }
    }
}

/// Formats a `Value` the way `.` prints it: integers in decimal, strings
/// unquoted, addresses as `@0x....`.
pub struct ValueDisplay<'a> {
    value: Value,
    interner: &'a Interner,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(sym) => match self.interner.try_resolve(sym) {
                Some(s) => f.write_str(s),
                None => write!(f, "<string #{}>", sym.as_u32()),
            },
            Value::Addr(addr) => write!(f, "{addr}"),
        }
    }
}
