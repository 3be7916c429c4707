//! Errors raised while declaring structs, allocating instances and accessing fields.

use cellforth_core::Address;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructError {
    /// A struct name was used (as a field type or by `new`) before being declared.
    #[error("unknown struct type `{name}`")]
    UnknownType { name: String },

    #[error("struct `{name}` is already defined")]
    DuplicateType { name: String },

    #[error("field `{field}` is declared more than once in struct `{struct_name}`")]
    DuplicateField { struct_name: String, field: String },

    /// A synthesized word name is already taken in the dictionary.
    #[error("accessor `{name}` conflicts with an existing word")]
    AccessorNameConflict { name: String },

    #[error("out of memory: requested {requested} bytes with {available} bytes available")]
    OutOfMemory { requested: u32, available: u32 },

    /// An instance address was expected but the cell holds none.
    #[error("null reference: cell does not hold an instance address")]
    NullReference,

    /// A non-zero value that is not an address was used as one.
    #[error("expected address, found {found}")]
    NotAnAddress { found: &'static str },

    /// The address does not start a block large enough for the access.
    #[error("address {address} does not hold a `{struct_name}` instance")]
    NotAnInstance {
        struct_name: String,
        address: Address,
    },

    #[error("field index {index} is out of range for struct `{struct_name}`")]
    FieldIndexOutOfRange { struct_name: String, index: i64 },

    #[error("address {address} is outside every allocated block")]
    InvalidAddress { address: Address },

    #[error("address {address} is not cell aligned")]
    MisalignedAddress { address: Address },
}
