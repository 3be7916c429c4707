//! Type registry: struct name to compiled layout.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{Result, StructError, StructType};

/// Append-only table of declared struct types.
///
/// Keeps declaration order so dumps list types the way the script declared
/// them. Lookups are exact and case-sensitive.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Rc<StructType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled type. Redefinition is rejected.
    pub fn define(&mut self, ty: Rc<StructType>) -> Result<Rc<StructType>> {
        if self.types.contains_key(&ty.name) {
            return Err(StructError::DuplicateType {
                name: ty.name.clone(),
            });
        }
        self.types.insert(ty.name.clone(), Rc::clone(&ty));
        Ok(ty)
    }

    pub fn lookup(&self, name: &str) -> Result<Rc<StructType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| StructError::UnknownType {
                name: name.to_owned(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<StructType>> {
        self.types.values()
    }
}
