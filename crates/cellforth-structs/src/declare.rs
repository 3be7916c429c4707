//! Declaration commit: layout, accessors, registration.

use std::rc::Rc;

use crate::{
    AccessorOp, LayoutCompiler, Result, StructDecl, StructError, StructType, TypeRegistry,
    WordLookup, synthesize,
};

/// Result of a successful declaration. The caller installs `accessors` into
/// its dictionary; their names are known to be free.
#[derive(Debug)]
pub struct Declared {
    pub struct_type: Rc<StructType>,
    pub accessors: Vec<AccessorOp>,
}

/// Compile `decl`, synthesize its accessors against `words`, and register it.
///
/// Every check runs before the registry is touched, so on error both the
/// registry and the caller's dictionary are left exactly as they were.
pub fn declare(
    registry: &mut TypeRegistry,
    words: &impl WordLookup,
    decl: &StructDecl,
) -> Result<Declared> {
    if registry.contains(&decl.name) {
        return Err(StructError::DuplicateType {
            name: decl.name.clone(),
        });
    }

    let struct_type = Rc::new(LayoutCompiler::new(registry).compile(decl)?);
    let accessors = synthesize(&struct_type, words)?;
    let struct_type = registry.define(struct_type)?;

    Ok(Declared {
        struct_type,
        accessors,
    })
}
