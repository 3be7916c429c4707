//! Layout compiler: declaration to `StructType`.
//!
//! Fields are laid out back to back in declaration order with no padding:
//! every field is either one cell or one pointer wide, and both are 8 bytes,
//! so every offset stays cell aligned.
//!
//! Compilation is pure. Registration happens in [`crate::declare`] once the
//! accessor names are known not to clash, so a failing declaration never
//! leaves a half-registered type behind.

use std::collections::HashSet;

use crate::{FieldKind, FieldSpec, Initializer, Result, StructError, StructType, TypeRegistry};

/// Parsed struct declaration, independent of source spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeToken,
}

/// Field type annotation as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeToken {
    /// `name`
    Plain,
    /// `name:Type` or, with `construct`, `name:Type.new`.
    Struct { name: String, construct: bool },
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn scalar(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty: TypeToken::Plain,
        });
        self
    }

    pub fn nested(mut self, name: impl Into<String>, ty: impl Into<String>, construct: bool) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty: TypeToken::Struct {
                name: ty.into(),
                construct,
            },
        });
        self
    }
}

pub struct LayoutCompiler<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> LayoutCompiler<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn compile(&self, decl: &StructDecl) -> Result<StructType> {
        self.check_unique_fields(decl)?;

        let mut fields = Vec::with_capacity(decl.fields.len());
        let mut offset = 0u32;

        for field in &decl.fields {
            let (kind, initializer) = self.resolve(&field.ty)?;
            let size = kind.size();
            fields.push(FieldSpec {
                name: field.name.clone(),
                kind,
                initializer,
                offset,
                size,
            });
            offset += size;
        }

        Ok(StructType {
            name: decl.name.clone(),
            fields,
            total_size: offset,
        })
    }

    fn check_unique_fields(&self, decl: &StructDecl) -> Result<()> {
        let mut seen = HashSet::with_capacity(decl.fields.len());
        for field in &decl.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(StructError::DuplicateField {
                    struct_name: decl.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Nested types must already be registered: no forward references, which
    /// also rules out direct and mutual recursion.
    fn resolve(&self, ty: &TypeToken) -> Result<(FieldKind, Option<Initializer>)> {
        match ty {
            TypeToken::Plain => Ok((FieldKind::Scalar, None)),
            TypeToken::Struct { name, construct } => {
                let target = self.registry.lookup(name)?;
                let initializer = construct.then_some(Initializer::Construct);
                Ok((FieldKind::Nested(target.name.clone()), initializer))
            }
        }
    }
}
