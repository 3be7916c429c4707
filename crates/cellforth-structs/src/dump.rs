//! Human and machine readable views of a registry.
//!
//! Text output mirrors declaration syntax so it can be read next to the script:
//!
//! ```text
//! # foo (24 bytes)
//!   +0   a: cell
//!   +8   b: cell
//!   +16  c: bar.new
//! ;
//! ```

use std::fmt::Write;

use cellforth_core::Colors;
use serde::Serialize;

use crate::{FieldKind, FieldSpec, StructType, TypeRegistry};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeLayout {
    pub name: String,
    pub size: u32,
    pub fields: Vec<FieldLayout>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub name: String,
    pub offset: u32,
    pub size: u32,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
}

impl From<&StructType> for TypeLayout {
    fn from(ty: &StructType) -> Self {
        Self {
            name: ty.name.clone(),
            size: ty.total_size,
            fields: ty.fields.iter().map(FieldLayout::from).collect(),
        }
    }
}

impl From<&FieldSpec> for FieldLayout {
    fn from(field: &FieldSpec) -> Self {
        Self {
            name: field.name.clone(),
            offset: field.offset,
            size: field.size,
            ty: type_label(field).to_owned(),
            initializer: field.initializer_word(),
        }
    }
}

fn type_label(field: &FieldSpec) -> &str {
    match &field.kind {
        FieldKind::Scalar => "cell",
        FieldKind::Nested(name) => name,
    }
}

/// All registered types in declaration order.
pub fn layouts(registry: &TypeRegistry) -> Vec<TypeLayout> {
    registry.iter().map(|ty| TypeLayout::from(ty.as_ref())).collect()
}

pub fn render(registry: &TypeRegistry, colors: Colors) -> String {
    let mut out = String::new();
    for ty in registry.iter() {
        render_type(&mut out, ty, colors);
    }
    out
}

pub fn render_type(out: &mut String, ty: &StructType, colors: Colors) {
    let c = colors;
    let _ = writeln!(
        out,
        "# {} {}",
        c.paint(c.name, &ty.name),
        c.paint(c.meta, format_args!("({} bytes)", ty.total_size))
    );
    for field in &ty.fields {
        let ty_text = match field.initializer_word() {
            Some(word) => word,
            None => type_label(field).to_owned(),
        };
        let offset = format!("+{:<4}", field.offset);
        let _ = writeln!(
            out,
            "  {}{}: {}",
            c.paint(c.meta, offset),
            field.name,
            c.paint(c.name, ty_text)
        );
    }
    out.push_str(";\n");
}
