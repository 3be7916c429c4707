use std::collections::HashSet;

use crate::{Declared, StructDecl, TypeRegistry, WordLookup, declare};

/// Stand-in dictionary: a set of taken names.
#[derive(Default)]
pub struct Words(pub HashSet<String>);

impl Words {
    pub fn with(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }

    pub fn install(&mut self, declared: &Declared) {
        for op in &declared.accessors {
            self.0.insert(op.name().to_owned());
        }
    }
}

impl WordLookup for Words {
    fn contains_word(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

pub fn bar_decl() -> StructDecl {
    StructDecl::new("bar").scalar("x").scalar("y").scalar("z")
}

pub fn foo_decl() -> StructDecl {
    StructDecl::new("foo")
        .scalar("a")
        .scalar("b")
        .nested("c", "bar", true)
}

/// Registry holding `bar{x,y,z}` and `foo{a,b,c:bar.new}`, plus the words they installed.
pub fn bar_foo() -> (TypeRegistry, Words) {
    let mut registry = TypeRegistry::new();
    let mut words = Words::default();
    for decl in [bar_decl(), foo_decl()] {
        let declared = declare(&mut registry, &words, &decl).unwrap();
        words.install(&declared);
    }
    (registry, words)
}
