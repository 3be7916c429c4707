//! Word dictionary.
//!
//! Natives are installed once at startup; struct declarations add their
//! accessors and `variable` adds one entry per name. Nothing is ever removed
//! or replaced.

use cellforth_core::Address;
use cellforth_structs::{AccessorOp, WordLookup};
use indexmap::IndexMap;

use super::error::ErrorKind;
use super::vm::VM;

pub type NativeFn = fn(&mut VM<'_>) -> Result<(), ErrorKind>;

#[derive(Clone)]
pub enum Word {
    Native(NativeFn),
    /// Synthesized struct operation, dispatched by kind.
    Accessor(AccessorOp),
    /// Pushes the address of the variable's cell.
    Variable(Address),
}

impl std::fmt::Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(_) => f.write_str("Native"),
            Self::Accessor(op) => write!(f, "Accessor({})", op.name()),
            Self::Variable(addr) => write!(f, "Variable({addr})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordEntry {
    pub word: Word,
    pub description: String,
    /// Stack effect, `before -- after`.
    pub signature: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: IndexMap<String, WordEntry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&WordEntry> {
        self.words.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Entries in installation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordEntry)> {
        self.words.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Add a word under a fresh name.
    pub fn define(&mut self, name: impl Into<String>, entry: WordEntry) -> Result<(), ErrorKind> {
        let name = name.into();
        if self.words.contains_key(&name) {
            return Err(ErrorKind::WordRedefined { name });
        }
        self.words.insert(name, entry);
        Ok(())
    }

    pub fn define_native(
        &mut self,
        name: &str,
        f: NativeFn,
        description: &str,
        signature: &str,
    ) -> Result<(), ErrorKind> {
        self.define(
            name,
            WordEntry {
                word: Word::Native(f),
                description: description.to_owned(),
                signature: signature.to_owned(),
            },
        )
    }

    pub fn define_accessor(&mut self, op: AccessorOp) -> Result<(), ErrorKind> {
        let name = op.name().to_owned();
        let entry = WordEntry {
            description: op.description(),
            signature: op.kind().signature().to_owned(),
            word: Word::Accessor(op),
        };
        self.define(name, entry)
    }

    pub fn define_variable(&mut self, name: &str, addr: Address) -> Result<(), ErrorKind> {
        self.define(
            name,
            WordEntry {
                word: Word::Variable(addr),
                description: format!("Push the address of variable {name}."),
                signature: " -- addr".to_owned(),
            },
        )
    }
}

impl WordLookup for Dictionary {
    fn contains_word(&self, name: &str) -> bool {
        self.contains(name)
    }
}
