//! Named single-cell variables.

use cellforth_core::{Address, CELL_SIZE, Value};
use cellforth_structs::{Heap, StructError};
use indexmap::IndexMap;

/// Name to heap cell. Each variable owns one cell acquired when it is
/// declared; its value starts at zero like any fresh cell.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    cells: IndexMap<String, Address>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a cell for `name`. Redeclaring returns the existing cell.
    pub fn declare<H: Heap + ?Sized>(
        &mut self,
        heap: &mut H,
        name: &str,
    ) -> Result<Address, StructError> {
        if let Some(&addr) = self.cells.get(name) {
            return Ok(addr);
        }
        let addr = heap.acquire(CELL_SIZE)?;
        self.cells.insert(name.to_owned(), addr);
        Ok(addr)
    }

    pub fn address(&self, name: &str) -> Option<Address> {
        self.cells.get(name).copied()
    }

    pub fn fetch<H: Heap + ?Sized>(&self, heap: &H, name: &str) -> Option<Result<Value, StructError>> {
        self.address(name).map(|addr| heap.load(addr))
    }

    pub fn store<H: Heap + ?Sized>(
        &self,
        heap: &mut H,
        name: &str,
        value: Value,
    ) -> Option<Result<(), StructError>> {
        self.address(name).map(|addr| heap.store(addr, value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.cells.iter().map(|(name, &addr)| (name.as_str(), addr))
    }
}
