//! Heap provider.
//!
//! The allocator and the accessors only see the [`Heap`] trait. [`CellHeap`]
//! is the provider the interpreter uses: a bump allocator over a vector of
//! cells that never releases memory.

use std::collections::BTreeMap;

use cellforth_core::{Address, CELL_SIZE, Value};

use crate::{Result, StructError};

/// Default capacity of a [`CellHeap`]: 1 MiB.
pub const DEFAULT_HEAP_CAPACITY: usize = 1 << 20;

pub trait Heap {
    /// Reserve `bytes` bytes. Every cell of the block reads as `Value::ZERO`.
    fn acquire(&mut self, bytes: u32) -> Result<Address>;

    /// Read the cell at `addr`.
    fn load(&self, addr: Address) -> Result<Value>;

    /// Write the cell at `addr`.
    fn store(&mut self, addr: Address, value: Value) -> Result<()>;

    /// Requested length of the block starting exactly at `base`, or `None`
    /// when no block starts there.
    fn block_len(&self, base: Address) -> Option<u32>;
}

/// Cell-granular bump allocator.
///
/// Cell 0 is never handed out so that byte address 0 can serve as null.
/// Blocks are rounded up to whole cells and a zero-byte request still
/// reserves one cell, which keeps base addresses unique.
#[derive(Debug, Clone)]
pub struct CellHeap {
    cells: Vec<Value>,
    /// Base byte address -> requested length in bytes.
    blocks: BTreeMap<u32, u32>,
    capacity: usize,
    used: usize,
}

impl Default for CellHeap {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HEAP_CAPACITY)
    }
}

impl CellHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heap limited to `capacity` bytes of acquired blocks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![Value::ZERO],
            blocks: BTreeMap::new(),
            capacity,
            used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes reserved so far, rounding included.
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.used)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Index of the cell at `addr`, after null, alignment and bounds checks.
    fn cell_index(&self, addr: Address) -> Result<usize> {
        if addr.is_null() {
            return Err(StructError::NullReference);
        }
        if !addr.is_cell_aligned() {
            return Err(StructError::MisalignedAddress { address: addr });
        }

        let byte = addr.as_u32();
        let in_block = self
            .blocks
            .range(..=byte)
            .next_back()
            .is_some_and(|(&base, &len)| byte < base + len);
        if !in_block {
            return Err(StructError::InvalidAddress { address: addr });
        }

        Ok((byte / CELL_SIZE) as usize)
    }
}

impl Heap for CellHeap {
    fn acquire(&mut self, bytes: u32) -> Result<Address> {
        let cells = bytes.div_ceil(CELL_SIZE).max(1) as usize;
        let reserved = cells * CELL_SIZE as usize;

        let base_byte = self.cells.len() * CELL_SIZE as usize;
        let fits = reserved <= self.available() && base_byte + reserved <= u32::MAX as usize;
        if !fits {
            return Err(StructError::OutOfMemory {
                requested: bytes,
                available: self.available().min(u32::MAX as usize) as u32,
            });
        }

        let base = base_byte as u32;
        self.cells.resize(self.cells.len() + cells, Value::ZERO);
        self.blocks.insert(base, bytes);
        self.used += reserved;

        Ok(Address::new(base))
    }

    fn load(&self, addr: Address) -> Result<Value> {
        let index = self.cell_index(addr)?;
        Ok(self.cells[index])
    }

    fn store(&mut self, addr: Address, value: Value) -> Result<()> {
        let index = self.cell_index(addr)?;
        self.cells[index] = value;
        Ok(())
    }

    fn block_len(&self, base: Address) -> Option<u32> {
        self.blocks.get(&base.as_u32()).copied()
    }
}
