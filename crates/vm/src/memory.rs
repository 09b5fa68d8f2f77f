//! Flat byte-addressed memory.

use lux_common::{Value, Width};

use crate::error::MemoryError;

/// Memory size in bytes. Addresses are single bytes, so every cell is reachable.
pub const MEMORY_SIZE: usize = 256;

/// The VM's data memory.
///
/// Multi-byte values are stored big-endian. An access that would cross the
/// last cell fails without touching memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Zero-filled memory.
    pub fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    fn range(address: u8, width: Width) -> Result<std::ops::Range<usize>, MemoryError> {
        let start = address as usize;
        let end = start + width.bytes();
        if end > MEMORY_SIZE {
            return Err(MemoryError::OutOfRange { address, width });
        }
        Ok(start..end)
    }

    /// Read a value of the given width.
    pub fn read(&self, address: u8, width: Width) -> Result<Value, MemoryError> {
        let range = Self::range(address, width)?;
        Value::from_be_bytes(&self.cells[range]).map_err(|_| MemoryError::OutOfRange { address, width })
    }

    /// Write a value at its own width.
    pub fn write(&mut self, address: u8, value: Value) -> Result<(), MemoryError> {
        let range = Self::range(address, value.width())?;
        self.cells[range].copy_from_slice(value.as_bytes());
        Ok(())
    }

    /// Read one byte. Every address holds a byte, so this cannot fail.
    pub fn read_byte(&self, address: u8) -> u8 {
        self.cells[address as usize]
    }

    pub fn read_word(&self, address: u8) -> Result<Value, MemoryError> {
        self.read(address, Width::Word)
    }

    pub fn read_double_word(&self, address: u8) -> Result<Value, MemoryError> {
        self.read(address, Width::DoubleWord)
    }

    pub fn read_quad_word(&self, address: u8) -> Result<Value, MemoryError> {
        self.read(address, Width::QuadWord)
    }

    /// Write one byte.
    pub fn write_byte(&mut self, address: u8, value: u8) {
        self.cells[address as usize] = value;
    }

    pub fn write_word(&mut self, address: u8, value: u16) -> Result<(), MemoryError> {
        self.write(address, Value::word(value))
    }

    pub fn write_double_word(&mut self, address: u8, value: u32) -> Result<(), MemoryError> {
        self.write(address, Value::double_word(value))
    }

    pub fn write_quad_word(&mut self, address: u8, value: u64) -> Result<(), MemoryError> {
        self.write(address, Value::quad_word(value))
    }

    /// All memory cells.
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}
