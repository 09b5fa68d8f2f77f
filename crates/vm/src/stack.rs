//! Fixed-capacity byte stack.

use lux_common::Value;

use crate::error::MemoryError;

/// Stack capacity in bytes.
pub const STACK_SIZE: usize = 1024;

/// The operand stack.
///
/// Composite values are pushed high byte first, so the low byte ends up
/// on top. Pops always remove a single byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    cells: Box<[u8]>,
    /// Next free slot.
    ptr: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// An empty stack.
    pub fn new() -> Self {
        Self {
            cells: vec![0; STACK_SIZE].into_boxed_slice(),
            ptr: 0,
        }
    }

    /// Push a value's bytes. Nothing is written if they do not all fit.
    pub fn push(&mut self, value: Value) -> Result<(), MemoryError> {
        let bytes = value.as_bytes();
        let end = self.ptr + bytes.len();
        if end > STACK_SIZE {
            return Err(MemoryError::StackOverflow);
        }
        self.cells[self.ptr..end].copy_from_slice(bytes);
        self.ptr = end;
        Ok(())
    }

    /// Push one byte.
    pub fn push_byte(&mut self, byte: u8) -> Result<(), MemoryError> {
        self.push(Value::byte(byte))
    }

    /// Remove the top byte, zeroing its slot.
    pub fn pop(&mut self) -> Result<u8, MemoryError> {
        if self.ptr == 0 {
            return Err(MemoryError::StackUnderflow);
        }
        self.ptr -= 1;
        let byte = self.cells[self.ptr];
        self.cells[self.ptr] = 0;
        Ok(byte)
    }

    /// The top byte, or 0 when the stack is empty.
    pub fn top(&self) -> u8 {
        match self.ptr {
            0 => 0,
            p => self.cells[p - 1],
        }
    }

    /// Index of the next free slot.
    pub fn pointer(&self) -> usize {
        self.ptr
    }

    pub fn is_empty(&self) -> bool {
        self.ptr == 0
    }

    /// Live bytes, bottom first.
    pub fn contents(&self) -> &[u8] {
        &self.cells[..self.ptr]
    }

    /// The whole backing store, including vacated slots.
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_top_is_zero() {
        let stack = Stack::new();
        assert_eq!(stack.top(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn push_pop_single_byte() {
        let mut stack = Stack::new();
        stack.push_byte(7).unwrap();
        assert_eq!(stack.top(), 7);
        assert_eq!(stack.pointer(), 1);
        assert_eq!(stack.pop(), Ok(7));
        assert_eq!(stack.pointer(), 0);
        assert_eq!(stack.as_bytes()[0], 0);
    }

    #[test]
    fn composite_push_is_big_endian() {
        let mut stack = Stack::new();
        stack.push(Value::double_word(0x0102_0304)).unwrap();
        assert_eq!(stack.contents(), &[1, 2, 3, 4]);
        assert_eq!(stack.top(), 4);
        assert_eq!(stack.pop(), Ok(4));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pointer(), 2);
    }

    #[test]
    fn pop_empty_underflows() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(MemoryError::StackUnderflow));
    }

    #[test]
    fn overflow_leaves_stack_unchanged() {
        let mut stack = Stack::new();
        for _ in 0..STACK_SIZE - 2 {
            stack.push_byte(1).unwrap();
        }
        assert_eq!(
            stack.push(Value::double_word(0xffff_ffff)),
            Err(MemoryError::StackOverflow)
        );
        assert_eq!(stack.pointer(), STACK_SIZE - 2);
        assert_eq!(stack.as_bytes()[STACK_SIZE - 1], 0);
        stack.push(Value::word(0xabcd)).unwrap();
        assert_eq!(stack.pointer(), STACK_SIZE);
        assert_eq!(stack.push_byte(0), Err(MemoryError::StackOverflow));
    }
}
