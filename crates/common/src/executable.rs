//! The instruction stream: an immutable program plus a cursor.
//!
//! Programs are raw byte sequences with no header, no length prefix and
//! no magic number. The stream ends when the cursor reaches the end.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::DecodeError;
use crate::value::{Value, Width};

/// A program and its instruction pointer.
///
/// Equality and hashing consider only the program bytes, never the cursor.
#[derive(Debug, Clone)]
pub struct Executable {
    bytes: Box<[u8]>,
    /// Offset of the next byte to fetch. Always `<= bytes.len()`.
    ip: usize,
}

impl Executable {
    /// Wrap a finished program. The cursor starts at offset 0.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
            ip: 0,
        }
    }

    /// Offset of the next byte to fetch.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Move the cursor to an absolute offset.
    ///
    /// `target == len()` is allowed and ends the stream; anything beyond is
    /// rejected and leaves the cursor where it was.
    pub fn jump(&mut self, target: usize) -> Result<(), DecodeError> {
        if target > self.bytes.len() {
            return Err(DecodeError::UnexpectedEnd);
        }
        self.ip = target;
        Ok(())
    }

    /// Reset the cursor to the start of the program.
    pub fn rewind(&mut self) {
        self.ip = 0;
    }

    /// Returns true if the cursor has bytes left to fetch.
    pub fn has_next(&self) -> bool {
        self.ip < self.bytes.len()
    }

    /// The byte under the cursor, without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.ip).copied()
    }

    /// Consume one byte.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek().ok_or(DecodeError::UnexpectedEnd)?;
        self.ip += 1;
        Ok(b)
    }

    /// Consume the next `width` bytes as one big-endian value.
    ///
    /// Consumes nothing if the stream is too short.
    pub fn next_value(&mut self, width: Width) -> Result<Value, DecodeError> {
        let end = self.ip + width.bytes();
        let slice = self
            .bytes
            .get(self.ip..end)
            .ok_or(DecodeError::UnexpectedEnd)?;
        let value = Value::from_be_bytes(slice)?;
        self.ip = end;
        Ok(value)
    }

    /// Consume one byte as a value.
    pub fn next_byte(&mut self) -> Result<Value, DecodeError> {
        self.next_value(Width::Byte)
    }

    /// Consume two bytes as a word.
    pub fn next_word(&mut self) -> Result<Value, DecodeError> {
        self.next_value(Width::Word)
    }

    /// Consume four bytes as a double word.
    pub fn next_double_word(&mut self) -> Result<Value, DecodeError> {
        self.next_value(Width::DoubleWord)
    }

    /// Consume eight bytes as a quad word.
    pub fn next_quad_word(&mut self) -> Result<Value, DecodeError> {
        self.next_value(Width::QuadWord)
    }

    /// The program bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Program length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the program has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for Executable {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Executable {}

impl Hash for Executable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl From<Vec<u8>> for Executable {
    fn from(bytes: Vec<u8>) -> Self {
        Executable::new(bytes)
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, b) in self.bytes.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{b:#04x}")?;
        }
        Ok(())
    }
}
