//! Composite fixed-width values.
//!
//! A byte is atomic. A word is a pair of bytes, a double word a pair of
//! words and a quad word a pair of double words. Values are stored flat,
//! big-endian: the high half of a pair always comes first.

use std::fmt;

use crate::error::DecodeError;

/// Width of a composite value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    /// 1 byte.
    Byte = 1,
    /// 2 bytes.
    Word = 2,
    /// 4 bytes.
    DoubleWord = 4,
    /// 8 bytes.
    QuadWord = 8,
}

/// All widths, narrowest first.
pub const ALL_WIDTHS: [Width; 4] = [Width::Byte, Width::Word, Width::DoubleWord, Width::QuadWord];

impl Width {
    /// Number of bytes occupied by a value of this width.
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Width of each half of a value of this width, or `None` for a byte.
    pub const fn half(self) -> Option<Width> {
        match self {
            Width::Byte => None,
            Width::Word => Some(Width::Byte),
            Width::DoubleWord => Some(Width::Word),
            Width::QuadWord => Some(Width::DoubleWord),
        }
    }

    /// Width of a pair of values of this width, or `None` for a quad word.
    pub const fn double(self) -> Option<Width> {
        match self {
            Width::Byte => Some(Width::Word),
            Width::Word => Some(Width::DoubleWord),
            Width::DoubleWord => Some(Width::QuadWord),
            Width::QuadWord => None,
        }
    }

    /// Width with the given byte count.
    pub const fn from_bytes(n: usize) -> Option<Width> {
        match n {
            1 => Some(Width::Byte),
            2 => Some(Width::Word),
            4 => Some(Width::DoubleWord),
            8 => Some(Width::QuadWord),
            _ => None,
        }
    }

    /// Mask selecting the bits a value of this width can hold.
    pub const fn mask(self) -> u64 {
        match self {
            Width::QuadWord => u64::MAX,
            w => (1u64 << (w.bytes() * 8)) - 1,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Width::Byte => "byte",
            Width::Word => "word",
            Width::DoubleWord => "double word",
            Width::QuadWord => "quad word",
        };
        f.write_str(name)
    }
}

/// An immutable value of 1, 2, 4 or 8 bytes.
///
/// Only the first `width.bytes()` entries of the backing array are
/// meaningful; the rest are always zero, so derived equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value {
    width: Width,
    bytes: [u8; 8],
}

impl Value {
    /// A single byte.
    pub const fn byte(v: u8) -> Self {
        let mut bytes = [0u8; 8];
        bytes[0] = v;
        Self {
            width: Width::Byte,
            bytes,
        }
    }

    /// A word, from its 16-bit integer value.
    pub fn word(v: u16) -> Self {
        Self::from_u64(Width::Word, v as u64)
    }

    /// A double word, from its 32-bit integer value.
    pub fn double_word(v: u32) -> Self {
        Self::from_u64(Width::DoubleWord, v as u64)
    }

    /// A quad word, from its 64-bit integer value.
    pub fn quad_word(v: u64) -> Self {
        Self::from_u64(Width::QuadWord, v)
    }

    /// A value of the given width holding the low-order bits of `v`.
    pub fn from_u64(width: Width, v: u64) -> Self {
        let n = width.bytes();
        let be = (v & width.mask()).to_be_bytes();
        let mut bytes = [0u8; 8];
        bytes[..n].copy_from_slice(&be[8 - n..]);
        Self { width, bytes }
    }

    /// Compose a value from big-endian bytes. The slice length selects the width.
    pub fn from_be_bytes(src: &[u8]) -> Result<Self, DecodeError> {
        let width = Width::from_bytes(src.len()).ok_or(DecodeError::InvalidLength(src.len()))?;
        let mut bytes = [0u8; 8];
        bytes[..src.len()].copy_from_slice(src);
        Ok(Self { width, bytes })
    }

    /// Pair two values of equal width into one of twice the width.
    ///
    /// Returns `None` if the halves differ in width or are already quad words.
    pub fn pair(high: Value, low: Value) -> Option<Self> {
        if high.width != low.width {
            return None;
        }
        let width = high.width.double()?;
        let n = high.width.bytes();
        let mut bytes = [0u8; 8];
        bytes[..n].copy_from_slice(high.as_bytes());
        bytes[n..2 * n].copy_from_slice(low.as_bytes());
        Some(Self { width, bytes })
    }

    /// Split into `(high, low)` halves. Returns `None` for a byte.
    pub fn split(&self) -> Option<(Value, Value)> {
        let half = self.width.half()?;
        let n = half.bytes();
        let mut high = [0u8; 8];
        let mut low = [0u8; 8];
        high[..n].copy_from_slice(&self.bytes[..n]);
        low[..n].copy_from_slice(&self.bytes[n..2 * n]);
        Some((
            Self {
                width: half,
                bytes: high,
            },
            Self {
                width: half,
                bytes: low,
            },
        ))
    }

    /// Width of this value.
    pub fn width(&self) -> Width {
        self.width
    }

    /// The big-endian bytes of this value.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width.bytes()]
    }

    /// The unsigned integer this value encodes.
    pub fn to_u64(&self) -> u64 {
        self.as_bytes()
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    /// The least significant byte (the last byte in storage order).
    pub fn low_byte(&self) -> u8 {
        self.bytes[self.width.bytes() - 1]
    }

    /// Convert to another width: zero-extend when widening, keep the
    /// low-order bytes when narrowing.
    pub fn resize(&self, width: Width) -> Self {
        Self::from_u64(width, self.to_u64())
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::byte(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
