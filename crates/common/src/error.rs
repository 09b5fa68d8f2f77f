//! Decode errors for Lux instruction streams.

use thiserror::Error;

use crate::opcode::Opcode;

/// Errors that occur while decoding bytes from an instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read would run past the end of the stream.
    #[error("unexpected end of instruction stream")]
    UnexpectedEnd,

    /// The byte in opcode position matches no table entry.
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    /// An addressing or size marker appeared in opcode position.
    #[error("marker {} is not an instruction", .0.mnemonic())]
    MisplacedMarker(Opcode),

    /// A table byte in operand position that has no addressing meaning there.
    #[error("unknown addressing marker {}", .0.mnemonic())]
    UnknownAddressingMarker(Opcode),

    /// Operand markers nested deeper than the decoder accepts.
    #[error("operand nesting exceeds {0} levels")]
    OperandTooDeep(usize),

    /// A composite value was built from a byte slice of unsupported length.
    #[error("invalid value length: {0} (must be 1, 2, 4 or 8)")]
    InvalidLength(usize),
}
