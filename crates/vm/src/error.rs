//! Runtime errors for the Lux VM.
//!
//! Every [`RuntimeError`] carries the offset of the faulting instruction's
//! opcode byte (`at`). A fault halts the run; nothing is retried.

use lux_common::{DecodeError, Opcode, Width};
use thiserror::Error;

/// Errors raised by [`Memory`](crate::Memory) and [`Stack`](crate::Stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// A multi-byte access would run past the end of memory.
    #[error("{width} access at {address:#04x} runs past the end of memory")]
    OutOfRange { address: u8, width: Width },

    /// A push would exceed the stack capacity.
    #[error("stack overflow")]
    StackOverflow,

    /// Pop on an empty stack.
    #[error("stack underflow")]
    StackUnderflow,
}

/// Errors that halt program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The fetched byte matches no opcode.
    #[error("invalid opcode {byte:#04x} at offset {at}")]
    InvalidOpcode { at: usize, byte: u8 },

    /// An addressing or size marker was fetched as an instruction.
    #[error("marker {} fetched as an instruction at offset {at}", .marker.mnemonic())]
    MisplacedMarker { at: usize, marker: Opcode },

    /// A marker has no meaning in the operand position it appeared in.
    #[error("unknown addressing marker {} at offset {at}", .marker.mnemonic())]
    UnknownAddressingMarker { at: usize, marker: Opcode },

    /// An operand nests more markers than the decoder accepts.
    #[error("operand nesting exceeds {limit} levels at offset {at}")]
    OperandTooDeep { at: usize, limit: usize },

    /// The instruction ran off the end of the program.
    #[error("instruction stream ended inside the instruction at offset {at}")]
    StreamUnderrun { at: usize },

    /// A memory access would run past the end of memory.
    #[error("{width} access at address {address:#04x} out of range at offset {at}")]
    MemoryOutOfRange { at: usize, address: u8, width: Width },

    /// Push beyond the stack capacity.
    #[error("stack overflow at offset {at}")]
    StackOverflow { at: usize },

    /// Pop on an empty stack.
    #[error("stack underflow at offset {at}")]
    StackUnderflow { at: usize },

    /// DIV with a zero right operand.
    #[error("division by zero at offset {at}")]
    DivisionByZero { at: usize },

    /// A jump target lies past the end of the program.
    #[error("jump target {target} out of range at offset {at}")]
    JumpOutOfRange { at: usize, target: usize },

    /// The instruction pointer does not fit in a byte.
    #[error("instruction pointer {ip} does not fit in a byte at offset {at}")]
    InsPtrOverflow { at: usize, ip: usize },
}

impl RuntimeError {
    /// Offset of the faulting instruction.
    pub fn at(&self) -> usize {
        match *self {
            RuntimeError::InvalidOpcode { at, .. }
            | RuntimeError::MisplacedMarker { at, .. }
            | RuntimeError::UnknownAddressingMarker { at, .. }
            | RuntimeError::OperandTooDeep { at, .. }
            | RuntimeError::StreamUnderrun { at }
            | RuntimeError::MemoryOutOfRange { at, .. }
            | RuntimeError::StackOverflow { at }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::JumpOutOfRange { at, .. }
            | RuntimeError::InsPtrOverflow { at, .. } => at,
        }
    }

    pub(crate) fn decode(at: usize, err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidOpcode(byte) => RuntimeError::InvalidOpcode { at, byte },
            DecodeError::MisplacedMarker(marker) => RuntimeError::MisplacedMarker { at, marker },
            DecodeError::UnknownAddressingMarker(marker) => {
                RuntimeError::UnknownAddressingMarker { at, marker }
            }
            DecodeError::OperandTooDeep(limit) => RuntimeError::OperandTooDeep { at, limit },
            // Composite reads only fail on a short stream.
            DecodeError::UnexpectedEnd | DecodeError::InvalidLength(_) => {
                RuntimeError::StreamUnderrun { at }
            }
        }
    }

    pub(crate) fn memory(at: usize, err: MemoryError) -> Self {
        match err {
            MemoryError::OutOfRange { address, width } => {
                RuntimeError::MemoryOutOfRange { at, address, width }
            }
            MemoryError::StackOverflow => RuntimeError::StackOverflow { at },
            MemoryError::StackUnderflow => RuntimeError::StackUnderflow { at },
        }
    }
}
