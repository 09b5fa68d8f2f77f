//! Error types for the Lux assembler.

use lux_common::Opcode;
use thiserror::Error;

/// Errors produced during assembly of text to bytecode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized instruction mnemonic was encountered.
    #[error("line {line}: unknown mnemonic '{token}'")]
    UnknownMnemonic { line: usize, token: String },

    /// An instruction did not have enough operands.
    #[error("line {line}: {mnemonic} expects {expected} operand(s)")]
    MissingOperand {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
    },

    /// A numeric literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A literal operand equals an opcode byte and would decode as that marker.
    #[error("line {line}: literal {value:#04x} is the {} opcode byte", .opcode.mnemonic())]
    AmbiguousLiteral {
        line: usize,
        value: u8,
        opcode: Opcode,
    },

    /// An operand nests more markers than the decoder accepts.
    #[error("line {line}: operand nesting exceeds {limit} levels")]
    OperandTooDeep { line: usize, limit: usize },
}

impl AsmError {
    /// Source line the error was found on (1-based).
    pub fn line(&self) -> usize {
        match *self {
            AsmError::UnknownMnemonic { line, .. }
            | AsmError::MissingOperand { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::AmbiguousLiteral { line, .. }
            | AsmError::OperandTooDeep { line, .. } => line,
        }
    }
}
