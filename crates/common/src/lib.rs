//! Lux common types and instruction encoding.
//!
//! This crate provides the foundational data structures for the Lux
//! bytecode format:
//!
//! - [`Value`] and [`Width`]: fixed-width composite values
//! - [`Opcode`]: the one-byte opcode table and [`Token`] operand classification
//! - [`Instruction`] and [`Operand`]: decoded instructions and the operand grammar
//! - [`Executable`]: a program plus its instruction pointer
//! - [`DecodeError`]: errors from decoding byte streams

pub mod error;
pub mod executable;
pub mod instruction;
pub mod opcode;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use executable::Executable;
pub use instruction::{ArithOp, BitOp, Condition, Instruction, Operand};
pub use opcode::{Opcode, Token};
pub use value::{Value, Width};
