//! Lux virtual machine: executes raw Lux bytecode.
//!
//! The VM has no registers. It works on:
//! - a 256-byte [`Memory`] addressed by single bytes
//! - a 1024-byte operand [`Stack`]
//! - the program's own cursor as instruction pointer
//!
//! # Usage
//!
//! ```
//! use lux_common::Executable;
//! use lux_vm::run;
//!
//! // PUSH 0x0a; ADD TOP 0x03
//! let mut exe = Executable::new(vec![0xfd, 0x0a, 0xa0, 0xb0, 0x03]);
//! let (_memory, stack) = run(&mut exe).unwrap();
//! assert_eq!(stack.contents(), &[0x0a, 0x0d]);
//! ```

pub mod error;
pub mod execute;
pub mod machine;
pub mod memory;
pub mod stack;

pub use error::{MemoryError, RuntimeError};
pub use machine::{Status, VM};
pub use memory::{Memory, MEMORY_SIZE};
pub use stack::{Stack, STACK_SIZE};

use lux_common::Executable;

/// Execute a program to completion and return the final memory and stack.
///
/// # Errors
///
/// Returns [`RuntimeError`] if the program faults (invalid opcode,
/// division by zero, stack underflow, etc.).
pub fn run(exe: &mut Executable) -> Result<(Memory, Stack), RuntimeError> {
    let mut vm = VM::new(exe);
    vm.run()?;
    Ok(vm.into_parts())
}
