//! VM state and operand evaluation.

use lux_common::{Executable, Opcode, Operand, Value, Width};

use crate::error::RuntimeError;
use crate::memory::Memory;
use crate::stack::Stack;

/// Where a run stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// More instructions may execute.
    Running,
    /// The stream was exhausted.
    Finished,
    /// A fault halted the run.
    Faulted(RuntimeError),
}

/// The Lux virtual machine.
///
/// One VM runs one program once. Memory and stack live exactly as long
/// as the VM.
#[derive(Debug)]
pub struct VM<'a> {
    /// The program being executed. Its cursor is the instruction pointer.
    pub(crate) exe: &'a mut Executable,
    pub(crate) memory: Memory,
    pub(crate) stack: Stack,
    pub(crate) status: Status,
    /// Offset of the instruction currently executing.
    pub(crate) at: usize,
    /// Instructions completed so far.
    pub(crate) steps: u64,
}

impl<'a> VM<'a> {
    /// Create a VM for the given program, starting at offset 0.
    pub fn new(exe: &'a mut Executable) -> Self {
        exe.rewind();
        Self {
            exe,
            memory: Memory::new(),
            stack: Stack::new(),
            status: Status::Running,
            at: 0,
            steps: 0,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Number of instructions executed.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Offset of the next byte to fetch.
    pub fn ip(&self) -> usize {
        self.exe.ip()
    }

    /// Give up the final memory and stack.
    pub fn into_parts(self) -> (Memory, Stack) {
        (self.memory, self.stack)
    }

    fn unknown(&self, marker: Opcode) -> RuntimeError {
        RuntimeError::UnknownAddressingMarker {
            at: self.at,
            marker,
        }
    }

    /// The instruction pointer as a byte.
    pub(crate) fn insptr(&self) -> Result<u8, RuntimeError> {
        let ip = self.exe.ip();
        u8::try_from(ip).map_err(|_| RuntimeError::InsPtrOverflow { at: self.at, ip })
    }

    pub(crate) fn read(&self, address: u8, width: Width) -> Result<Value, RuntimeError> {
        self.memory
            .read(address, width)
            .map_err(|e| RuntimeError::memory(self.at, e))
    }

    pub(crate) fn write(&mut self, address: u8, value: Value) -> Result<(), RuntimeError> {
        self.memory
            .write(address, value)
            .map_err(|e| RuntimeError::memory(self.at, e))
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), RuntimeError> {
        self.stack
            .push_byte(byte)
            .map_err(|e| RuntimeError::memory(self.at, e))
    }

    pub(crate) fn pop(&mut self) -> Result<u8, RuntimeError> {
        self.stack
            .pop()
            .map_err(|e| RuntimeError::memory(self.at, e))
    }

    /// Resolve an operand to a memory address.
    pub(crate) fn address(&self, op: &Operand) -> Result<u8, RuntimeError> {
        match op {
            Operand::Literal(b) => Ok(*b),
            Operand::Top => Ok(self.stack.top()),
            Operand::InsPtr => self.insptr(),
            Operand::Ref {
                width: None | Some(Width::Byte),
                inner,
            } => Ok(self.memory.read_byte(self.address(inner)?)),
            Operand::Ref {
                width: Some(w), ..
            } => Err(self.unknown(Opcode::size_marker(*w))),
            Operand::Sized { width, .. } => Err(self.unknown(Opcode::size_marker(*width))),
        }
    }

    /// Resolve an operand to a value. Literals are immediates.
    pub(crate) fn value(&self, op: &Operand) -> Result<Value, RuntimeError> {
        match op {
            Operand::Literal(b) => Ok(Value::byte(*b)),
            Operand::Top => Ok(Value::byte(self.stack.top())),
            Operand::InsPtr => self.insptr().map(Value::byte),
            Operand::Ref { width, inner } => {
                self.read(self.address(inner)?, width.unwrap_or(Width::Byte))
            }
            Operand::Sized { width, inner } => self.read(self.address(inner)?, *width),
        }
    }

    /// Resolve an operand to a byte, taking the low byte of wider values.
    pub(crate) fn byte(&self, op: &Operand) -> Result<u8, RuntimeError> {
        self.value(op).map(|v| v.low_byte())
    }

    /// Resolve a write target to an address and an optional width.
    pub(crate) fn destination(&self, op: &Operand) -> Result<(u8, Option<Width>), RuntimeError> {
        match op {
            Operand::Literal(b) => Ok((*b, None)),
            Operand::Top => Ok((self.stack.top(), None)),
            Operand::InsPtr => Err(self.unknown(Opcode::InsPtr)),
            Operand::Ref { width, inner } => {
                let pointer = self.memory.read_byte(self.address(inner)?);
                Ok((pointer, *width))
            }
            Operand::Sized { width, inner } => Ok((self.address(inner)?, Some(*width))),
        }
    }

    /// Resolve the source of a MOVE. Literals name memory cells.
    pub(crate) fn move_source(&self, op: &Operand) -> Result<Value, RuntimeError> {
        match op {
            Operand::Literal(b) => Ok(Value::byte(self.memory.read_byte(*b))),
            _ => self.value(op),
        }
    }

    /// Resolve a jump target offset.
    pub(crate) fn jump_target(&self, op: &Operand) -> Result<usize, RuntimeError> {
        match op {
            Operand::Literal(b) => Ok(*b as usize),
            Operand::Top => Ok(self.stack.top() as usize),
            other => Err(self.unknown(other.marker().unwrap_or(Opcode::Jmp))),
        }
    }

    pub(crate) fn jump(&mut self, target: usize) -> Result<(), RuntimeError> {
        self.exe
            .jump(target)
            .map_err(|_| RuntimeError::JumpOutOfRange {
                at: self.at,
                target,
            })
    }
}
