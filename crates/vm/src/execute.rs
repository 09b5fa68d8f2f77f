//! Fetch/decode/execute loop and instruction dispatch.

use log::{debug, trace, warn};
use lux_common::{ArithOp, BitOp, Instruction, Opcode, Operand, Value, Width};

use crate::error::RuntimeError;
use crate::machine::{Status, VM};

impl<'a> VM<'a> {
    /// Run until the stream is exhausted or a fault halts the program.
    ///
    /// A halted VM does not resume: calling `run` again returns the
    /// recorded outcome.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while self.step()? {}
        Ok(())
    }

    /// Execute one instruction.
    ///
    /// Returns `Ok(false)` once the stream is exhausted. Each instruction
    /// either completes or faults without touching memory or the stack.
    pub fn step(&mut self) -> Result<bool, RuntimeError> {
        match &self.status {
            Status::Running => {}
            Status::Finished => return Ok(false),
            Status::Faulted(err) => return Err(err.clone()),
        }

        if !self.exe.has_next() {
            debug!("program finished after {} instructions", self.steps);
            self.status = Status::Finished;
            return Ok(false);
        }

        self.at = self.exe.ip();
        match self.fetch_and_execute() {
            Ok(()) => {
                self.steps += 1;
                Ok(true)
            }
            Err(err) => {
                warn!("halted: {err}");
                self.status = Status::Faulted(err.clone());
                Err(err)
            }
        }
    }

    fn fetch_and_execute(&mut self) -> Result<(), RuntimeError> {
        let instr =
            Instruction::decode(self.exe).map_err(|e| RuntimeError::decode(self.at, e))?;
        trace!("{:#06x}  {instr}", self.at);

        match &instr {
            Instruction::Move { dest, src } => self.exec_move(dest, src),
            Instruction::Load { dest, value } => self.exec_load(dest, *value),
            Instruction::Jump { target } => {
                let target = self.jump_target(target)?;
                self.jump(target)
            }
            Instruction::Push { src } => {
                let byte = self.byte(src)?;
                self.push(byte)
            }
            Instruction::Pop => self.pop().map(drop),
            Instruction::Arith { op, lhs, rhs } => self.exec_arith(*op, lhs, rhs),
            Instruction::Compare { cond, lhs, rhs } => {
                let holds = cond.holds(self.byte(lhs)?, self.byte(rhs)?);
                self.push(u8::from(holds))
            }
            Instruction::Branch {
                cond,
                lhs,
                rhs,
                target,
            } => {
                let lhs = self.byte(lhs)?;
                let rhs = self.byte(rhs)?;
                let target = self.jump_target(target)?;
                if cond.holds(lhs, rhs) {
                    self.jump(target)?;
                }
                Ok(())
            }
            Instruction::Bitwise { op, dest, src } => self.exec_bitwise(*op, dest, src),
            Instruction::Invert { dest } => {
                let (address, width) = self.destination(dest)?;
                let width = width.unwrap_or(Width::Byte);
                let cell = self.read(address, width)?.to_u64();
                self.write(address, Value::from_u64(width, !cell))
            }
        }
    }

    /// MOVE: a sized destination converts the source to its width; an
    /// unsized one takes a size-qualified source as a byte and anything
    /// else at the source's own width.
    fn exec_move(&mut self, dest: &Operand, src: &Operand) -> Result<(), RuntimeError> {
        let (address, width) = self.destination(dest)?;
        let value = self.move_source(src)?;
        let value = match (width, src) {
            (Some(w), _) => value.resize(w),
            (None, Operand::Sized { .. }) => value.resize(Width::Byte),
            (None, _) => value,
        };
        self.write(address, value)
    }

    fn exec_load(&mut self, dest: &Operand, value: Value) -> Result<(), RuntimeError> {
        let (address, width) = self.destination(dest)?;
        match width {
            Some(w) if w != value.width() => Err(RuntimeError::UnknownAddressingMarker {
                at: self.at,
                marker: Opcode::size_marker(w),
            }),
            _ => self.write(address, value),
        }
    }

    fn exec_arith(&mut self, op: ArithOp, lhs: &Operand, rhs: &Operand) -> Result<(), RuntimeError> {
        let a = self.byte(lhs)?;
        let b = self.byte(rhs)?;
        let result = match op {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
            ArithOp::Div => a
                .checked_div(b)
                .ok_or(RuntimeError::DivisionByZero { at: self.at })?,
        };
        self.push(result)
    }

    fn exec_bitwise(&mut self, op: BitOp, dest: &Operand, src: &Operand) -> Result<(), RuntimeError> {
        let (address, width) = self.destination(dest)?;
        let width = width.unwrap_or(Width::Byte);
        let src = u64::from(self.byte(src)?);
        let cell = self.read(address, width)?.to_u64();
        let bits = width.bytes() as u64 * 8;
        let result = match op {
            BitOp::And => cell & src,
            BitOp::Or => cell | src,
            BitOp::Xor => cell ^ src,
            BitOp::Shr if src >= bits => 0,
            BitOp::Shr => cell >> src,
            BitOp::Shl if src >= bits => 0,
            BitOp::Shl => cell << src,
        };
        self.write(address, Value::from_u64(width, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_common::Executable;

    #[test]
    fn step_reports_exhaustion() {
        let mut exe = Executable::new(vec![0xfd, 1]);
        let mut vm = VM::new(&mut exe);
        assert_eq!(vm.step(), Ok(true));
        assert_eq!(vm.step(), Ok(false));
        assert_eq!(vm.status(), &Status::Finished);
        assert_eq!(vm.step(), Ok(false));
        assert_eq!(vm.steps(), 1);
    }

    #[test]
    fn fault_is_terminal() {
        let mut exe = Executable::new(vec![0xfc, 0xfd, 1]);
        let mut vm = VM::new(&mut exe);
        let err = RuntimeError::StackUnderflow { at: 0 };
        assert_eq!(vm.run(), Err(err.clone()));
        assert_eq!(vm.run(), Err(err.clone()));
        assert_eq!(vm.step(), Err(err));
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn shifts_past_width_clear_cell() {
        let mut exe = Executable::new(vec![
            0xef, 0x00, 0xff, // MOVB 0x00 0xff
            0x95, 0x00, 0x08, // SHL 0x00 0x08
            0xee, 0x02, 0x80, 0x00, // MOVW 0x02 0x8000
            0x94, 0xc3, 0x02, 0x0f, // SHR WORD 0x02 0x0f
        ]);
        let mut vm = VM::new(&mut exe);
        vm.run().unwrap();
        assert_eq!(vm.memory().read_byte(0), 0);
        assert_eq!(vm.memory().read_word(2), Ok(Value::word(1)));
    }

    #[test]
    fn load_width_mismatch_is_rejected() {
        // MOVB WORD 0x04 0x01
        let mut exe = Executable::new(vec![0xef, 0xc3, 0x04, 0x01]);
        let mut vm = VM::new(&mut exe);
        assert!(matches!(
            vm.run(),
            Err(RuntimeError::UnknownAddressingMarker { at: 0, .. })
        ));
    }
}
