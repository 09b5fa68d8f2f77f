//! Instruction decoding and encoding.
//!
//! Each instruction is one opcode byte followed by operands. Which bytes
//! an operand consumes depends only on the stream itself:
//!
//! ```text
//! operand := LITERAL                 ; any byte not in the opcode table
//!          | TOP                     ; current stack-top byte
//!          | INSPTR                  ; current instruction pointer
//!          | REF [size] operand      ; memory at the inner operand's address
//!          | size operand            ; BYTE | WORD | DWORD | QWORD qualified cell
//! ```
//!
//! A size marker directly after `REF` always qualifies the reference, so
//! `REF WORD 4` is a word-wide read through address 4.
//!
//! Operands read as a byte value (arithmetic and comparison operands,
//! branch comparands, the bitwise source) use a narrower rule: only `TOP`,
//! `INSPTR` and `REF` are markers there, and every other byte is a
//! literal. `ADD 0x05 0xfc` adds 0xfc.

use std::fmt;

use crate::error::DecodeError;
use crate::executable::Executable;
use crate::opcode::{Opcode, Token};
use crate::value::{Value, Width};

/// Maximum marker nesting inside a single operand.
pub const MAX_OPERAND_DEPTH: usize = 16;

/// A decoded operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A plain byte. Outside byte-value positions it is never a table byte.
    Literal(u8),
    /// The byte on top of the stack.
    Top,
    /// The instruction pointer.
    InsPtr,
    /// Memory at the address the inner operand resolves to.
    Ref {
        /// Access width, when a size marker follows `REF`.
        width: Option<Width>,
        /// Operand supplying the address.
        inner: Box<Operand>,
    },
    /// A width-qualified memory cell.
    Sized {
        /// Access width.
        width: Width,
        /// Operand supplying the address.
        inner: Box<Operand>,
    },
}

impl Operand {
    /// Shorthand for `REF inner`.
    pub fn reference(inner: Operand) -> Self {
        Operand::Ref {
            width: None,
            inner: Box::new(inner),
        }
    }

    /// Shorthand for `REF width inner`.
    pub fn reference_sized(width: Width, inner: Operand) -> Self {
        Operand::Ref {
            width: Some(width),
            inner: Box::new(inner),
        }
    }

    /// Shorthand for `width inner`.
    pub fn sized(width: Width, inner: Operand) -> Self {
        Operand::Sized {
            width,
            inner: Box::new(inner),
        }
    }

    /// The marker this operand starts with, or `None` for a literal.
    pub fn marker(&self) -> Option<Opcode> {
        match self {
            Operand::Literal(_) => None,
            Operand::Top => Some(Opcode::Top),
            Operand::InsPtr => Some(Opcode::InsPtr),
            Operand::Ref { .. } => Some(Opcode::Ref),
            Operand::Sized { width, .. } => Some(Opcode::size_marker(*width)),
        }
    }

    fn decode(exe: &mut Executable, depth: usize) -> Result<Self, DecodeError> {
        if depth >= MAX_OPERAND_DEPTH {
            return Err(DecodeError::OperandTooDeep(MAX_OPERAND_DEPTH));
        }
        match Token::classify(exe.next()?) {
            Token::Literal(b) => Ok(Operand::Literal(b)),
            Token::Marker(Opcode::Top) => Ok(Operand::Top),
            Token::Marker(Opcode::InsPtr) => Ok(Operand::InsPtr),
            Token::Marker(Opcode::Ref) => {
                let width = exe.peek().and_then(Opcode::lookup).and_then(Opcode::width);
                if width.is_some() {
                    exe.next()?;
                }
                let inner = Operand::decode(exe, depth + 1)?;
                Ok(Operand::Ref {
                    width,
                    inner: Box::new(inner),
                })
            }
            Token::Marker(op) => match op.width() {
                Some(width) => {
                    let inner = Operand::decode(exe, depth + 1)?;
                    Ok(Operand::sized(width, inner))
                }
                None => Err(DecodeError::UnknownAddressingMarker(op)),
            },
        }
    }

    /// Decode an operand read as a byte value.
    fn decode_value(exe: &mut Executable) -> Result<Self, DecodeError> {
        match exe.peek().map(Token::classify_value) {
            Some(Token::Marker(_)) => Operand::decode(exe, 0),
            _ => exe.next().map(Operand::Literal),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Operand::Literal(b) => out.push(*b),
            Operand::Top => out.push(Opcode::Top.code()),
            Operand::InsPtr => out.push(Opcode::InsPtr.code()),
            Operand::Ref { width, inner } => {
                out.push(Opcode::Ref.code());
                if let Some(w) = width {
                    out.push(Opcode::size_marker(*w).code());
                }
                inner.encode(out);
            }
            Operand::Sized { width, inner } => {
                out.push(Opcode::size_marker(*width).code());
                inner.encode(out);
            }
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(b) => write!(f, "{b:#04x}"),
            Operand::Top => f.write_str("TOP"),
            Operand::InsPtr => f.write_str("INSPTR"),
            Operand::Ref { width: None, inner } => write!(f, "REF {inner}"),
            Operand::Ref {
                width: Some(w),
                inner,
            } => write!(f, "REF {} {inner}", Opcode::size_marker(*w).mnemonic()),
            Operand::Sized { width, inner } => {
                write!(f, "{} {inner}", Opcode::size_marker(*width).mnemonic())
            }
        }
    }
}

/// Byte arithmetic pushed onto the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_opcode(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::Add => Some(ArithOp::Add),
            Opcode::Sub => Some(ArithOp::Sub),
            Opcode::Mul => Some(ArithOp::Mul),
            Opcode::Div => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn opcode(self) -> Opcode {
        match self {
            ArithOp::Add => Opcode::Add,
            ArithOp::Sub => Opcode::Sub,
            ArithOp::Mul => Opcode::Mul,
            ArithOp::Div => Opcode::Div,
        }
    }
}

/// Relation tested by comparisons and conditional jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Condition {
    /// The relation tested by a comparison opcode (CMP, LE, LT, GE, GT).
    pub fn from_compare(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::Cmp => Some(Condition::Eq),
            Opcode::Le => Some(Condition::Le),
            Opcode::Lt => Some(Condition::Lt),
            Opcode::Ge => Some(Condition::Ge),
            Opcode::Gt => Some(Condition::Gt),
            _ => None,
        }
    }

    /// The relation tested by a conditional jump opcode.
    pub fn from_branch(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::Jeq => Some(Condition::Eq),
            Opcode::Jlt => Some(Condition::Lt),
            Opcode::Jle => Some(Condition::Le),
            Opcode::Jgt => Some(Condition::Gt),
            Opcode::Jge => Some(Condition::Ge),
            _ => None,
        }
    }

    pub fn compare_opcode(self) -> Opcode {
        match self {
            Condition::Eq => Opcode::Cmp,
            Condition::Lt => Opcode::Lt,
            Condition::Le => Opcode::Le,
            Condition::Gt => Opcode::Gt,
            Condition::Ge => Opcode::Ge,
        }
    }

    pub fn branch_opcode(self) -> Opcode {
        match self {
            Condition::Eq => Opcode::Jeq,
            Condition::Lt => Opcode::Jlt,
            Condition::Le => Opcode::Jle,
            Condition::Gt => Opcode::Jgt,
            Condition::Ge => Opcode::Jge,
        }
    }

    /// Evaluate the relation on two unsigned bytes.
    pub fn holds(self, lhs: u8, rhs: u8) -> bool {
        match self {
            Condition::Eq => lhs == rhs,
            Condition::Lt => lhs < rhs,
            Condition::Le => lhs <= rhs,
            Condition::Gt => lhs > rhs,
            Condition::Ge => lhs >= rhs,
        }
    }
}

/// Read-modify-write bitwise operations on a memory cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Shr,
    Shl,
}

impl BitOp {
    /// The operation of a two-operand bitwise opcode. INV is not one.
    pub fn from_opcode(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::And => Some(BitOp::And),
            Opcode::Or => Some(BitOp::Or),
            Opcode::Xor => Some(BitOp::Xor),
            Opcode::Shr => Some(BitOp::Shr),
            Opcode::Shl => Some(BitOp::Shl),
            _ => None,
        }
    }

    pub fn opcode(self) -> Opcode {
        match self {
            BitOp::And => Opcode::And,
            BitOp::Or => Opcode::Or,
            BitOp::Xor => Opcode::Xor,
            BitOp::Shr => Opcode::Shr,
            BitOp::Shl => Opcode::Shl,
        }
    }
}

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `MOVE dest src`
    Move { dest: Operand, src: Operand },
    /// `MOVB`/`MOVW`/`MOVD`/`MOVQ dest imm`; the opcode follows `value.width()`.
    Load { dest: Operand, value: Value },
    /// `JMP target`
    Jump { target: Operand },
    /// `PUSH byte`. The byte is taken verbatim unless it is `INSPTR`.
    Push { src: Operand },
    /// `POP`
    Pop,
    /// `ADD`/`SUB`/`MUL`/`DIV lhs rhs`
    Arith {
        op: ArithOp,
        lhs: Operand,
        rhs: Operand,
    },
    /// `CMP`/`LE`/`LT`/`GE`/`GT lhs rhs`
    Compare {
        cond: Condition,
        lhs: Operand,
        rhs: Operand,
    },
    /// `JEQ`/`JLT`/`JLE`/`JGT`/`JGE lhs rhs target`
    Branch {
        cond: Condition,
        lhs: Operand,
        rhs: Operand,
        target: Operand,
    },
    /// `AND`/`OR`/`XOR`/`SHR`/`SHL dest src`
    Bitwise {
        op: BitOp,
        dest: Operand,
        src: Operand,
    },
    /// `INV dest`
    Invert { dest: Operand },
}

impl Instruction {
    /// Decode one instruction at the cursor, advancing past it.
    ///
    /// On error the cursor is left wherever decoding stopped.
    pub fn decode(exe: &mut Executable) -> Result<Self, DecodeError> {
        let opcode = Opcode::try_from(exe.next()?)?;
        let operand = |exe: &mut Executable| Operand::decode(exe, 0);
        let value = Operand::decode_value;

        let instr = match opcode {
            Opcode::Move => Instruction::Move {
                dest: operand(exe)?,
                src: operand(exe)?,
            },
            Opcode::Movb | Opcode::Movw | Opcode::Movd | Opcode::Movq => {
                let dest = operand(exe)?;
                let width = match opcode {
                    Opcode::Movb => Width::Byte,
                    Opcode::Movw => Width::Word,
                    Opcode::Movd => Width::DoubleWord,
                    _ => Width::QuadWord,
                };
                Instruction::Load {
                    dest,
                    value: exe.next_value(width)?,
                }
            }
            Opcode::Jmp => Instruction::Jump {
                target: operand(exe)?,
            },
            Opcode::Push => {
                let byte = exe.next()?;
                let src = if byte == Opcode::InsPtr.code() {
                    Operand::InsPtr
                } else {
                    Operand::Literal(byte)
                };
                Instruction::Push { src }
            }
            Opcode::Pop => Instruction::Pop,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                let op = match opcode {
                    Opcode::Add => ArithOp::Add,
                    Opcode::Sub => ArithOp::Sub,
                    Opcode::Mul => ArithOp::Mul,
                    _ => ArithOp::Div,
                };
                Instruction::Arith {
                    op,
                    lhs: value(exe)?,
                    rhs: value(exe)?,
                }
            }
            Opcode::Cmp | Opcode::Le | Opcode::Lt | Opcode::Ge | Opcode::Gt => {
                let cond = match opcode {
                    Opcode::Cmp => Condition::Eq,
                    Opcode::Le => Condition::Le,
                    Opcode::Lt => Condition::Lt,
                    Opcode::Ge => Condition::Ge,
                    _ => Condition::Gt,
                };
                Instruction::Compare {
                    cond,
                    lhs: value(exe)?,
                    rhs: value(exe)?,
                }
            }
            Opcode::Jeq | Opcode::Jlt | Opcode::Jle | Opcode::Jgt | Opcode::Jge => {
                let cond = match opcode {
                    Opcode::Jeq => Condition::Eq,
                    Opcode::Jlt => Condition::Lt,
                    Opcode::Jle => Condition::Le,
                    Opcode::Jgt => Condition::Gt,
                    _ => Condition::Ge,
                };
                Instruction::Branch {
                    cond,
                    lhs: value(exe)?,
                    rhs: value(exe)?,
                    target: operand(exe)?,
                }
            }
            Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Shr | Opcode::Shl => {
                let op = match opcode {
                    Opcode::And => BitOp::And,
                    Opcode::Or => BitOp::Or,
                    Opcode::Xor => BitOp::Xor,
                    Opcode::Shr => BitOp::Shr,
                    _ => BitOp::Shl,
                };
                Instruction::Bitwise {
                    op,
                    dest: operand(exe)?,
                    src: value(exe)?,
                }
            }
            Opcode::Inv => Instruction::Invert {
                dest: operand(exe)?,
            },
            Opcode::Top
            | Opcode::Ref
            | Opcode::InsPtr
            | Opcode::Byte
            | Opcode::Word
            | Opcode::DWord
            | Opcode::QWord => return Err(DecodeError::MisplacedMarker(opcode)),
        };

        Ok(instr)
    }

    /// Append the encoded bytes of this instruction.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode().code());
        match self {
            Instruction::Move { dest, src } => {
                dest.encode(out);
                src.encode(out);
            }
            Instruction::Load { dest, value } => {
                dest.encode(out);
                out.extend_from_slice(value.as_bytes());
            }
            Instruction::Jump { target } => target.encode(out),
            Instruction::Push { src } => src.encode(out),
            Instruction::Pop => {}
            Instruction::Arith { lhs, rhs, .. } | Instruction::Compare { lhs, rhs, .. } => {
                lhs.encode(out);
                rhs.encode(out);
            }
            Instruction::Branch {
                lhs, rhs, target, ..
            } => {
                lhs.encode(out);
                rhs.encode(out);
                target.encode(out);
            }
            Instruction::Bitwise { dest, src, .. } => {
                dest.encode(out);
                src.encode(out);
            }
            Instruction::Invert { dest } => dest.encode(out),
        }
    }

    /// The opcode this instruction is encoded with.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Move { .. } => Opcode::Move,
            Instruction::Load { value, .. } => Opcode::immediate_move(value.width()),
            Instruction::Jump { .. } => Opcode::Jmp,
            Instruction::Push { .. } => Opcode::Push,
            Instruction::Pop => Opcode::Pop,
            Instruction::Arith { op, .. } => op.opcode(),
            Instruction::Compare { cond, .. } => cond.compare_opcode(),
            Instruction::Branch { cond, .. } => cond.branch_opcode(),
            Instruction::Bitwise { op, .. } => op.opcode(),
            Instruction::Invert { .. } => Opcode::Inv,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode().mnemonic())?;
        match self {
            Instruction::Move { dest, src } => write!(f, " {dest} {src}"),
            Instruction::Load { dest, value } => write!(f, " {dest} {value}"),
            Instruction::Jump { target } => write!(f, " {target}"),
            Instruction::Push { src } => write!(f, " {src}"),
            Instruction::Pop => Ok(()),
            Instruction::Arith { lhs, rhs, .. } | Instruction::Compare { lhs, rhs, .. } => {
                write!(f, " {lhs} {rhs}")
            }
            Instruction::Branch {
                lhs, rhs, target, ..
            } => write!(f, " {lhs} {rhs} {target}"),
            Instruction::Bitwise { dest, src, .. } => write!(f, " {dest} {src}"),
            Instruction::Invert { dest } => write!(f, " {dest}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: Vec<u8>) -> Result<Vec<Instruction>, DecodeError> {
        let mut exe = Executable::new(bytes);
        let mut out = Vec::new();
        while exe.has_next() {
            out.push(Instruction::decode(&mut exe)?);
        }
        Ok(out)
    }

    fn decode_one(bytes: Vec<u8>) -> Result<Instruction, DecodeError> {
        Instruction::decode(&mut Executable::new(bytes))
    }

    #[test]
    fn decode_add_literals() {
        assert_eq!(
            decode_one(vec![0xa0, 5, 3]),
            Ok(Instruction::Arith {
                op: ArithOp::Add,
                lhs: Operand::Literal(5),
                rhs: Operand::Literal(3),
            })
        );
    }

    #[test]
    fn decode_add_top_and_ref() {
        assert_eq!(
            decode_one(vec![0xa0, 0xb0, 0xc0, 2]),
            Ok(Instruction::Arith {
                op: ArithOp::Add,
                lhs: Operand::Top,
                rhs: Operand::reference(Operand::Literal(2)),
            })
        );
    }

    #[test]
    fn right_operand_classified_on_its_own_byte() {
        // Left is a literal, right is a marker: the right marker still applies.
        assert_eq!(
            decode_one(vec![0xa1, 10, 0xb0]),
            Ok(Instruction::Arith {
                op: ArithOp::Sub,
                lhs: Operand::Literal(10),
                rhs: Operand::Top,
            })
        );
    }

    #[test]
    fn ref_with_size_marker() {
        assert_eq!(
            decode_one(vec![0xff, 0x10, 0xc0, 0xc3, 0x20]),
            Ok(Instruction::Move {
                dest: Operand::Literal(0x10),
                src: Operand::reference_sized(Width::Word, Operand::Literal(0x20)),
            })
        );
    }

    #[test]
    fn nested_ref() {
        assert_eq!(
            decode_one(vec![0xff, 0xc0, 0xc0, 1, 2]),
            Ok(Instruction::Move {
                dest: Operand::reference(Operand::reference(Operand::Literal(1))),
                src: Operand::Literal(2),
            })
        );
    }

    #[test]
    fn sized_destination() {
        assert_eq!(
            decode_one(vec![0xff, 0xc4, 8, 3]),
            Ok(Instruction::Move {
                dest: Operand::sized(Width::DoubleWord, Operand::Literal(8)),
                src: Operand::Literal(3),
            })
        );
    }

    #[test]
    fn immediate_moves_take_raw_bytes() {
        // 0xb0 inside the immediate is data, not TOP.
        assert_eq!(
            decode_one(vec![0xee, 4, 0xb0, 0xa0]),
            Ok(Instruction::Load {
                dest: Operand::Literal(4),
                value: Value::word(0xb0a0),
            })
        );
        assert_eq!(
            decode_one(vec![0xec, 0, 1, 2, 3, 4, 5, 6, 7, 8]),
            Ok(Instruction::Load {
                dest: Operand::Literal(0),
                value: Value::quad_word(0x0102_0304_0506_0708),
            })
        );
    }

    #[test]
    fn push_is_verbatim_except_insptr() {
        assert_eq!(
            decode_one(vec![0xfd, 0xb0]),
            Ok(Instruction::Push {
                src: Operand::Literal(0xb0)
            })
        );
        assert_eq!(
            decode_one(vec![0xfd, 0xc1]),
            Ok(Instruction::Push {
                src: Operand::InsPtr
            })
        );
    }

    #[test]
    fn branch_has_three_operands() {
        assert_eq!(
            decode_one(vec![0xd2, 1, 2, 9]),
            Ok(Instruction::Branch {
                cond: Condition::Lt,
                lhs: Operand::Literal(1),
                rhs: Operand::Literal(2),
                target: Operand::Literal(9),
            })
        );
    }

    #[test]
    fn invalid_opcode() {
        assert_eq!(decode_one(vec![0x07]), Err(DecodeError::InvalidOpcode(0x07)));
    }

    #[test]
    fn marker_in_opcode_position() {
        assert_eq!(
            decode_one(vec![0xb0]),
            Err(DecodeError::MisplacedMarker(Opcode::Top))
        );
        assert_eq!(
            decode_one(vec![0xc3, 1]),
            Err(DecodeError::MisplacedMarker(Opcode::Word))
        );
    }

    #[test]
    fn instruction_byte_in_operand_position() {
        assert_eq!(
            decode_one(vec![0xff, 0xa2, 1]),
            Err(DecodeError::UnknownAddressingMarker(Opcode::Mul))
        );
        assert_eq!(
            decode_one(vec![0xfe, 0xfc]),
            Err(DecodeError::UnknownAddressingMarker(Opcode::Pop))
        );
    }

    #[test]
    fn byte_value_operands_take_table_bytes_as_literals() {
        assert_eq!(
            decode_one(vec![0xa0, 0x05, 0xfc]),
            Ok(Instruction::Arith {
                op: ArithOp::Add,
                lhs: Operand::Literal(0x05),
                rhs: Operand::Literal(0xfc),
            })
        );
        // A size marker is a literal here, so the instruction is three bytes.
        let program = decode_all(vec![0xa0, 0xc2, 0x01, 0xfc]).unwrap();
        assert_eq!(
            program,
            vec![
                Instruction::Arith {
                    op: ArithOp::Add,
                    lhs: Operand::Literal(0xc2),
                    rhs: Operand::Literal(0x01),
                },
                Instruction::Pop,
            ]
        );
        assert_eq!(
            decode_one(vec![0xd1, 0xff, 0xa0, 0x09]),
            Ok(Instruction::Branch {
                cond: Condition::Eq,
                lhs: Operand::Literal(0xff),
                rhs: Operand::Literal(0xa0),
                target: Operand::Literal(0x09),
            })
        );
        assert_eq!(
            decode_one(vec![0x90, 0x04, 0xc5]),
            Ok(Instruction::Bitwise {
                op: BitOp::And,
                dest: Operand::Literal(0x04),
                src: Operand::Literal(0xc5),
            })
        );
    }

    #[test]
    fn ref_keeps_its_size_in_byte_value_operands() {
        assert_eq!(
            decode_one(vec![0xa0, 0xc0, 0xc3, 0x10, 0x01]),
            Ok(Instruction::Arith {
                op: ArithOp::Add,
                lhs: Operand::reference_sized(Width::Word, Operand::Literal(0x10)),
                rhs: Operand::Literal(0x01),
            })
        );
    }

    #[test]
    fn truncated_operand() {
        assert_eq!(decode_one(vec![0xa0, 5]), Err(DecodeError::UnexpectedEnd));
        assert_eq!(decode_one(vec![0xed, 0, 1, 2]), Err(DecodeError::UnexpectedEnd));
        assert_eq!(decode_one(vec![0xff, 0xc0]), Err(DecodeError::UnexpectedEnd));
    }

    #[test]
    fn deeply_nested_operand_is_rejected() {
        let mut bytes = vec![0xfe];
        bytes.extend(std::iter::repeat(0xc0).take(MAX_OPERAND_DEPTH + 1));
        bytes.push(0);
        assert_eq!(
            decode_one(bytes),
            Err(DecodeError::OperandTooDeep(MAX_OPERAND_DEPTH))
        );
    }

    #[test]
    fn decode_sequence_advances_cursor() {
        let program = decode_all(vec![0xfd, 10, 0xfc, 0xfe, 0]).unwrap();
        assert_eq!(
            program,
            vec![
                Instruction::Push {
                    src: Operand::Literal(10)
                },
                Instruction::Pop,
                Instruction::Jump {
                    target: Operand::Literal(0)
                },
            ]
        );
    }

    #[test]
    fn encode_matches_source_bytes() {
        let bytes = vec![
            0xff, 0xc0, 0xc3, 0x10, 0xc4, 0xb0, // MOVE REF WORD 0x10 DWORD TOP
            0xee, 0x04, 0x00, 0xa1, // MOVW 0x04 0x00a1
            0xd1, 0xb0, 0x00, 0x02, // JEQ TOP 0x00 0x02
            0x93, 0xc0, 0x07, // INV REF 0x07
            0xfd, 0xc1, // PUSH INSPTR
        ];
        let mut out = Vec::new();
        for instr in decode_all(bytes.clone()).unwrap() {
            instr.encode(&mut out);
        }
        assert_eq!(out, bytes);
    }

    #[test]
    fn display_renders_assembly() {
        let instr = decode_one(vec![0xff, 0x05, 0xc0, 0xc3, 0x02]).unwrap();
        assert_eq!(instr.to_string(), "MOVE 0x05 REF WORD 0x02");
        let instr = decode_one(vec![0xee, 0x05, 0x00, 0xa1]).unwrap();
        assert_eq!(instr.to_string(), "MOVW 0x05 0x00a1");
        assert_eq!(decode_one(vec![0xfc]).unwrap().to_string(), "POP");
    }

    #[test]
    fn condition_relations() {
        assert!(Condition::Eq.holds(3, 3));
        assert!(Condition::Lt.holds(2, 3));
        assert!(!Condition::Lt.holds(3, 3));
        assert!(Condition::Le.holds(3, 3));
        assert!(Condition::Gt.holds(0xff, 1));
        assert!(Condition::Ge.holds(1, 1));
    }
}
