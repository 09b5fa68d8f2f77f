//! Opcode table for the Lux instruction set.
//!
//! Every mnemonic maps to one byte. The same bytes double as addressing
//! and size markers when they appear where an operand is expected; see
//! [`Token`] for how an operand byte is classified.

use crate::error::DecodeError;
use crate::value::Width;

/// A one-byte code from the opcode table.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Move
    /// Memory-to-memory move. Operands: destination, source.
    Move = 0xff,
    /// Store a 1-byte immediate. Operands: destination, immediate.
    Movb = 0xef,
    /// Store a 2-byte immediate.
    Movw = 0xee,
    /// Store a 4-byte immediate.
    Movd = 0xed,
    /// Store an 8-byte immediate.
    Movq = 0xec,

    // Control
    /// Unconditional jump. Operand: literal offset or TOP.
    Jmp = 0xfe,

    // Stack
    /// Push one byte.
    Push = 0xfd,
    /// Discard the top byte.
    Pop = 0xfc,
    /// Marker: the current stack-top byte.
    Top = 0xb0,

    // Arithmetic
    /// Push `lhs + rhs` (wrapping).
    Add = 0xa0,
    /// Push `lhs - rhs` (wrapping).
    Sub = 0xa1,
    /// Push `lhs * rhs` (wrapping).
    Mul = 0xa2,
    /// Push `lhs / rhs`. A zero divisor is a runtime error.
    Div = 0xa3,

    // Addressing and size markers
    /// Marker: memory at the following operand's address.
    Ref = 0xc0,
    /// Marker: the current instruction pointer.
    InsPtr = 0xc1,
    /// Marker: byte-wide access.
    Byte = 0xc2,
    /// Marker: word-wide access.
    Word = 0xc3,
    /// Marker: double-word-wide access.
    DWord = 0xc4,
    /// Marker: quad-word-wide access.
    QWord = 0xc5,

    // Comparison
    /// Push 1 if `lhs == rhs`, else 0.
    Cmp = 0xc6,
    /// Push 1 if `lhs <= rhs`, else 0.
    Le = 0xc7,
    /// Push 1 if `lhs < rhs`, else 0.
    Lt = 0xc8,
    /// Push 1 if `lhs >= rhs`, else 0.
    Ge = 0xc9,
    /// Push 1 if `lhs > rhs`, else 0.
    Gt = 0xca,

    // Conditional jump
    /// Jump to the third operand if `lhs == rhs`.
    Jeq = 0xd1,
    /// Jump if `lhs < rhs`.
    Jlt = 0xd2,
    /// Jump if `lhs <= rhs`.
    Jle = 0xd3,
    /// Jump if `lhs > rhs`.
    Jgt = 0xd4,
    /// Jump if `lhs >= rhs`.
    Jge = 0xd5,

    // Bitwise
    /// `dest &= src`
    And = 0x90,
    /// `dest |= src`
    Or = 0x91,
    /// `dest ^= src`
    Xor = 0x92,
    /// `dest = !dest`
    Inv = 0x93,
    /// `dest >>= src`
    Shr = 0x94,
    /// `dest <<= src`
    Shl = 0x95,
}

/// All opcodes, in table order.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::Move,
    Opcode::Movb,
    Opcode::Movw,
    Opcode::Movd,
    Opcode::Movq,
    Opcode::Jmp,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Top,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Ref,
    Opcode::InsPtr,
    Opcode::Byte,
    Opcode::Word,
    Opcode::DWord,
    Opcode::QWord,
    Opcode::Cmp,
    Opcode::Le,
    Opcode::Lt,
    Opcode::Ge,
    Opcode::Gt,
    Opcode::Jeq,
    Opcode::Jlt,
    Opcode::Jle,
    Opcode::Jgt,
    Opcode::Jge,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Inv,
    Opcode::Shr,
    Opcode::Shl,
];

/// Direct byte → opcode lookup, built once at compile time.
const TABLE: [Option<Opcode>; 256] = {
    let mut table = [None; 256];
    let mut i = 0;
    while i < ALL_OPCODES.len() {
        let op = ALL_OPCODES[i];
        table[op as usize] = Some(op);
        i += 1;
    }
    table
};

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Opcode::lookup(value).ok_or(DecodeError::InvalidOpcode(value))
    }
}

impl Opcode {
    /// Look up a byte in the opcode table.
    pub const fn lookup(byte: u8) -> Option<Opcode> {
        TABLE[byte as usize]
    }

    /// The byte code of this opcode.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true for the addressing and size markers.
    ///
    /// These never execute as instructions.
    pub const fn is_marker(self) -> bool {
        matches!(
            self,
            Opcode::Top
                | Opcode::Ref
                | Opcode::InsPtr
                | Opcode::Byte
                | Opcode::Word
                | Opcode::DWord
                | Opcode::QWord
        )
    }

    /// Returns true for the markers that keep their meaning where an
    /// operand is read as a byte value: `TOP`, `REF` and `INSPTR`.
    pub const fn is_value_marker(self) -> bool {
        matches!(self, Opcode::Top | Opcode::Ref | Opcode::InsPtr)
    }

    /// Access width named by a size marker.
    pub const fn width(self) -> Option<Width> {
        match self {
            Opcode::Byte => Some(Width::Byte),
            Opcode::Word => Some(Width::Word),
            Opcode::DWord => Some(Width::DoubleWord),
            Opcode::QWord => Some(Width::QuadWord),
            _ => None,
        }
    }

    /// The size marker naming a width.
    pub const fn size_marker(width: Width) -> Opcode {
        match width {
            Width::Byte => Opcode::Byte,
            Width::Word => Opcode::Word,
            Width::DoubleWord => Opcode::DWord,
            Width::QuadWord => Opcode::QWord,
        }
    }

    /// The immediate move storing a value of this width.
    pub const fn immediate_move(width: Width) -> Opcode {
        match width {
            Width::Byte => Opcode::Movb,
            Width::Word => Opcode::Movw,
            Width::DoubleWord => Opcode::Movd,
            Width::QuadWord => Opcode::Movq,
        }
    }

    /// Width of the immediate an immediate move carries.
    pub const fn immediate_width(self) -> Option<Width> {
        match self {
            Opcode::Movb => Some(Width::Byte),
            Opcode::Movw => Some(Width::Word),
            Opcode::Movd => Some(Width::DoubleWord),
            Opcode::Movq => Some(Width::QuadWord),
            _ => None,
        }
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::Movb => "MOVB",
            Opcode::Movw => "MOVW",
            Opcode::Movd => "MOVD",
            Opcode::Movq => "MOVQ",
            Opcode::Jmp => "JMP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Top => "TOP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Ref => "REF",
            Opcode::InsPtr => "INSPTR",
            Opcode::Byte => "BYTE",
            Opcode::Word => "WORD",
            Opcode::DWord => "DWORD",
            Opcode::QWord => "QWORD",
            Opcode::Cmp => "CMP",
            Opcode::Le => "LE",
            Opcode::Lt => "LT",
            Opcode::Ge => "GE",
            Opcode::Gt => "GT",
            Opcode::Jeq => "JEQ",
            Opcode::Jlt => "JLT",
            Opcode::Jle => "JLE",
            Opcode::Jgt => "JGT",
            Opcode::Jge => "JGE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Inv => "INV",
            Opcode::Shr => "SHR",
            Opcode::Shl => "SHL",
        }
    }

    /// Find the opcode with the given (uppercase) mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }
}

/// Classification of a byte read in operand position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Not in the opcode table: an address or immediate byte.
    Literal(u8),
    /// In the opcode table: its meaning is decided by the marker.
    Marker(Opcode),
}

impl Token {
    /// Classify an operand byte against the opcode table.
    pub const fn classify(byte: u8) -> Token {
        match Opcode::lookup(byte) {
            Some(op) => Token::Marker(op),
            None => Token::Literal(byte),
        }
    }

    /// Classify a byte-value operand. Only value markers are markers here;
    /// size markers and instruction codes are literals.
    pub const fn classify_value(byte: u8) -> Token {
        match Opcode::lookup(byte) {
            Some(op) if op.is_value_marker() => Token::Marker(op),
            _ => Token::Literal(byte),
        }
    }
}
