//! Parser for Lux assembly tokens → instructions.
//!
//! Operands are written with the same grammar the decoder reads:
//! numbers are literals, `TOP` and `INSPTR` are markers, and `REF` or a
//! size name prefixes another operand. Byte-value operands take any
//! number except the `TOP`, `REF` and `INSPTR` bytes, and no size prefix.

use crate::error::AsmError;
use crate::lexer::Token;
use lux_common::instruction::MAX_OPERAND_DEPTH;
use lux_common::{ArithOp, BitOp, Condition, Instruction, Opcode, Operand, Value, Width};

/// Result of parsing a single assembly line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ParseResult {
    /// One instruction.
    Instruction(Instruction),
    /// Raw bytes from a `DB` directive.
    Data(Vec<u8>),
}

/// Parse a sequence of tokens from a single line.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(tokens: &[Token], line: usize) -> Result<Option<ParseResult>, AsmError> {
    let (first, rest) = match tokens.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        Token::Number(_) => {
            return Err(AsmError::UnexpectedToken {
                line,
                token: first.text(),
            })
        }
    };

    if mnemonic == "DB" {
        return parse_data(rest, line).map(|bytes| Some(ParseResult::Data(bytes)));
    }

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
        line,
        token: mnemonic.to_string(),
    })?;

    let mut p = Parser {
        tokens: rest,
        pos: 0,
        line,
        mnemonic: opcode.mnemonic(),
        expected: operand_count(opcode),
    };

    let instr = match opcode {
        Opcode::Move => Instruction::Move {
            dest: p.expect_operand()?,
            src: p.expect_operand()?,
        },
        Opcode::Jmp => Instruction::Jump {
            target: p.expect_operand()?,
        },
        Opcode::Push => Instruction::Push {
            src: p.expect_push_byte()?,
        },
        Opcode::Pop => Instruction::Pop,
        Opcode::Inv => Instruction::Invert {
            dest: p.expect_operand()?,
        },
        Opcode::Top
        | Opcode::Ref
        | Opcode::InsPtr
        | Opcode::Byte
        | Opcode::Word
        | Opcode::DWord
        | Opcode::QWord => {
            return Err(AsmError::UnexpectedToken {
                line,
                token: mnemonic.to_string(),
            })
        }
        _ => {
            if let Some(width) = opcode.immediate_width() {
                Instruction::Load {
                    dest: p.expect_operand()?,
                    value: p.expect_immediate(width)?,
                }
            } else if let Some(op) = ArithOp::from_opcode(opcode) {
                Instruction::Arith {
                    op,
                    lhs: p.expect_value()?,
                    rhs: p.expect_value()?,
                }
            } else if let Some(cond) = Condition::from_compare(opcode) {
                Instruction::Compare {
                    cond,
                    lhs: p.expect_value()?,
                    rhs: p.expect_value()?,
                }
            } else if let Some(cond) = Condition::from_branch(opcode) {
                Instruction::Branch {
                    cond,
                    lhs: p.expect_value()?,
                    rhs: p.expect_value()?,
                    target: p.expect_operand()?,
                }
            } else if let Some(op) = BitOp::from_opcode(opcode) {
                Instruction::Bitwise {
                    op,
                    dest: p.expect_operand()?,
                    src: p.expect_value()?,
                }
            } else {
                return Err(AsmError::UnknownMnemonic {
                    line,
                    token: mnemonic.to_string(),
                });
            }
        }
    };

    p.expect_end()?;
    Ok(Some(ParseResult::Instruction(instr)))
}

/// Number of operands written after the mnemonic.
fn operand_count(opcode: Opcode) -> usize {
    match opcode {
        Opcode::Pop => 0,
        Opcode::Jmp | Opcode::Push | Opcode::Inv => 1,
        Opcode::Jeq | Opcode::Jlt | Opcode::Jle | Opcode::Jgt | Opcode::Jge => 3,
        _ => 2,
    }
}

/// `DB n...`: one or more raw bytes.
fn parse_data(args: &[Token], line: usize) -> Result<Vec<u8>, AsmError> {
    if args.is_empty() {
        return Err(AsmError::MissingOperand {
            line,
            mnemonic: "DB",
            expected: 1,
        });
    }
    args.iter()
        .map(|tok| match tok {
            Token::Number(n) => u8::try_from(*n).map_err(|_| AsmError::InvalidNumber {
                line,
                token: n.to_string(),
            }),
            Token::Ident(s) => Err(AsmError::UnexpectedToken {
                line,
                token: s.clone(),
            }),
        })
        .collect()
}

/// Cursor over the operand tokens of one line.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    line: usize,
    mnemonic: &'static str,
    expected: usize,
}

impl<'t> Parser<'t> {
    fn next(&mut self) -> Result<&'t Token, AsmError> {
        let tokens = self.tokens;
        let tok = tokens.get(self.pos).ok_or(AsmError::MissingOperand {
            line: self.line,
            mnemonic: self.mnemonic,
            expected: self.expected,
        })?;
        self.pos += 1;
        Ok(tok)
    }

    fn peek_ident(&self) -> Option<&'t str> {
        match self.tokens.get(self.pos) {
            Some(Token::Ident(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn expect_operand(&mut self) -> Result<Operand, AsmError> {
        self.operand(0)
    }

    fn operand(&mut self, depth: usize) -> Result<Operand, AsmError> {
        if depth >= MAX_OPERAND_DEPTH {
            return Err(AsmError::OperandTooDeep {
                line: self.line,
                limit: MAX_OPERAND_DEPTH,
            });
        }
        let line = self.line;
        match self.next()? {
            Token::Number(n) => {
                let byte = self.expect_byte(*n)?;
                match Opcode::lookup(byte) {
                    Some(opcode) => Err(AsmError::AmbiguousLiteral {
                        line,
                        value: byte,
                        opcode,
                    }),
                    None => Ok(Operand::Literal(byte)),
                }
            }
            Token::Ident(name) => match name.as_str() {
                "TOP" => Ok(Operand::Top),
                "INSPTR" => Ok(Operand::InsPtr),
                "REF" => {
                    let width = self.peek_ident().and_then(size_width);
                    if width.is_some() {
                        self.pos += 1;
                    }
                    let inner = self.operand(depth + 1)?;
                    Ok(Operand::Ref {
                        width,
                        inner: Box::new(inner),
                    })
                }
                other => match size_width(other) {
                    Some(width) => {
                        let inner = self.operand(depth + 1)?;
                        Ok(Operand::sized(width, inner))
                    }
                    None => Err(AsmError::UnexpectedToken {
                        line,
                        token: other.to_string(),
                    }),
                },
            },
        }
    }

    /// An operand read as a byte value.
    fn expect_value(&mut self) -> Result<Operand, AsmError> {
        let line = self.line;
        let tokens = self.tokens;
        match tokens.get(self.pos) {
            Some(Token::Number(n)) => {
                self.pos += 1;
                let byte = self.expect_byte(*n)?;
                match Opcode::lookup(byte) {
                    Some(opcode) if opcode.is_value_marker() => Err(AsmError::AmbiguousLiteral {
                        line,
                        value: byte,
                        opcode,
                    }),
                    _ => Ok(Operand::Literal(byte)),
                }
            }
            Some(Token::Ident(name)) if size_width(name).is_some() => {
                Err(AsmError::UnexpectedToken {
                    line,
                    token: name.clone(),
                })
            }
            _ => self.operand(0),
        }
    }

    /// PUSH takes a raw byte, or `INSPTR`.
    fn expect_push_byte(&mut self) -> Result<Operand, AsmError> {
        let line = self.line;
        match self.next()? {
            Token::Number(n) => {
                let byte = self.expect_byte(*n)?;
                if byte == Opcode::InsPtr.code() {
                    return Err(AsmError::AmbiguousLiteral {
                        line,
                        value: byte,
                        opcode: Opcode::InsPtr,
                    });
                }
                Ok(Operand::Literal(byte))
            }
            Token::Ident(s) if s == "INSPTR" => Ok(Operand::InsPtr),
            Token::Ident(s) => Err(AsmError::UnexpectedToken {
                line,
                token: s.clone(),
            }),
        }
    }

    fn expect_immediate(&mut self, width: Width) -> Result<Value, AsmError> {
        let line = self.line;
        match self.next()? {
            Token::Number(n) if *n <= width.mask() => Ok(Value::from_u64(width, *n)),
            Token::Number(n) => Err(AsmError::InvalidNumber {
                line,
                token: n.to_string(),
            }),
            Token::Ident(s) => Err(AsmError::UnexpectedToken {
                line,
                token: s.clone(),
            }),
        }
    }

    fn expect_byte(&self, n: u64) -> Result<u8, AsmError> {
        u8::try_from(n).map_err(|_| AsmError::InvalidNumber {
            line: self.line,
            token: n.to_string(),
        })
    }

    /// Check that there are no extra tokens.
    fn expect_end(&self) -> Result<(), AsmError> {
        match self.tokens.get(self.pos) {
            Some(tok) => Err(AsmError::UnexpectedToken {
                line: self.line,
                token: tok.text(),
            }),
            None => Ok(()),
        }
    }
}

fn size_width(name: &str) -> Option<Width> {
    Opcode::from_mnemonic(name).and_then(Opcode::width)
}
