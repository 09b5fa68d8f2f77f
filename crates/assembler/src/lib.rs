//! Lux assembler: text assembly ↔ bytecode.
//!
//! The assembler is a mechanical 1:1 translation. No labels, no macros.
//!
//! # Usage
//!
//! ```
//! use lux_assembler::{assemble, disassemble};
//!
//! let text = "PUSH 0x0a\nADD TOP 0x03\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.as_bytes(), &[0xfd, 0x0a, 0xa0, 0xb0, 0x03]);
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program))` reproduces the same bytes for every byte
//! stream. The disassembler outputs canonical text; the assembler also
//! accepts decimal numbers, lowercase names and comma separators.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use lux_common::Executable;
use parser::{parse_line, ParseResult};

/// Assemble text into a program.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Executable, AsmError> {
    let mut bytes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        match parse_line(&tokens, line_num)? {
            Some(ParseResult::Instruction(instr)) => instr.encode(&mut bytes),
            Some(ParseResult::Data(data)) => bytes.extend_from_slice(&data),
            None => {}
        }
    }

    Ok(Executable::new(bytes))
}

/// Disassemble a program into canonical assembly text.
///
/// One instruction per line; undecodable bytes appear as `DB` lines.
pub fn disassemble(program: &Executable) -> String {
    disassembler::disassemble(program)
}
