//! Disassembler: bytecode → canonical assembly text.
//!
//! One instruction per line, no comments. Bytes that do not start a
//! decodable instruction are emitted as `DB` lines, so any byte stream
//! survives a disassemble/assemble round trip.

use lux_common::{Executable, Instruction};

/// Disassemble a program into canonical assembly text.
pub fn disassemble(program: &Executable) -> String {
    let mut exe = Executable::new(program.as_bytes().to_vec());
    let mut out = String::new();
    let mut data: Vec<u8> = Vec::new();

    while exe.has_next() {
        let start = exe.ip();
        match Instruction::decode(&mut exe) {
            Ok(instr) => {
                flush_data(&mut out, &mut data);
                out.push_str(&instr.to_string());
                out.push('\n');
            }
            Err(_) => {
                // Resume decoding at the next byte.
                if exe.jump(start).is_err() {
                    break;
                }
                match exe.next() {
                    Ok(b) => data.push(b),
                    Err(_) => break,
                }
            }
        }
    }
    flush_data(&mut out, &mut data);

    out
}

fn flush_data(out: &mut String, data: &mut Vec<u8>) {
    if data.is_empty() {
        return;
    }
    out.push_str("DB");
    for b in data.drain(..) {
        out.push_str(&format!(" {b:#04x}"));
    }
    out.push('\n');
}
