//! Disassembler: bytecode → canonical assembly text.
//!
//! One instruction per line, no indentation. PUSH immediates are written
//! as hex at the full width of the opcode. Bytes with no opcode are
//! written as `INVALID 0xNN`.

use crate::parser::INVALID_MNEMONIC;
use subvm_common::Code;

/// Disassemble a program into canonical assembly text.
pub fn disassemble(code: &Code) -> String {
    let mut lines = Vec::new();

    for instr in code.instructions() {
        let line = match instr.opcode {
            None => format!("{INVALID_MNEMONIC} 0x{:02x}", instr.byte),
            Some(op) if op.immediate_len() == 0 => op.mnemonic().to_string(),
            Some(op) => {
                let mut line = format!("{} 0x{}", op.mnemonic(), hex_digits(instr.immediate));
                if instr.is_truncated() {
                    line.push_str(" ; truncated");
                }
                line
            }
        };
        lines.push(line);
    }

    let mut result = lines.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

fn hex_digits(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "0".to_string();
    }
    hex::encode(bytes)
}
