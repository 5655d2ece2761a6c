//! subvm assembler: bidirectional text ↔ bytecode translation.
//!
//! The assembler is a mechanical 1:1 translation. No labels, no macros.
//!
//! # Usage
//!
//! ```
//! use subvm_assembler::{assemble, disassemble};
//!
//! let text = "PUSH1 0x04\nJUMPSUB\nSTOP\nBEGINSUB\nRETURNSUB\n";
//! let code = assemble(text).unwrap();
//! assert_eq!(code.to_hex(), "6004b300b2b7");
//! assert_eq!(disassemble(&code), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(code)) == code` holds for all code whose last
//! PUSH is not truncated. The assembler accepts non-canonical input
//! (decimal immediates, lowercase mnemonics, short hex).

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use parser::parse_line;
use subvm_common::Code;

/// Assemble text into bytecode.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Code, AsmError> {
    let mut bytes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        if let Some(encoded) = parse_line(&tokens, line_num)? {
            bytes.extend_from_slice(&encoded);
        }
    }

    Ok(Code::new(bytes))
}

/// Disassemble bytecode into canonical assembly text.
pub fn disassemble(code: &Code) -> String {
    disassembler::disassemble(code)
}
