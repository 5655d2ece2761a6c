//! subvm common types and bytecode encoding.
//!
//! This crate provides the foundational data structures shared by the
//! interpreter, the analyzer and the assembler:
//!
//! - [`Opcode`]: the instruction set, including the subroutine extension
//! - [`Code`]: an immutable program with its opcode/data bitmap
//! - [`gas`]: static gas costs
//! - [`U256`]: the data stack word
//! - [`CodeError`]: errors from decoding input

pub mod code;
pub mod error;
pub mod gas;
pub mod opcode;

pub use code::{Code, InstructionRef};
pub use error::CodeError;
pub use opcode::{all_opcodes, Opcode};
pub use primitive_types::U256;

/// Convert a stack word to a code offset, if it fits in `usize`.
pub fn word_to_offset(word: U256) -> Option<usize> {
    if word > U256::from(usize::MAX) {
        None
    } else {
        Some(word.as_usize())
    }
}
