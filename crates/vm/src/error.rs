//! Runtime errors for the subvm interpreter.
//!
//! Every error aborts the current execution context. Each variant records
//! the program counter (`at`) of the instruction that raised it; the
//! display string is the bare reason so it can be placed in an abort
//! record next to the pc and mnemonic.

use subvm_common::U256;
use thiserror::Error;

/// Errors that abort program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// JUMP/JUMPI target is not a JUMPDEST, or JUMPSUB target is not a
    /// BEGINSUB (or either is outside the code).
    #[error("invalid jump destination")]
    InvalidJumpDestination { at: usize, dest: U256 },

    /// JUMPSUB with the return stack already full.
    #[error("return stack limit reached")]
    ReturnStackOverflow { at: usize },

    /// RETURNSUB with an empty return stack.
    #[error("invalid retsub")]
    ReturnStackUnderflow { at: usize },

    /// Gas exhausted, including the forced exhaustion of a fall-through BEGINSUB.
    #[error("out of gas")]
    OutOfGas { at: usize },

    /// Instruction needs more data-stack items than are present.
    #[error("stack underflow (have {len}, need {required})")]
    StackUnderflow {
        at: usize,
        len: usize,
        required: usize,
    },

    /// Instruction would grow the data stack past its limit.
    #[error("stack limit reached {limit}")]
    StackOverflow { at: usize, limit: usize },

    /// Byte is not an assigned opcode.
    #[error("invalid opcode {byte:#04x}")]
    InvalidOpcode { at: usize, byte: u8 },
}

impl RuntimeError {
    /// Program counter of the instruction that raised the error.
    pub fn at(&self) -> usize {
        match *self {
            RuntimeError::InvalidJumpDestination { at, .. }
            | RuntimeError::ReturnStackOverflow { at }
            | RuntimeError::ReturnStackUnderflow { at }
            | RuntimeError::OutOfGas { at }
            | RuntimeError::StackUnderflow { at, .. }
            | RuntimeError::StackOverflow { at, .. }
            | RuntimeError::InvalidOpcode { at, .. } => at,
        }
    }
}
