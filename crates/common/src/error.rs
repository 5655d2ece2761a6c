//! Errors for decoding subvm bytecode.

use thiserror::Error;

/// Errors that occur while turning raw input into bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Byte value is not assigned to any instruction.
    #[error("undefined opcode: {0:#04x}")]
    UndefinedOpcode(u8),

    /// Hex text could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for CodeError {
    fn from(err: hex::FromHexError) -> Self {
        CodeError::InvalidHex(err.to_string())
    }
}
