//! The bounded return-address stack used by JUMPSUB/RETURNSUB.
//!
//! One instance belongs to exactly one execution context. Entries are
//! always produced by the interpreter (the address after a JUMPSUB), so
//! popped values are trusted without re-validation.

use thiserror::Error;

/// Maximum number of return addresses.
pub const RETURN_STACK_LIMIT: usize = 1023;

/// Failure of a return stack operation. Nothing is mutated on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReturnStackError {
    #[error("return stack full")]
    Overflow,
    #[error("return stack empty")]
    Underflow,
}

/// A LIFO of program counter values, capped at [`RETURN_STACK_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnStack {
    entries: Vec<usize>,
}

impl ReturnStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a return address. Fails without mutation when full.
    pub fn push(&mut self, pc: usize) -> Result<(), ReturnStackError> {
        if self.entries.len() >= RETURN_STACK_LIMIT {
            return Err(ReturnStackError::Overflow);
        }
        self.entries.push(pc);
        Ok(())
    }

    /// Pop the most recent return address.
    pub fn pop(&mut self) -> Result<usize, ReturnStackError> {
        self.entries.pop().ok_or(ReturnStackError::Underflow)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries bottom first. Used for traces only.
    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }
}
