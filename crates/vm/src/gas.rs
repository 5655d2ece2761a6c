//! Gas accounting for one execution context.

/// Tracks the remaining gas budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gasometer {
    limit: u64,
    remaining: u64,
}

/// Returned when a charge exceeds the remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfGas;

impl Gasometer {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Deduct `cost`. On failure the budget is left as it was.
    pub fn charge(&mut self, cost: u64) -> Result<(), OutOfGas> {
        self.remaining = self.remaining.checked_sub(cost).ok_or(OutOfGas)?;
        Ok(())
    }

    /// Consume everything that is left.
    pub fn exhaust(&mut self) {
        self.remaining = 0;
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn used(&self) -> u64 {
        self.limit - self.remaining
    }
}
