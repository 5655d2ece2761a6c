//! Execution limits.

/// Maximum data stack depth.
pub const MAX_STACK_DEPTH: usize = 1024;

/// Default gas budget for one execution context.
pub const DEFAULT_GAS_LIMIT: u64 = 10_000_000;

/// Limits applied to one execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Gas available to the context.
    pub gas_limit: u64,
    /// Maximum data stack depth.
    pub stack_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            stack_limit: MAX_STACK_DEPTH,
        }
    }
}

impl Config {
    /// Default limits with the given gas budget.
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self {
            gas_limit,
            ..Self::default()
        }
    }
}
