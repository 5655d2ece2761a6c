//! Static gas costs.
//!
//! Host opcodes use the EVM tiers. The subroutine opcodes have their own
//! fixed costs.

pub const ZERO: u64 = 0;
pub const JUMPDEST: u64 = 1;
pub const BASE: u64 = 2;
pub const VERYLOW: u64 = 3;
pub const LOW: u64 = 5;
pub const MID: u64 = 8;
pub const HIGH: u64 = 10;

/// Charged when BEGINSUB is dispatched, and when JUMPSUB lands on it.
pub const BEGINSUB: u64 = 1;
pub const JUMPSUB: u64 = 8;
pub const RETURNSUB: u64 = 2;
