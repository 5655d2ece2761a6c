//! Opcode definitions for the subvm instruction set.
//!
//! Byte assignments follow the EVM. The subroutine extension occupies
//! `0xb2` (BEGINSUB), `0xb3` (JUMPSUB) and `0xb7` (RETURNSUB).

use crate::error::CodeError;
use crate::gas;

/// Identifies the operation to perform.
///
/// The `PUSH`, `DUP` and `SWAP` families carry their width/depth
/// (1-based) instead of having one variant per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Halting
    /// Halt execution successfully.
    Stop,

    // Arithmetic
    /// Pop a, b; push a + b (wrapping).
    Add,
    /// Pop a, b; push a * b (wrapping).
    Mul,
    /// Pop a, b; push a - b (wrapping).
    Sub,
    /// Pop a, b; push a / b, or 0 when b is 0.
    Div,
    /// Pop a, b; push a % b, or 0 when b is 0.
    Mod,

    // Comparison & Bitwise
    /// Pop a, b; push 1 if a < b.
    Lt,
    /// Pop a, b; push 1 if a > b.
    Gt,
    /// Pop a, b; push 1 if a == b.
    Eq,
    /// Pop a; push 1 if a == 0.
    IsZero,
    And,
    Or,
    Xor,
    Not,

    // Stack & Flow
    /// Discard the top of the data stack.
    Pop,
    /// Pop a destination; continue at it. Target must be a JUMPDEST.
    Jump,
    /// Pop a destination and a condition; jump if the condition is non-zero.
    JumpI,
    /// Push the offset of this instruction.
    Pc,
    /// Push the gas remaining after this instruction is charged.
    Gas,
    /// Marks a valid target for JUMP/JUMPI.
    JumpDest,

    /// Push the next `n` bytes (1..=32) as a big-endian word.
    Push(u8),
    /// Duplicate the `n`th (1..=16) stack item.
    Dup(u8),
    /// Swap the top with the `n + 1`th (1..=16) stack item.
    Swap(u8),

    // Subroutines
    /// Subroutine entry marker. Faults when reached by sequential flow.
    BeginSub,
    /// Pop a location; push the return address; enter the subroutine.
    JumpSub,
    /// Pop the return stack and continue there.
    ReturnSub,
}

const PUSH_MNEMONICS: [&str; 32] = [
    "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9", "PUSH10",
    "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18", "PUSH19",
    "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27", "PUSH28",
    "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_MNEMONICS: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_MNEMONICS: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

impl TryFrom<u8> for Opcode {
    type Error = CodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Opcode::Stop),
            0x01 => Ok(Opcode::Add),
            0x02 => Ok(Opcode::Mul),
            0x03 => Ok(Opcode::Sub),
            0x04 => Ok(Opcode::Div),
            0x06 => Ok(Opcode::Mod),

            0x10 => Ok(Opcode::Lt),
            0x11 => Ok(Opcode::Gt),
            0x14 => Ok(Opcode::Eq),
            0x15 => Ok(Opcode::IsZero),
            0x16 => Ok(Opcode::And),
            0x17 => Ok(Opcode::Or),
            0x18 => Ok(Opcode::Xor),
            0x19 => Ok(Opcode::Not),

            0x50 => Ok(Opcode::Pop),
            0x56 => Ok(Opcode::Jump),
            0x57 => Ok(Opcode::JumpI),
            0x58 => Ok(Opcode::Pc),
            0x5a => Ok(Opcode::Gas),
            0x5b => Ok(Opcode::JumpDest),

            0x60..=0x7f => Ok(Opcode::Push(value - 0x5f)),
            0x80..=0x8f => Ok(Opcode::Dup(value - 0x7f)),
            0x90..=0x9f => Ok(Opcode::Swap(value - 0x8f)),

            0xb2 => Ok(Opcode::BeginSub),
            0xb3 => Ok(Opcode::JumpSub),
            0xb7 => Ok(Opcode::ReturnSub),

            _ => Err(CodeError::UndefinedOpcode(value)),
        }
    }
}

impl Opcode {
    /// The byte encoding of this opcode.
    pub fn byte(&self) -> u8 {
        match *self {
            Opcode::Stop => 0x00,
            Opcode::Add => 0x01,
            Opcode::Mul => 0x02,
            Opcode::Sub => 0x03,
            Opcode::Div => 0x04,
            Opcode::Mod => 0x06,
            Opcode::Lt => 0x10,
            Opcode::Gt => 0x11,
            Opcode::Eq => 0x14,
            Opcode::IsZero => 0x15,
            Opcode::And => 0x16,
            Opcode::Or => 0x17,
            Opcode::Xor => 0x18,
            Opcode::Not => 0x19,
            Opcode::Pop => 0x50,
            Opcode::Jump => 0x56,
            Opcode::JumpI => 0x57,
            Opcode::Pc => 0x58,
            Opcode::Gas => 0x5a,
            Opcode::JumpDest => 0x5b,
            Opcode::Push(n) => 0x5f + n,
            Opcode::Dup(n) => 0x7f + n,
            Opcode::Swap(n) => 0x8f + n,
            Opcode::BeginSub => 0xb2,
            Opcode::JumpSub => 0xb3,
            Opcode::ReturnSub => 0xb7,
        }
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match *self {
            Opcode::Stop => "STOP",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Sub => "SUB",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::IsZero => "ISZERO",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Not => "NOT",
            Opcode::Pop => "POP",
            Opcode::Jump => "JUMP",
            Opcode::JumpI => "JUMPI",
            Opcode::Pc => "PC",
            Opcode::Gas => "GAS",
            Opcode::JumpDest => "JUMPDEST",
            Opcode::Push(n) => PUSH_MNEMONICS[n as usize - 1],
            Opcode::Dup(n) => DUP_MNEMONICS[n as usize - 1],
            Opcode::Swap(n) => SWAP_MNEMONICS[n as usize - 1],
            Opcode::BeginSub => "BEGINSUB",
            Opcode::JumpSub => "JUMPSUB",
            Opcode::ReturnSub => "RETURNSUB",
        }
    }

    /// Look up an opcode by its (uppercase) mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        all_opcodes().find(|op| op.mnemonic() == mnemonic)
    }

    /// Number of immediate bytes following the opcode byte.
    pub fn immediate_len(&self) -> usize {
        match *self {
            Opcode::Push(n) => n as usize,
            _ => 0,
        }
    }

    /// Number of data-stack items this opcode requires.
    pub fn stack_inputs(&self) -> usize {
        match *self {
            Opcode::Stop
            | Opcode::Pc
            | Opcode::Gas
            | Opcode::JumpDest
            | Opcode::Push(_)
            | Opcode::BeginSub
            | Opcode::ReturnSub => 0,
            Opcode::IsZero | Opcode::Not | Opcode::Pop | Opcode::Jump | Opcode::JumpSub => 1,
            Opcode::Add
            | Opcode::Mul
            | Opcode::Sub
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::JumpI => 2,
            Opcode::Dup(n) => n as usize,
            Opcode::Swap(n) => n as usize + 1,
        }
    }

    /// Number of data-stack items this opcode leaves in place of its inputs.
    pub fn stack_outputs(&self) -> usize {
        match *self {
            Opcode::Stop
            | Opcode::Pop
            | Opcode::Jump
            | Opcode::JumpI
            | Opcode::JumpDest
            | Opcode::BeginSub
            | Opcode::JumpSub
            | Opcode::ReturnSub => 0,
            Opcode::Add
            | Opcode::Mul
            | Opcode::Sub
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::IsZero
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Pc
            | Opcode::Gas
            | Opcode::Push(_) => 1,
            Opcode::Dup(n) => n as usize + 1,
            Opcode::Swap(n) => n as usize + 1,
        }
    }

    /// Fixed gas charged when the opcode is dispatched.
    pub fn static_gas(&self) -> u64 {
        match *self {
            Opcode::Stop => gas::ZERO,
            Opcode::JumpDest => gas::JUMPDEST,
            Opcode::Pc | Opcode::Gas | Opcode::Pop => gas::BASE,
            Opcode::Add
            | Opcode::Sub
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::IsZero
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Push(_)
            | Opcode::Dup(_)
            | Opcode::Swap(_) => gas::VERYLOW,
            Opcode::Mul | Opcode::Div | Opcode::Mod => gas::LOW,
            Opcode::Jump => gas::MID,
            Opcode::JumpI => gas::HIGH,
            Opcode::BeginSub => gas::BEGINSUB,
            Opcode::JumpSub => gas::JUMPSUB,
            Opcode::ReturnSub => gas::RETURNSUB,
        }
    }

    /// True if execution never continues to the next sequential instruction.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Opcode::Stop | Opcode::Jump | Opcode::ReturnSub)
    }
}

/// Iterate over every defined opcode in byte order.
pub fn all_opcodes() -> impl Iterator<Item = Opcode> {
    (0..=u8::MAX).filter_map(|byte| Opcode::try_from(byte).ok())
}
