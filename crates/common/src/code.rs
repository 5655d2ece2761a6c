//! The code buffer: an immutable byte program plus its jump analysis.
//!
//! Offsets covered by PUSH immediates are data, not instructions. The
//! bitmap computed at construction is what makes `JUMPDEST`/`BEGINSUB`
//! bytes hidden inside push data invalid as targets.

use std::fmt;

use crate::error::CodeError;
use crate::opcode::Opcode;

/// An immutable program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    bytes: Vec<u8>,
    /// `true` where the byte at that offset is an opcode.
    is_opcode: Vec<bool>,
}

/// One decoded instruction position within a [`Code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionRef<'a> {
    /// Offset of the opcode byte.
    pub offset: usize,
    /// The raw opcode byte.
    pub byte: u8,
    /// The decoded opcode, or `None` for an undefined byte.
    pub opcode: Option<Opcode>,
    /// Immediate bytes. Shorter than `immediate_len()` if the code ends early.
    pub immediate: &'a [u8],
}

impl InstructionRef<'_> {
    /// True if the immediate ran past the end of the code.
    pub fn is_truncated(&self) -> bool {
        self.opcode
            .is_some_and(|op| self.immediate.len() < op.immediate_len())
    }

    /// Offset of the next instruction.
    pub fn next_offset(&self) -> usize {
        self.offset + 1 + self.immediate.len()
    }
}

impl Code {
    /// Wrap raw bytes, computing the opcode bitmap.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let is_opcode = analyze_opcodes(&bytes);
        Self { bytes, is_opcode }
    }

    /// Parse hex text. Surrounding whitespace and a `0x` prefix are accepted.
    pub fn from_hex(text: &str) -> Result<Self, CodeError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        Ok(Self::new(hex::decode(digits)?))
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bounds-checked byte lookup.
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// True if `offset` is inside the code and holds an opcode, not push data.
    pub fn is_opcode_offset(&self, offset: usize) -> bool {
        self.is_opcode.get(offset).copied().unwrap_or(false)
    }

    /// Up to `len` bytes starting at `offset`, clipped to the end of code.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        let start = offset.min(self.bytes.len());
        let end = offset.saturating_add(len).min(self.bytes.len());
        &self.bytes[start..end]
    }

    /// Valid target for JUMP/JUMPI: an opcode byte that is `JUMPDEST`.
    pub fn is_valid_jump_destination(&self, offset: usize) -> bool {
        self.is_marker(offset, Opcode::JumpDest)
    }

    /// Valid target for JUMPSUB: in bounds, an opcode byte, and `BEGINSUB`.
    pub fn is_valid_subroutine_entry(&self, offset: usize) -> bool {
        self.is_marker(offset, Opcode::BeginSub)
    }

    fn is_marker(&self, offset: usize, marker: Opcode) -> bool {
        self.is_opcode_offset(offset) && self.bytes[offset] == marker.byte()
    }

    /// Iterate over instruction positions in order, skipping immediates.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            code: self,
            offset: 0,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl From<Vec<u8>> for Code {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Iterator returned by [`Code::instructions`].
pub struct Instructions<'a> {
    code: &'a Code,
    offset: usize,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = InstructionRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.code.get(self.offset)?;
        let opcode = Opcode::try_from(byte).ok();
        let imm_len = opcode.map_or(0, |op| op.immediate_len());
        let item = InstructionRef {
            offset: self.offset,
            byte,
            opcode,
            immediate: self.code.slice(self.offset + 1, imm_len),
        };
        self.offset = item.next_offset();
        Some(item)
    }
}

fn analyze_opcodes(bytes: &[u8]) -> Vec<bool> {
    let mut is_opcode = vec![false; bytes.len()];
    let mut pc = 0;
    while pc < bytes.len() {
        is_opcode[pc] = true;
        let imm_len = match Opcode::try_from(bytes[pc]) {
            Ok(op) => op.immediate_len(),
            Err(_) => 0,
        };
        pc += 1 + imm_len;
    }
    is_opcode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code() {
        let code = Code::new(vec![]);
        assert!(code.is_empty());
        assert_eq!(code.len(), 0);
        assert_eq!(code.get(0), None);
        assert_eq!(code.instructions().count(), 0);
    }

    #[test]
    fn from_hex_accepts_prefix_and_whitespace() {
        let a = Code::from_hex("0x6004b300b2b7").unwrap();
        let b = Code::from_hex("  6004b300b2b7\n").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[0x60, 0x04, 0xb3, 0x00, 0xb2, 0xb7]);
    }

    #[test]
    fn from_hex_rejects_odd_length() {
        assert!(matches!(
            Code::from_hex("6004b"),
            Err(CodeError::InvalidHex(_))
        ));
    }

    #[test]
    fn display_is_prefixed_hex() {
        let code = Code::new(vec![0xb7, 0x58]);
        assert_eq!(code.to_string(), "0xb758");
    }

    #[test]
    fn subroutine_entry_requires_beginsub() {
        let code = Code::from_hex("6004b300b2b7").unwrap();
        assert!(code.is_valid_subroutine_entry(4));
        assert!(!code.is_valid_subroutine_entry(3));
        assert!(!code.is_valid_subroutine_entry(5));
        assert!(!code.is_valid_subroutine_entry(6));
        assert!(!code.is_valid_subroutine_entry(usize::MAX));
    }

    #[test]
    fn beginsub_inside_push_data_is_not_an_entry() {
        // PUSH1 0xb2, BEGINSUB
        let code = Code::new(vec![0x60, 0xb2, 0xb2]);
        assert!(!code.is_valid_subroutine_entry(1));
        assert!(code.is_valid_subroutine_entry(2));
    }

    #[test]
    fn jumpdest_inside_push_data_is_not_a_destination() {
        // PUSH2 0x5b5b, JUMPDEST
        let code = Code::new(vec![0x61, 0x5b, 0x5b, 0x5b]);
        assert!(!code.is_valid_jump_destination(1));
        assert!(!code.is_valid_jump_destination(2));
        assert!(code.is_valid_jump_destination(3));
    }

    #[test]
    fn instructions_skip_immediates() {
        let code = Code::from_hex("6800000000000000000cb300b2").unwrap();
        let offsets: Vec<usize> = code.instructions().map(|i| i.offset).collect();
        assert_eq!(offsets, vec![0, 10, 11, 12]);
        let first = code.instructions().next().unwrap();
        assert_eq!(first.opcode, Some(Opcode::Push(9)));
        assert_eq!(first.immediate.len(), 9);
        assert!(!first.is_truncated());
    }

    #[test]
    fn truncated_push_is_reported() {
        let code = Code::new(vec![0x00, 0x62, 0x01]);
        let last = code.instructions().last().unwrap();
        assert_eq!(last.offset, 1);
        assert_eq!(last.immediate, &[0x01]);
        assert!(last.is_truncated());
        assert_eq!(last.next_offset(), 3);
    }

    #[test]
    fn undefined_bytes_are_single_byte_instructions() {
        let code = Code::new(vec![0xfe, 0x00]);
        let items: Vec<_> = code.instructions().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].opcode, None);
        assert_eq!(items[0].byte, 0xfe);
    }

    #[test]
    fn slice_clips_to_end() {
        let code = Code::new(vec![1, 2, 3]);
        assert_eq!(code.slice(1, 10), &[2, 3]);
        assert_eq!(code.slice(5, 2), &[] as &[u8]);
        assert_eq!(code.slice(usize::MAX, 2), &[] as &[u8]);
    }
}
