//! The analysis report.

use serde::Serialize;
use subvm_common::Code;

use crate::error::AnalysisIssue;

/// One row of the instruction listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionEntry {
    pub offset: usize,
    /// Mnemonic, or `INVALID` for an undefined byte.
    pub op: &'static str,
    /// Immediate bytes as `0x`-prefixed hex, for PUSH instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immediate: Option<String>,
}

/// Everything static analysis learns about a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub instructions: Vec<InstructionEntry>,
    /// Offsets of JUMPDEST opcode bytes.
    pub jump_destinations: Vec<usize>,
    /// Offsets of BEGINSUB opcode bytes.
    pub subroutine_entries: Vec<usize>,
    pub issues: Vec<AnalysisIssue>,
    /// blake3 of the code, hex-encoded.
    pub digest: String,
}

impl Report {
    /// True if any issue is an error.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(AnalysisIssue::is_error)
    }

    /// Issues that are errors, in offset order.
    pub fn errors(&self) -> Vec<AnalysisIssue> {
        self.issues.iter().filter(|i| i.is_error()).cloned().collect()
    }
}

/// Build the instruction listing for `code`.
pub(crate) fn listing(code: &Code) -> Vec<InstructionEntry> {
    code.instructions()
        .map(|instr| InstructionEntry {
            offset: instr.offset,
            op: instr.opcode.map_or("INVALID", |op| op.mnemonic()),
            immediate: instr
                .opcode
                .filter(|op| op.immediate_len() > 0)
                .map(|_| format!("0x{}", hex::encode(instr.immediate))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_marks_immediates() {
        let code = Code::from_hex("6004b3fe").unwrap();
        let rows = listing(&code);
        assert_eq!(
            rows,
            vec![
                InstructionEntry {
                    offset: 0,
                    op: "PUSH1",
                    immediate: Some("0x04".to_string()),
                },
                InstructionEntry {
                    offset: 2,
                    op: "JUMPSUB",
                    immediate: None,
                },
                InstructionEntry {
                    offset: 3,
                    op: "INVALID",
                    immediate: None,
                },
            ]
        );
    }
}
