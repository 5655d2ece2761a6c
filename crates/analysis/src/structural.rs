//! Structural checks on the instruction stream.

use crate::error::AnalysisIssue;
use subvm_common::Code;

/// Report undefined opcode bytes and a truncated trailing PUSH.
pub fn check_structural(code: &Code) -> Vec<AnalysisIssue> {
    let mut issues = Vec::new();

    for instr in code.instructions() {
        if instr.opcode.is_none() {
            issues.push(AnalysisIssue::UndefinedOpcode {
                at: instr.offset,
                byte: instr.byte,
            });
        } else if instr.is_truncated() {
            issues.push(AnalysisIssue::TruncatedPush { at: instr.offset });
        }
    }

    issues
}
