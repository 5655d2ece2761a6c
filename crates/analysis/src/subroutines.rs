//! Subroutine layout checks.
//!
//! A BEGINSUB must only be entered through JUMPSUB. Two things are
//! checked: that no BEGINSUB follows an instruction that continues
//! sequentially, and that every BEGINSUB is named by at least one direct
//! `PUSHn <entry>; JUMPSUB` pair.

use std::collections::BTreeSet;

use crate::error::AnalysisIssue;
use subvm_common::{word_to_offset, Code, InstructionRef, Opcode, U256};

/// Report every BEGINSUB that sequential execution can reach.
///
/// Execution starts at offset 0, so a BEGINSUB there always counts.
pub fn check_fallthrough(code: &Code) -> Vec<AnalysisIssue> {
    let mut issues = Vec::new();
    let mut prev: Option<InstructionRef<'_>> = None;

    for instr in code.instructions() {
        if instr.opcode == Some(Opcode::BeginSub) && continues_into_next(prev.as_ref()) {
            issues.push(AnalysisIssue::FallThroughIntoSubroutine { at: instr.offset });
        }
        prev = Some(instr);
    }

    issues
}

/// Report every BEGINSUB no direct call names.
pub fn check_unreachable_subroutines(code: &Code) -> Vec<AnalysisIssue> {
    let called = direct_call_targets(code);
    subroutine_entries(code)
        .into_iter()
        .filter(|entry| !called.contains(entry))
        .map(|at| AnalysisIssue::UnreachableSubroutine { at })
        .collect()
}

/// Offsets of BEGINSUB opcode bytes.
pub fn subroutine_entries(code: &Code) -> Vec<usize> {
    code.instructions()
        .filter(|instr| instr.opcode == Some(Opcode::BeginSub))
        .map(|instr| instr.offset)
        .collect()
}

/// Targets of `PUSHn x; JUMPSUB` pairs that land on a valid entry.
fn direct_call_targets(code: &Code) -> BTreeSet<usize> {
    let instrs: Vec<_> = code.instructions().collect();
    instrs
        .windows(2)
        .filter_map(|pair| {
            let (push, call) = (&pair[0], &pair[1]);
            if !matches!(push.opcode, Some(Opcode::Push(_))) || push.is_truncated() {
                return None;
            }
            if call.opcode != Some(Opcode::JumpSub) {
                return None;
            }
            word_to_offset(U256::from_big_endian(push.immediate))
        })
        .filter(|&target| code.is_valid_subroutine_entry(target))
        .collect()
}

fn continues_into_next(prev: Option<&InstructionRef<'_>>) -> bool {
    match prev {
        None => true,
        Some(instr) => match instr.opcode {
            // an undefined opcode aborts
            None => false,
            Some(op) => !op.is_terminator(),
        },
    }
}
