//! subvm analysis: static checks on bytecode.
//!
//! Analysis inspects a [`Code`] BEFORE execution. It collects ALL issues
//! (not just the first) into a [`Report`].
//!
//! # Usage
//!
//! ```
//! use subvm_common::Code;
//! use subvm_analysis::{analyze, verify};
//!
//! let code = Code::from_hex("6004b300b2b7").unwrap();
//! let report = analyze(&code);
//! assert_eq!(report.subroutine_entries, vec![4]);
//! assert!(verify(&code).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: undefined opcodes, truncated PUSH
//! 2. **Fall-through**: BEGINSUB reachable by sequential flow
//! 3. **Subroutine reachability**: BEGINSUB with no direct call
//! 4. **Hashing**: blake3 digest

pub mod error;
pub mod hashing;
pub mod report;
pub mod structural;
pub mod subroutines;

pub use error::AnalysisIssue;
pub use report::{InstructionEntry, Report};

use subvm_common::{Code, Opcode};

/// Analyze a program.
///
/// Issues are sorted by offset.
pub fn analyze(code: &Code) -> Report {
    let mut issues = Vec::new();
    issues.extend(structural::check_structural(code));
    issues.extend(subroutines::check_fallthrough(code));
    issues.extend(subroutines::check_unreachable_subroutines(code));
    issues.sort_by_key(AnalysisIssue::at);

    let jump_destinations = code
        .instructions()
        .filter(|instr| instr.opcode == Some(Opcode::JumpDest))
        .map(|instr| instr.offset)
        .collect();

    Report {
        instructions: report::listing(code),
        jump_destinations,
        subroutine_entries: subroutines::subroutine_entries(code),
        issues,
        digest: hashing::code_digest(code),
    }
}

/// Verify a program.
///
/// Returns `Ok(())` if no issue is an error, or `Err` with every error.
/// Warnings never fail verification.
pub fn verify(code: &Code) -> Result<(), Vec<AnalysisIssue>> {
    let errors = analyze(code).errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
