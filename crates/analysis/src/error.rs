//! Issues reported by static analysis.
//!
//! Every issue carries the byte offset (`at`) it refers to. Analysis
//! collects ALL issues, not just the first.

use serde::Serialize;
use thiserror::Error;

/// Something noteworthy found in a program without running it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalysisIssue {
    /// A BEGINSUB that sequential execution can walk into.
    #[error("fall-through into BEGINSUB at offset {at}")]
    FallThroughIntoSubroutine { at: usize },

    /// A byte with no assigned opcode in instruction position.
    #[error("undefined opcode {byte:#04x} at offset {at}")]
    UndefinedOpcode { at: usize, byte: u8 },

    /// A PUSH whose immediate runs past the end of code.
    #[error("truncated PUSH at offset {at}")]
    TruncatedPush { at: usize },

    /// A BEGINSUB never named by a `PUSHn` directly before a JUMPSUB.
    #[error("subroutine at offset {at} is never called directly")]
    UnreachableSubroutine { at: usize },
}

impl AnalysisIssue {
    /// Offset the issue refers to.
    pub fn at(&self) -> usize {
        match self {
            AnalysisIssue::FallThroughIntoSubroutine { at }
            | AnalysisIssue::UndefinedOpcode { at, .. }
            | AnalysisIssue::TruncatedPush { at }
            | AnalysisIssue::UnreachableSubroutine { at } => *at,
        }
    }

    /// True for issues that make `verify` fail. The rest are warnings.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            AnalysisIssue::FallThroughIntoSubroutine { .. } | AnalysisIssue::TruncatedPush { .. }
        )
    }
}
