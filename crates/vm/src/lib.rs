//! subvm interpreter: executes bytecode with native subroutines.
//!
//! Each execution context ([`Machine`]) owns:
//! - a data stack of 256-bit words
//! - a [`ReturnStack`] of up to 1023 return addresses
//! - a program counter and a gas budget
//!
//! `JUMPSUB` enters a subroutine that starts with `BEGINSUB`, `RETURNSUB`
//! comes back to the instruction after the `JUMPSUB`. Walking into a
//! `BEGINSUB` any other way burns all remaining gas.
//!
//! # Usage
//!
//! ```
//! use subvm_common::Code;
//! use subvm_vm::{run, Config};
//!
//! // PUSH1 4, JUMPSUB, STOP, BEGINSUB, RETURNSUB
//! let code = Code::from_hex("6004b300b2b7").unwrap();
//! let outcome = run(&code, &Config::default()).unwrap();
//! assert_eq!(outcome.gas_used, 14);
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod gas;
pub mod machine;
pub mod return_stack;
mod subroutine;
pub mod trace;

pub use config::Config;
pub use error::RuntimeError;
pub use machine::{Machine, Outcome};
pub use return_stack::{ReturnStack, ReturnStackError, RETURN_STACK_LIMIT};
pub use trace::{AbortRecord, NoopTracer, StepRecord, TraceLog, Tracer};

use subvm_common::Code;

/// Execute `code` in a fresh context.
///
/// # Errors
///
/// Returns [`RuntimeError`] if the context aborts. An aborted context
/// has consumed its whole gas budget.
pub fn run(code: &Code, config: &Config) -> Result<Outcome, RuntimeError> {
    Machine::new(code, config).execute()
}

/// Execute `code` in a fresh context, reporting each step to `tracer`.
pub fn run_traced<T: Tracer>(
    code: &Code,
    config: &Config,
    tracer: &mut T,
) -> Result<Outcome, RuntimeError> {
    Machine::new(code, config).execute_with(tracer)
}
