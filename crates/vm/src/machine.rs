//! VM state for one execution context: code, stacks, pc, gas.

use crate::config::Config;
use crate::error::RuntimeError;
use crate::gas::Gasometer;
use crate::return_stack::ReturnStack;
use crate::trace::{StepRecord, Tracer};
use subvm_common::{Code, U256};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Gas consumed by the context.
    pub gas_used: u64,
    /// Final data stack, bottom first.
    pub stack: Vec<U256>,
    /// Program counter at which execution halted.
    pub pc: usize,
}

/// One execution context.
///
/// Owns its data stack, its return stack and its gas budget. Nothing is
/// shared between machines; a nested call would get a fresh `Machine`.
pub struct Machine<'a> {
    /// The program being executed.
    pub(crate) code: &'a Code,
    /// Data stack, bottom first.
    pub(crate) stack: Vec<U256>,
    /// Return addresses pushed by JUMPSUB.
    pub(crate) return_stack: ReturnStack,
    /// Offset of the next opcode.
    pub(crate) pc: usize,
    pub(crate) gas: Gasometer,
    pub(crate) stack_limit: usize,
    /// Terminal result once the context has finished.
    pub(crate) finished: Option<Result<Outcome, RuntimeError>>,
}

impl<'a> Machine<'a> {
    /// Create a fresh context for `code`.
    pub fn new(code: &'a Code, config: &Config) -> Self {
        Self {
            code,
            stack: Vec::new(),
            return_stack: ReturnStack::new(),
            pc: 0,
            gas: Gasometer::new(config.gas_limit),
            stack_limit: config.stack_limit,
            finished: None,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn stack(&self) -> &[U256] {
        &self.stack
    }

    pub fn return_stack(&self) -> &ReturnStack {
        &self.return_stack
    }

    pub fn gas_remaining(&self) -> u64 {
        self.gas.remaining()
    }

    pub fn gas_used(&self) -> u64 {
        self.gas.used()
    }

    /// True once execution has halted or aborted.
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Push a value onto the data stack, checking for overflow.
    pub(crate) fn push(&mut self, value: U256) -> Result<(), RuntimeError> {
        if self.stack.len() >= self.stack_limit {
            return Err(RuntimeError::StackOverflow {
                at: self.pc,
                limit: self.stack_limit,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pop a value from the data stack.
    pub(crate) fn pop(&mut self) -> Result<U256, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow {
            at: self.pc,
            len: 0,
            required: 1,
        })
    }

    /// Read the `n`th item from the top (0 = top) without removing it.
    pub(crate) fn peek(&self, n: usize) -> Result<U256, RuntimeError> {
        let len = self.stack.len();
        if n >= len {
            return Err(RuntimeError::StackUnderflow {
                at: self.pc,
                len,
                required: n + 1,
            });
        }
        Ok(self.stack[len - 1 - n])
    }

    /// Check the data stack can supply `inputs` and absorb `outputs`.
    pub(crate) fn check_stack(&self, inputs: usize, outputs: usize) -> Result<(), RuntimeError> {
        let len = self.stack.len();
        if len < inputs {
            return Err(RuntimeError::StackUnderflow {
                at: self.pc,
                len,
                required: inputs,
            });
        }
        if len - inputs + outputs > self.stack_limit {
            return Err(RuntimeError::StackOverflow {
                at: self.pc,
                limit: self.stack_limit,
            });
        }
        Ok(())
    }

    /// Charge gas for the instruction at the current pc.
    pub(crate) fn charge(&mut self, cost: u64) -> Result<(), RuntimeError> {
        self.gas
            .charge(cost)
            .map_err(|_| RuntimeError::OutOfGas { at: self.pc })
    }

    /// Emit a step record for the instruction at `pc`.
    pub(crate) fn record_step<T: Tracer>(
        &self,
        tracer: &mut T,
        pc: usize,
        op: &'static str,
        gas_cost: u64,
    ) {
        if !tracer.enabled() {
            return;
        }
        tracer.step(StepRecord {
            pc,
            op,
            gas: self.gas.remaining(),
            gas_cost,
            depth: self.return_stack.len(),
            stack: self.stack.iter().map(|w| format!("{w:#x}")).collect(),
            return_stack: self.return_stack.as_slice().to_vec(),
        });
    }

    pub(crate) fn outcome(&self) -> Outcome {
        Outcome {
            gas_used: self.gas.used(),
            stack: self.stack.clone(),
            pc: self.pc,
        }
    }
}
