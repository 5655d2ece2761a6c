//! Main execution loop and opcode dispatch.

use crate::error::RuntimeError;
use crate::machine::{Machine, Outcome};
use crate::trace::{AbortRecord, NoopTracer, Tracer};
use log::{debug, trace};
use subvm_common::{word_to_offset, Opcode, U256};

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    /// Advance past the instruction and its immediate.
    Continue,
    /// Continue at the given offset.
    Jump(usize),
    /// Land on the BEGINSUB at the given offset.
    EnterSubroutine(usize),
    /// Stop successfully.
    Halt,
}

impl<'a> Machine<'a> {
    /// Execute until STOP, end of code, or abort.
    pub fn execute(&mut self) -> Result<Outcome, RuntimeError> {
        self.execute_with(&mut NoopTracer)
    }

    /// Execute, reporting every step to `tracer`.
    ///
    /// A finished machine is never re-entered: later calls return the
    /// same terminal result without executing anything.
    pub fn execute_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<Outcome, RuntimeError> {
        if let Some(result) = &self.finished {
            return result.clone();
        }

        let result = self.run_loop(tracer);
        match &result {
            Ok(outcome) => {
                debug!("halted at pc {} using {} gas", outcome.pc, outcome.gas_used);
            }
            Err(err) => {
                // Exceptional halt: the whole budget is forfeit.
                self.gas.exhaust();
                let record = self.abort_record(err);
                debug!("aborted at pc {} ({}): {}", record.pc, record.op, record.error);
                tracer.abort(record);
            }
        }

        self.finished = Some(result.clone());
        result
    }

    fn run_loop<T: Tracer>(&mut self, tracer: &mut T) -> Result<Outcome, RuntimeError> {
        loop {
            // pc == code length is an implicit STOP, however pc got there.
            let Some(byte) = self.code.get(self.pc) else {
                return Ok(self.outcome());
            };
            let opcode = Opcode::try_from(byte)
                .map_err(|_| RuntimeError::InvalidOpcode { at: self.pc, byte })?;
            let cost = opcode.static_gas();

            trace!("pc {} {} gas {}", self.pc, opcode.mnemonic(), self.gas.remaining());
            self.record_step(tracer, self.pc, opcode.mnemonic(), cost);
            self.check_stack(opcode.stack_inputs(), opcode.stack_outputs())?;
            self.charge(cost)?;

            let control = match opcode {
                Opcode::Stop => Control::Halt,

                // Arithmetic
                Opcode::Add => self.exec_binary(|a, b| a.overflowing_add(b).0)?,
                Opcode::Mul => self.exec_binary(|a, b| a.overflowing_mul(b).0)?,
                Opcode::Sub => self.exec_binary(|a, b| a.overflowing_sub(b).0)?,
                Opcode::Div => {
                    self.exec_binary(|a, b| if b.is_zero() { U256::zero() } else { a / b })?
                }
                Opcode::Mod => {
                    self.exec_binary(|a, b| if b.is_zero() { U256::zero() } else { a % b })?
                }

                // Comparison & Bitwise
                Opcode::Lt => self.exec_binary(|a, b| bool_word(a < b))?,
                Opcode::Gt => self.exec_binary(|a, b| bool_word(a > b))?,
                Opcode::Eq => self.exec_binary(|a, b| bool_word(a == b))?,
                Opcode::IsZero => self.exec_unary(|a| bool_word(a.is_zero()))?,
                Opcode::And => self.exec_binary(|a, b| a & b)?,
                Opcode::Or => self.exec_binary(|a, b| a | b)?,
                Opcode::Xor => self.exec_binary(|a, b| a ^ b)?,
                Opcode::Not => self.exec_unary(|a| !a)?,

                // Stack & Flow
                Opcode::Pop => {
                    self.pop()?;
                    Control::Continue
                }
                Opcode::Jump => self.exec_jump()?,
                Opcode::JumpI => self.exec_jumpi()?,
                Opcode::Pc => {
                    self.push(U256::from(self.pc))?;
                    Control::Continue
                }
                Opcode::Gas => {
                    self.push(U256::from(self.gas.remaining()))?;
                    Control::Continue
                }
                Opcode::JumpDest => Control::Continue,
                Opcode::Push(n) => self.exec_push(n as usize)?,
                Opcode::Dup(n) => {
                    let value = self.peek(n as usize - 1)?;
                    self.push(value)?;
                    Control::Continue
                }
                Opcode::Swap(n) => {
                    let top = self.stack.len() - 1;
                    self.stack.swap(top, top - n as usize);
                    Control::Continue
                }

                // Subroutines
                Opcode::BeginSub => return Err(self.exec_beginsub()),
                Opcode::JumpSub => self.exec_jumpsub()?,
                Opcode::ReturnSub => self.exec_returnsub()?,
            };

            match control {
                Control::Continue => {
                    let next = self.pc + 1 + opcode.immediate_len();
                    self.pc = next.min(self.code.len());
                }
                Control::Jump(dest) => self.pc = dest,
                Control::EnterSubroutine(location) => self.enter_subroutine(location, tracer)?,
                Control::Halt => return Ok(self.outcome()),
            }
        }
    }

    fn abort_record(&self, err: &RuntimeError) -> AbortRecord {
        let pc = err.at();
        let op = self
            .code
            .get(pc)
            .and_then(|byte| Opcode::try_from(byte).ok())
            .map_or("INVALID", |op| op.mnemonic());
        AbortRecord {
            pc,
            op,
            error: err.to_string(),
        }
    }

    // ---- Host instructions ----

    fn exec_binary(&mut self, f: impl FnOnce(U256, U256) -> U256) -> Result<Control, RuntimeError> {
        let a = self.pop()?;
        let b = self.pop()?;
        self.push(f(a, b))?;
        Ok(Control::Continue)
    }

    fn exec_unary(&mut self, f: impl FnOnce(U256) -> U256) -> Result<Control, RuntimeError> {
        let a = self.pop()?;
        self.push(f(a))?;
        Ok(Control::Continue)
    }

    fn exec_push(&mut self, n: usize) -> Result<Control, RuntimeError> {
        // Immediate bytes past the end of code read as zero.
        let bytes = self.code.slice(self.pc + 1, n);
        let mut word = [0u8; 32];
        let start = 32 - n;
        word[start..start + bytes.len()].copy_from_slice(bytes);
        self.push(U256::from_big_endian(&word))?;
        Ok(Control::Continue)
    }

    fn exec_jump(&mut self) -> Result<Control, RuntimeError> {
        let dest = self.pop()?;
        Ok(Control::Jump(self.jump_target(dest)?))
    }

    fn exec_jumpi(&mut self) -> Result<Control, RuntimeError> {
        let dest = self.pop()?;
        let condition = self.pop()?;
        if condition.is_zero() {
            Ok(Control::Continue)
        } else {
            Ok(Control::Jump(self.jump_target(dest)?))
        }
    }

    /// JUMP/JUMPI accept a JUMPDEST. A BEGINSUB is accepted too, so that the
    /// fetch loop then dispatches it and the context runs out of gas.
    fn jump_target(&self, dest: U256) -> Result<usize, RuntimeError> {
        word_to_offset(dest)
            .filter(|&offset| {
                self.code.is_valid_jump_destination(offset)
                    || self.code.is_valid_subroutine_entry(offset)
            })
            .ok_or(RuntimeError::InvalidJumpDestination { at: self.pc, dest })
    }
}

fn bool_word(value: bool) -> U256 {
    if value {
        U256::one()
    } else {
        U256::zero()
    }
}
