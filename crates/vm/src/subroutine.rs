//! BEGINSUB, JUMPSUB and RETURNSUB.
//!
//! These handlers are the only code that touches the return stack.
//! BEGINSUB has two entry paths: dispatched by the fetch loop it is a
//! fault that burns all gas; landed on by JUMPSUB it is a charged no-op.

use crate::error::RuntimeError;
use crate::execute::Control;
use crate::machine::Machine;
use crate::trace::Tracer;
use subvm_common::{gas, word_to_offset, Opcode};

impl Machine<'_> {
    /// BEGINSUB reached through the ordinary fetch path.
    pub(crate) fn exec_beginsub(&mut self) -> RuntimeError {
        self.gas.exhaust();
        RuntimeError::OutOfGas { at: self.pc }
    }

    /// Validate the target, record the return address, then pop the target.
    ///
    /// Any failure leaves the data stack, return stack and pc untouched.
    pub(crate) fn exec_jumpsub(&mut self) -> Result<Control, RuntimeError> {
        let dest = self.peek(0)?;
        let location = word_to_offset(dest)
            .filter(|&location| self.code.is_valid_subroutine_entry(location))
            .ok_or(RuntimeError::InvalidJumpDestination { at: self.pc, dest })?;

        self.return_stack
            .push(self.pc + 1)
            .map_err(|_| RuntimeError::ReturnStackOverflow { at: self.pc })?;
        self.pop()?;

        Ok(Control::EnterSubroutine(location))
    }

    /// Land on the BEGINSUB at `location` and continue just past it.
    pub(crate) fn enter_subroutine<T: Tracer>(
        &mut self,
        location: usize,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        self.pc = location;
        self.record_step(tracer, location, Opcode::BeginSub.mnemonic(), gas::BEGINSUB);
        self.charge(gas::BEGINSUB)?;
        self.pc = location + 1;
        Ok(())
    }

    /// Pop the return stack. The address is interpreter-produced, so it is
    /// used as-is; it may equal the code length, which the fetch loop
    /// treats as a successful halt.
    pub(crate) fn exec_returnsub(&mut self) -> Result<Control, RuntimeError> {
        let return_pc = self
            .return_stack
            .pop()
            .map_err(|_| RuntimeError::ReturnStackUnderflow { at: self.pc })?;
        Ok(Control::Jump(return_pc))
    }
}
