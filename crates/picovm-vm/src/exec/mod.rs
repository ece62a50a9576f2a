//! Instruction evaluation.

mod register;
mod stack;

use picovm_core::{HaltReason, Instruction, Opcode, Register};
use tracing::warn;

use crate::context::Context;
use crate::trace::Observer;

/// Apply `inst` to `ctx`.
///
/// The instruction pointer advances past the instruction unless a jump
/// overrides it. A faulting stack operation ends the run right away through
/// the internal halt path; the pointer is left on the faulting instruction.
pub fn evaluate<O: Observer + ?Sized>(ctx: &mut Context<'_>, inst: &Instruction, observer: &mut O) {
    let mut next_ip = ctx.ip() + inst.param_count + 1;

    let result = match inst.opcode {
        Opcode::Nop => Ok(()),
        Opcode::Push => stack::checked_push(ctx, inst.params[0]),
        Opcode::Pop => stack::pop(ctx, observer),
        Opcode::Set => register_operand(inst, 0).and_then(|reg| stack::set(ctx, reg, observer)),
        Opcode::Add => stack::add(ctx),
        Opcode::RAdd => register_operand(inst, 0)
            .and_then(|r1| register::radd(ctx, r1, register_operand(inst, 1)?)),
        Opcode::RDec => register_operand(inst, 0).map(|reg| register::rdec(ctx, reg)),
        Opcode::Rjne => match register_operand(inst, 0)
            .and_then(|reg| register::rjne(ctx, reg, inst.params[1]))
        {
            Ok(Some(target)) => {
                next_ip = target;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(reason) => Err(reason),
        },
        Opcode::Halt => {
            ctx.halted = true;
            Ok(())
        }
        Opcode::IHalt => Err(inst.halt_reason().unwrap_or(HaltReason::Unknown)),
    };

    if let Err(reason) = result {
        internal_halt(ctx, reason, observer);
    }

    if !ctx.is_halted() {
        ctx.ip = next_ip;
    }
}

/// Stop the context with `reason`. Terminal: nothing resumes a context
/// halted this way.
fn internal_halt<O: Observer + ?Sized>(
    ctx: &mut Context<'_>,
    reason: HaltReason,
    observer: &mut O,
) {
    warn!(ip = ctx.ip(), code = ?reason.code(), "invalid program detected: {}", reason);
    observer.internal_halt(&reason);
    ctx.halt_reason = Some(reason);
    ctx.halted = true;
}

/// Register named by operand `slot`. The decoder already rejects bad register
/// operands, but instructions can also be built by hand.
fn register_operand(inst: &Instruction, slot: usize) -> Result<Register, HaltReason> {
    let value = inst.params[slot];
    Register::from_code(value).ok_or(HaltReason::InvalidRegister {
        opcode: inst.opcode,
        value,
    })
}
