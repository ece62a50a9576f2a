//! Register instructions: RADD, RDEC, RJNE.

use picovm_core::{HaltReason, Register};

use super::stack::{checked_peek, checked_push};
use crate::context::Context;

pub(super) fn radd(ctx: &mut Context<'_>, r1: Register, r2: Register) -> Result<(), HaltReason> {
    let sum = ctx.register(r1).wrapping_add(ctx.register(r2));
    checked_push(ctx, sum)
}

pub(super) fn rdec(ctx: &mut Context<'_>, reg: Register) {
    let value = ctx.register(reg).wrapping_sub(1);
    ctx.set_register(reg, value);
}

/// Compare `reg` with the top of the stack (not popped). Returns the jump
/// target when they differ. The offset is relative to the RJNE opcode, so 0
/// spins on the same instruction.
pub(super) fn rjne(
    ctx: &mut Context<'_>,
    reg: Register,
    offset: i32,
) -> Result<Option<usize>, HaltReason> {
    let top = checked_peek(ctx)?;
    if ctx.register(reg) == top {
        return Ok(None);
    }
    let from = ctx.ip();
    let target = from as i64 + i64::from(offset);
    usize::try_from(target)
        .map(Some)
        .map_err(|_| HaltReason::JumpOutOfRange { from, offset })
}
