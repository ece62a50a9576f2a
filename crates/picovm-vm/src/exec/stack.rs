//! Stack instructions: PUSH, POP, SET, ADD.

use picovm_core::{HaltReason, Register};

use crate::context::Context;
use crate::trace::Observer;

pub(super) fn checked_push(ctx: &mut Context<'_>, value: i32) -> Result<(), HaltReason> {
    ctx.push(value);
    if ctx.stack_overflow() {
        return Err(HaltReason::StackOverflow);
    }
    Ok(())
}

pub(super) fn checked_pop(ctx: &mut Context<'_>) -> Result<i32, HaltReason> {
    let value = ctx.pop();
    if ctx.stack_underflow() {
        return Err(HaltReason::StackUnderflow);
    }
    Ok(value)
}

pub(super) fn checked_peek(ctx: &mut Context<'_>) -> Result<i32, HaltReason> {
    let value = ctx.peek();
    if ctx.stack_underflow() {
        return Err(HaltReason::StackUnderflow);
    }
    Ok(value)
}

/// The value only goes to the observer.
pub(super) fn pop<O: Observer + ?Sized>(
    ctx: &mut Context<'_>,
    observer: &mut O,
) -> Result<(), HaltReason> {
    let value = checked_pop(ctx)?;
    observer.popped(value);
    Ok(())
}

pub(super) fn set<O: Observer + ?Sized>(
    ctx: &mut Context<'_>,
    reg: Register,
    observer: &mut O,
) -> Result<(), HaltReason> {
    let value = checked_pop(ctx)?;
    ctx.set_register(reg, value);
    observer.register_set(reg, value);
    Ok(())
}

/// Two separate pops, each checked before the next.
pub(super) fn add(ctx: &mut Context<'_>) -> Result<(), HaltReason> {
    let p1 = checked_pop(ctx)?;
    let p2 = checked_pop(ctx)?;
    checked_push(ctx, p1.wrapping_add(p2))
}
