//! Interpreter driver: decode, observe, evaluate, until halted.

mod decode;
mod types;

pub use decode::decode;
pub use types::{Outcome, Snapshot};

use picovm_core::HaltReason;
use tracing::{debug, trace};

use crate::context::Context;
use crate::exec;
use crate::trace::Observer;

/// Run one decode/evaluate cycle.
///
/// Does nothing on a halted context. Returns whether the context is still
/// running afterwards.
pub fn step<O: Observer + ?Sized>(ctx: &mut Context<'_>, observer: &mut O) -> bool {
    if ctx.is_halted() {
        return false;
    }

    let inst = decode(ctx);
    trace!(ip = ctx.ip(), opcode = %inst.opcode, params = ?inst.params(), "decoded");
    observer.instruction(ctx, &inst);
    exec::evaluate(ctx, &inst, observer);

    !ctx.is_halted()
}

/// Run the program until it halts.
///
/// There is no iteration limit: a program that loops forever keeps this
/// running forever. Use [`step`] to impose an external budget.
pub fn interpret(ctx: &mut Context<'_>) -> Outcome {
    interpret_with(ctx, &mut ())
}

/// [`interpret`], reporting every cycle to `observer`.
pub fn interpret_with<O: Observer + ?Sized>(ctx: &mut Context<'_>, observer: &mut O) -> Outcome {
    debug!(program_len = ctx.program_len(), ip = ctx.ip(), "interpreter starting");

    let mut steps: u64 = 0;
    while !ctx.is_halted() {
        step(ctx, observer);
        steps += 1;
    }

    // A halted context always has an outcome.
    let outcome = ctx.outcome().unwrap_or(Outcome::Faulted(HaltReason::Unknown));
    debug!(steps, ?outcome, "interpreter halted");
    outcome
}
