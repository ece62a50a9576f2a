//! Output tags for script parsing.
//!
//! These tags are used by test scripts to determine execution results.

use picovm_core::{HaltReason, Register};
use picovm_vm::Context;

/// Success tag - the program executed HALT.
pub const TAG_OK: &str = "[VM:OK]";

/// Internal halt tag prefix - the program was malformed.
pub const TAG_IHALT_PREFIX: &str = "[VM:IHALT:";

/// Limit tag prefix - the step budget ran out before the program halted.
pub const TAG_LIMIT_PREFIX: &str = "[VM:LIMIT:";

pub fn format_ihalt(reason: &HaltReason) -> String {
    format!("{}{}]", TAG_IHALT_PREFIX, reason)
}

pub fn format_limit(steps: u64) -> String {
    format!("{}{}]", TAG_LIMIT_PREFIX, steps)
}

/// Human-readable final state: one line of registers, one of stack.
pub fn format_state(ctx: &Context<'_>) -> String {
    let registers: Vec<String> = Register::ALL
        .iter()
        .map(|reg| format!("{}={}", reg, ctx.register(*reg)))
        .collect();
    format!("registers: {}\nstack: {:?}", registers.join(" "), ctx.stack())
}
