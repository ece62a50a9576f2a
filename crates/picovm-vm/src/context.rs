//! Execution context: the complete state of one program run.

use picovm_core::{HaltReason, Register, REGISTER_COUNT};

use crate::vm::{Outcome, Snapshot};

/// Operand stack capacity, in entries.
pub const STACK_CAPACITY: usize = 256;

/// Result bits of the most recent stack operations.
///
/// `overflow` is written only by push; `underflow` only by pop and peek.
/// Each operation overwrites its own bit and leaves the other alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackFlags {
    pub overflow: bool,
    pub underflow: bool,
}

#[derive(Debug, Clone)]
pub struct Context<'p> {
    program: &'p [i32],
    pub(crate) ip: usize,
    stack: [i32; STACK_CAPACITY],
    /// Index of the top entry; -1 when empty.
    sp: isize,
    registers: [i32; REGISTER_COUNT],
    pub(crate) halted: bool,
    flags: StackFlags,
    pub(crate) halt_reason: Option<HaltReason>,
}

impl<'p> Context<'p> {
    pub fn new(program: &'p [i32]) -> Self {
        Self {
            program,
            ip: 0,
            stack: [0; STACK_CAPACITY],
            sp: -1,
            registers: [0; REGISTER_COUNT],
            halted: false,
            flags: StackFlags::default(),
            halt_reason: None,
        }
    }

    #[inline]
    pub fn program(&self) -> &'p [i32] {
        self.program
    }

    #[inline]
    pub fn program_len(&self) -> usize {
        self.program.len()
    }

    /// Position of the next opcode to decode.
    #[inline]
    pub fn ip(&self) -> usize {
        self.ip
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Reason of the internal halt that ended the run, if any.
    #[inline]
    pub fn halt_reason(&self) -> Option<&HaltReason> {
        self.halt_reason.as_ref()
    }

    /// `None` while the program is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.halted {
            return None;
        }
        Some(match self.halt_reason {
            Some(reason) => Outcome::Faulted(reason),
            None => Outcome::Halted,
        })
    }

    // =========================================================================
    // Stack
    // =========================================================================

    /// Push `value`. On a full stack nothing changes except the overflow bit.
    pub fn push(&mut self, value: i32) {
        if self.sp == STACK_CAPACITY as isize - 1 {
            self.flags.overflow = true;
            return;
        }
        self.sp += 1;
        self.stack[self.sp as usize] = value;
        self.flags.overflow = false;
    }

    /// Pop the top value. On an empty stack returns 0 and sets the underflow bit.
    pub fn pop(&mut self) -> i32 {
        let value = self.peek();
        if !self.flags.underflow {
            self.sp -= 1;
        }
        value
    }

    /// Same as [`pop`](Self::pop) without removing the value.
    pub fn peek(&mut self) -> i32 {
        if self.sp < 0 {
            self.flags.underflow = true;
            return 0;
        }
        self.flags.underflow = false;
        self.stack[self.sp as usize]
    }

    /// Live stack entries, bottom first.
    #[inline]
    pub fn stack(&self) -> &[i32] {
        &self.stack[..self.depth()]
    }

    #[inline]
    pub fn depth(&self) -> usize {
        (self.sp + 1) as usize
    }

    /// Raw stack pointer: index of the top entry, -1 when empty.
    #[inline]
    pub fn sp(&self) -> isize {
        self.sp
    }

    #[inline]
    pub fn flags(&self) -> StackFlags {
        self.flags
    }

    #[inline]
    pub fn stack_overflow(&self) -> bool {
        self.flags.overflow
    }

    #[inline]
    pub fn stack_underflow(&self) -> bool {
        self.flags.underflow
    }

    // =========================================================================
    // Registers
    // =========================================================================

    #[inline]
    pub fn register(&self, reg: Register) -> i32 {
        self.registers[reg.index()]
    }

    #[inline]
    pub fn set_register(&mut self, reg: Register, value: i32) {
        self.registers[reg.index()] = value;
    }

    #[inline]
    pub fn registers(&self) -> &[i32; REGISTER_COUNT] {
        &self.registers
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ip: self.ip,
            registers: self.registers,
            stack: self.stack().to_vec(),
            outcome: self.outcome(),
        }
    }
}
