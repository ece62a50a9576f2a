//! Instruction format, opcodes and registers.
//!
//! The bytecode stream is a flat sequence of `i32`. Each opcode is followed by
//! its operands; the number of operands is fixed per opcode (see
//! [`Opcode::operand_count`]), so instruction boundaries are implicit.

use std::fmt;

use num_enum::TryFromPrimitive;

use crate::halt::HaltReason;

/// Maximum number of operands an instruction can carry.
pub const MAX_OPCODE_PARAMS: usize = 5;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(i32)]
pub enum Opcode {
    /// Do nothing.
    Nop = 0,
    /// Push the literal operand onto the stack.
    Push = 1,
    /// Pop the top item from the stack.
    Pop = 2,
    /// Pop the top of the stack into the register operand.
    Set = 3,
    /// Pop two values and push their sum.
    Add = 4,
    /// Push the sum of the two register operands.
    RAdd = 5,
    /// Decrement the register operand.
    RDec = 6,
    /// Jump by the offset operand when the register operand differs from the
    /// top of the stack. The offset is relative to the RJNE opcode itself.
    Rjne = 7,
    /// Normal halt.
    Halt = 8,
    /// Internal halt. Reserved for the interpreter; never valid in a program.
    IHalt = 9,
}

/// What an operand slot holds. Only used when rendering instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Literal,
    Register,
}

impl Opcode {
    #[inline]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::try_from(code).ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Set => "SET",
            Opcode::Add => "ADD",
            Opcode::RAdd => "RADD",
            Opcode::RDec => "RDEC",
            Opcode::Rjne => "RJNE",
            Opcode::Halt => "HALT",
            Opcode::IHalt => "IHALT",
        }
    }

    /// Operand layout of this opcode, in stream order.
    ///
    /// IHALT reports no operands: it may not appear in a program at all, so the
    /// decoder rejects it before looking for operands.
    pub fn operand_kinds(self) -> &'static [OperandKind] {
        use OperandKind::{Literal, Register};
        match self {
            Opcode::Push => &[Literal],
            Opcode::Set | Opcode::RDec => &[Register],
            Opcode::RAdd => &[Register, Register],
            Opcode::Rjne => &[Register, Literal],
            Opcode::Nop | Opcode::Pop | Opcode::Add | Opcode::Halt | Opcode::IHalt => &[],
        }
    }

    #[inline]
    pub fn operand_count(self) -> usize {
        self.operand_kinds().len()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// General purpose registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(i32)]
pub enum Register {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
}

impl Register {
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::E,
        Register::F,
    ];

    #[inline]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::try_from(code).ok()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::A => "REG_A",
            Register::B => "REG_B",
            Register::C => "REG_C",
            Register::D => "REG_D",
            Register::E => "REG_E",
            Register::F => "REG_F",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded instruction. Built fresh every cycle and never stored.
///
/// For IHALT, `params[0]` holds the [`HaltCode`](crate::HaltCode) and the
/// following slots hold the reason's payload (see [`HaltReason::encode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub params: [i32; MAX_OPCODE_PARAMS],
    pub param_count: usize,
}

impl Instruction {
    pub fn new(opcode: Opcode, params: &[i32]) -> Self {
        let param_count = params.len().min(MAX_OPCODE_PARAMS);
        let mut inst = Self {
            opcode,
            params: [0; MAX_OPCODE_PARAMS],
            param_count,
        };
        inst.params[..param_count].copy_from_slice(&params[..param_count]);
        inst
    }

    /// Internal halt carrying `reason`.
    pub fn ihalt(reason: HaltReason) -> Self {
        let mut params = [0; MAX_OPCODE_PARAMS];
        let param_count = reason.encode(&mut params);
        Self {
            opcode: Opcode::IHalt,
            params,
            param_count,
        }
    }

    /// The operands actually in use.
    #[inline]
    pub fn params(&self) -> &[i32] {
        &self.params[..self.param_count]
    }

    #[inline]
    pub fn is_ihalt(&self) -> bool {
        self.opcode == Opcode::IHalt
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.is_ihalt().then(|| HaltReason::decode(self.params()))
    }
}
