//! Internal halt reasons.
//!
//! Every malformed-program condition ends the run through an IHALT carrying one
//! of these reasons. The reason travels inside the IHALT instruction's operands
//! as a [`HaltCode`] followed by its payload.

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::instruction::{Opcode, MAX_OPCODE_PARAMS};

/// Wire tag of a [`HaltReason`], stored in `params[0]` of an IHALT instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(i32)]
pub enum HaltCode {
    Unknown = 0,
    ExplicitIHalt = 1,
    MissingOpcode = 2,
    MissingOpcodeParameter = 3,
    StackOverflow = 4,
    StackUnderflow = 5,
    InvalidOpcode = 6,
    InvalidRegister = 7,
    JumpOutOfRange = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum HaltReason {
    /// Reached only through a defect in the decoder or evaluator.
    #[error("Unknown error (the interpreter halted without recording a reason)")]
    Unknown,
    #[error("IHALT instructions are not allowed in the bytecode stream")]
    ExplicitIHalt,
    #[error("Bytecode terminates without a HALT opcode")]
    MissingOpcode,
    #[error("Opcode ({0}) requires more parameters than are available in the bytecode stream")]
    MissingOpcodeParameter(Opcode),
    #[error("Stack overflow")]
    StackOverflow,
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Value {0} is not a valid opcode")]
    InvalidOpcode(i32),
    #[error("Opcode ({opcode}) refers to register {value}, which does not exist")]
    InvalidRegister { opcode: Opcode, value: i32 },
    /// `from` is the position of the RJNE opcode.
    #[error("RJNE at {from} jumps by {offset}, before the start of the bytecode stream")]
    JumpOutOfRange { from: usize, offset: i32 },
}

impl HaltReason {
    pub fn code(&self) -> HaltCode {
        match self {
            HaltReason::Unknown => HaltCode::Unknown,
            HaltReason::ExplicitIHalt => HaltCode::ExplicitIHalt,
            HaltReason::MissingOpcode => HaltCode::MissingOpcode,
            HaltReason::MissingOpcodeParameter(_) => HaltCode::MissingOpcodeParameter,
            HaltReason::StackOverflow => HaltCode::StackOverflow,
            HaltReason::StackUnderflow => HaltCode::StackUnderflow,
            HaltReason::InvalidOpcode(_) => HaltCode::InvalidOpcode,
            HaltReason::InvalidRegister { .. } => HaltCode::InvalidRegister,
            HaltReason::JumpOutOfRange { .. } => HaltCode::JumpOutOfRange,
        }
    }

    /// False only for `Unknown`, which points at the interpreter rather than
    /// the program.
    pub fn is_program_error(&self) -> bool {
        !matches!(self, HaltReason::Unknown)
    }

    /// Write the code and payload into IHALT operand slots.
    /// Returns the number of slots used.
    pub fn encode(&self, out: &mut [i32; MAX_OPCODE_PARAMS]) -> usize {
        out[0] = self.code() as i32;
        match *self {
            HaltReason::MissingOpcodeParameter(opcode) => {
                out[1] = opcode as i32;
                2
            }
            HaltReason::InvalidOpcode(value) => {
                out[1] = value;
                2
            }
            HaltReason::InvalidRegister { opcode, value } => {
                out[1] = opcode as i32;
                out[2] = value;
                3
            }
            HaltReason::JumpOutOfRange { from, offset } => {
                out[1] = i32::try_from(from).unwrap_or(i32::MAX);
                out[2] = offset;
                3
            }
            HaltReason::Unknown
            | HaltReason::ExplicitIHalt
            | HaltReason::MissingOpcode
            | HaltReason::StackOverflow
            | HaltReason::StackUnderflow => 1,
        }
    }

    /// Inverse of [`encode`](Self::encode). Anything unreadable is `Unknown`.
    pub fn decode(params: &[i32]) -> Self {
        let arg = |i: usize| params.get(i).copied();
        let Some(code) = arg(0).and_then(|c| HaltCode::try_from(c).ok()) else {
            return HaltReason::Unknown;
        };
        let reason = match code {
            HaltCode::Unknown => Some(HaltReason::Unknown),
            HaltCode::ExplicitIHalt => Some(HaltReason::ExplicitIHalt),
            HaltCode::MissingOpcode => Some(HaltReason::MissingOpcode),
            HaltCode::MissingOpcodeParameter => arg(1)
                .and_then(Opcode::from_code)
                .map(HaltReason::MissingOpcodeParameter),
            HaltCode::StackOverflow => Some(HaltReason::StackOverflow),
            HaltCode::StackUnderflow => Some(HaltReason::StackUnderflow),
            HaltCode::InvalidOpcode => arg(1).map(HaltReason::InvalidOpcode),
            HaltCode::InvalidRegister => match (arg(1).and_then(Opcode::from_code), arg(2)) {
                (Some(opcode), Some(value)) => Some(HaltReason::InvalidRegister { opcode, value }),
                _ => None,
            },
            HaltCode::JumpOutOfRange => {
                let from = arg(1).and_then(|v| usize::try_from(v).ok());
                match (from, arg(2)) {
                    (Some(from), Some(offset)) => Some(HaltReason::JumpOutOfRange { from, offset }),
                    _ => None,
                }
            }
        };
        reason.unwrap_or(HaltReason::Unknown)
    }
}
