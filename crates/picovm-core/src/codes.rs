//! Raw integer codes, so literal programs read like the encoded stream:
//!
//! ```
//! use picovm_core::codes::*;
//!
//! let program = [PUSH, 5, PUSH, 6, ADD, POP, HALT];
//! assert_eq!(program[0], 1);
//! ```

use crate::instruction::{Opcode, Register};

pub const NOP: i32 = Opcode::Nop as i32;
pub const PUSH: i32 = Opcode::Push as i32;
pub const POP: i32 = Opcode::Pop as i32;
pub const SET: i32 = Opcode::Set as i32;
pub const ADD: i32 = Opcode::Add as i32;
pub const RADD: i32 = Opcode::RAdd as i32;
pub const RDEC: i32 = Opcode::RDec as i32;
pub const RJNE: i32 = Opcode::Rjne as i32;
pub const HALT: i32 = Opcode::Halt as i32;
pub const IHALT: i32 = Opcode::IHalt as i32;

pub const REG_A: i32 = Register::A as i32;
pub const REG_B: i32 = Register::B as i32;
pub const REG_C: i32 = Register::C as i32;
pub const REG_D: i32 = Register::D as i32;
pub const REG_E: i32 = Register::E as i32;
pub const REG_F: i32 = Register::F as i32;
