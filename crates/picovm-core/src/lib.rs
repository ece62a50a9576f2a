//! # picovm-core
//!
//! Core types shared by the picovm interpreter and its tools:
//! - `Opcode` / `Register` - the closed tag sets of the bytecode stream
//! - `Instruction` - a decoded instruction (opcode plus up to 5 operands)
//! - `HaltReason` - why an internal halt (IHALT) stopped a program
//! - `codes` - raw integer codes for writing literal programs

pub mod codes;
pub mod halt;
pub mod instruction;

pub use halt::{HaltCode, HaltReason};
pub use instruction::{
    Instruction, Opcode, OperandKind, Register, MAX_OPCODE_PARAMS, REGISTER_COUNT,
};
