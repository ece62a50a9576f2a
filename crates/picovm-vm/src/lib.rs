//! Register/stack bytecode interpreter for picovm.
//!
//! A program is a flat `&[i32]` stream of opcodes and operands. All state of a
//! run lives in one [`Context`]; nothing is global, so independent contexts can
//! be driven from separate threads.
//!
//! ```
//! use picovm_core::codes::*;
//! use picovm_vm::{interpret, Context, Outcome};
//!
//! let program = [PUSH, 5, PUSH, 6, ADD, HALT];
//! let mut ctx = Context::new(&program);
//! assert_eq!(interpret(&mut ctx), Outcome::Halted);
//! assert_eq!(ctx.stack(), &[11]);
//! ```

pub mod context;
pub mod exec;
pub mod trace;
pub mod vm;

pub use context::{Context, StackFlags, STACK_CAPACITY};
pub use exec::evaluate;
pub use trace::{format_instruction, Observer, Tracer};
pub use vm::{decode, interpret, interpret_with, step, Outcome, Snapshot};

pub use picovm_core::{HaltReason, Instruction, Opcode, Register};
