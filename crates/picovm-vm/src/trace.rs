//! Execution observers and the text tracer.
//!
//! Observers only read VM state; nothing they do changes control flow.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use picovm_core::{HaltReason, Instruction, OperandKind, Register};

use crate::context::Context;

/// Hooks called by the interpreter while it runs. All default to no-ops.
pub trait Observer {
    /// Called after decoding, before the instruction is evaluated.
    fn instruction(&mut self, _ctx: &Context<'_>, _inst: &Instruction) {}

    /// Value removed by POP.
    fn popped(&mut self, _value: i32) {}

    /// Register written by SET.
    fn register_set(&mut self, _reg: Register, _value: i32) {}

    /// The run is ending through an internal halt.
    fn internal_halt(&mut self, _reason: &HaltReason) {}
}

impl Observer for () {}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn instruction(&mut self, ctx: &Context<'_>, inst: &Instruction) {
        (**self).instruction(ctx, inst)
    }

    fn popped(&mut self, value: i32) {
        (**self).popped(value)
    }

    fn register_set(&mut self, reg: Register, value: i32) {
        (**self).register_set(reg, value)
    }

    fn internal_halt(&mut self, reason: &HaltReason) {
        (**self).internal_halt(reason)
    }
}

/// Render an instruction with register operands resolved against `ctx`:
/// `RJNE REG_F (9) -2`. IHALT renders its reason instead of raw operands.
pub fn format_instruction(inst: &Instruction, ctx: &Context<'_>) -> String {
    let mut out = String::from(inst.opcode.name());

    if let Some(reason) = inst.halt_reason() {
        let _ = write!(out, " ({})", reason);
        return out;
    }

    let kinds = inst.opcode.operand_kinds();
    for (i, &value) in inst.params().iter().enumerate() {
        let kind = kinds.get(i).copied().unwrap_or(OperandKind::Literal);
        let _ = match (kind, Register::from_code(value)) {
            (OperandKind::Register, Some(reg)) => write!(out, " {} ({})", reg, ctx.register(reg)),
            (OperandKind::Register, None) => write!(out, " REG_? ({})", value),
            (OperandKind::Literal, _) => write!(out, " {}", value),
        };
    }
    out
}

/// Observer that writes a line per event to `out`.
///
/// ```text
/// >>> PUSH 5
/// >>> POP
/// <<POP>> 11
/// >> *** << Invalid program detected
/// >> *** << Bytecode terminates without a HALT opcode
/// ```
///
/// The first write error stops further output and is returned by
/// [`finish`](Self::finish).
pub struct Tracer<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Tracer<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", line) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> Observer for Tracer<W> {
    fn instruction(&mut self, ctx: &Context<'_>, inst: &Instruction) {
        // Faults are reported once, from internal_halt.
        if inst.is_ihalt() {
            return;
        }
        let text = format_instruction(inst, ctx);
        self.emit(format_args!(">>> {}", text));
    }

    fn popped(&mut self, value: i32) {
        self.emit(format_args!("<<POP>> {}", value));
    }

    fn register_set(&mut self, reg: Register, value: i32) {
        self.emit(format_args!("<<SET {}>> {}", reg, value));
    }

    fn internal_halt(&mut self, reason: &HaltReason) {
        self.emit(format_args!(">> *** << Invalid program detected"));
        self.emit(format_args!(">> *** << {}", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::interpret_with;
    use picovm_core::codes::*;
    use picovm_core::Opcode;
    use pretty_assertions::assert_eq;

    fn trace_program(program: &[i32]) -> String {
        let mut ctx = Context::new(program);
        let mut tracer = Tracer::new(Vec::new());
        interpret_with(&mut ctx, &mut tracer);
        String::from_utf8(tracer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_format_register_operands() {
        let mut ctx = Context::new(&[]);
        ctx.set_register(Register::F, 9);
        let inst = Instruction::new(Opcode::Rjne, &[REG_F, -2]);
        assert_eq!(format_instruction(&inst, &ctx), "RJNE REG_F (9) -2");

        let inst = Instruction::new(Opcode::Push, &[5]);
        assert_eq!(format_instruction(&inst, &ctx), "PUSH 5");
    }

    #[test]
    fn test_format_ihalt() {
        let ctx = Context::new(&[]);
        let inst = Instruction::ihalt(HaltReason::MissingOpcodeParameter(Opcode::Push));
        assert_eq!(
            format_instruction(&inst, &ctx),
            "IHALT (Opcode (PUSH) requires more parameters than are available in the bytecode stream)"
        );
    }

    #[test]
    fn test_trace_arithmetic() {
        let text = trace_program(&[PUSH, 5, PUSH, 6, ADD, POP, HALT]);
        assert_eq!(
            text,
            ">>> PUSH 5\n>>> PUSH 6\n>>> ADD\n>>> POP\n<<POP>> 11\n>>> HALT\n"
        );
    }

    #[test]
    fn test_trace_set() {
        let text = trace_program(&[PUSH, 3, SET, REG_A, HALT]);
        assert_eq!(text, ">>> PUSH 3\n>>> SET REG_A (0)\n<<SET REG_A>> 3\n>>> HALT\n");
    }

    #[test]
    fn test_trace_fault_reported_once() {
        let text = trace_program(&[NOP]);
        assert_eq!(
            text,
            ">>> NOP\n>> *** << Invalid program detected\n>> *** << Bytecode terminates without a HALT opcode\n"
        );
    }

    #[derive(Debug)]
    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_does_not_stop_vm() {
        let program = [PUSH, 1, POP, HALT];
        let mut ctx = Context::new(&program);
        let mut tracer = Tracer::new(FailingWriter);
        let outcome = interpret_with(&mut ctx, &mut tracer);
        assert!(outcome.is_ok());
        assert_eq!(tracer.finish().unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
