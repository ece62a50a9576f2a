//! Instruction decoder.

use picovm_core::{HaltReason, Instruction, Opcode, OperandKind, Register};

use crate::context::Context;

/// Decode the instruction at the context's instruction pointer.
///
/// Pure read: the instruction pointer is not moved. Any problem with the
/// stream comes back as an IHALT instruction carrying the reason.
pub fn decode(ctx: &Context<'_>) -> Instruction {
    let program = ctx.program();
    let ip = ctx.ip();

    let Some(&code) = program.get(ip) else {
        return Instruction::ihalt(HaltReason::MissingOpcode);
    };
    let Some(opcode) = Opcode::from_code(code) else {
        return Instruction::ihalt(HaltReason::InvalidOpcode(code));
    };
    if opcode == Opcode::IHalt {
        return Instruction::ihalt(HaltReason::ExplicitIHalt);
    }

    let kinds = opcode.operand_kinds();
    let Some(operands) = program.get(ip + 1..ip + 1 + kinds.len()) else {
        return Instruction::ihalt(HaltReason::MissingOpcodeParameter(opcode));
    };

    // Register operands index the register file, so they must name a register.
    for (kind, &value) in kinds.iter().zip(operands) {
        if *kind == OperandKind::Register && Register::from_code(value).is_none() {
            return Instruction::ihalt(HaltReason::InvalidRegister { opcode, value });
        }
    }

    Instruction::new(opcode, operands)
}
