//! End-to-end runs of literal programs.

use picovm_core::codes::*;
use picovm_vm::{
    decode, interpret, interpret_with, step, Context, HaltReason, Instruction, Observer, Opcode,
    Outcome, Register, Snapshot, STACK_CAPACITY,
};
use pretty_assertions::assert_eq;

/// Records what the interpreter reports.
#[derive(Default)]
struct Recorder {
    executed: Vec<Opcode>,
    popped: Vec<i32>,
    sets: Vec<(Register, i32)>,
    faults: Vec<HaltReason>,
}

impl Observer for Recorder {
    fn instruction(&mut self, _ctx: &Context<'_>, inst: &Instruction) {
        self.executed.push(inst.opcode);
    }

    fn popped(&mut self, value: i32) {
        self.popped.push(value);
    }

    fn register_set(&mut self, reg: Register, value: i32) {
        self.sets.push((reg, value));
    }

    fn internal_halt(&mut self, reason: &HaltReason) {
        self.faults.push(*reason);
    }
}

fn run(program: &[i32]) -> (Outcome, Snapshot, Recorder) {
    let mut ctx = Context::new(program);
    let mut rec = Recorder::default();
    let outcome = interpret_with(&mut ctx, &mut rec);
    (outcome, ctx.snapshot(), rec)
}

#[test]
fn test_arithmetic() {
    let (outcome, snap, rec) = run(&[PUSH, 5, PUSH, 6, ADD, POP, HALT]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(rec.popped, vec![11]);
    assert!(snap.stack.is_empty());
    assert!(rec.faults.is_empty());
}

#[test]
fn test_register_loop() {
    #[rustfmt::skip]
    let program = [
        PUSH, 10,
        SET, REG_F,
        PUSH, 0,
        RDEC, REG_F,
        RJNE, REG_F, -2,
        HALT,
    ];
    let (outcome, snap, rec) = run(&program);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(snap.registers[Register::F.index()], 0);
    assert_eq!(snap.stack, vec![0]);

    let decrements = rec.executed.iter().filter(|op| **op == Opcode::RDec).count();
    let compares = rec.executed.iter().filter(|op| **op == Opcode::Rjne).count();
    assert_eq!(decrements, 10);
    assert_eq!(compares, 10);
    assert_eq!(rec.executed.last(), Some(&Opcode::Halt));
    assert_eq!(rec.sets, vec![(Register::F, 10)]);
}

#[test]
fn test_register_arithmetic() {
    #[rustfmt::skip]
    let program = [
        PUSH, 3,
        SET, REG_A,
        RDEC, REG_A,
        PUSH, 3,
        SET, REG_B,
        RADD, REG_A, REG_B,
        PUSH, 6,
        ADD,
        POP,
        HALT,
    ];
    let (outcome, snap, rec) = run(&program);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(rec.popped, vec![11]);
    assert_eq!(&snap.registers[..2], &[2, 3]);
}

#[test]
fn test_missing_halt() {
    let program = [NOP];
    let mut ctx = Context::new(&program);
    let outcome = interpret(&mut ctx);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::MissingOpcode));
    assert_eq!(ctx.ip(), 1);
}

#[test]
fn test_truncated_push() {
    let program = [PUSH];
    let ctx = Context::new(&program);
    let inst = decode(&ctx);
    assert_eq!(inst.opcode, Opcode::IHalt);
    assert_eq!(
        inst.halt_reason(),
        Some(HaltReason::MissingOpcodeParameter(Opcode::Push))
    );

    let (outcome, _, rec) = run(&program);
    assert_eq!(
        outcome,
        Outcome::Faulted(HaltReason::MissingOpcodeParameter(Opcode::Push))
    );
    assert_eq!(rec.faults.len(), 1);
}

#[test]
fn test_explicit_ihalt_rejected() {
    let program = [IHALT, HALT];
    let ctx = Context::new(&program);
    assert_eq!(decode(&ctx).halt_reason(), Some(HaltReason::ExplicitIHalt));

    let (outcome, snap, _) = run(&program);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::ExplicitIHalt));
    assert_eq!(snap.ip, 0);
}

#[test]
fn test_pop_empty_stack() {
    let (outcome, snap, rec) = run(&[POP, HALT]);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::StackUnderflow));
    assert!(rec.popped.is_empty());
    assert_eq!(snap.ip, 0);
}

#[test]
fn test_set_empty_stack() {
    let (outcome, snap, rec) = run(&[SET, REG_A, HALT]);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::StackUnderflow));
    assert!(rec.sets.is_empty());
    assert_eq!(snap.registers, [0; 6]);
}

#[test]
fn test_push_overflow_halts() {
    let mut program = Vec::new();
    for i in 0..=STACK_CAPACITY as i32 {
        program.extend_from_slice(&[PUSH, i]);
    }
    program.push(HALT);

    let (outcome, snap, rec) = run(&program);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::StackOverflow));
    assert_eq!(snap.stack.len(), STACK_CAPACITY);
    assert_eq!(snap.stack.last(), Some(&(STACK_CAPACITY as i32 - 1)));
    // Halted on the 257th PUSH.
    assert_eq!(snap.ip, STACK_CAPACITY * 2);
    assert_eq!(rec.faults, vec![HaltReason::StackOverflow]);
}

#[test]
fn test_radd_overflow_halts() {
    let mut program = Vec::new();
    for _ in 0..STACK_CAPACITY {
        program.extend_from_slice(&[PUSH, 0]);
    }
    program.extend_from_slice(&[RADD, REG_A, REG_B, HALT]);
    let (outcome, _, _) = run(&program);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::StackOverflow));
}

#[test]
fn test_invalid_register_operand() {
    let (outcome, _, _) = run(&[PUSH, 1, SET, 17, HALT]);
    assert_eq!(
        outcome,
        Outcome::Faulted(HaltReason::InvalidRegister { opcode: Opcode::Set, value: 17 })
    );
}

#[test]
fn test_unknown_opcode() {
    let (outcome, _, _) = run(&[NOP, -3, HALT]);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::InvalidOpcode(-3)));
}

#[test]
fn test_jump_past_end() {
    let (outcome, snap, _) = run(&[PUSH, 1, RJNE, REG_A, 50, HALT]);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::MissingOpcode));
    assert_eq!(snap.ip, 52);
}

#[test]
fn test_jump_before_start() {
    let (outcome, snap, rec) = run(&[PUSH, 1, RJNE, REG_A, i32::MIN, HALT]);
    let reason = HaltReason::JumpOutOfRange { from: 2, offset: i32::MIN };
    assert_eq!(outcome, Outcome::Faulted(reason));
    assert_eq!(snap.ip, 2);
    assert_eq!(rec.faults, vec![reason]);
}

#[test]
fn test_add_empty_stack() {
    let program = [ADD, HALT];
    let mut ctx = Context::new(&program);
    let mut rec = Recorder::default();
    let outcome = interpret_with(&mut ctx, &mut rec);
    assert_eq!(outcome, Outcome::Faulted(HaltReason::StackUnderflow));
    assert_eq!(outcome.reason(), Some(&HaltReason::StackUnderflow));
    assert_eq!(ctx.ip(), 0);
    assert_eq!(ctx.sp(), -1);
    assert_eq!(ctx.depth(), 0);
    assert!(ctx.stack_underflow());
    // The first pop fails, so the fault is raised once and no IHALT is decoded.
    assert_eq!(rec.executed, vec![Opcode::Add]);
    assert_eq!(rec.faults, vec![HaltReason::StackUnderflow]);
}

#[test]
fn test_offset_zero_spins() {
    let program = [PUSH, 1, RJNE, REG_A, 0, HALT];
    let mut ctx = Context::new(&program);
    for _ in 0..10_000 {
        assert!(step(&mut ctx, &mut ()));
    }
    assert_eq!(ctx.ip(), 2);
    assert!(!ctx.is_halted());
}

#[test]
fn test_halted_context_is_idempotent() {
    let program = [PUSH, 5, PUSH, 6, ADD, POP, HALT];
    let mut ctx = Context::new(&program);
    interpret(&mut ctx);
    let before = ctx.snapshot();

    let mut rec = Recorder::default();
    let outcome = interpret_with(&mut ctx, &mut rec);
    assert_eq!(outcome, Outcome::Halted);
    assert!(rec.executed.is_empty());
    assert_eq!(ctx.snapshot(), before);
}

#[test]
fn test_stack_round_trip() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..32 {
        let n = rng.usize(0..=STACK_CAPACITY);
        let values: Vec<i32> = (0..n).map(|_| rng.i32(..)).collect();

        let mut ctx = Context::new(&[]);
        for &v in &values {
            ctx.push(v);
            assert!(!ctx.stack_overflow());
        }
        let popped: Vec<i32> = (0..n).map(|_| ctx.pop()).collect();
        let expected: Vec<i32> = values.iter().rev().copied().collect();
        assert_eq!(popped, expected);
        assert!(!ctx.stack_underflow());
        assert!(!ctx.stack_overflow());
        assert_eq!(ctx.depth(), 0);
    }
}

#[test]
fn test_overflow_boundary() {
    let mut ctx = Context::new(&[]);
    for i in 0..STACK_CAPACITY {
        ctx.push(i as i32);
        assert!(!ctx.stack_overflow(), "push {} overflowed", i + 1);
    }
    ctx.push(0);
    assert!(ctx.stack_overflow());
    assert_eq!(ctx.depth(), STACK_CAPACITY);
}

#[test]
fn test_underflow_boundary() {
    let mut ctx = Context::new(&[]);
    assert_eq!(ctx.pop(), 0);
    assert!(ctx.stack_underflow());
    assert_eq!(ctx.sp(), -1);
}

#[test]
fn test_contexts_on_separate_threads() {
    let program: &'static [i32] = &[
        PUSH, 100, SET, REG_A, PUSH, 0, RDEC, REG_A, RJNE, REG_A, -2, HALT,
    ];
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                let mut ctx = Context::new(program);
                let outcome = interpret(&mut ctx);
                (outcome, ctx.register(Register::A))
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (Outcome::Halted, 0));
    }
}
