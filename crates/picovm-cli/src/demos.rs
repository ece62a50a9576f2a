//! Built-in literal programs.

use picovm_core::codes::*;

pub struct Demo {
    pub name: &'static str,
    pub about: &'static str,
    pub program: &'static [i32],
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "add",
        about: "Push 5 and 6, add them, pop the result",
        program: &[PUSH, 5, PUSH, 6, ADD, POP, HALT],
    },
    Demo {
        name: "registers",
        about: "Load two registers, add them with RADD, then add 6",
        program: &[
            PUSH, 3, SET, REG_A, RDEC, REG_A, PUSH, 3, SET, REG_B, RADD, REG_A, REG_B, PUSH, 6, ADD,
            POP, HALT,
        ],
    },
    Demo {
        name: "countdown",
        about: "Count REG_F down from 10 with an RJNE loop",
        program: &[PUSH, 10, SET, REG_F, PUSH, 0, RDEC, REG_F, RJNE, REG_F, -2, HALT],
    },
    Demo {
        name: "spin",
        about: "RJNE with offset 0; never halts (use --max-steps)",
        program: &[PUSH, 1, RJNE, REG_A, 0, HALT],
    },
    Demo {
        name: "no-halt",
        about: "Runs off the end of the stream",
        program: &[PUSH, 1, POP],
    },
    Demo {
        name: "truncated",
        about: "PUSH without its operand",
        program: &[NOP, PUSH],
    },
    Demo {
        name: "underflow",
        about: "ADD with a single value on the stack",
        program: &[PUSH, 1, ADD, HALT],
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|d| d.name == name)
}
