//! Run results.

use picovm_core::{HaltReason, REGISTER_COUNT};

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Outcome {
    /// The program executed HALT.
    Halted,
    /// The run ended through an internal halt.
    Faulted(HaltReason),
}

impl Outcome {
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Halted)
    }

    /// The halt reason, if the run faulted.
    pub fn reason(&self) -> Option<&HaltReason> {
        match self {
            Outcome::Halted => None,
            Outcome::Faulted(reason) => Some(reason),
        }
    }
}

/// Owned copy of a context's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub ip: usize,
    pub registers: [i32; REGISTER_COUNT],
    /// Bottom first.
    pub stack: Vec<i32>,
    /// `None` while still running.
    pub outcome: Option<Outcome>,
}
