//! Timestamped transition events.

use crate::models::{ProcessId, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle step an event asks the engine to perform.
///
/// `Preempt` is transient: it moves a `Running` process back to `Ready`
/// without ever resting in a state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// `Created` or `Blocked` becomes `Ready`.
    Ready,
    /// `Ready` becomes `Running` (a dispatch).
    Run,
    /// `Running` becomes `Blocked` (burst finished, IO starts).
    Block,
    /// `Running` becomes `Ready` (quantum expiry or a higher priority
    /// process becoming ready).
    Preempt,
    /// `Running` becomes `Done` (all CPU demand consumed).
    Done,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Ready => "READY",
            Transition::Run => "RUN",
            Transition::Block => "BLOCK",
            Transition::Preempt => "PREEMPT",
            Transition::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// A transition scheduled for a process at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub process: ProcessId,
    pub time: Time,
    pub transition: Transition,
}

impl Event {
    pub fn new(process: ProcessId, time: Time, transition: Transition) -> Self {
        Self {
            process,
            time,
            transition,
        }
    }
}
