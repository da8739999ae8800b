//! Process state tracked across a simulation run.
//!
//! # Lifecycle
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Created` | Admitted, waiting for its arrival instant |
//! | `Ready` | Runnable, waiting to be dispatched |
//! | `Running` | Executing on the single CPU |
//! | `Blocked` | Performing IO |
//! | `Done` | All CPU demand consumed |
//!
//! Preemption is a transition back to `Ready`, not a state of its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated time, in abstract integer time units.
pub type Time = u64;

/// Index of a process in its [`ProcessTable`](super::ProcessTable).
///
/// Ids are assigned densely in creation order, so they double as stable
/// tie-breakers wherever ordering falls back to "earlier process first".
pub type ProcessId = usize;

/// Where a process currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcState {
    Created,
    Ready,
    Running,
    Blocked,
    Done,
}

impl fmt::Display for ProcState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcState::Created => "CREATED",
            ProcState::Ready => "READY",
            ProcState::Running => "RUNNING",
            ProcState::Blocked => "BLOCKED",
            ProcState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// A single simulated process.
///
/// The first four fields are the immutable workload parameters; the rest is
/// mutable run state owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: Time,
    pub total_cpu_time: u64,
    pub cpu_burst_cap: u64,
    pub io_burst_cap: u64,

    /// Drawn once at load time, in `[1, max_priority]`. Higher is better.
    pub static_priority: u32,
    /// Decays by one per quantum expiry; reset to `static_priority - 1`
    /// whenever the process returns from IO. May reach -1.
    pub dynamic_priority: i32,

    pub state: ProcState,
    /// Instant the current state was entered; transitions measure the time
    /// spent in the prior state against this.
    pub state_start_time: Time,
    /// CPU demand not yet consumed.
    pub remaining_cpu_time: u64,
    /// Remnant of the in-progress CPU burst, 0 when no burst is active.
    /// A preempted burst resumes from here instead of drawing anew.
    pub current_burst: u64,
    /// Accumulated time spent in `Blocked`.
    pub blocked_time: u64,
    /// Accumulated time spent in `Ready`.
    pub waiting_time: u64,
    /// Instant the process entered `Done`; meaningless until then.
    pub finishing_time: Time,
}

impl Process {
    /// Creates a process in `Created` state with its full CPU demand ahead
    /// of it. `dynamic_priority` starts one below the static priority.
    pub fn new(
        id: ProcessId,
        arrival_time: Time,
        total_cpu_time: u64,
        cpu_burst_cap: u64,
        io_burst_cap: u64,
        static_priority: u32,
    ) -> Self {
        Self {
            id,
            arrival_time,
            total_cpu_time,
            cpu_burst_cap,
            io_burst_cap,
            static_priority,
            dynamic_priority: static_priority as i32 - 1,
            state: ProcState::Created,
            state_start_time: arrival_time,
            remaining_cpu_time: total_cpu_time,
            current_burst: 0,
            blocked_time: 0,
            waiting_time: 0,
            finishing_time: arrival_time,
        }
    }

    /// Time between arrival and completion. Only meaningful once `Done`.
    pub fn turnaround_time(&self) -> u64 {
        self.finishing_time - self.arrival_time
    }

    pub fn is_done(&self) -> bool {
        self.state == ProcState::Done
    }
}
