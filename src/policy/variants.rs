//! Built-in scheduling policies.
//!
//! One type per discipline. The two priority policies share their
//! active/expired pool machinery; everything else is a thin wrapper around
//! one ordered container.
//!
//! # References
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Aas (2005), "Understanding the Linux 2.6.8.1 CPU Scheduler"

use super::SchedulerPolicy;
use crate::des::EventQueue;
use crate::models::{Process, ProcessId, ProcessTable, Time};
use std::collections::VecDeque;

// ======================== Queue-order policies ========================

/// First Come First Served.
///
/// Processes run in the order they became ready, with no event-driven
/// preemption and a quantum long enough to never expire in practice.
#[derive(Debug, Clone, Default)]
pub struct Fcfs {
    queue: VecDeque<ProcessId>,
}

impl Fcfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulerPolicy for Fcfs {
    fn add(&mut self, process: ProcessId, _table: &mut ProcessTable) {
        self.queue.push_back(process);
    }

    fn next(&mut self) -> Option<ProcessId> {
        self.queue.pop_front()
    }

    fn label(&self) -> String {
        "FCFS".to_string()
    }
}

/// Last Come First Served.
///
/// The most recently readied process runs next.
#[derive(Debug, Clone, Default)]
pub struct Lcfs {
    stack: Vec<ProcessId>,
}

impl Lcfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulerPolicy for Lcfs {
    fn add(&mut self, process: ProcessId, _table: &mut ProcessTable) {
        self.stack.push(process);
    }

    fn next(&mut self) -> Option<ProcessId> {
        self.stack.pop()
    }

    fn label(&self) -> String {
        "LCFS".to_string()
    }
}

/// Shortest Remaining Time First.
///
/// The ready pool is kept sorted ascending by remaining CPU time, with ties
/// falling back to insertion order. The remaining time is captured when the
/// process is added and not revisited while it waits; only the process
/// actually running burns CPU, so a queued snapshot cannot go stale.
///
/// # Reference
/// Schrage (1968), "A Proof of the Optimality of the Shortest Remaining
/// Processing Time Discipline"
#[derive(Debug, Clone, Default)]
pub struct Srtf {
    queue: VecDeque<(ProcessId, u64)>,
}

impl Srtf {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulerPolicy for Srtf {
    fn add(&mut self, process: ProcessId, table: &mut ProcessTable) {
        let remaining = table[process].remaining_cpu_time;
        let at = self.queue.partition_point(|&(_, r)| r <= remaining);
        self.queue.insert(at, (process, remaining));
    }

    fn next(&mut self) -> Option<ProcessId> {
        self.queue.pop_front().map(|(process, _)| process)
    }

    fn label(&self) -> String {
        "SRTF".to_string()
    }
}

/// Round Robin.
///
/// FIFO order with a fixed quantum. Dynamic priority plays no part in the
/// ordering; `add` still resets it to the static baseline.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum: Time,
    queue: VecDeque<ProcessId>,
}

impl RoundRobin {
    /// # Panics
    ///
    /// Panics if `quantum` is 0.
    /// [`PolicySpec::build`](super::PolicySpec::build) reports the same
    /// condition as an error instead.
    pub fn new(quantum: Time) -> Self {
        assert!(quantum > 0, "quantum must be positive");
        Self {
            quantum,
            queue: VecDeque::new(),
        }
    }
}

impl SchedulerPolicy for RoundRobin {
    fn add(&mut self, process: ProcessId, table: &mut ProcessTable) {
        let p = &mut table[process];
        p.dynamic_priority = p.static_priority as i32 - 1;
        self.queue.push_back(process);
    }

    fn next(&mut self) -> Option<ProcessId> {
        self.queue.pop_front()
    }

    fn quantum(&self) -> Time {
        self.quantum
    }

    fn label(&self) -> String {
        format!("RR {}", self.quantum)
    }
}

// ======================== Priority policies ========================

/// Active/expired priority pools shared by [`Priority`] and
/// [`PreemptivePriority`].
///
/// Each pool holds one LIFO bucket per priority level. Processes whose
/// dynamic priority has decayed below level 0 are reset and parked in the
/// expired pool; they become eligible again only once the active pool is
/// fully drained and the pools swap. This is the aging scheme of the Linux
/// O(1) scheduler's paired priority arrays.
#[derive(Debug, Clone)]
struct PrioPools {
    active: Vec<Vec<ProcessId>>,
    expired: Vec<Vec<ProcessId>>,
}

impl PrioPools {
    fn new(levels: u32) -> Self {
        let levels = levels as usize;
        Self {
            active: vec![Vec::new(); levels],
            expired: vec![Vec::new(); levels],
        }
    }

    /// Files `process` by its dynamic priority. A decayed priority (-1) is
    /// reset to `static - 1` and the process goes to the expired pool.
    ///
    /// Panics if the level exceeds the configured level count, i.e. the
    /// policy was built with fewer levels than priorities were drawn with.
    fn add(&mut self, process: ProcessId, table: &mut ProcessTable) {
        let p = &mut table[process];
        let (pool, level) = if p.dynamic_priority >= 0 {
            (&mut self.active, p.dynamic_priority as usize)
        } else {
            p.dynamic_priority = p.static_priority as i32 - 1;
            (&mut self.expired, p.dynamic_priority as usize)
        };
        assert!(
            level < pool.len(),
            "priority level {} outside the {} configured levels",
            level,
            pool.len()
        );
        pool[level].push(process);
    }

    /// Pops from the highest non-empty active level; when the active pool
    /// is empty, swaps in the expired pool and retries once.
    fn next(&mut self) -> Option<ProcessId> {
        if let Some(process) = Self::pop_highest(&mut self.active) {
            return Some(process);
        }
        std::mem::swap(&mut self.active, &mut self.expired);
        Self::pop_highest(&mut self.active)
    }

    fn pop_highest(pool: &mut [Vec<ProcessId>]) -> Option<ProcessId> {
        pool.iter_mut().rev().find_map(|level| level.pop())
    }
}

/// Priority scheduling with aging.
///
/// Higher dynamic priority runs first. Every quantum expiry costs the
/// running process one priority level; once it decays past the lowest
/// level it sits out in the expired pool until the current generation of
/// active processes has drained.
#[derive(Debug, Clone)]
pub struct Priority {
    quantum: Time,
    levels: u32,
    pools: PrioPools,
}

impl Priority {
    /// `levels` must match the bound the process table drew static
    /// priorities with, so every dynamic priority indexes a real bucket.
    ///
    /// # Panics
    ///
    /// Panics if `quantum` or `levels` is 0.
    pub fn new(quantum: Time, levels: u32) -> Self {
        assert!(quantum > 0, "quantum must be positive");
        assert!(levels > 0, "at least one priority level required");
        Self {
            quantum,
            levels,
            pools: PrioPools::new(levels),
        }
    }
}

impl SchedulerPolicy for Priority {
    fn add(&mut self, process: ProcessId, table: &mut ProcessTable) {
        self.pools.add(process, table);
    }

    fn next(&mut self) -> Option<ProcessId> {
        self.pools.next()
    }

    fn quantum(&self) -> Time {
        self.quantum
    }

    fn max_priority(&self) -> u32 {
        self.levels
    }

    fn label(&self) -> String {
        format!("PRIO {}", self.quantum)
    }
}

/// Priority scheduling with aging and event-driven preemption.
///
/// Same pools as [`Priority`], plus: the moment a process becomes ready
/// with a strictly higher dynamic priority than the running one, the
/// running process is preempted on the spot instead of finishing its
/// quantum. A preemption is suppressed when the running process already
/// has an event due at this very instant, so it never transitions twice.
#[derive(Debug, Clone)]
pub struct PreemptivePriority {
    quantum: Time,
    levels: u32,
    pools: PrioPools,
}

impl PreemptivePriority {
    /// # Panics
    ///
    /// Panics if `quantum` or `levels` is 0.
    pub fn new(quantum: Time, levels: u32) -> Self {
        assert!(quantum > 0, "quantum must be positive");
        assert!(levels > 0, "at least one priority level required");
        Self {
            quantum,
            levels,
            pools: PrioPools::new(levels),
        }
    }
}

impl SchedulerPolicy for PreemptivePriority {
    fn add(&mut self, process: ProcessId, table: &mut ProcessTable) {
        self.pools.add(process, table);
    }

    fn next(&mut self) -> Option<ProcessId> {
        self.pools.next()
    }

    fn quantum(&self) -> Time {
        self.quantum
    }

    fn max_priority(&self) -> u32 {
        self.levels
    }

    fn test_preempt(
        &self,
        candidate: &Process,
        running: &Process,
        at_time: Time,
        queue: &EventQueue,
    ) -> bool {
        candidate.dynamic_priority > running.dynamic_priority
            && !queue.has_pending_at(running.id, at_time)
    }

    fn label(&self) -> String {
        format!("PREPRIO {}", self.quantum)
    }
}
