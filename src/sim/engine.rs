//! The simulation engine.
//!
//! Couples the event queue, the process table, and a scheduling policy into
//! a single deterministic run.
//!
//! # Algorithm
//!
//! Repeat while events remain: pop the earliest event, advance the clock to
//! its timestamp, and apply its transition to the process (measuring the
//! time spent in the prior state). Transitions push follow-up events: a
//! dispatch schedules its own preemption, completion, or IO block; an IO
//! block schedules the return to ready. After each transition the scheduler
//! is consulted: if further events exist at this same instant they are
//! resolved first, otherwise, with the CPU free, the policy picks the next
//! process and a dispatch event is injected at the current time.
//!
//! The clock only ever jumps between event timestamps; idle CPU intervals
//! cost nothing to simulate.

use crate::des::{Event, EventQueue, Transition};
use crate::models::{ProcState, ProcessId, ProcessTable, Time, Workload, WorkloadError};
use crate::policy::{ConfigError, PolicySpec, SchedulerPolicy};
use crate::random::RandomTable;
use crate::sim::stats::{ProcessReport, RunReport, RunSummary, TraceRecord};
use thiserror::Error;
use tracing::debug;

/// A failed simulation, either at setup or mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Policy configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The workload failed validation.
    #[error("workload failed validation with {} problem(s)", .problems.len())]
    Workload { problems: Vec<WorkloadError> },
    /// An event fired for a process in the wrong state. Always an engine
    /// defect, never bad input.
    #[error("process {process}: {transition} event while {observed} (expected {expected})")]
    InvalidTransition {
        process: ProcessId,
        transition: Transition,
        observed: ProcState,
        expected: &'static str,
    },
}

/// Mutable run state threaded through the event loop. Built at the start
/// of [`Simulation::run`] and discarded with it.
struct RunState {
    clock: Time,
    /// The process currently on the CPU, if any.
    running: Option<ProcessId>,
    /// Set by every transition; cleared once the scheduler is consulted.
    consult: bool,
    /// Processes currently blocked on IO.
    blocked: usize,
    /// Start of the open IO-busy window; meaningful while `blocked > 0`.
    io_busy_since: Time,
    /// Closed IO-busy windows accumulated so far. Overlapping blocked
    /// intervals count once.
    io_busy_time: u64,
    trace: Vec<TraceRecord>,
}

/// A configured, ready-to-run simulation.
///
/// ```
/// use des_sched::models::Workload;
/// use des_sched::policy::PolicySpec;
/// use des_sched::random::RandomTable;
/// use des_sched::sim::Simulation;
///
/// let workload = Workload::parse("0 10 10 10").unwrap();
/// let random = RandomTable::from_values(vec![1]).unwrap();
/// let report = Simulation::new(&workload, PolicySpec::Fcfs, random)
///     .unwrap()
///     .run()
///     .unwrap();
/// assert_eq!(report.summary.finishing_time, 18);
/// ```
#[derive(Debug)]
pub struct Simulation {
    table: ProcessTable,
    queue: EventQueue,
    policy: Box<dyn SchedulerPolicy>,
    random: RandomTable,
    record_trace: bool,
}

impl Simulation {
    /// Validates the workload, builds the policy, loads the process table
    /// (drawing static priorities), and seeds the arrival events.
    pub fn new(
        workload: &Workload,
        policy: PolicySpec,
        mut random: RandomTable,
    ) -> Result<Self, SimError> {
        workload
            .validate()
            .map_err(|problems| SimError::Workload { problems })?;
        let policy = policy.build()?;
        let table = ProcessTable::load(workload, &mut random, policy.max_priority());
        let mut queue = EventQueue::new();
        queue.seed(&table);
        Ok(Self {
            table,
            queue,
            policy,
            random,
            record_trace: false,
        })
    }

    /// Enables recording of every processed event into the report.
    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Runs the simulation to completion and reports the outcome.
    pub fn run(mut self) -> Result<RunReport, SimError> {
        let label = self.policy.label();
        debug!(scheduler = %label, processes = self.table.len(), "simulation start");

        let mut state = RunState {
            clock: 0,
            running: None,
            consult: false,
            blocked: 0,
            io_busy_since: 0,
            io_busy_time: 0,
            trace: Vec::new(),
        };

        while let Some(event) = self.queue.pop_earliest() {
            let process = event.process;
            state.clock = event.time;
            let elapsed = state.clock - self.table[process].state_start_time;
            let from = self.table[process].state;

            match event.transition {
                Transition::Ready => self.on_ready(process, elapsed, &mut state)?,
                Transition::Run => self.on_run(process, elapsed, &mut state)?,
                Transition::Block => self.on_block(process, elapsed, &mut state)?,
                Transition::Preempt => self.on_preempt(process, elapsed, &mut state)?,
                Transition::Done => self.on_done(process, elapsed, &mut state)?,
            }

            if self.record_trace {
                state.trace.push(TraceRecord {
                    time: state.clock,
                    process,
                    elapsed,
                    from,
                    transition: event.transition,
                });
            }

            if state.consult {
                // Same-instant events are resolved before picking a
                // process, so simultaneous arrivals all enter the pool
                // first.
                if self.queue.peek_time() == Some(state.clock) {
                    continue;
                }
                state.consult = false;
                if state.running.is_none() {
                    if let Some(next) = self.policy.next() {
                        self.queue
                            .insert(Event::new(next, state.clock, Transition::Run));
                    }
                }
            }
        }

        debug!(t = state.clock, "simulation complete");

        let finishing_time = state.clock;
        let processes: Vec<ProcessReport> =
            self.table.iter().map(ProcessReport::from_process).collect();
        let summary = RunSummary::calculate(&processes, finishing_time, state.io_busy_time);
        Ok(RunReport {
            scheduler: label,
            processes,
            summary,
            trace: state.trace,
        })
    }

    /// Arrival or IO completion: the process becomes ready and enters the
    /// policy's pool. May preempt the running process on the spot.
    fn on_ready(
        &mut self,
        process: ProcessId,
        elapsed: u64,
        state: &mut RunState,
    ) -> Result<(), SimError> {
        let p = &mut self.table[process];
        let from = p.state;
        match from {
            ProcState::Created => {}
            ProcState::Blocked => {
                p.blocked_time += elapsed;
                p.dynamic_priority = p.static_priority as i32 - 1;
                state.blocked -= 1;
                if state.blocked == 0 {
                    state.io_busy_time += state.clock - state.io_busy_since;
                }
            }
            observed => {
                return Err(SimError::InvalidTransition {
                    process,
                    transition: Transition::Ready,
                    observed,
                    expected: "CREATED or BLOCKED",
                })
            }
        }
        p.state = ProcState::Ready;
        p.state_start_time = state.clock;
        debug!(t = state.clock, pid = process, dt = elapsed, "{} -> READY", from);

        self.policy.add(process, &mut self.table);

        if let Some(running_id) = state.running {
            let candidate = &self.table[process];
            let running = &self.table[running_id];
            if self
                .policy
                .test_preempt(candidate, running, state.clock, &self.queue)
            {
                debug!(
                    t = state.clock,
                    pid = running_id,
                    by = process,
                    "preempting running process"
                );
                self.queue.cancel_pending(running_id, state.clock);
                self.queue
                    .insert(Event::new(running_id, state.clock, Transition::Preempt));
            }
        }
        state.consult = true;
        Ok(())
    }

    /// Dispatch: the process takes the CPU. Draws a fresh burst when none
    /// is in progress and schedules exactly one follow-up event.
    fn on_run(
        &mut self,
        process: ProcessId,
        elapsed: u64,
        state: &mut RunState,
    ) -> Result<(), SimError> {
        let quantum = self.policy.quantum();
        let p = &mut self.table[process];
        if p.state != ProcState::Ready {
            return Err(SimError::InvalidTransition {
                process,
                transition: Transition::Run,
                observed: p.state,
                expected: "READY",
            });
        }
        p.waiting_time += elapsed;
        if p.current_burst == 0 {
            p.current_burst = self.random.next(p.cpu_burst_cap).min(p.remaining_cpu_time);
        }

        // Exactly one of preemption, completion, or IO ends this dispatch.
        let follow_up = if quantum < p.current_burst {
            Event::new(process, state.clock + quantum, Transition::Preempt)
        } else if p.current_burst == p.remaining_cpu_time {
            Event::new(process, state.clock + p.current_burst, Transition::Done)
        } else {
            Event::new(process, state.clock + p.current_burst, Transition::Block)
        };

        p.state = ProcState::Running;
        p.state_start_time = state.clock;
        debug!(
            t = state.clock,
            pid = process,
            dt = elapsed,
            cb = p.current_burst,
            rem = p.remaining_cpu_time,
            prio = p.dynamic_priority,
            "READY -> RUNNING"
        );

        state.running = Some(process);
        self.queue.insert(follow_up);
        state.consult = true;
        Ok(())
    }

    /// CPU burst finished with demand left: the process starts an IO burst.
    fn on_block(
        &mut self,
        process: ProcessId,
        elapsed: u64,
        state: &mut RunState,
    ) -> Result<(), SimError> {
        let p = &mut self.table[process];
        if p.state != ProcState::Running {
            return Err(SimError::InvalidTransition {
                process,
                transition: Transition::Block,
                observed: p.state,
                expected: "RUNNING",
            });
        }
        p.remaining_cpu_time -= elapsed;
        p.current_burst = 0;
        let io_burst = self.random.next(p.io_burst_cap);
        p.state = ProcState::Blocked;
        p.state_start_time = state.clock;
        debug!(
            t = state.clock,
            pid = process,
            dt = elapsed,
            ib = io_burst,
            rem = p.remaining_cpu_time,
            "RUNNING -> BLOCKED"
        );

        state.running = None;
        state.blocked += 1;
        if state.blocked == 1 {
            state.io_busy_since = state.clock;
        }
        self.queue
            .insert(Event::new(process, state.clock + io_burst, Transition::Ready));
        state.consult = true;
        Ok(())
    }

    /// Quantum expiry or priority preemption: back to ready with the burst
    /// remnant intact, one priority level down.
    fn on_preempt(
        &mut self,
        process: ProcessId,
        elapsed: u64,
        state: &mut RunState,
    ) -> Result<(), SimError> {
        let p = &mut self.table[process];
        if p.state != ProcState::Running {
            return Err(SimError::InvalidTransition {
                process,
                transition: Transition::Preempt,
                observed: p.state,
                expected: "RUNNING",
            });
        }
        p.remaining_cpu_time -= elapsed;
        p.current_burst -= elapsed;
        p.dynamic_priority -= 1;
        p.state = ProcState::Ready;
        p.state_start_time = state.clock;
        debug!(
            t = state.clock,
            pid = process,
            dt = elapsed,
            cb = p.current_burst,
            rem = p.remaining_cpu_time,
            prio = p.dynamic_priority,
            "RUNNING -> READY (preempted)"
        );

        if state.running == Some(process) {
            state.running = None;
        }
        self.policy.add(process, &mut self.table);
        state.consult = true;
        Ok(())
    }

    /// Final burst consumed the last of the CPU demand: terminal state.
    fn on_done(
        &mut self,
        process: ProcessId,
        elapsed: u64,
        state: &mut RunState,
    ) -> Result<(), SimError> {
        let p = &mut self.table[process];
        if p.state != ProcState::Running {
            return Err(SimError::InvalidTransition {
                process,
                transition: Transition::Done,
                observed: p.state,
                expected: "RUNNING",
            });
        }
        p.remaining_cpu_time = 0;
        p.current_burst = 0;
        p.finishing_time = state.clock;
        p.state = ProcState::Done;
        p.state_start_time = state.clock;
        debug!(t = state.clock, pid = process, dt = elapsed, "RUNNING -> DONE");

        state.running = None;
        state.consult = true;
        Ok(())
    }
}
