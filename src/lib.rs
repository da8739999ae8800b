//! Discrete-event CPU scheduling simulator.
//!
//! Simulates a single CPU serving a workload of processes that alternate
//! CPU bursts with IO, under a pluggable scheduling policy. Time is
//! logical: the clock jumps from event to event, and every run is fully
//! deterministic, because burst lengths and priorities come from a fixed
//! random table and simultaneous events resolve in a stable order.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Workload`, `ProcessSpec`, `Process`,
//!   `ProcessTable`)
//! - **`random`**: The bounded deterministic random source
//! - **`des`**: Discrete-event core (`Event`, `Transition`, `EventQueue`)
//! - **`policy`**: The `SchedulerPolicy` trait and the six built-in
//!   policies (FCFS, LCFS, SRTF, RR, PRIO, PREPRIO)
//! - **`sim`**: The `Simulation` engine and its run reports
//!
//! # Architecture
//!
//! The process table owns every process; events and policy queues refer to
//! processes by plain integer id. The engine is the only piece that
//! mutates run state, so the whole simulation is a single-threaded,
//! lock-free event loop.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Banks, Carson, Nelson & Nicol (2010), "Discrete-Event System Simulation"

pub mod des;
pub mod models;
pub mod policy;
pub mod random;
pub mod sim;
