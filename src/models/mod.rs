//! Simulation domain models.
//!
//! Everything the engine manipulates lives here: the workload (what the user
//! asks to run), the processes materialized from it, and the table that owns
//! them. Processes are addressed by plain [`ProcessId`] indices everywhere
//! else in the crate.
//!
//! | Type | Role |
//! |------|------|
//! | [`ProcessSpec`] / [`Workload`] | Input parameters, one spec per process |
//! | [`Process`] | Live state of one process during a run |
//! | [`ProcessTable`] | Arena owning all processes, indexed by id |

mod process;
mod registry;
mod workload;

pub use process::{ProcState, Process, ProcessId, Time};
pub use registry::ProcessTable;
pub use workload::{ProcessSpec, Workload, WorkloadError, WorkloadResult};
