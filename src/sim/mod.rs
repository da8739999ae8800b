//! Simulation engine and run reports.

mod engine;
mod stats;

pub use engine::{SimError, Simulation};
pub use stats::{ProcessReport, RunReport, RunSummary, TraceRecord};
