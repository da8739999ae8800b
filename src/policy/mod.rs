//! Scheduling policies.
//!
//! A policy owns the ready pool. The engine hands it every process that
//! becomes ready (`add`) and asks it which process to dispatch next
//! (`next`); how the pool is ordered between those calls is entirely the
//! policy's business. Preemptive policies also get a veto point
//! (`test_preempt`) when a newly readied process might oust the running
//! one.
//!
//! # Built-in Policies
//!
//! | Policy | Discipline | Preempts ready→running |
//! |--------|------------|------------------------|
//! | [`Fcfs`] | FIFO | no |
//! | [`Lcfs`] | LIFO | no |
//! | [`Srtf`] | shortest remaining CPU time first | no |
//! | [`RoundRobin`] | FIFO with quantum | no |
//! | [`Priority`] | aging priority pools with quantum | no |
//! | [`PreemptivePriority`] | aging priority pools with quantum | yes |
//!
//! All policies preempt on quantum expiry; only `PreemptivePriority` also
//! preempts the moment a higher priority process becomes ready.

mod variants;

pub use variants::{Fcfs, Lcfs, PreemptivePriority, Priority, RoundRobin, Srtf};

use crate::des::EventQueue;
use crate::models::{Process, ProcessId, ProcessTable, Time};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Quantum used by policies that do not take one: effectively no
/// preemption for realistic burst lengths.
pub const DEFAULT_QUANTUM: Time = 10_000;

/// Priority levels used by policies that do not take a level count.
pub const DEFAULT_MAX_PRIORITY: u32 = 4;

/// A configuration problem detected when building a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("quantum must be positive")]
    ZeroQuantum,
    #[error("priority level count must be positive")]
    ZeroLevels,
}

/// Ready-pool discipline shared by all scheduling policies.
///
/// The engine is the only caller and upholds two conventions: every id
/// passed to `add` refers to a `Ready` process in `table`, and ids returned
/// by `next` are dispatched immediately.
pub trait SchedulerPolicy: Send + Sync + Debug {
    /// Accepts a process that has just become ready.
    ///
    /// The table is mutable so that disciplines with priority bookkeeping
    /// can adjust the process on entry.
    fn add(&mut self, process: ProcessId, table: &mut ProcessTable);

    /// Removes and returns the process to dispatch next, if any is ready.
    fn next(&mut self) -> Option<ProcessId>;

    /// How long a dispatched process may run before a forced preemption.
    fn quantum(&self) -> Time {
        DEFAULT_QUANTUM
    }

    /// Number of priority levels; static priorities are drawn in
    /// `[1, max_priority]`.
    fn max_priority(&self) -> u32 {
        DEFAULT_MAX_PRIORITY
    }

    /// Whether `candidate`, readied at `at_time`, should preempt `running`
    /// immediately. Policies without event-driven preemption keep the
    /// default.
    fn test_preempt(
        &self,
        _candidate: &Process,
        _running: &Process,
        _at_time: Time,
        _queue: &EventQueue,
    ) -> bool {
        false
    }

    /// Display label carried into run reports, e.g. `RR 2`.
    fn label(&self) -> String;
}

/// Declarative policy selection, the serializable counterpart of the
/// [`SchedulerPolicy`] objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicySpec {
    #[default]
    Fcfs,
    Lcfs,
    Srtf,
    RoundRobin {
        quantum: Time,
    },
    Priority {
        quantum: Time,
        levels: u32,
    },
    PreemptivePriority {
        quantum: Time,
        levels: u32,
    },
}

impl PolicySpec {
    /// Builds the policy, rejecting degenerate configuration up front.
    pub fn build(&self) -> Result<Box<dyn SchedulerPolicy>, ConfigError> {
        match *self {
            PolicySpec::Fcfs => Ok(Box::new(Fcfs::new())),
            PolicySpec::Lcfs => Ok(Box::new(Lcfs::new())),
            PolicySpec::Srtf => Ok(Box::new(Srtf::new())),
            PolicySpec::RoundRobin { quantum } => {
                Self::check_quantum(quantum)?;
                Ok(Box::new(RoundRobin::new(quantum)))
            }
            PolicySpec::Priority { quantum, levels } => {
                Self::check_quantum(quantum)?;
                Self::check_levels(levels)?;
                Ok(Box::new(Priority::new(quantum, levels)))
            }
            PolicySpec::PreemptivePriority { quantum, levels } => {
                Self::check_quantum(quantum)?;
                Self::check_levels(levels)?;
                Ok(Box::new(PreemptivePriority::new(quantum, levels)))
            }
        }
    }

    fn check_quantum(quantum: Time) -> Result<(), ConfigError> {
        if quantum == 0 {
            Err(ConfigError::ZeroQuantum)
        } else {
            Ok(())
        }
    }

    fn check_levels(levels: u32) -> Result<(), ConfigError> {
        if levels == 0 {
            Err(ConfigError::ZeroLevels)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_labels() {
        let labels: Vec<String> = [
            PolicySpec::Fcfs,
            PolicySpec::Lcfs,
            PolicySpec::Srtf,
            PolicySpec::RoundRobin { quantum: 2 },
            PolicySpec::Priority {
                quantum: 5,
                levels: 4,
            },
            PolicySpec::PreemptivePriority {
                quantum: 5,
                levels: 4,
            },
        ]
        .iter()
        .map(|spec| spec.build().unwrap().label())
        .collect();
        assert_eq!(labels, vec!["FCFS", "LCFS", "SRTF", "RR 2", "PRIO 5", "PREPRIO 5"]);
    }

    #[test]
    fn test_build_rejects_zero_quantum() {
        let spec = PolicySpec::RoundRobin { quantum: 0 };
        assert_eq!(spec.build().err(), Some(ConfigError::ZeroQuantum));
        let spec = PolicySpec::Priority {
            quantum: 0,
            levels: 4,
        };
        assert_eq!(spec.build().err(), Some(ConfigError::ZeroQuantum));
    }

    #[test]
    fn test_build_rejects_zero_levels() {
        let spec = PolicySpec::PreemptivePriority {
            quantum: 2,
            levels: 0,
        };
        assert_eq!(spec.build().err(), Some(ConfigError::ZeroLevels));
    }

    #[test]
    fn test_defaults_for_unparameterized_policies() {
        let policy = PolicySpec::Fcfs.build().unwrap();
        assert_eq!(policy.quantum(), DEFAULT_QUANTUM);
        assert_eq!(policy.max_priority(), DEFAULT_MAX_PRIORITY);
    }

    #[test]
    fn test_parameterized_policies_report_their_config() {
        let policy = PolicySpec::PreemptivePriority {
            quantum: 7,
            levels: 3,
        }
        .build()
        .unwrap();
        assert_eq!(policy.quantum(), 7);
        assert_eq!(policy.max_priority(), 3);
    }
}
