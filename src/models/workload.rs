//! Workload definition and validation.
//!
//! A workload is an ordered list of process parameter lines. The text form
//! is one process per line, four whitespace-separated integers:
//!
//! ```text
//! arrival_time  total_cpu_time  cpu_burst_cap  io_burst_cap
//! ```
//!
//! Line order fixes the process ids: the first line becomes process 0 and so
//! on. Blank lines are skipped.

use crate::models::process::{ProcessId, Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workload validation result, collecting every detected problem.
pub type WorkloadResult = Result<(), Vec<WorkloadError>>;

/// A problem with a workload definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkloadError {
    /// A line did not have exactly four fields.
    #[error("line {line}: expected `arrival total cpu-cap io-cap`, found {found} fields")]
    MalformedLine { line: usize, found: usize },
    /// A field could not be parsed as an integer.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    /// A process demands no CPU time at all.
    #[error("process {id}: total CPU time must be positive")]
    ZeroTotalCpu { id: ProcessId },
    /// A zero cap would leave the burst draw with an empty range.
    #[error("process {id}: CPU burst cap must be positive")]
    ZeroCpuBurstCap { id: ProcessId },
    /// A zero cap would leave the IO draw with an empty range.
    #[error("process {id}: IO burst cap must be positive")]
    ZeroIoBurstCap { id: ProcessId },
}

/// Immutable parameters of one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Instant the process becomes known to the scheduler.
    pub arrival_time: Time,
    /// Total CPU demand over the whole lifetime.
    pub total_cpu_time: u64,
    /// Upper bound for each drawn CPU burst.
    pub cpu_burst_cap: u64,
    /// Upper bound for each drawn IO burst.
    pub io_burst_cap: u64,
}

impl ProcessSpec {
    pub fn new(
        arrival_time: Time,
        total_cpu_time: u64,
        cpu_burst_cap: u64,
        io_burst_cap: u64,
    ) -> Self {
        Self {
            arrival_time,
            total_cpu_time,
            cpu_burst_cap,
            io_burst_cap,
        }
    }
}

/// An ordered set of process specs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    specs: Vec<ProcessSpec>,
}

impl Workload {
    /// Creates an empty workload.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: Vec<ProcessSpec>) -> Self {
        Self { specs }
    }

    /// Appends a process spec (builder style).
    pub fn with_process(mut self, spec: ProcessSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Parses the line-oriented text format. Stops at the first bad line.
    pub fn parse(text: &str) -> Result<Self, WorkloadError> {
        let mut specs = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let line_no = index + 1;
            if fields.len() != 4 {
                return Err(WorkloadError::MalformedLine {
                    line: line_no,
                    found: fields.len(),
                });
            }
            let mut numbers = [0u64; 4];
            for (slot, token) in numbers.iter_mut().zip(&fields) {
                *slot = token.parse().map_err(|_| WorkloadError::InvalidNumber {
                    line: line_no,
                    token: token.to_string(),
                })?;
            }
            specs.push(ProcessSpec::new(numbers[0], numbers[1], numbers[2], numbers[3]));
        }
        Ok(Self { specs })
    }

    /// Checks every spec, returning all problems at once.
    ///
    /// Zero burst caps and zero total CPU time are rejected: each burst draw
    /// needs a non-empty `[1, cap]` range, and a process with no CPU demand
    /// could never reach completion through a burst.
    pub fn validate(&self) -> WorkloadResult {
        let mut errors = Vec::new();
        for (id, spec) in self.specs.iter().enumerate() {
            if spec.total_cpu_time == 0 {
                errors.push(WorkloadError::ZeroTotalCpu { id });
            }
            if spec.cpu_burst_cap == 0 {
                errors.push(WorkloadError::ZeroCpuBurstCap { id });
            }
            if spec.io_burst_cap == 0 {
                errors.push(WorkloadError::ZeroIoBurstCap { id });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
