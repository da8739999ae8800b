//! Run reports and aggregate metrics.
//!
//! A finished simulation is summarized per process and across the run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Finishing time | Timestamp of the last event processed |
//! | Turnaround | completion - arrival, per process |
//! | CPU utilization | % of the run the CPU was executing a process |
//! | IO utilization | % of the run at least one process was blocked |
//! | Throughput | processes completed per 100 time units |

use crate::des::Transition;
use crate::models::{ProcState, Process, ProcessId, Time};
use serde::{Deserialize, Serialize};

/// Per-process outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub id: ProcessId,
    pub arrival_time: Time,
    pub total_cpu_time: u64,
    pub cpu_burst_cap: u64,
    pub io_burst_cap: u64,
    pub static_priority: u32,
    pub finishing_time: Time,
    /// `finishing_time - arrival_time`.
    pub turnaround_time: u64,
    /// Total time spent blocked on IO.
    pub blocked_time: u64,
    /// Total time spent ready, waiting for the CPU.
    pub waiting_time: u64,
}

impl ProcessReport {
    pub fn from_process(process: &Process) -> Self {
        Self {
            id: process.id,
            arrival_time: process.arrival_time,
            total_cpu_time: process.total_cpu_time,
            cpu_burst_cap: process.cpu_burst_cap,
            io_burst_cap: process.io_burst_cap,
            static_priority: process.static_priority,
            finishing_time: process.finishing_time,
            turnaround_time: process.turnaround_time(),
            blocked_time: process.blocked_time,
            waiting_time: process.waiting_time,
        }
    }
}

/// Aggregate metrics over a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Timestamp of the last event; the length of the run.
    pub finishing_time: Time,
    /// Percentage of the run spent executing some process.
    pub cpu_utilization: f64,
    /// Percentage of the run with at least one process blocked on IO.
    pub io_utilization: f64,
    pub avg_turnaround_time: f64,
    pub avg_waiting_time: f64,
    /// Completed processes per 100 time units.
    pub throughput: f64,
}

impl RunSummary {
    /// Computes the aggregates from per-process reports.
    ///
    /// `io_busy_time` is the union of all blocked intervals, measured by
    /// the engine; overlapping IO must not count twice, so it cannot be
    /// recovered from the per-process figures here.
    pub fn calculate(reports: &[ProcessReport], finishing_time: Time, io_busy_time: u64) -> Self {
        let mut total_turnaround: u64 = 0;
        let mut total_waiting: u64 = 0;
        let mut cpu_busy: u64 = 0;

        for report in reports {
            total_turnaround += report.turnaround_time;
            total_waiting += report.waiting_time;
            // What remains of a lifetime after IO and ready-waiting is
            // time actually executing.
            cpu_busy += report
                .turnaround_time
                .saturating_sub(report.blocked_time)
                .saturating_sub(report.waiting_time);
        }

        let count = reports.len();
        let (avg_turnaround_time, avg_waiting_time) = if count == 0 {
            (0.0, 0.0)
        } else {
            (
                total_turnaround as f64 / count as f64,
                total_waiting as f64 / count as f64,
            )
        };

        let (cpu_utilization, io_utilization, throughput) = if finishing_time == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                100.0 * cpu_busy as f64 / finishing_time as f64,
                100.0 * io_busy_time as f64 / finishing_time as f64,
                100.0 * count as f64 / finishing_time as f64,
            )
        };

        Self {
            finishing_time,
            cpu_utilization,
            io_utilization,
            avg_turnaround_time,
            avg_waiting_time,
            throughput,
        }
    }
}

/// One processed event, as recorded when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub time: Time,
    pub process: ProcessId,
    /// Time the process had spent in `from` when the event fired.
    pub elapsed: u64,
    /// State the process was in just before the transition.
    pub from: ProcState,
    pub transition: Transition,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Label of the policy that produced this run, e.g. `RR 2`.
    pub scheduler: String,
    /// One report per process, in id order.
    pub processes: Vec<ProcessReport>,
    pub summary: RunSummary,
    /// Every event processed, in order; empty unless tracing was enabled.
    pub trace: Vec<TraceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(
        id: ProcessId,
        arrival: Time,
        finishing: Time,
        blocked: u64,
        waiting: u64,
    ) -> ProcessReport {
        ProcessReport {
            id,
            arrival_time: arrival,
            total_cpu_time: 0,
            cpu_burst_cap: 1,
            io_burst_cap: 1,
            static_priority: 1,
            finishing_time: finishing,
            turnaround_time: finishing - arrival,
            blocked_time: blocked,
            waiting_time: waiting,
        }
    }

    #[test]
    fn test_summary_known_numbers() {
        // Two processes over a run of 100: executes 30+20, waits 10+10,
        // blocked 20+10.
        let reports = vec![make_report(0, 0, 60, 20, 10), make_report(1, 20, 60, 10, 10)];
        let summary = RunSummary::calculate(&reports, 100, 25);

        assert_eq!(summary.finishing_time, 100);
        assert!((summary.cpu_utilization - 50.0).abs() < 1e-10);
        assert!((summary.io_utilization - 25.0).abs() < 1e-10);
        assert!((summary.avg_turnaround_time - 50.0).abs() < 1e-10);
        assert!((summary.avg_waiting_time - 10.0).abs() < 1e-10);
        assert!((summary.throughput - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_empty_run_is_all_zero() {
        let summary = RunSummary::calculate(&[], 0, 0);
        assert_eq!(summary.finishing_time, 0);
        assert_eq!(summary.cpu_utilization, 0.0);
        assert_eq!(summary.io_utilization, 0.0);
        assert_eq!(summary.avg_turnaround_time, 0.0);
        assert_eq!(summary.avg_waiting_time, 0.0);
        assert_eq!(summary.throughput, 0.0);
    }

    #[test]
    fn test_process_report_from_process() {
        let mut process = Process::new(1, 10, 50, 8, 4, 3);
        process.finishing_time = 110;
        process.blocked_time = 30;
        process.waiting_time = 20;

        let report = ProcessReport::from_process(&process);
        assert_eq!(report.id, 1);
        assert_eq!(report.turnaround_time, 100);
        assert_eq!(report.blocked_time, 30);
        assert_eq!(report.waiting_time, 20);
        assert_eq!(report.static_priority, 3);
    }

    #[test]
    fn test_report_serde_round_trip() {
        let report = RunReport {
            scheduler: "RR 2".to_string(),
            processes: vec![make_report(0, 0, 18, 8, 0)],
            summary: RunSummary::calculate(&[make_report(0, 0, 18, 8, 0)], 18, 8),
            trace: vec![TraceRecord {
                time: 0,
                process: 0,
                elapsed: 0,
                from: ProcState::Created,
                transition: Transition::Ready,
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
