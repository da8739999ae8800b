//! Process table: the arena owning every [`Process`] in a run.
//!
//! Processes are stored in a `Vec` and addressed by [`ProcessId`] index.
//! Everything else in the crate (events, policy queues, the engine) passes
//! these plain ids around instead of references, so there is a single owner
//! and no aliasing to fight.

use crate::models::process::{Process, ProcessId};
use crate::models::workload::Workload;
use crate::random::RandomTable;
use std::ops::{Index, IndexMut};

/// Owns all processes of a simulation, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes a validated workload into processes.
    ///
    /// Ids are assigned in workload order. One static priority is drawn per
    /// process, in that same order and before any burst is ever drawn, so
    /// priorities always consume the leading table values.
    pub fn load(workload: &Workload, random: &mut RandomTable, max_priority: u32) -> Self {
        let mut table = Self::new();
        for spec in workload.specs() {
            let static_priority = random.next(max_priority as u64) as u32;
            let id = table.processes.len();
            table.processes.push(Process::new(
                id,
                spec.arrival_time,
                spec.total_cpu_time,
                spec.cpu_burst_cap,
                spec.io_burst_cap,
                static_priority,
            ));
        }
        table
    }

    /// Appends a pre-built process, returning its id. The process keeps the
    /// id it was built with; callers are expected to use the returned one.
    pub fn push(&mut self, process: Process) -> ProcessId {
        let id = self.processes.len();
        self.processes.push(process);
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

impl Index<ProcessId> for ProcessTable {
    type Output = Process;

    fn index(&self, id: ProcessId) -> &Process {
        &self.processes[id]
    }
}

impl IndexMut<ProcessId> for ProcessTable {
    fn index_mut(&mut self, id: ProcessId) -> &mut Process {
        &mut self.processes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::process::ProcState;
    use crate::models::workload::ProcessSpec;

    #[test]
    fn test_load_assigns_ids_in_order() {
        let workload = Workload::new()
            .with_process(ProcessSpec::new(0, 100, 10, 5))
            .with_process(ProcessSpec::new(7, 50, 8, 4));
        let mut random = RandomTable::from_values(vec![1]).unwrap();
        let table = ProcessTable::load(&workload, &mut random, 4);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].id, 0);
        assert_eq!(table[1].id, 1);
        assert_eq!(table[1].arrival_time, 7);
        assert_eq!(table[0].state, ProcState::Created);
    }

    #[test]
    fn test_load_draws_one_priority_per_process() {
        let workload = Workload::new()
            .with_process(ProcessSpec::new(0, 10, 5, 5))
            .with_process(ProcessSpec::new(0, 10, 5, 5))
            .with_process(ProcessSpec::new(0, 10, 5, 5));
        // Draws 1 + v % 4: 1, 4, 3.
        let mut random = RandomTable::from_values(vec![0, 3, 2, 9]).unwrap();
        let table = ProcessTable::load(&workload, &mut random, 4);

        assert_eq!(table[0].static_priority, 1);
        assert_eq!(table[1].static_priority, 4);
        assert_eq!(table[2].static_priority, 3);
        assert_eq!(table[2].dynamic_priority, 2);
        // The next draw continues after the three consumed values.
        assert_eq!(random.next(100), 10);
    }

    #[test]
    fn test_index_mut_updates_in_place() {
        let workload = Workload::new().with_process(ProcessSpec::new(0, 10, 5, 5));
        let mut random = RandomTable::from_values(vec![1]).unwrap();
        let mut table = ProcessTable::load(&workload, &mut random, 4);

        table[0].remaining_cpu_time = 3;
        assert_eq!(table[0].remaining_cpu_time, 3);
    }

    #[test]
    fn test_push_returns_next_id() {
        let mut table = ProcessTable::new();
        let id = table.push(Process::new(0, 0, 10, 5, 5, 2));
        assert_eq!(id, 0);
        let id = table.push(Process::new(1, 4, 10, 5, 5, 2));
        assert_eq!(id, 1);
        assert_eq!(table.iter().count(), 2);
    }
}
