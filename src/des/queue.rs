//! The event queue driving the simulation clock.
//!
//! Events are kept sorted by timestamp, and insertion is stable: an event
//! lands *after* every event already queued for the same instant. Same-time
//! events therefore fire in the order they were scheduled, which is what
//! makes whole runs deterministic.

use crate::des::event::{Event, Transition};
use crate::models::{ProcessId, ProcessTable, Time};
use std::collections::VecDeque;

/// Stable time-ordered queue of pending events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the initial `Ready` event of every process at its arrival
    /// instant, in creation order.
    pub fn seed(&mut self, table: &ProcessTable) {
        for process in table.iter() {
            self.insert(Event::new(process.id, process.arrival_time, Transition::Ready));
        }
    }

    /// Inserts an event behind all events with the same or earlier time.
    pub fn insert(&mut self, event: Event) {
        let at = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(at, event);
    }

    /// Removes and returns the earliest event, if any.
    pub fn pop_earliest(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Timestamp of the earliest pending event.
    pub fn peek_time(&self) -> Option<Time> {
        self.events.front().map(|e| e.time)
    }

    /// Drops every pending event for `process` except those at
    /// `except_time`. Used when a preemption overtakes an already scheduled
    /// future transition.
    pub fn cancel_pending(&mut self, process: ProcessId, except_time: Time) {
        self.events
            .retain(|e| e.process != process || e.time == except_time);
    }

    /// Whether `process` already has an event queued at exactly `time`.
    pub fn has_pending_at(&self, process: ProcessId, time: Time) -> bool {
        self.events
            .iter()
            .any(|e| e.process == process && e.time == time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut EventQueue) -> Vec<Event> {
        let mut out = Vec::new();
        while let Some(e) = queue.pop_earliest() {
            out.push(e);
        }
        out
    }

    #[test]
    fn test_pop_in_time_order() {
        let mut queue = EventQueue::new();
        queue.insert(Event::new(0, 30, Transition::Block));
        queue.insert(Event::new(1, 10, Transition::Ready));
        queue.insert(Event::new(2, 20, Transition::Run));

        let times: Vec<Time> = drain(&mut queue).iter().map(|e| e.time).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn test_equal_times_fire_in_insertion_order() {
        let mut queue = EventQueue::new();
        queue.insert(Event::new(0, 5, Transition::Ready));
        queue.insert(Event::new(1, 5, Transition::Ready));
        queue.insert(Event::new(2, 5, Transition::Ready));

        let pids: Vec<ProcessId> = drain(&mut queue).iter().map(|e| e.process).collect();
        assert_eq!(pids, vec![0, 1, 2]);
    }

    #[test]
    fn test_insert_lands_behind_earlier_and_equal() {
        let mut queue = EventQueue::new();
        queue.insert(Event::new(0, 10, Transition::Ready));
        queue.insert(Event::new(1, 20, Transition::Ready));
        // Same instant as the first event: must fire after it.
        queue.insert(Event::new(2, 10, Transition::Run));

        let order: Vec<(ProcessId, Time)> =
            drain(&mut queue).iter().map(|e| (e.process, e.time)).collect();
        assert_eq!(order, vec![(0, 10), (2, 10), (1, 20)]);
    }

    #[test]
    fn test_peek_time() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.peek_time(), None);
        queue.insert(Event::new(0, 7, Transition::Ready));
        assert_eq!(queue.peek_time(), Some(7));
        queue.pop_earliest();
        assert_eq!(queue.peek_time(), None);
    }

    #[test]
    fn test_cancel_pending_spares_except_time() {
        let mut queue = EventQueue::new();
        queue.insert(Event::new(0, 10, Transition::Preempt));
        queue.insert(Event::new(0, 25, Transition::Block));
        queue.insert(Event::new(1, 25, Transition::Ready));

        queue.cancel_pending(0, 10);

        let remaining = drain(&mut queue);
        assert_eq!(
            remaining,
            vec![
                Event::new(0, 10, Transition::Preempt),
                Event::new(1, 25, Transition::Ready),
            ]
        );
    }

    #[test]
    fn test_has_pending_at() {
        let mut queue = EventQueue::new();
        queue.insert(Event::new(3, 40, Transition::Block));
        assert!(queue.has_pending_at(3, 40));
        assert!(!queue.has_pending_at(3, 41));
        assert!(!queue.has_pending_at(2, 40));
    }

    #[test]
    fn test_seed_orders_by_arrival_then_creation() {
        use crate::models::{ProcessSpec, Workload};
        use crate::random::RandomTable;

        let workload = Workload::new()
            .with_process(ProcessSpec::new(8, 10, 5, 5))
            .with_process(ProcessSpec::new(0, 10, 5, 5))
            .with_process(ProcessSpec::new(0, 10, 5, 5));
        let mut random = RandomTable::from_values(vec![1]).unwrap();
        let table = ProcessTable::load(&workload, &mut random, 4);

        let mut queue = EventQueue::new();
        queue.seed(&table);

        let order: Vec<(ProcessId, Time)> =
            drain(&mut queue).iter().map(|e| (e.process, e.time)).collect();
        assert_eq!(order, vec![(1, 0), (2, 0), (0, 8)]);
    }
}
