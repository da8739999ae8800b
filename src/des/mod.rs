//! Discrete-event core: events and the queue that orders them.
//!
//! The simulation clock never ticks; it jumps from one event timestamp to
//! the next. All ordering guarantees live in [`EventQueue`].

mod event;
mod queue;

pub use event::{Event, Transition};
pub use queue::EventQueue;
