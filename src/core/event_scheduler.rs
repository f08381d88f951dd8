use super::types::{ProcessId, SimTime};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pending resumption of a process at a given simulated hour
#[derive(Debug, Clone, Copy)]
pub struct ScheduledWake {
    pub wake_at: SimTime,
    pub process: ProcessId,
    pub sequence_num: u64,
}

impl PartialEq for ScheduledWake {
    fn eq(&self, other: &Self) -> bool {
        self.wake_at == other.wake_at
            && self.process == other.process
            && self.sequence_num == other.sequence_num
    }
}

impl Eq for ScheduledWake {}

impl PartialOrd for ScheduledWake {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledWake {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default).
        // Within the same hour, processes run in registration order.
        other
            .wake_at
            .cmp(&self.wake_at)
            .then_with(|| other.process.cmp(&self.process))
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Timer queue of the virtual clock
#[derive(Debug, Default)]
pub struct EventScheduler {
    wake_queue: BinaryHeap<ScheduledWake>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            wake_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule a process to resume at the given absolute hour
    pub fn schedule_at(&mut self, process: ProcessId, wake_at: SimTime) {
        self.wake_queue.push(ScheduledWake {
            wake_at,
            process,
            sequence_num: self.sequence_counter,
        });
        self.sequence_counter += 1;
    }

    /// Pop the next process due at or before `now`, if any
    pub fn pop_due(&mut self, now: SimTime) -> Option<ProcessId> {
        match self.wake_queue.peek() {
            Some(next) if next.wake_at <= now => self.wake_queue.pop().map(|w| w.process),
            _ => None,
        }
    }

    /// Check if there are any wakes remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.wake_queue.is_empty()
    }

    /// Get the hour of the next wake without removing it
    pub fn peek_next_wake(&self) -> Option<SimTime> {
        self.wake_queue.peek().map(|w| w.wake_at)
    }

    /// Number of pending wakes
    pub fn len(&self) -> usize {
        self.wake_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wake_queue.is_empty()
    }
}
