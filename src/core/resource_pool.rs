use super::errors::{SimError, SimResult};
use super::types::ProcessId;
use log::warn;
use std::collections::VecDeque;

/// Who is waiting on a pool.
///
/// Staffing requests come from the orchestrator when a shift change sends
/// workers home; once granted those units simply leave the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Process(ProcessId),
    Staffing,
}

#[derive(Debug, Clone, Copy)]
struct Waiter {
    requester: Requester,
    units: u32,
}

/// Outcome of an acquire request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// Units were taken immediately
    Granted,
    /// Caller is suspended in the FIFO queue
    Queued,
}

/// Outcome of a release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Released {
    /// Units actually returned to the pool
    pub accepted: u32,
    /// Processes whose queued acquisitions were satisfied, in FIFO order
    pub woken: Vec<ProcessId>,
}

/// Bounded counting resource with a FIFO wait queue
#[derive(Debug, Clone)]
pub struct ResourcePool {
    name: String,
    capacity: u32,
    level: u32,
    waiters: VecDeque<Waiter>,
}

impl ResourcePool {
    /// Create a pool holding `initial_level` of `capacity` units
    pub fn new(name: impl Into<String>, capacity: u32, initial_level: u32) -> SimResult<Self> {
        let name = name.into();
        if initial_level > capacity {
            return Err(SimError::InvalidConfiguration(format!(
                "pool '{}' starts with {} units but holds at most {}",
                name, initial_level, capacity
            )));
        }
        Ok(Self {
            name,
            capacity,
            level: initial_level,
            waiters: VecDeque::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units currently free
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of suspended requests
    pub fn queued(&self) -> usize {
        self.waiters.len()
    }

    /// Request `units`; queues behind earlier waiters even when enough units are free
    pub fn acquire(&mut self, requester: Requester, units: u32) -> SimResult<Acquire> {
        if units > self.capacity {
            return Err(SimError::CapacityExceeded {
                requested: units,
                capacity: self.capacity,
            });
        }
        if self.waiters.is_empty() && self.level >= units {
            self.level -= units;
            return Ok(Acquire::Granted);
        }
        self.waiters.push_back(Waiter { requester, units });
        Ok(Acquire::Queued)
    }

    /// Return `units` and hand them to queued waiters in FIFO order.
    ///
    /// Units beyond capacity are dropped: a worker coming back from a repair
    /// into an already fully staffed shift goes off shift.
    pub fn release(&mut self, units: u32) -> Released {
        let room = self.capacity - self.level;
        let accepted = units.min(room);
        if accepted < units {
            warn!(
                "Pool '{}' truncated release of {} units to {} (capacity {})",
                self.name, units, accepted, self.capacity
            );
        }
        self.level += accepted;
        Released {
            accepted,
            woken: self.grant_waiters(),
        }
    }

    /// Move the free level towards `target`, clamped to capacity.
    ///
    /// A reduction larger than the free units queues a staffing request that
    /// completes as workers come back from repairs.
    pub fn set_target(&mut self, target: u32) -> SimResult<Vec<ProcessId>> {
        let target = target.min(self.capacity);
        if target > self.level {
            Ok(self.release(target - self.level).woken)
        } else {
            if target < self.level {
                self.acquire(Requester::Staffing, self.level - target)?;
            }
            Ok(Vec::new())
        }
    }

    fn grant_waiters(&mut self) -> Vec<ProcessId> {
        let mut woken = Vec::new();
        while let Some(front) = self.waiters.front() {
            if front.units > self.level {
                break;
            }
            self.level -= front.units;
            if let Requester::Process(id) = front.requester {
                woken.push(id);
            }
            self.waiters.pop_front();
        }
        woken
    }
}
