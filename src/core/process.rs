use super::errors::{SimError, SimResult};
use super::event_scheduler::EventScheduler;
use super::resource_pool::ResourcePool;
use super::types::{PoolId, ProcessId, SimTime};

/// Resume condition returned by a process at each suspension point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Resume after the given number of simulated hours
    Wait(SimTime),
    /// Resume once `units` have been taken from `pool`
    Acquire { pool: PoolId, units: u32 },
    /// The process has finished and is dropped
    Done,
}

/// A cooperative simulation process.
///
/// Each call to `resume` runs the process up to its next suspension point.
/// Implementations are explicit state machines: whatever the process needs
/// to remember between suspensions lives in `self`, shared simulation state
/// lives in the world `W`.
pub trait Process<W> {
    fn name(&self) -> &str;

    fn resume(&mut self, cx: &mut ProcessContext<'_, W>) -> SimResult<Step>;
}

/// What a process can see and touch while it runs
pub struct ProcessContext<'a, W> {
    pub(crate) now: SimTime,
    pub(crate) id: ProcessId,
    /// Shared simulation state
    pub world: &'a mut W,
    pub(crate) pools: &'a mut [ResourcePool],
    pub(crate) scheduler: &'a mut EventScheduler,
    pub(crate) spawned: &'a mut Vec<Box<dyn Process<W>>>,
}

impl<'a, W> ProcessContext<'a, W> {
    /// Current simulated hour
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Id of the running process
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Read-only view of a pool
    pub fn pool(&self, pool: PoolId) -> SimResult<&ResourcePool> {
        self.pools.get(pool.0).ok_or(SimError::UnknownPool(pool))
    }

    /// Return units to a pool; never suspends the caller.
    ///
    /// Waiters satisfied by the release resume within the current hour.
    pub fn release(&mut self, pool: PoolId, units: u32) -> SimResult<u32> {
        let released = self
            .pools
            .get_mut(pool.0)
            .ok_or(SimError::UnknownPool(pool))?
            .release(units);
        for woken in released.woken {
            self.scheduler.schedule_at(woken, self.now);
        }
        Ok(released.accepted)
    }

    /// Start a new process; its first resume happens within the current hour
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) {
        self.spawned.push(process);
    }
}
