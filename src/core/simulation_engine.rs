use super::errors::{SimError, SimResult};
use super::event_scheduler::EventScheduler;
use super::process::{Process, ProcessContext, Step};
use super::resource_pool::{Acquire, Requester, ResourcePool};
use super::types::{PoolId, ProcessId, SimTime};
use log::{debug, trace};
use std::collections::HashMap;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the virtual clock moves to the next hour
    fn on_hour_advance(&mut self, old_hour: SimTime, new_hour: SimTime);

    /// Called when every process due in `hour` has run to its next suspension
    fn on_tick_complete(&mut self, hour: SimTime, processes_resumed: usize);
}

/// Virtual clock and cooperative scheduler over a shared world `W`.
///
/// Time advances one hour at a time. Within an hour, every process whose
/// timer expired or whose acquisition was granted resumes in registration
/// order and runs until its next suspension point.
pub struct SimulationEngine<W> {
    world: W,
    pools: Vec<ResourcePool>,
    scheduler: EventScheduler,
    processes: HashMap<ProcessId, Box<dyn Process<W>>>,
    next_process_id: u64,
    current_hour: SimTime,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl<W> SimulationEngine<W> {
    /// Create an engine at hour 0 around the given world
    pub fn new(world: W) -> Self {
        Self {
            world,
            pools: Vec::new(),
            scheduler: EventScheduler::new(),
            processes: HashMap::new(),
            next_process_id: 0,
            current_hour: 0,
            observers: Vec::new(),
        }
    }

    /// Add a resource pool
    pub fn add_pool(&mut self, pool: ResourcePool) -> PoolId {
        self.pools.push(pool);
        PoolId(self.pools.len() - 1)
    }

    /// Register a process; it first runs during the current hour
    pub fn register(&mut self, process: Box<dyn Process<W>>) -> ProcessId {
        let id = ProcessId(self.next_process_id);
        self.next_process_id += 1;
        trace!("Registered {} ({}) at hour {}", id, process.name(), self.current_hour);
        self.processes.insert(id, process);
        self.scheduler.schedule_at(id, self.current_hour);
        id
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Consume the engine and keep the final world state
    pub fn into_world(self) -> W {
        self.world
    }

    pub fn pool(&self, pool: PoolId) -> SimResult<&ResourcePool> {
        self.pools.get(pool.0).ok_or(SimError::UnknownPool(pool))
    }

    /// Get current simulation time
    pub fn current_hour(&self) -> SimTime {
        self.current_hour
    }

    /// Number of live processes, suspended on a timer or a pool
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Check if there are pending wakes in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }

    /// Adjust a pool's free level from outside any process.
    ///
    /// Processes woken by the adjustment resume at the start of the next tick.
    pub fn set_pool_target(&mut self, pool: PoolId, target: u32) -> SimResult<()> {
        let woken = self
            .pools
            .get_mut(pool.0)
            .ok_or(SimError::UnknownPool(pool))?
            .set_target(target)?;
        for id in woken {
            self.scheduler.schedule_at(id, self.current_hour);
        }
        Ok(())
    }

    /// Resume every process due in the current hour; returns how many ran
    pub fn tick(&mut self) -> SimResult<usize> {
        let mut resumed = 0;
        while let Some(id) = self.scheduler.pop_due(self.current_hour) {
            self.resume(id)?;
            resumed += 1;
        }

        debug!(
            "=== Simulation Hour {} === ({} processes resumed)",
            self.current_hour, resumed
        );

        let hour = self.current_hour;
        for observer in &mut self.observers {
            observer.on_tick_complete(hour, resumed);
        }
        Ok(resumed)
    }

    /// Move the clock to the next hour
    pub fn advance(&mut self) {
        let old_hour = self.current_hour;
        self.current_hour += 1;
        for observer in &mut self.observers {
            observer.on_hour_advance(old_hour, self.current_hour);
        }
    }

    /// Run `horizon_hours` ticks, returns the final hour
    pub fn run(&mut self, horizon_hours: SimTime) -> SimResult<SimTime> {
        if horizon_hours == 0 {
            return Err(SimError::InvalidConfiguration(
                "horizon must be at least one hour".to_string(),
            ));
        }
        for _ in 0..horizon_hours {
            self.tick()?;
            self.advance();
        }
        Ok(self.current_hour)
    }

    fn resume(&mut self, id: ProcessId) -> SimResult<()> {
        let Some(mut process) = self.processes.remove(&id) else {
            return Ok(());
        };

        loop {
            let mut spawned = Vec::new();
            let step = {
                let mut cx = ProcessContext {
                    now: self.current_hour,
                    id,
                    world: &mut self.world,
                    pools: &mut self.pools,
                    scheduler: &mut self.scheduler,
                    spawned: &mut spawned,
                };
                process.resume(&mut cx)?
            };

            for child in spawned {
                self.register(child);
            }

            match step {
                Step::Wait(hours) => {
                    self.scheduler.schedule_at(id, self.current_hour + hours);
                    self.processes.insert(id, process);
                    return Ok(());
                }
                Step::Acquire { pool, units } => {
                    let outcome = self
                        .pools
                        .get_mut(pool.0)
                        .ok_or(SimError::UnknownPool(pool))?
                        .acquire(Requester::Process(id), units)?;
                    match outcome {
                        // Holding the units, run on to the next suspension point
                        Acquire::Granted => continue,
                        Acquire::Queued => {
                            self.processes.insert(id, process);
                            return Ok(());
                        }
                    }
                }
                Step::Done => {
                    trace!("{} ({}) finished at hour {}", id, process.name(), self.current_hour);
                    return Ok(());
                }
            }
        }
    }
}
