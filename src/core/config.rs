//! Configuration for OEE simulation runs
//!
//! Structural parameters of the factory model plus the execution settings
//! used when several seeds are simulated as an ensemble.

use super::errors::{SimError, SimResult};
use super::types::SimTime;
use serde::{Deserialize, Serialize};

/// One simulated year
pub const DEFAULT_HORIZON_HOURS: SimTime = 8760;

/// Enumeration of supported concurrency modes for ensemble runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Runs are executed one after the other on the calling thread
    #[default]
    Sequential,
    /// Independent runs are spread over a Rayon thread pool
    Rayon,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated hours, one output row each
    pub horizon_hours: SimTime,
    /// Seed of the single random stream driving the run
    pub seed: u64,
    /// Number of machines on the line
    pub machine_count: usize,
    /// Maximum number of workers in the shared pool
    pub worker_capacity: u32,
    /// Hours between production start and finished goods
    pub wip_lag: usize,
    /// The concurrency mode to use for ensembles
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel ensembles
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SimulationConfig {
    /// Create a new configuration with default values
    ///
    /// One year, five machines, four workers, a three hour WIP lag.
    pub fn new() -> Self {
        Self {
            horizon_hours: DEFAULT_HORIZON_HOURS,
            seed: 42,
            machine_count: 5,
            worker_capacity: 4,
            wip_lag: 3,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_horizon(mut self, hours: SimTime) -> Self {
        self.horizon_hours = hours;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_machine_count(mut self, count: usize) -> Self {
        self.machine_count = count;
        self
    }

    pub fn with_worker_capacity(mut self, capacity: u32) -> Self {
        self.worker_capacity = capacity;
        self
    }

    pub fn with_wip_lag(mut self, lag: usize) -> Self {
        self.wip_lag = lag;
        self
    }

    /// Set the concurrency mode for ensembles
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel ensembles
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Reject parameters that cannot produce a run
    pub fn validate(&self) -> SimResult<()> {
        if self.horizon_hours == 0 {
            return Err(SimError::InvalidConfiguration(
                "horizon must be at least one hour".to_string(),
            ));
        }
        if self.machine_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "at least one machine is required".to_string(),
            ));
        }
        if self.wip_lag == 0 {
            return Err(SimError::InvalidConfiguration(
                "WIP lag must be at least one hour".to_string(),
            ));
        }
        if self.thread_pool_size == Some(0) {
            return Err(SimError::InvalidConfiguration(
                "thread pool needs at least one thread".to_string(),
            ));
        }
        // Every repair holds one worker
        if self.worker_capacity < 1 {
            return Err(SimError::CapacityExceeded {
                requested: 1,
                capacity: self.worker_capacity,
            });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
