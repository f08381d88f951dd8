pub mod config;
pub mod errors;
pub mod event_scheduler;
pub mod process;
pub mod resource_pool;
pub mod simulation_engine;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{ConcurrencyMode, SimulationConfig};
pub use errors::{SimError, SimResult};
pub use process::{Process, ProcessContext, Step};
pub use resource_pool::ResourcePool;
pub use simulation_engine::{SimulationEngine, SimulationObserver};
pub use types::{PoolId, ProcessId, SimTime};
