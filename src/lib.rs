pub mod core;
pub mod factory;

// Re-export commonly used types
pub use crate::core::{ConcurrencyMode, SimError, SimResult, SimulationConfig};
pub use crate::factory::{
    load_series, run_ensemble, run_simulation, validate_series, FactorySimulation, OutputRecord,
    SeriesSummary, SimulationOutput,
};
