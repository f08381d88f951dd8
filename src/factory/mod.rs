pub mod context;
pub mod ensemble;
pub mod environment;
pub mod machine;
pub mod metrics;
pub mod output;
pub mod power_grid;
pub mod record;
pub mod simulation;
pub mod summary;
pub mod supplier;
pub mod validation;

// Re-export commonly used types
pub use context::SimulationContext;
pub use ensemble::run_ensemble;
pub use output::{load_series, write_series};
pub use record::OutputRecord;
pub use simulation::{run_simulation, FactorySimulation, SimulationOutput};
pub use summary::SeriesSummary;
pub use validation::{validate_series, ValidationIssue};
