use super::simulation::{FactorySimulation, SimulationOutput};
use crate::core::config::{ConcurrencyMode, SimulationConfig};
use crate::core::errors::{SimError, SimResult};
use log::info;
use rayon::prelude::*;

/// Run one independent simulation per seed.
///
/// Outputs follow the order of `seeds`; each run is the same as running
/// its config alone, whichever concurrency mode is used.
pub fn run_ensemble(config: &SimulationConfig, seeds: &[u64]) -> SimResult<Vec<SimulationOutput>> {
    config.validate()?;
    info!(
        "Running ensemble of {} simulations ({:?})",
        seeds.len(),
        config.concurrency_mode
    );

    let run_one = |seed: &u64| FactorySimulation::new(config.clone().with_seed(*seed))?.run();

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => seeds.iter().map(run_one).collect(),
        ConcurrencyMode::Rayon => match config.thread_pool_size {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SimError::InvalidConfiguration(format!("thread pool: {}", e)))?;
                pool.install(|| seeds.par_iter().map(run_one).collect())
            }
            None => seeds.par_iter().map(run_one).collect(),
        },
    }
}
