use super::types::PoolId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the simulation engine and the factory model
#[derive(Debug, Error)]
pub enum SimError {
    /// Structural parameters that can never produce a valid run
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An acquisition larger than the pool could ever satisfy
    #[error("requested {requested} units from a pool with capacity {capacity}")]
    CapacityExceeded { requested: u32, capacity: u32 },

    /// A process referenced a pool that was never registered
    #[error("resource pool {0} is not registered")]
    UnknownPool(PoolId),

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV failure on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type SimResult<T> = Result<T, SimError>;
