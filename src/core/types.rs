/// Simulated time in whole hours since the start of the run
pub type SimTime = u64;

/// Identifier of a process registered with the simulation engine.
///
/// Ids are handed out in registration order and never reused, so ordering
/// by id reproduces registration order within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub(crate) u64);

impl ProcessId {
    /// Get the raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "process#{}", self.0)
    }
}

/// Handle for a resource pool owned by the simulation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub(crate) usize);

impl PoolId {
    /// Index of the pool inside the engine
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}
