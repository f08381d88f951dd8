use super::environment::Environment;
use super::machine::MachineState;
use super::power_grid::PowerGrid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::collections::VecDeque;

/// Raw material on hand before the line starts
pub const INITIAL_RAW_INVENTORY: f64 = 1000.0;

/// Material stocks of the plant and the work-in-progress delay line
#[derive(Debug, Clone)]
pub struct Inventory {
    pub raw: f64,
    pub finished: f64,
    wip: VecDeque<f64>,
}

impl Inventory {
    /// Create stocks with an empty WIP line of `lag` slots
    pub fn new(raw: f64, lag: usize) -> Self {
        Self {
            raw,
            finished: 0.0,
            wip: std::iter::repeat(0.0).take(lag).collect(),
        }
    }

    /// Consume raw material, never below zero
    pub fn draw_raw(&mut self, amount: f64) {
        self.raw = (self.raw - amount).max(0.0);
    }

    pub fn restock_raw(&mut self, amount: f64) {
        self.raw += amount;
    }

    /// Start `units` of work and complete the oldest slot; returns the completed amount
    pub fn push_wip(&mut self, units: f64) -> f64 {
        self.wip.push_back(units);
        let completed = self.wip.pop_front().unwrap_or(0.0);
        self.finished += completed;
        completed
    }

    /// Units currently in the delay line
    pub fn wip_total(&self) -> f64 {
        self.wip.iter().sum()
    }

    pub fn lag(&self) -> usize {
        self.wip.len()
    }
}

/// Shared state of one simulation run.
///
/// Every process gets it through its `ProcessContext`. Each field has one
/// writer: the power process owns `power`, a machine process and its repair
/// own their `machines` slot, the orchestrator owns `environment`, and
/// inventory is written by deliveries and the orchestrator at different
/// points of the tick.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub rng: StdRng,
    pub environment: Environment,
    pub power: PowerGrid,
    pub machines: Vec<MachineState>,
    pub inventory: Inventory,
}

impl SimulationContext {
    pub fn new(seed: u64, machine_count: usize, wip_lag: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            environment: Environment::default(),
            power: PowerGrid::default(),
            machines: vec![MachineState::new(); machine_count],
            inventory: Inventory::new(INITIAL_RAW_INVENTORY, wip_lag),
        }
    }
}

/// Draw from a normal distribution
pub fn gauss<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

/// Bernoulli trial with probability `p`
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wip_line_delays_by_lag() {
        let mut inventory = Inventory::new(0.0, 3);
        assert_eq!(inventory.push_wip(10.0), 0.0);
        assert_eq!(inventory.push_wip(20.0), 0.0);
        assert_eq!(inventory.push_wip(30.0), 0.0);
        assert_eq!(inventory.push_wip(40.0), 10.0);
        assert_eq!(inventory.finished, 10.0);
        assert_eq!(inventory.wip_total(), 90.0);
        assert_eq!(inventory.lag(), 3);
    }

    #[test]
    fn raw_draw_floors_at_zero() {
        let mut inventory = Inventory::new(50.0, 1);
        inventory.draw_raw(80.0);
        assert_eq!(inventory.raw, 0.0);
        inventory.restock_raw(12.5);
        assert_eq!(inventory.raw, 12.5);
    }

    #[test]
    fn context_starts_with_healthy_machines() {
        let ctx = SimulationContext::new(1, 5, 3);
        assert_eq!(ctx.machines.len(), 5);
        assert!(ctx.machines.iter().all(|m| m.health == 1.0 && m.is_working()));
        assert_eq!(ctx.power.voltage, 1.0);
        assert_eq!(ctx.inventory.raw, INITIAL_RAW_INVENTORY);
    }
}
