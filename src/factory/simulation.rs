use super::context::SimulationContext;
use super::environment::{fatigue_for, shift_for, staffing_target};
use super::machine::MachineProcess;
use super::metrics::{mean_mtbf, OeeComponents};
use super::output::write_series;
use super::power_grid::PowerGridProcess;
use super::record::OutputRecord;
use super::summary::SeriesSummary;
use super::supplier::{orders_for_horizon, SupplierProcess};
use crate::core::config::SimulationConfig;
use crate::core::errors::SimResult;
use crate::core::resource_pool::ResourcePool;
use crate::core::simulation_engine::SimulationEngine;
use crate::core::types::{PoolId, SimTime};
use log::{debug, info};
use rand::Rng;
use std::path::Path;

const NOMINAL_RATE: f64 = 450.0;
const DEMAND_RANGE: (f64, f64) = (0.85, 1.15);
const RAW_PER_UNIT: f64 = 0.6;
const REORDER_POINT: f64 = 200.0;
const EMERGENCY_RESTOCK: (f64, f64) = (300.0, 600.0);

/// The factory: processes registered on the virtual clock plus the hourly
/// control loop that turns machine states into telemetry rows
pub struct FactorySimulation {
    config: SimulationConfig,
    engine: SimulationEngine<SimulationContext>,
    workers: PoolId,
    records: Vec<OutputRecord>,
}

impl FactorySimulation {
    /// Build the plant; fails before anything runs if the configuration is unusable
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;

        let context = SimulationContext::new(config.seed, config.machine_count, config.wip_lag);
        let mut engine = SimulationEngine::new(context);
        let workers = engine.add_pool(ResourcePool::new(
            "workers",
            config.worker_capacity,
            config.worker_capacity,
        )?);

        let horizon = config.horizon_hours;
        engine.register(Box::new(PowerGridProcess::new(horizon)));
        engine.register(Box::new(SupplierProcess::new(orders_for_horizon(horizon))));
        for index in 0..config.machine_count {
            engine.register(Box::new(MachineProcess::new(index, workers, horizon)));
        }

        Ok(Self {
            config,
            engine,
            workers,
            records: Vec::with_capacity(horizon as usize),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn context(&self) -> &SimulationContext {
        self.engine.world()
    }

    pub fn workers(&self) -> SimResult<&ResourcePool> {
        self.engine.pool(self.workers)
    }

    pub fn current_hour(&self) -> SimTime {
        self.engine.current_hour()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    /// Whether every configured hour has been emitted
    pub fn is_finished(&self) -> bool {
        self.engine.current_hour() >= self.config.horizon_hours
    }

    /// Simulate one hour and append its record
    pub fn step_hour(&mut self) -> SimResult<&OutputRecord> {
        let hour = self.engine.current_hour();
        self.engine.tick()?;

        {
            let SimulationContext {
                rng, environment, ..
            } = self.engine.world_mut();
            environment.update(hour, rng);
        }

        let shift = shift_for(hour);
        self.engine.set_pool_target(self.workers, staffing_target(shift))?;
        let available_workers = self.engine.pool(self.workers)?.level();

        let ctx = self.engine.world_mut();
        ctx.environment.worker_fatigue = fatigue_for(shift);

        let oee = OeeComponents::from_machines(&ctx.machines);
        let demand = ctx.rng.gen_range(DEMAND_RANGE.0..=DEMAND_RANGE.1);
        let voltage = ctx.power.voltage;
        let throughput = (NOMINAL_RATE * oee.oee * demand * voltage).floor().max(0.0) as u64;

        ctx.inventory.draw_raw(throughput as f64 * RAW_PER_UNIT);
        ctx.inventory.push_wip(throughput as f64);

        if ctx.inventory.raw < REORDER_POINT {
            let amount = ctx
                .rng
                .gen_range(EMERGENCY_RESTOCK.0..=EMERGENCY_RESTOCK.1);
            ctx.inventory.restock_raw(amount);
            debug!("Emergency restock of {:.1} units at hour {}", amount, hour);
        }

        let record = OutputRecord {
            hour,
            oee: oee.oee,
            availability: oee.availability,
            performance: oee.performance,
            quality: oee.quality,
            throughput,
            raw_inventory: ctx.inventory.raw,
            wip: ctx.inventory.wip_total(),
            finished_inventory: ctx.inventory.finished,
            energy_price: ctx.environment.energy_price,
            temp: ctx.environment.temperature,
            humidity: ctx.environment.humidity,
            voltage,
            available_workers,
            fatigue: ctx.environment.worker_fatigue,
            maintenance_flag: ctx.machines.iter().any(|m| m.maintained_at(hour)) as u8,
            downtime_flag: ctx.machines.iter().any(|m| !m.is_working()) as u8,
            mtbf: mean_mtbf(&ctx.machines),
            shift,
        };

        self.engine.advance();
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Simulate the remaining hours of the horizon
    pub fn run(mut self) -> SimResult<SimulationOutput> {
        info!(
            "Starting OEE simulation: seed {}, {} hours, {} machines, {} workers",
            self.config.seed,
            self.config.horizon_hours,
            self.config.machine_count,
            self.config.worker_capacity
        );
        while !self.is_finished() {
            self.step_hour()?;
        }

        let summary = SeriesSummary::from_records(&self.records);
        info!(
            "Simulation complete: {}, {} blackouts",
            summary,
            self.engine.world().power.blackouts
        );
        Ok(SimulationOutput {
            config: self.config,
            records: self.records,
            summary,
        })
    }
}

/// A finished run, held in memory so writing it can be retried
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub config: SimulationConfig,
    pub records: Vec<OutputRecord>,
    pub summary: SeriesSummary,
}

impl SimulationOutput {
    /// Write the series as CSV; returns the row count
    pub fn write_csv(&self, path: impl AsRef<Path>) -> SimResult<usize> {
        write_series(path, &self.records)
    }
}

/// Simulate `horizon_hours` with `seed` using the default plant and write the CSV
pub fn run_simulation(
    output_path: impl AsRef<Path>,
    horizon_hours: SimTime,
    seed: u64,
) -> SimResult<usize> {
    let config = SimulationConfig::new()
        .with_horizon(horizon_hours)
        .with_seed(seed);
    FactorySimulation::new(config)?.run()?.write_csv(output_path)
}
