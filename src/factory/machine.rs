use super::context::{chance, SimulationContext};
use crate::core::errors::SimResult;
use crate::core::process::{Process, ProcessContext, Step};
use crate::core::types::{PoolId, SimTime};
use log::debug;
use rand::Rng;

const HEALTH_DECAY: f64 = 0.0003;
const REFERENCE_TEMPERATURE: f64 = 30.0;
pub const MAINTENANCE_INTERVAL_HOURS: SimTime = 500;
const MAINTENANCE_BOOST: f64 = 0.25;
const MAJOR_FAILURE_RATE: f64 = 0.0005;
const MINOR_FAILURE_RATE: f64 = 0.0015;
const MAJOR_REPAIR_SHARE: f64 = 0.3;
pub const UNDERVOLTAGE_THRESHOLD: f64 = 0.8;
const STOPPAGE_PROBABILITY: f64 = 0.001;

/// Condition and counters of one machine
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    /// Remaining health in [0, 1]
    pub health: f64,
    /// Broken down and waiting for, or receiving, its breakdown repair
    pub under_repair: bool,
    /// Halted by an external short stoppage
    pub stopped: bool,
    pub last_maintenance_time: SimTime,
    /// Hours spent running
    pub cumulative_uptime: u64,
    /// Major failures
    pub failure_count: u32,
    pub minor_failures: u32,
    pub maintenance_count: u32,
    pub repairs_completed: u32,
}

impl MachineState {
    pub fn new() -> Self {
        Self {
            health: 1.0,
            under_repair: false,
            stopped: false,
            last_maintenance_time: 0,
            cumulative_uptime: 0,
            failure_count: 0,
            minor_failures: 0,
            maintenance_count: 0,
            repairs_completed: 0,
        }
    }

    pub fn is_working(&self) -> bool {
        !self.under_repair && !self.stopped
    }

    /// Health counted towards output: zero while not working
    pub fn effective_health(&self) -> f64 {
        if self.is_working() {
            self.health
        } else {
            0.0
        }
    }

    /// Mean time between failures; plain uptime until the first failure
    pub fn mtbf(&self) -> f64 {
        if self.failure_count > 0 {
            self.cumulative_uptime as f64 / self.failure_count as f64
        } else {
            self.cumulative_uptime as f64
        }
    }

    /// Failure rate multiplier, higher as health drops
    pub fn wear(&self) -> f64 {
        2.0 - self.health
    }

    /// Whether preventive maintenance ran in `hour`
    pub fn maintained_at(&self, hour: SimTime) -> bool {
        self.maintenance_count > 0 && self.last_maintenance_time == hour
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Running,
    Stopped,
}

/// Hourly wear, maintenance and failure of one machine
pub struct MachineProcess {
    index: usize,
    workers: PoolId,
    remaining: u64,
    phase: Phase,
    name: String,
}

impl MachineProcess {
    /// Drive machine `index` for `iterations` hours, repairing with `workers`
    pub fn new(index: usize, workers: PoolId, iterations: u64) -> Self {
        Self {
            index,
            workers,
            remaining: iterations,
            phase: Phase::Start,
            name: format!("machine-{}", index),
        }
    }

    fn next_iteration(&mut self) -> Step {
        if self.remaining == 0 {
            Step::Done
        } else {
            self.phase = Phase::Running;
            Step::Wait(1)
        }
    }

    /// One running hour; returns the repair to start if the machine broke down
    fn operate(&self, cx: &mut ProcessContext<'_, SimulationContext>) -> Option<RepairProcess> {
        let now = cx.now();
        let SimulationContext {
            rng,
            environment,
            power,
            machines,
            ..
        } = &mut *cx.world;
        let machine = &mut machines[self.index];
        if !machine.is_working() {
            return None;
        }

        let load = rng.gen_range(0.8..=1.2);
        let stress = load * (REFERENCE_TEMPERATURE / environment.temperature) * rng.gen_range(0.9..=1.1);
        machine.health = (machine.health - HEALTH_DECAY * stress).max(0.0);
        machine.cumulative_uptime += 1;

        if now - machine.last_maintenance_time >= MAINTENANCE_INTERVAL_HOURS {
            machine.last_maintenance_time = now;
            machine.maintenance_count += 1;
            machine.health = (machine.health + MAINTENANCE_BOOST).min(1.0);
            debug!("{} preventive maintenance at hour {}", self.name, now);
        }

        let wear = machine.wear();
        if chance(rng, MAJOR_FAILURE_RATE * wear) || power.voltage < UNDERVOLTAGE_THRESHOLD {
            let major = chance(rng, MAJOR_REPAIR_SHARE);
            machine.under_repair = true;
            machine.health = 0.0;
            machine.failure_count += 1;
            let hours = repair_hours(rng, major, environment.worker_fatigue);
            debug!(
                "{} failed at hour {} (voltage {:.2}, major repair: {})",
                self.name, now, power.voltage, major
            );
            Some(RepairProcess::new(
                self.index,
                self.workers,
                RepairKind::Breakdown,
                hours,
            ))
        } else if chance(rng, MINOR_FAILURE_RATE * wear) {
            machine.minor_failures += 1;
            let hours = repair_hours(rng, false, environment.worker_fatigue);
            debug!("{} minor failure at hour {}", self.name, now);
            Some(RepairProcess::new(
                self.index,
                self.workers,
                RepairKind::Minor,
                hours,
            ))
        } else {
            None
        }
    }
}

impl Process<SimulationContext> for MachineProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, SimulationContext>) -> SimResult<Step> {
        match self.phase {
            Phase::Start => Ok(self.next_iteration()),
            Phase::Stopped => {
                cx.world.machines[self.index].stopped = false;
                debug!("{} back from stoppage at hour {}", self.name, cx.now());
                Ok(self.next_iteration())
            }
            Phase::Running => {
                self.remaining -= 1;
                if let Some(repair) = self.operate(cx) {
                    cx.spawn(Box::new(repair));
                }

                let rng = &mut cx.world.rng;
                if chance(rng, STOPPAGE_PROBABILITY) {
                    let duration = rng.gen_range(1..=3);
                    cx.world.machines[self.index].stopped = true;
                    self.phase = Phase::Stopped;
                    debug!(
                        "{} short stoppage at hour {} for {} hours",
                        self.name,
                        cx.now(),
                        duration
                    );
                    return Ok(Step::Wait(duration));
                }
                Ok(self.next_iteration())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepairPhase {
    Requesting,
    Acquired,
    Working,
}

/// What a repair restores when it completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairKind {
    /// Brings a broken-down machine back into service
    Breakdown,
    /// Restores health on a machine that keeps running
    Minor,
}

/// Repair of one machine by one worker from the pool
pub struct RepairProcess {
    machine: usize,
    workers: PoolId,
    kind: RepairKind,
    hours: SimTime,
    phase: RepairPhase,
}

impl RepairProcess {
    /// `hours` is fixed when the repair is ordered, before a worker is free
    pub fn new(machine: usize, workers: PoolId, kind: RepairKind, hours: SimTime) -> Self {
        Self {
            machine,
            workers,
            kind,
            hours,
            phase: RepairPhase::Requesting,
        }
    }
}

/// Repair hours for a base duration, rounded to the nearest whole hour
pub fn scaled_repair_hours(base_hours: SimTime, fatigue: f64) -> SimTime {
    ((base_hours as f64 * fatigue).round() as SimTime).max(1)
}

fn repair_hours<R: Rng + ?Sized>(rng: &mut R, major: bool, fatigue: f64) -> SimTime {
    let base = if major {
        rng.gen_range(12..=24)
    } else {
        rng.gen_range(3..=8)
    };
    scaled_repair_hours(base, fatigue)
}

impl Process<SimulationContext> for RepairProcess {
    fn name(&self) -> &str {
        match self.kind {
            RepairKind::Breakdown => "breakdown-repair",
            RepairKind::Minor => "minor-repair",
        }
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, SimulationContext>) -> SimResult<Step> {
        match self.phase {
            RepairPhase::Requesting => {
                self.phase = RepairPhase::Acquired;
                Ok(Step::Acquire {
                    pool: self.workers,
                    units: 1,
                })
            }
            RepairPhase::Acquired => {
                debug!(
                    "Repair of machine-{} started at hour {}, {} hours",
                    self.machine,
                    cx.now(),
                    self.hours
                );
                self.phase = RepairPhase::Working;
                Ok(Step::Wait(self.hours))
            }
            RepairPhase::Working => {
                let SimulationContext { rng, machines, .. } = &mut *cx.world;
                let machine = &mut machines[self.machine];
                machine.health = (machine.health + rng.gen_range(0.3..=0.6)).min(1.0);
                // Only the breakdown repair owns the downed state
                if self.kind == RepairKind::Breakdown {
                    machine.under_repair = false;
                }
                machine.repairs_completed += 1;
                debug!(
                    "Repair of machine-{} completed at hour {}",
                    self.machine,
                    cx.now()
                );
                cx.release(self.workers, 1)?;
                Ok(Step::Done)
            }
        }
    }
}
