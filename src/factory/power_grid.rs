use super::context::{chance, gauss, SimulationContext};
use crate::core::errors::SimResult;
use crate::core::process::{Process, ProcessContext, Step};
use log::debug;
use rand::Rng;

pub const NOMINAL_VOLTAGE: f64 = 1.0;
const VOLTAGE_RANGE: (f64, f64) = (0.5, 1.5);
const VOLTAGE_NOISE: f64 = 0.01;
const BLACKOUT_PROBABILITY: f64 = 0.002;

/// Supply voltage seen by every machine, relative to nominal
#[derive(Debug, Clone, PartialEq)]
pub struct PowerGrid {
    pub voltage: f64,
    pub blackouts: u32,
}

impl Default for PowerGrid {
    fn default() -> Self {
        Self {
            voltage: NOMINAL_VOLTAGE,
            blackouts: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Fluctuating,
    Blackout,
}

/// Hourly voltage random walk with rare blackouts
pub struct PowerGridProcess {
    remaining: u64,
    phase: Phase,
}

impl PowerGridProcess {
    /// Run for `iterations` fluctuation steps
    pub fn new(iterations: u64) -> Self {
        Self {
            remaining: iterations,
            phase: Phase::Start,
        }
    }

    fn next_iteration(&mut self) -> Step {
        if self.remaining == 0 {
            Step::Done
        } else {
            self.phase = Phase::Fluctuating;
            Step::Wait(1)
        }
    }
}

impl Process<SimulationContext> for PowerGridProcess {
    fn name(&self) -> &str {
        "power-grid"
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, SimulationContext>) -> SimResult<Step> {
        let now = cx.now();
        let SimulationContext { rng, power, .. } = &mut *cx.world;

        match self.phase {
            Phase::Start => Ok(self.next_iteration()),
            Phase::Blackout => {
                power.voltage = NOMINAL_VOLTAGE;
                debug!("Power restored at hour {}", now);
                Ok(self.next_iteration())
            }
            Phase::Fluctuating => {
                self.remaining -= 1;
                power.voltage = (power.voltage + gauss(rng, 0.0, VOLTAGE_NOISE))
                    .clamp(VOLTAGE_RANGE.0, VOLTAGE_RANGE.1);

                if chance(rng, BLACKOUT_PROBABILITY) {
                    let duration = rng.gen_range(1..=5);
                    power.voltage = 0.0;
                    power.blackouts += 1;
                    self.phase = Phase::Blackout;
                    debug!("Blackout at hour {} for {} hours", now, duration);
                    return Ok(Step::Wait(duration));
                }
                Ok(self.next_iteration())
            }
        }
    }
}
