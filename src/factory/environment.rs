use super::context::gauss;
use crate::core::types::SimTime;
use rand::Rng;
use std::f64::consts::PI;

pub const HOURS_PER_SHIFT: SimTime = 8;
pub const SHIFTS_PER_DAY: SimTime = 3;

const TEMPERATURE_RANGE: (f64, f64) = (10.0, 40.0);
const HUMIDITY_RANGE: (f64, f64) = (20.0, 95.0);
const ENERGY_PRICE_RANGE: (f64, f64) = (0.05, 0.30);

/// Plant conditions written by the orchestrator once per hour
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Shop-floor temperature in °C
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Spot energy price per kWh
    pub energy_price: f64,
    /// Multiplier applied to repair durations
    pub worker_fatigue: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 50.0,
            energy_price: 0.12,
            worker_fatigue: 1.0,
        }
    }
}

impl Environment {
    /// Advance temperature, humidity and energy price to `hour`.
    ///
    /// Temperature and humidity follow a daily cycle with a weekly swell on
    /// top; the energy price is a bounded random walk.
    pub fn update<R: Rng + ?Sized>(&mut self, hour: SimTime, rng: &mut R) {
        let day_phase = 2.0 * PI * ((hour % 24) as f64 - 9.0) / 24.0;
        let week_phase = 2.0 * PI * (hour % 168) as f64 / 168.0;

        let temperature = 24.0 + 5.0 * day_phase.sin() + 1.5 * week_phase.sin() + gauss(rng, 0.0, 0.5);
        self.temperature = temperature.clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);

        let humidity = 55.0 - 10.0 * day_phase.sin() + 4.0 * week_phase.cos() + gauss(rng, 0.0, 2.0);
        self.humidity = humidity.clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);

        let price = self.energy_price + gauss(rng, 0.0, 0.005);
        self.energy_price = price.clamp(ENERGY_PRICE_RANGE.0, ENERGY_PRICE_RANGE.1);
    }
}

/// Shift index for an hour: 0 night, 1 day, 2 evening
pub fn shift_for(hour: SimTime) -> u8 {
    ((hour / HOURS_PER_SHIFT) % SHIFTS_PER_DAY) as u8
}

/// Workers on duty during a shift
pub fn staffing_target(shift: u8) -> u32 {
    if shift == 1 {
        4
    } else {
        2
    }
}

/// Evening crews repair half again as slowly
pub fn fatigue_for(shift: u8) -> f64 {
    if shift == 2 {
        1.5
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shifts_cycle_every_eight_hours() {
        let shifts: Vec<u8> = (0..48).map(shift_for).collect();
        assert!(shifts[0..8].iter().all(|&s| s == 0));
        assert!(shifts[8..16].iter().all(|&s| s == 1));
        assert!(shifts[16..24].iter().all(|&s| s == 2));
        assert_eq!(shifts[24], 0);
    }

    #[test]
    fn staffing_and_fatigue_follow_shift() {
        assert_eq!(staffing_target(0), 2);
        assert_eq!(staffing_target(1), 4);
        assert_eq!(staffing_target(2), 2);
        assert_eq!(fatigue_for(0), 1.0);
        assert_eq!(fatigue_for(1), 1.0);
        assert_eq!(fatigue_for(2), 1.5);
    }

    #[test]
    fn environment_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut env = Environment::default();
        for hour in 0..5000 {
            env.update(hour, &mut rng);
            assert!((10.0..=40.0).contains(&env.temperature));
            assert!((20.0..=95.0).contains(&env.humidity));
            assert!((0.05..=0.30).contains(&env.energy_price));
        }
    }
}
