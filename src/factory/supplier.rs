use super::context::SimulationContext;
use crate::core::errors::SimResult;
use crate::core::process::{Process, ProcessContext, Step};
use crate::core::types::SimTime;
use log::debug;
use rand::Rng;

pub const ORDER_INTERVAL_HOURS: SimTime = 24;
const LEAD_TIME_HOURS: (SimTime, SimTime) = (12, 72);
const DELIVERY_QUANTITY: (f64, f64) = (200.0, 800.0);

/// Number of orders placed over a horizon, covering deliveries still in
/// flight at the end of the run
pub fn orders_for_horizon(horizon_hours: SimTime) -> u64 {
    horizon_hours / ORDER_INTERVAL_HOURS + 20
}

/// Places one raw-material order every day.
///
/// Each order becomes its own `DeliveryProcess`, so orders whose lead time
/// exceeds the order interval overlap freely.
pub struct SupplierProcess {
    remaining_orders: u64,
    started: bool,
}

impl SupplierProcess {
    pub fn new(orders: u64) -> Self {
        Self {
            remaining_orders: orders,
            started: false,
        }
    }
}

impl Process<SimulationContext> for SupplierProcess {
    fn name(&self) -> &str {
        "supplier"
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, SimulationContext>) -> SimResult<Step> {
        if !self.started {
            self.started = true;
            return Ok(if self.remaining_orders == 0 {
                Step::Done
            } else {
                Step::Wait(ORDER_INTERVAL_HOURS)
            });
        }

        let lead_time = cx
            .world
            .rng
            .gen_range(LEAD_TIME_HOURS.0..=LEAD_TIME_HOURS.1);
        debug!(
            "Raw material ordered at hour {}, lead time {} hours",
            cx.now(),
            lead_time
        );
        cx.spawn(Box::new(DeliveryProcess::new(lead_time)));

        self.remaining_orders -= 1;
        Ok(if self.remaining_orders == 0 {
            Step::Done
        } else {
            Step::Wait(ORDER_INTERVAL_HOURS)
        })
    }
}

/// A single order in transit
pub struct DeliveryProcess {
    lead_time: SimTime,
    dispatched: bool,
}

impl DeliveryProcess {
    pub fn new(lead_time: SimTime) -> Self {
        Self {
            lead_time,
            dispatched: false,
        }
    }
}

impl Process<SimulationContext> for DeliveryProcess {
    fn name(&self) -> &str {
        "delivery"
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, SimulationContext>) -> SimResult<Step> {
        if !self.dispatched {
            self.dispatched = true;
            return Ok(Step::Wait(self.lead_time));
        }

        let now = cx.now();
        let SimulationContext { rng, inventory, .. } = &mut *cx.world;
        let quantity = rng.gen_range(DELIVERY_QUANTITY.0..=DELIVERY_QUANTITY.1);
        inventory.restock_raw(quantity);
        debug!("Delivered {:.1} units of raw material at hour {}", quantity, now);
        Ok(Step::Done)
    }
}
