// Tests for SimulationEngine functionality
use crate::core::errors::{SimError, SimResult};
use crate::core::process::{Process, ProcessContext, Step};
use crate::core::resource_pool::ResourcePool;
use crate::core::simulation_engine::{SimulationEngine, SimulationObserver};
use crate::core::types::{PoolId, SimTime};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct EventLog {
    events: Vec<(SimTime, String)>,
}

impl EventLog {
    fn labels_at(&self, hour: SimTime) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(h, _)| *h == hour)
            .map(|(_, label)| label.as_str())
            .collect()
    }
}

/// Logs its label every hour for a fixed number of hours
struct Ticker {
    label: String,
    remaining: u32,
}

impl Ticker {
    fn new(label: &str, remaining: u32) -> Self {
        Self {
            label: label.to_string(),
            remaining,
        }
    }
}

impl Process<EventLog> for Ticker {
    fn name(&self) -> &str {
        &self.label
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, EventLog>) -> SimResult<Step> {
        let now = cx.now();
        cx.world.events.push((now, self.label.clone()));
        if self.remaining == 0 {
            return Ok(Step::Done);
        }
        self.remaining -= 1;
        Ok(Step::Wait(1))
    }
}

/// Takes `units` from a pool, holds them for `hold` hours, gives them back
struct Holder {
    label: String,
    pool: PoolId,
    units: u32,
    hold: SimTime,
    stage: u8,
}

impl Holder {
    fn new(label: &str, pool: PoolId, units: u32, hold: SimTime) -> Self {
        Self {
            label: label.to_string(),
            pool,
            units,
            hold,
            stage: 0,
        }
    }
}

impl Process<EventLog> for Holder {
    fn name(&self) -> &str {
        &self.label
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, EventLog>) -> SimResult<Step> {
        let now = cx.now();
        self.stage += 1;
        match self.stage {
            1 => Ok(Step::Acquire {
                pool: self.pool,
                units: self.units,
            }),
            2 => {
                cx.world.events.push((now, format!("{}:acquired", self.label)));
                Ok(Step::Wait(self.hold))
            }
            _ => {
                cx.world.events.push((now, format!("{}:released", self.label)));
                cx.release(self.pool, self.units)?;
                Ok(Step::Done)
            }
        }
    }
}

/// Starts a child ticker on its second resume
struct Parent {
    spawned: bool,
}

impl Process<EventLog> for Parent {
    fn name(&self) -> &str {
        "parent"
    }

    fn resume(&mut self, cx: &mut ProcessContext<'_, EventLog>) -> SimResult<Step> {
        if self.spawned {
            return Ok(Step::Done);
        }
        if cx.now() == 0 {
            return Ok(Step::Wait(2));
        }
        self.spawned = true;
        cx.spawn(Box::new(Ticker::new("child", 1)));
        Ok(Step::Wait(10))
    }
}

#[derive(Clone, Default)]
struct CountingObserver {
    advances: Rc<RefCell<Vec<(SimTime, SimTime)>>>,
    ticks: Rc<RefCell<Vec<(SimTime, usize)>>>,
}

impl SimulationObserver for CountingObserver {
    fn on_hour_advance(&mut self, old_hour: SimTime, new_hour: SimTime) {
        self.advances.borrow_mut().push((old_hour, new_hour));
    }

    fn on_tick_complete(&mut self, hour: SimTime, processes_resumed: usize) {
        self.ticks.borrow_mut().push((hour, processes_resumed));
    }
}

#[test]
fn test_run_exact_horizon() {
    let mut engine = SimulationEngine::new(EventLog::default());
    engine.register(Box::new(Ticker::new("a", 100)));

    let final_hour = engine.run(3).unwrap();

    assert_eq!(final_hour, 3, "Should run exactly 3 hours");
    assert_eq!(engine.current_hour(), 3);
    assert_eq!(engine.world().events.len(), 3);
}

#[test]
fn test_zero_horizon_is_invalid() {
    let mut engine = SimulationEngine::new(EventLog::default());
    let err = engine.run(0).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn test_processes_run_in_registration_order() {
    let mut engine = SimulationEngine::new(EventLog::default());
    engine.register(Box::new(Ticker::new("power", 5)));
    engine.register(Box::new(Ticker::new("supplier", 5)));
    engine.register(Box::new(Ticker::new("machine-0", 5)));
    engine.register(Box::new(Ticker::new("machine-1", 5)));

    engine.run(4).unwrap();

    for hour in 0..4 {
        assert_eq!(
            engine.world().labels_at(hour),
            vec!["power", "supplier", "machine-0", "machine-1"]
        );
    }
}

#[test]
fn test_finished_processes_are_dropped() {
    let mut engine = SimulationEngine::new(EventLog::default());
    engine.register(Box::new(Ticker::new("short", 1)));
    engine.run(5).unwrap();

    assert_eq!(engine.world().events.len(), 2);
    assert_eq!(engine.process_count(), 0);
    assert!(!engine.has_pending_events());
}

#[test]
fn test_contended_pool_serves_waiters_in_order() {
    let mut engine = SimulationEngine::new(EventLog::default());
    let pool = engine.add_pool(ResourcePool::new("workers", 1, 1).unwrap());
    engine.register(Box::new(Holder::new("first", pool, 1, 3)));
    engine.register(Box::new(Holder::new("second", pool, 1, 2)));
    engine.register(Box::new(Holder::new("third", pool, 1, 1)));

    engine.run(10).unwrap();

    let log = &engine.world().events;
    let expected = vec![
        (0, "first:acquired".to_string()),
        (3, "first:released".to_string()),
        (3, "second:acquired".to_string()),
        (5, "second:released".to_string()),
        (5, "third:acquired".to_string()),
        (6, "third:released".to_string()),
    ];
    assert_eq!(log, &expected);
    assert_eq!(engine.pool(pool).unwrap().level(), 1);
}

#[test]
fn test_level_stays_within_capacity_every_tick() {
    let mut engine = SimulationEngine::new(EventLog::default());
    let pool = engine.add_pool(ResourcePool::new("workers", 2, 2).unwrap());
    for i in 0..6 {
        engine.register(Box::new(Holder::new(&format!("h{}", i), pool, 1 + i % 2, 2)));
    }

    for _ in 0..20 {
        engine.tick().unwrap();
        let workers = engine.pool(pool).unwrap();
        assert!(workers.level() <= workers.capacity());
        engine.advance();
    }
    assert_eq!(engine.pool(pool).unwrap().level(), 2);
}

#[test]
fn test_oversized_acquire_fails_the_tick() {
    let mut engine = SimulationEngine::new(EventLog::default());
    let pool = engine.add_pool(ResourcePool::new("workers", 1, 1).unwrap());
    engine.register(Box::new(Holder::new("greedy", pool, 2, 1)));

    let err = engine.tick().unwrap_err();
    assert!(matches!(err, SimError::CapacityExceeded { .. }));
}

#[test]
fn test_unknown_pool_is_reported() {
    let mut engine: SimulationEngine<EventLog> = SimulationEngine::new(EventLog::default());
    let missing = PoolId(3);
    assert!(matches!(engine.pool(missing), Err(SimError::UnknownPool(_))));
    assert!(engine.set_pool_target(missing, 1).is_err());
}

#[test]
fn test_spawned_process_runs_in_the_same_hour() {
    let mut engine = SimulationEngine::new(EventLog::default());
    engine.register(Box::new(Parent { spawned: false }));
    engine.run(5).unwrap();

    assert_eq!(engine.world().labels_at(2), vec!["child"]);
    assert_eq!(engine.world().labels_at(3), vec!["child"]);
}

#[test]
fn test_set_pool_target_wakes_next_tick() {
    let mut engine = SimulationEngine::new(EventLog::default());
    let pool = engine.add_pool(ResourcePool::new("workers", 2, 0).unwrap());
    engine.register(Box::new(Holder::new("repair", pool, 1, 1)));

    engine.tick().unwrap();
    assert!(engine.world().events.is_empty());

    engine.set_pool_target(pool, 2).unwrap();
    engine.advance();
    engine.tick().unwrap();
    assert_eq!(engine.world().labels_at(1), vec!["repair:acquired"]);
}

#[test]
fn test_observers_see_every_hour() {
    let observer = CountingObserver::default();
    let mut engine = SimulationEngine::new(EventLog::default());
    engine.add_observer(Box::new(observer.clone()));
    engine.register(Box::new(Ticker::new("a", 10)));
    engine.register(Box::new(Ticker::new("b", 10)));

    engine.run(3).unwrap();

    assert_eq!(*observer.advances.borrow(), vec![(0, 1), (1, 2), (2, 3)]);
    assert_eq!(*observer.ticks.borrow(), vec![(0, 2), (1, 2), (2, 2)]);
}
