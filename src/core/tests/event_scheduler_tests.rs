use crate::core::event_scheduler::EventScheduler;
use crate::core::types::ProcessId;

#[test]
fn test_pop_due_respects_time() {
    let mut scheduler = EventScheduler::new();
    scheduler.schedule_at(ProcessId(0), 3);
    scheduler.schedule_at(ProcessId(1), 1);

    assert_eq!(scheduler.pop_due(0), None);
    assert_eq!(scheduler.pop_due(1), Some(ProcessId(1)));
    assert_eq!(scheduler.pop_due(2), None);
    assert_eq!(scheduler.peek_next_wake(), Some(3));
    assert_eq!(scheduler.pop_due(3), Some(ProcessId(0)));
    assert!(!scheduler.has_events());
}

#[test]
fn test_same_hour_runs_in_registration_order() {
    let mut scheduler = EventScheduler::new();
    // Scheduled out of order, popped by process id
    scheduler.schedule_at(ProcessId(4), 5);
    scheduler.schedule_at(ProcessId(2), 5);
    scheduler.schedule_at(ProcessId(3), 5);

    let order: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(5)).collect();
    assert_eq!(order, vec![ProcessId(2), ProcessId(3), ProcessId(4)]);
}

#[test]
fn test_overdue_wakes_are_still_delivered() {
    let mut scheduler = EventScheduler::new();
    scheduler.schedule_at(ProcessId(7), 2);
    scheduler.schedule_at(ProcessId(1), 4);

    // Earlier hour first, regardless of id
    assert_eq!(scheduler.pop_due(10), Some(ProcessId(7)));
    assert_eq!(scheduler.pop_due(10), Some(ProcessId(1)));
    assert_eq!(scheduler.len(), 0);
}
