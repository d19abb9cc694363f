use crate::support::project::{test_database_configured, TestProject};
use gatelist_db::models::{CapacityOutcome, Event};

#[test]
fn create() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().with_title("Harvest Summit").with_capacity(250).finish();

    assert_eq!(event.title, "Harvest Summit");
    assert_eq!(event.capacity, 250);
    assert_eq!(event.registered_count, 0);
    assert!(!event.archived);
}

#[test]
fn increment_registered_count_stops_at_capacity() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().with_capacity(2).finish();
    let conn = project.get_connection();

    for expected in 1..=2 {
        match Event::increment_registered_count(event.id, conn).unwrap() {
            CapacityOutcome::Counted(event) => assert_eq!(event.registered_count, expected),
            CapacityOutcome::Full => panic!("Event filled up early at {}", expected),
        }
    }
    match Event::increment_registered_count(event.id, conn).unwrap() {
        CapacityOutcome::Full => (),
        CapacityOutcome::Counted(event) => {
            panic!("Exceeded capacity, registered_count={}", event.registered_count)
        }
    }

    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 2);
}

#[test]
fn unlimited_capacity_always_counts() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().with_capacity(0).finish();
    let conn = project.get_connection();

    for _ in 0..5 {
        match Event::increment_registered_count(event.id, conn).unwrap() {
            CapacityOutcome::Counted(_) => (),
            CapacityOutcome::Full => panic!("Unlimited event reported full"),
        }
    }
    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 5);
}

#[test]
fn decrement_registered_count_floors_at_zero() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().with_capacity(10).finish();
    let conn = project.get_connection();

    Event::increment_registered_count(event.id, conn).unwrap();
    Event::decrement_registered_count(event.id, conn).unwrap();
    Event::decrement_registered_count(event.id, conn).unwrap();

    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 0);
}
