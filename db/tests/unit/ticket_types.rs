use std::thread;

use diesel::prelude::*;

use crate::support::project::{test_database_configured, TestProject};
use gatelist_db::models::{ReserveOutcome, TicketType};
use gatelist_db::schema::events;

#[test]
fn create() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project
        .create_ticket_type(&event)
        .with_name("VIP")
        .with_price(1500)
        .with_quantity(20)
        .finish();

    assert_eq!(ticket_type.event_id, event.id);
    assert_eq!(ticket_type.name, "VIP");
    assert_eq!(ticket_type.price, 1500);
    assert_eq!(ticket_type.remaining(), Some(20));
}

#[test]
fn reserve_counts_down_to_sold_out() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_quantity(2).finish();
    let conn = project.get_connection();

    for expected_sold in 1..=2 {
        match TicketType::reserve(ticket_type.id, conn).unwrap() {
            ReserveOutcome::Reserved(tier) => assert_eq!(tier.sold, expected_sold),
            ReserveOutcome::SoldOut => panic!("Sold out early at {}", expected_sold),
        }
    }
    match TicketType::reserve(ticket_type.id, conn).unwrap() {
        ReserveOutcome::SoldOut => (),
        ReserveOutcome::Reserved(tier) => panic!("Oversold: sold={}", tier.sold),
    }
}

#[test]
fn unlimited_quantity_never_sells_out() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_quantity(0).finish();
    let conn = project.get_connection();

    for _ in 0..10 {
        match TicketType::reserve(ticket_type.id, conn).unwrap() {
            ReserveOutcome::Reserved(_) => (),
            ReserveOutcome::SoldOut => panic!("Unlimited tier reported sold out"),
        }
    }
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 10);
}

#[test]
fn release_returns_a_unit_and_floors_at_zero() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_quantity(5).finish();
    let conn = project.get_connection();

    TicketType::reserve(ticket_type.id, conn).unwrap();
    TicketType::release(ticket_type.id, conn).unwrap();
    TicketType::release(ticket_type.id, conn).unwrap();

    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 0);
}

#[test]
fn concurrent_reservations_cannot_oversell_the_last_unit() {
    if !test_database_configured() {
        return;
    }
    // Committed rows so that both threads' connections can see them
    let mut project = TestProject::new_without_rollback();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_quantity(1).finish();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let ticket_type_id = ticket_type.id;
            thread::spawn(move || {
                let mut conn = TestProject::connect();
                match TicketType::reserve(ticket_type_id, &mut conn).unwrap() {
                    ReserveOutcome::Reserved(_) => true,
                    ReserveOutcome::SoldOut => false,
                }
            })
        })
        .collect();
    let reservations: Vec<bool> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    assert_eq!(reservations.iter().filter(|reserved| **reserved).count(), 1);
    let conn = project.get_connection();
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 1);

    // Event cascade cleans up the committed rows
    diesel::delete(events::table.filter(events::id.eq(event.id)))
        .execute(conn)
        .unwrap();
}
