use std::thread;

use diesel::prelude::*;

use crate::support::project::{test_database_configured, TestProject};
use gatelist_db::models::{
    AttendeeDetails, CheckInResult, Event, ReconcileResult, Registration, RegistrationCreateResult,
    TicketType,
};
use gatelist_db::schema::{events, ticket_types};
use gatelist_db::utils::errors::ErrorCode;

#[test]
fn free_ticket_confirms_immediately() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(0).with_quantity(10).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();

    assert_eq!(registration.status, "confirmed");
    assert_eq!(registration.payment_status, "free");
    assert_eq!(registration.amount, 0);
    assert_eq!(registration.phone.as_deref(), Some("233241234567"));

    let conn = project.get_connection();
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 1);
    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 1);
}

#[test]
fn paid_ticket_starts_pending() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).with_quantity(10).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();

    assert_eq!(registration.status, "pending");
    assert_eq!(registration.payment_status, "pending");
    assert_eq!(registration.amount, 500);
    assert!(registration.payment_reference.is_none());
}

#[test]
fn amount_is_a_snapshot_of_the_price() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();

    let conn = project.get_connection();
    diesel::update(ticket_types::table.filter(ticket_types::id.eq(ticket_type.id)))
        .set(ticket_types::price.eq(900_i64))
        .execute(conn)
        .unwrap();

    assert_eq!(Registration::find(registration.id, conn).unwrap().amount, 500);
}

#[test]
fn sold_out_tier_rejects_further_registrations() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_quantity(1).finish();
    let _first = project.create_registration(&event, &ticket_type).finish();

    let conn = project.get_connection();
    let result = Registration::create_for_ticket(
        &event,
        &ticket_type,
        attendee("Kofi Boateng", "kofi@example.com"),
        None,
        conn,
    )
    .unwrap();

    match result {
        RegistrationCreateResult::SoldOut => (),
        RegistrationCreateResult::Created(_) => panic!("Oversold the tier"),
    }
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 1);
}

#[test]
fn full_event_rejects_and_rolls_back_the_tier_reservation() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().with_capacity(1).finish();
    let ticket_type = project.create_ticket_type(&event).with_quantity(0).finish();
    let _first = project.create_registration(&event, &ticket_type).finish();

    let conn = project.get_connection();
    let result = Registration::create_for_ticket(
        &event,
        &ticket_type,
        attendee("Kofi Boateng", "kofi@example.com"),
        None,
        conn,
    )
    .unwrap();

    match result {
        RegistrationCreateResult::SoldOut => (),
        RegistrationCreateResult::Created(_) => panic!("Exceeded event capacity"),
    }
    // The tier increment from the failed attempt must not survive
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 1);
    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 1);
}

#[test]
fn settle_payment_is_idempotent() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    let first = registration.settle_payment(conn).unwrap();
    let settled = match first {
        ReconcileResult::Applied(settled) => settled,
        ReconcileResult::AlreadySettled(_) => panic!("First settlement should apply"),
    };
    assert_eq!(settled.status, "confirmed");
    assert_eq!(settled.payment_status, "paid");

    // The duplicate callback path: same outcome delivered again
    match registration.settle_payment(conn).unwrap() {
        ReconcileResult::AlreadySettled(current) => {
            assert_eq!(current.status, "confirmed");
            assert_eq!(current.payment_status, "paid");
        }
        ReconcileResult::Applied(_) => panic!("Duplicate settlement must not re-apply"),
    }
}

#[test]
fn fail_payment_cancels_and_releases_inventory() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().with_capacity(10).finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).with_quantity(5).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    match registration.fail_payment(conn).unwrap() {
        ReconcileResult::Applied(cancelled) => {
            assert_eq!(cancelled.status, "cancelled");
            assert_eq!(cancelled.payment_status, "failed");
        }
        ReconcileResult::AlreadySettled(_) => panic!("First failure should apply"),
    }
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 0);
    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 0);

    match registration.fail_payment(conn).unwrap() {
        ReconcileResult::AlreadySettled(_) => (),
        ReconcileResult::Applied(_) => panic!("Duplicate failure must not re-apply"),
    }
    // And must not release a second unit
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 0);
}

#[test]
fn late_failure_cannot_claw_back_a_confirmed_ticket() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    registration.settle_payment(conn).unwrap();
    match registration.fail_payment(conn).unwrap() {
        ReconcileResult::AlreadySettled(current) => {
            assert_eq!(current.status, "confirmed");
            assert_eq!(current.payment_status, "paid");
        }
        ReconcileResult::Applied(_) => panic!("Failure applied over a confirmed registration"),
    }
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 1);
}

#[test]
fn check_in_lifecycle() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(0).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    let checked_in = match registration.check_in(conn).unwrap() {
        CheckInResult::CheckedIn(checked_in) => checked_in,
        other => panic!("Expected check-in to succeed, got {:?}", other),
    };
    assert_eq!(checked_in.status, "checked-in");
    assert_eq!(checked_in.payment_status, "free");
    assert!(checked_in.checked_in_at.is_some());

    match checked_in.check_in(conn).unwrap() {
        CheckInResult::AlreadyCheckedIn(_) => (),
        other => panic!("Expected AlreadyCheckedIn, got {:?}", other),
    }
}

#[test]
fn check_in_is_blocked_while_payment_is_pending() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    match registration.check_in(conn).unwrap() {
        CheckInResult::PaymentPending(_) => (),
        other => panic!("Expected PaymentPending, got {:?}", other),
    }
    assert_eq!(Registration::find(registration.id, conn).unwrap().status, "pending");
}

#[test]
fn check_in_is_blocked_for_cancelled_registrations() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    registration.fail_payment(conn).unwrap();
    let cancelled = Registration::find(registration.id, conn).unwrap();
    match cancelled.check_in(conn).unwrap() {
        CheckInResult::Cancelled(_) => (),
        other => panic!("Expected Cancelled, got {:?}", other),
    }
}

#[test]
fn payment_reference_round_trip() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    registration.set_payment_reference("MLR-556677", conn).unwrap();
    let found = Registration::find_by_payment_reference("MLR-556677", conn).unwrap();

    assert_eq!(found.map(|r| r.id), Some(registration.id));
    assert!(Registration::find_by_payment_reference("MLR-000000", conn).unwrap().is_none());
}

#[test]
fn find_by_ticket_code() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).finish();
    let registration = project.create_registration(&event, &ticket_type).finish();
    let conn = project.get_connection();

    let found = Registration::find_by_ticket_code(&registration.ticket_id, conn).unwrap();
    assert_eq!(found.id, registration.id);
}

#[test]
fn validation_failures_are_reported_per_field() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).finish();
    let conn = project.get_connection();

    let err = Registration::create_for_ticket(
        &event,
        &ticket_type,
        AttendeeDetails {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
        },
        None,
        conn,
    )
    .unwrap_err();

    match err.error_code {
        ErrorCode::ValidationError { errors } => {
            assert!(errors.contains_key("name"));
            assert!(errors.contains_key("email"));
            // Paid ticket without a phone cannot enter the payment flow
            assert!(errors.contains_key("phone"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn archived_event_rejects_registrations() {
    if !test_database_configured() {
        return;
    }
    let mut project = TestProject::new();
    let event = project.create_event().archived().finish();
    let ticket_type = project.create_ticket_type(&event).finish();
    let conn = project.get_connection();

    let err = Registration::create_for_ticket(
        &event,
        &ticket_type,
        attendee("Ama Mensah", "ama@example.com"),
        None,
        conn,
    )
    .unwrap_err();

    assert!(matches!(err.error_code, ErrorCode::ValidationError { .. }));
}

#[test]
fn concurrent_registrations_for_the_last_spot() {
    if !test_database_configured() {
        return;
    }
    // The §capacity=1 scenario: two simultaneous submissions, one ticket
    let mut project = TestProject::new_without_rollback();
    let event = project.create_event().with_capacity(1).finish();
    let ticket_type = project.create_ticket_type(&event).with_price(500).with_quantity(1).finish();

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let event = event.clone();
            let ticket_type = ticket_type.clone();
            thread::spawn(move || {
                let mut conn = TestProject::connect();
                let result = Registration::create_for_ticket(
                    &event,
                    &ticket_type,
                    attendee(&format!("Attendee {}", i), &format!("attendee{}@example.com", i)),
                    None,
                    &mut conn,
                )
                .unwrap();
                matches!(result, RegistrationCreateResult::Created(_))
            })
        })
        .collect();
    let created: Vec<bool> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    assert_eq!(created.iter().filter(|c| **c).count(), 1);

    let conn = project.get_connection();
    assert_eq!(TicketType::find(ticket_type.id, conn).unwrap().sold, 1);
    assert_eq!(Event::find(event.id, conn).unwrap().registered_count, 1);

    diesel::delete(events::table.filter(events::id.eq(event.id)))
        .execute(conn)
        .unwrap();
}

fn attendee(name: &str, email: &str) -> AttendeeDetails {
    AttendeeDetails {
        name: name.to_string(),
        email: email.to_string(),
        phone: Some("0241234567".to_string()),
    }
}
