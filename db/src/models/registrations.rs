use chrono::Utc;
use diesel::dsl;
use diesel::prelude::*;
use log::Level::Debug;
use logging::jlog;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;
use validator::validate_email;

use crate::models::enums::{PaymentStatus, RegistrationStatus};
use crate::models::registration_state::{CheckInBlock, RegistrationState, SettleAttempt};
use crate::models::{CapacityOutcome, Event, ReserveOutcome, TicketType};
use crate::schema::registrations;
use crate::utils::errors::{ConvertToDatabaseError, DatabaseError, ErrorCode};
use crate::utils::phone::normalize_ghana_phone;
use crate::utils::rand::random_alpha_string;
use crate::validators::ValidationErrors;

const TICKET_CODE_ATTEMPTS: usize = 5;

#[derive(Queryable, Identifiable, Clone, Serialize, Debug, PartialEq)]
#[diesel(table_name = registrations)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub ticket_id: String,
    pub amount: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub custom_field_values: Option<Value>,
    pub checked_in_at: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = registrations)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub ticket_id: String,
    pub amount: i64,
    pub status: String,
    pub payment_status: String,
    pub custom_field_values: Option<Value>,
}

pub struct AttendeeDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub enum RegistrationCreateResult {
    Created(Registration),
    SoldOut,
}

#[derive(Debug)]
pub enum CheckInResult {
    CheckedIn(Registration),
    AlreadyCheckedIn(Registration),
    PaymentPending(Registration),
    Cancelled(Registration),
}

/// Result of applying a payment outcome. `AlreadySettled` means the guarded
/// update matched nothing because the registration left `pending` earlier;
/// duplicate callbacks take this branch and change no state.
#[derive(Debug)]
pub enum ReconcileResult {
    Applied(Registration),
    AlreadySettled(Registration),
}

impl NewRegistration {
    pub fn commit(self, conn: &mut PgConnection) -> Result<Registration, DatabaseError> {
        diesel::insert_into(registrations::table)
            .values(&self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new registration")
    }
}

impl Registration {
    /// Registers an attendee for one unit of `ticket_type`. Reservation comes
    /// first: the tier's `sold` counter and the event's `registered_count`
    /// are taken with conditional increments inside the same transaction as
    /// the insert, so a failure at any step returns the units. The tier price
    /// is snapshotted into `amount` and never read from the tier again.
    pub fn create_for_ticket(
        event: &Event,
        ticket_type: &TicketType,
        attendee: AttendeeDetails,
        custom_field_values: Option<Value>,
        conn: &mut PgConnection,
    ) -> Result<RegistrationCreateResult, DatabaseError> {
        if ticket_type.event_id != event.id {
            return DatabaseError::business_process_error("Ticket type does not belong to this event");
        }

        let now = Utc::now().naive_utc();
        let mut validation = ValidationErrors::new();
        if attendee.name.trim().is_empty() {
            validation.add("name", "Name is required");
        }
        if !validate_email(attendee.email.trim()) {
            validation.add("email", "Email is invalid");
        }
        let phone = match attendee.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => match normalize_ghana_phone(raw) {
                Ok(normalized) => Some(normalized),
                Err(message) => {
                    validation.add("phone", message);
                    None
                }
            },
            None => {
                if ticket_type.price > 0 {
                    validation.add("phone", "Phone is required for paid tickets");
                }
                None
            }
        };
        if !event.is_open_for_registration(now.date()) {
            validation.add("event_id", "Event is not open for registration");
        }
        if !ticket_type.is_on_sale(now) {
            validation.add("ticket_type_id", "Ticket type is not currently on sale");
        }
        validation.into_result()?;

        let (status, payment_status) = RegistrationState::initial(ticket_type.price).columns();

        for _ in 0..TICKET_CODE_ATTEMPTS {
            let new_registration = NewRegistration {
                event_id: event.id,
                ticket_type_id: ticket_type.id,
                name: attendee.name.trim().to_string(),
                email: attendee.email.trim().to_string(),
                phone: phone.clone(),
                ticket_id: generate_ticket_code(&event.title, &ticket_type.name),
                amount: ticket_type.price,
                status: status.to_string(),
                payment_status: payment_status.to_string(),
                custom_field_values: custom_field_values.clone(),
            };

            let result = conn.transaction::<Registration, DatabaseError, _>(|conn| {
                if let ReserveOutcome::SoldOut = TicketType::reserve(ticket_type.id, conn)? {
                    return Err(DatabaseError::sold_out("Ticket type has no remaining inventory"));
                }
                if let CapacityOutcome::Full = Event::increment_registered_count(event.id, conn)? {
                    return Err(DatabaseError::sold_out("Event is at capacity"));
                }
                new_registration.commit(conn)
            });

            match result {
                Ok(registration) => return Ok(RegistrationCreateResult::Created(registration)),
                Err(ref e) if e.is_sold_out() => return Ok(RegistrationCreateResult::SoldOut),
                Err(ref e)
                    if e.is_duplicate_key()
                        && e.cause.as_ref().map_or(false, |cause| cause.contains("ticket_id")) =>
                {
                    // Ticket code collision, roll the dice again
                    jlog!(Debug, "Regenerating colliding ticket code", {"event_id": event.id});
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        DatabaseError::business_process_error("Could not generate a unique ticket code")
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Registration, DatabaseError> {
        registrations::table
            .filter(registrations::id.eq(id))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not find registration")
    }

    pub fn find_optional(id: Uuid, conn: &mut PgConnection) -> Result<Option<Registration>, DatabaseError> {
        registrations::table
            .filter(registrations::id.eq(id))
            .get_result(conn)
            .optional()
            .to_db_error(ErrorCode::QueryError, "Could not find registration")
    }

    pub fn find_by_ticket_code(ticket_code: &str, conn: &mut PgConnection) -> Result<Registration, DatabaseError> {
        registrations::table
            .filter(registrations::ticket_id.eq(ticket_code))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not find registration for ticket code")
    }

    pub fn find_by_payment_reference(
        reference: &str,
        conn: &mut PgConnection,
    ) -> Result<Option<Registration>, DatabaseError> {
        registrations::table
            .filter(registrations::payment_reference.eq(reference))
            .get_result(conn)
            .optional()
            .to_db_error(ErrorCode::QueryError, "Could not find registration for payment reference")
    }

    /// Registrations still awaiting payment for an event, for the reminder
    /// broadcast. Only rows with a phone number can receive one.
    pub fn pending_payment_for_event(
        event_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<Vec<Registration>, DatabaseError> {
        registrations::table
            .filter(
                registrations::event_id
                    .eq(event_id)
                    .and(registrations::payment_status.eq(PaymentStatus::Pending.to_string()))
                    .and(registrations::phone.is_not_null()),
            )
            .order_by(registrations::created_at.asc())
            .get_results(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load pending registrations for event")
    }

    pub fn event(&self, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        Event::find(self.event_id, conn)
    }

    pub fn ticket_type(&self, conn: &mut PgConnection) -> Result<TicketType, DatabaseError> {
        TicketType::find(self.ticket_type_id, conn)
    }

    pub fn state(&self) -> Result<RegistrationState, DatabaseError> {
        RegistrationState::from_columns(&self.status, &self.payment_status).map_err(Into::into)
    }

    /// Stores the processor's tracking token for later webhook matching.
    pub fn set_payment_reference(&self, reference: &str, conn: &mut PgConnection) -> Result<Registration, DatabaseError> {
        diesel::update(self)
            .set((
                registrations::payment_reference.eq(reference),
                registrations::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not store payment reference")
    }

    /// Applies a successful payment. The UPDATE is keyed on the current
    /// pending state, so a duplicate or late callback matches zero rows and
    /// is reported as `AlreadySettled`.
    pub fn settle_payment(&self, conn: &mut PgConnection) -> Result<ReconcileResult, DatabaseError> {
        let next = match self.state()?.settle_paid() {
            SettleAttempt::Apply(next) => next,
            SettleAttempt::AlreadySettled => return Ok(ReconcileResult::AlreadySettled(self.clone())),
        };
        let (status, payment_status) = next.columns();

        let updated = diesel::update(
            registrations::table.filter(
                registrations::id
                    .eq(self.id)
                    .and(registrations::status.eq(RegistrationStatus::Pending.to_string()))
                    .and(registrations::payment_status.eq(PaymentStatus::Pending.to_string())),
            ),
        )
        .set((
            registrations::status.eq(status.to_string()),
            registrations::payment_status.eq(payment_status.to_string()),
            registrations::updated_at.eq(dsl::now),
        ))
        .get_result::<Registration>(conn)
        .optional()
        .to_db_error(ErrorCode::UpdateError, "Could not confirm registration payment")?;

        match updated {
            Some(registration) => Ok(ReconcileResult::Applied(registration)),
            None => {
                // Lost the race against another callback
                let fresh = Registration::find(self.id, conn)?;
                Ok(ReconcileResult::AlreadySettled(fresh))
            }
        }
    }

    /// Applies a terminal payment failure: the registration is cancelled and
    /// its reserved inventory unit is returned, in one transaction. Same
    /// guard discipline as `settle_payment`.
    pub fn fail_payment(&self, conn: &mut PgConnection) -> Result<ReconcileResult, DatabaseError> {
        let next = match self.state()?.settle_failed() {
            SettleAttempt::Apply(next) => next,
            SettleAttempt::AlreadySettled => return Ok(ReconcileResult::AlreadySettled(self.clone())),
        };
        let (status, payment_status) = next.columns();

        conn.transaction::<ReconcileResult, DatabaseError, _>(|conn| {
            let updated = diesel::update(
                registrations::table.filter(
                    registrations::id
                        .eq(self.id)
                        .and(registrations::status.eq(RegistrationStatus::Pending.to_string()))
                        .and(registrations::payment_status.eq(PaymentStatus::Pending.to_string())),
                ),
            )
            .set((
                registrations::status.eq(status.to_string()),
                registrations::payment_status.eq(payment_status.to_string()),
                registrations::updated_at.eq(dsl::now),
            ))
            .get_result::<Registration>(conn)
            .optional()
            .to_db_error(ErrorCode::UpdateError, "Could not cancel registration")?;

            match updated {
                Some(registration) => {
                    TicketType::release(registration.ticket_type_id, conn)?;
                    Event::decrement_registered_count(registration.event_id, conn)?;
                    Ok(ReconcileResult::Applied(registration))
                }
                None => {
                    let fresh = Registration::find(self.id, conn)?;
                    Ok(ReconcileResult::AlreadySettled(fresh))
                }
            }
        })
    }

    /// Door check-in. Blocked while payment is pending and for cancelled or
    /// already checked-in registrations; the UPDATE is guarded on the current
    /// status so two staff scanning the same code race safely.
    pub fn check_in(&self, conn: &mut PgConnection) -> Result<CheckInResult, DatabaseError> {
        let current = self.state()?;
        let next = match current.check_in() {
            Ok(next) => next,
            Err(CheckInBlock::AlreadyCheckedIn) => return Ok(CheckInResult::AlreadyCheckedIn(self.clone())),
            Err(CheckInBlock::PaymentPending) => return Ok(CheckInResult::PaymentPending(self.clone())),
            Err(CheckInBlock::Cancelled) => return Ok(CheckInResult::Cancelled(self.clone())),
        };
        let (current_status, _) = current.columns();
        let (next_status, _) = next.columns();

        let updated = diesel::update(
            registrations::table.filter(
                registrations::id
                    .eq(self.id)
                    .and(registrations::status.eq(current_status.to_string())),
            ),
        )
        .set((
            registrations::status.eq(next_status.to_string()),
            registrations::checked_in_at.eq(dsl::now.nullable()),
            registrations::updated_at.eq(dsl::now),
        ))
        .get_result::<Registration>(conn)
        .optional()
        .to_db_error(ErrorCode::UpdateError, "Could not check in registration")?;

        match updated {
            Some(registration) => Ok(CheckInResult::CheckedIn(registration)),
            None => {
                let fresh = Registration::find(self.id, conn)?;
                Ok(CheckInResult::AlreadyCheckedIn(fresh))
            }
        }
    }
}

fn generate_ticket_code(event_title: &str, ticket_type_name: &str) -> String {
    let initials: String = event_title
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect();
    let tier: String = ticket_type_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect();
    format!(
        "{}-{}-{}",
        initials.to_uppercase(),
        tier.to_uppercase(),
        random_alpha_string(4).to_uppercase()
    )
}
