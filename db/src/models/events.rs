use chrono::{NaiveDate, NaiveDateTime};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::enums::EventStatus;
use crate::models::TicketType;
use crate::schema::{events, ticket_types};
use crate::utils::errors::{ConvertToDatabaseError, DatabaseError, ErrorCode};

#[derive(Queryable, Identifiable, Clone, Serialize, Debug, PartialEq)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub venue: String,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub category: String,
    pub capacity: i32,
    pub registered_count: i32,
    pub status: String,
    pub archived: bool,
    pub custom_fields: Option<Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub venue: String,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub category: String,
    pub capacity: i32,
    pub status: String,
    pub archived: bool,
    pub custom_fields: Option<Value>,
}

/// Outcome of the conditional `registered_count` increment. `Full` is an
/// expected result under contention, not an error.
#[derive(Debug)]
pub enum CapacityOutcome {
    Counted(Event),
    Full,
}

impl NewEvent {
    pub fn commit(self, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        diesel::insert_into(events::table)
            .values(&self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new event")
    }
}

impl Event {
    pub fn create(title: String, date: NaiveDate, time: String, venue: String, category: String) -> NewEvent {
        NewEvent {
            title,
            description: None,
            date,
            time,
            venue,
            image_url: None,
            organizer: None,
            category,
            capacity: 0,
            status: EventStatus::Upcoming.to_string(),
            archived: false,
            custom_fields: None,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        events::table
            .filter(events::id.eq(id))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not find event")
    }

    pub fn ticket_types(&self, conn: &mut PgConnection) -> Result<Vec<TicketType>, DatabaseError> {
        ticket_types::table
            .filter(ticket_types::event_id.eq(self.id))
            .order_by(ticket_types::created_at.asc())
            .get_results(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load ticket types for event")
    }

    pub fn is_at_capacity(&self) -> bool {
        self.capacity > 0 && self.registered_count >= self.capacity
    }

    /// Status as the UI vocabulary derives it from the calendar and the
    /// capacity counters. The stored `status` column is a cached copy of
    /// this; the derived value is authoritative for registration gating.
    pub fn derived_status(&self, today: NaiveDate) -> EventStatus {
        if self.date < today {
            EventStatus::Past
        } else if self.is_at_capacity() {
            EventStatus::SoldOut
        } else if self.date == today {
            EventStatus::Ongoing
        } else {
            EventStatus::Upcoming
        }
    }

    pub fn is_open_for_registration(&self, today: NaiveDate) -> bool {
        !self.archived && self.derived_status(today) != EventStatus::Past
    }

    /// Counts one more attendee, guarded by `capacity` in the same UPDATE so
    /// concurrent registrations cannot exceed it. Capacity 0 is unlimited.
    pub fn increment_registered_count(id: Uuid, conn: &mut PgConnection) -> Result<CapacityOutcome, DatabaseError> {
        let updated = diesel::update(
            events::table.filter(
                events::id
                    .eq(id)
                    .and(events::capacity.eq(0).or(events::registered_count.lt(events::capacity))),
            ),
        )
        .set((
            events::registered_count.eq(events::registered_count + 1),
            events::updated_at.eq(dsl::now),
        ))
        .get_result::<Event>(conn)
        .optional()
        .to_db_error(ErrorCode::UpdateError, "Could not update event attendee count")?;

        match updated {
            Some(event) => Ok(CapacityOutcome::Counted(event)),
            None => {
                // Guard failed: either the event is gone or it is full
                Event::find(id, conn)?;
                Ok(CapacityOutcome::Full)
            }
        }
    }

    /// Compensating action for a released reservation; floored at zero.
    pub fn decrement_registered_count(id: Uuid, conn: &mut PgConnection) -> Result<(), DatabaseError> {
        diesel::update(events::table.filter(events::id.eq(id).and(events::registered_count.gt(0))))
            .set((
                events::registered_count.eq(events::registered_count - 1),
                events::updated_at.eq(dsl::now),
            ))
            .execute(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update event attendee count")?;
        Ok(())
    }
}
