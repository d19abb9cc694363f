use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::ticket_types;
use crate::utils::errors::{ConvertToDatabaseError, DatabaseError, ErrorCode};

#[derive(Queryable, Identifiable, Clone, Serialize, Debug, PartialEq)]
#[diesel(table_name = ticket_types)]
pub struct TicketType {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i32,
    pub sold: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = ticket_types)]
pub struct NewTicketType {
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// Outcome of the conditional `sold` increment.
#[derive(Debug)]
pub enum ReserveOutcome {
    Reserved(TicketType),
    SoldOut,
}

impl NewTicketType {
    pub fn commit(self, conn: &mut PgConnection) -> Result<TicketType, DatabaseError> {
        diesel::insert_into(ticket_types::table)
            .values(&self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new ticket type")
    }
}

impl TicketType {
    pub fn create(event_id: Uuid, name: String, price: i64, quantity: i32) -> NewTicketType {
        NewTicketType {
            event_id,
            name,
            description: None,
            price,
            quantity,
            start_date: None,
            end_date: None,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<TicketType, DatabaseError> {
        ticket_types::table
            .filter(ticket_types::id.eq(id))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not find ticket type")
    }

    /// Remaining sellable units, `None` when unlimited.
    pub fn remaining(&self) -> Option<i32> {
        if self.quantity == 0 {
            None
        } else {
            Some((self.quantity - self.sold).max(0))
        }
    }

    /// Whether the tier is inside its sale window. Tiers without a window are
    /// always on sale.
    pub fn is_on_sale(&self, now: NaiveDateTime) -> bool {
        let started = self.start_date.map_or(true, |start| start <= now);
        let not_ended = self.end_date.map_or(true, |end| now <= end);
        started && not_ended
    }

    /// Takes one unit of inventory. The availability check and the increment
    /// are a single conditional UPDATE so concurrent callers can never push
    /// `sold` past `quantity`; quantity 0 is the unlimited sentinel.
    pub fn reserve(id: Uuid, conn: &mut PgConnection) -> Result<ReserveOutcome, DatabaseError> {
        let updated = diesel::update(
            ticket_types::table.filter(
                ticket_types::id
                    .eq(id)
                    .and(ticket_types::quantity.eq(0).or(ticket_types::sold.lt(ticket_types::quantity))),
            ),
        )
        .set(ticket_types::sold.eq(ticket_types::sold + 1))
        .get_result::<TicketType>(conn)
        .optional()
        .to_db_error(ErrorCode::UpdateError, "Could not reserve ticket")?;

        match updated {
            Some(ticket_type) => Ok(ReserveOutcome::Reserved(ticket_type)),
            None => {
                // Guard failed: either the tier is gone or it is sold out
                TicketType::find(id, conn)?;
                Ok(ReserveOutcome::SoldOut)
            }
        }
    }

    /// Returns one unit of inventory, used when a reservation's registration
    /// fails terminally. Floored at zero.
    pub fn release(id: Uuid, conn: &mut PgConnection) -> Result<(), DatabaseError> {
        diesel::update(ticket_types::table.filter(ticket_types::id.eq(id).and(ticket_types::sold.gt(0))))
            .set(ticket_types::sold.eq(ticket_types::sold - 1))
            .execute(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not release ticket")?;
        Ok(())
    }
}
