use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use gatelist_db::prelude::*;
use log::Level::Info;
use logging::jlog;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::communications::smsers;
use crate::errors::ApiError;
use crate::models::{PathParameters, TicketCodePathParameters};
use crate::server::AppState;

#[derive(Deserialize)]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub custom_field_values: Option<Value>,
}

pub async fn create(
    (state, data): (Data<AppState>, Json<CreateRegistrationRequest>),
) -> Result<HttpResponse, ApiError> {
    let data = data.into_inner();
    let mut conn = state.database.get_connection()?;

    let event = Event::find(data.event_id, &mut conn)?;
    let ticket_type = TicketType::find(data.ticket_type_id, &mut conn)?;
    if ticket_type.event_id != event.id {
        return Ok(HttpResponse::BadRequest().json(json!({"error": "Ticket type does not belong to this event"})));
    }

    let attendee = AttendeeDetails {
        name: data.name,
        email: data.email,
        phone: data.phone,
    };
    match Registration::create_for_ticket(&event, &ticket_type, attendee, data.custom_field_values, &mut conn)? {
        RegistrationCreateResult::Created(registration) => {
            jlog!(Info, "gatelist_api::registrations", "Registration created", {
                "registration_id": registration.id,
                "event_id": event.id,
                "ticket_type_id": ticket_type.id,
                "payment_status": &registration.payment_status
            });
            smsers::registrations::registration_created(&state.config, &registration, &event.title);
            Ok(HttpResponse::Created().json(&registration))
        }
        RegistrationCreateResult::SoldOut => {
            Ok(HttpResponse::UnprocessableEntity().json(json!({"error": "This ticket is sold out"})))
        }
    }
}

pub async fn show((state, path): (Data<AppState>, Path<PathParameters>)) -> Result<HttpResponse, ApiError> {
    let mut conn = state.database.get_connection()?;
    let registration = Registration::find(path.id, &mut conn)?;
    Ok(HttpResponse::Ok().json(&registration))
}

pub async fn check_in(
    (state, path): (Data<AppState>, Path<TicketCodePathParameters>),
) -> Result<HttpResponse, ApiError> {
    let mut conn = state.database.get_connection()?;
    let registration = Registration::find_by_ticket_code(&path.ticket_code, &mut conn)?;

    match registration.check_in(&mut conn)? {
        CheckInResult::CheckedIn(registration) => {
            jlog!(Info, "gatelist_api::registrations", "Attendee checked in", {
                "registration_id": registration.id,
                "ticket_code": &registration.ticket_id
            });
            Ok(HttpResponse::Ok().json(&registration))
        }
        CheckInResult::AlreadyCheckedIn(registration) => Ok(HttpResponse::Conflict().json(json!({
            "error": "Ticket has already been checked in",
            "checked_in_at": registration.checked_in_at
        }))),
        CheckInResult::PaymentPending(_) => Ok(HttpResponse::Conflict()
            .json(json!({"error": "Payment is still pending for this registration"}))),
        CheckInResult::Cancelled(_) => {
            Ok(HttpResponse::Conflict().json(json!({"error": "Registration has been cancelled"})))
        }
    }
}
