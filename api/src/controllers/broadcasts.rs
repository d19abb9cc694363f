use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use gatelist_db::prelude::*;
use log::Level::Info;
use logging::jlog;
use moolre::SmsMessage;
use serde::Deserialize;
use serde_json::json;

use crate::communications;
use crate::communications::smsers;
use crate::errors::ApiError;
use crate::models::PathParameters;
use crate::server::AppState;

#[derive(Deserialize, Default)]
pub struct CreateBroadcastRequest {
    pub message_template: Option<String>,
}

/// Sends a pending-payment reminder to every registration of the event that
/// is still awaiting payment and has a phone number. Best effort: the batch
/// is dispatched without waiting and individual failures are only logged.
pub async fn create(
    (state, path, data): (Data<AppState>, Path<PathParameters>, Json<CreateBroadcastRequest>),
) -> Result<HttpResponse, ApiError> {
    let mut conn = state.database.get_connection()?;
    let event = Event::find(path.id, &mut conn)?;
    let pending = Registration::pending_payment_for_event(event.id, &mut conn)?;

    let messages: Vec<SmsMessage> = pending
        .iter()
        .filter_map(|registration| {
            registration.phone.as_ref().map(|phone| SmsMessage {
                recipient: phone.clone(),
                message: smsers::registrations::pending_payment_reminder_message(
                    data.message_template.as_deref(),
                    &registration.name,
                    &event.title,
                    &registration.ticket_id,
                    registration.amount,
                ),
                reference: Some(format!("pending-{}", registration.id)),
            })
        })
        .collect();
    let sent = messages.len();
    communications::dispatch_sms(&state.config, messages);

    jlog!(Info, "gatelist_api::broadcasts", "Pending payment reminders dispatched", {
        "event_id": event.id,
        "sent": sent
    });
    Ok(HttpResponse::Ok().json(json!({"success": true, "sent": sent})))
}
