use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use gatelist_db::prelude::*;
use log::Level::{Info, Warn};
use logging::jlog;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::payments::CollectionDetails;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    pub registration_id: Uuid,
}

/// Starts the mobile-money collection for a pending registration. Acceptance
/// here only means the USSD prompt went out; confirmation arrives later on
/// the webhook, so the registration stays pending with the processor's
/// tracking token stored for matching.
pub async fn create((state, data): (Data<AppState>, Json<CreatePaymentRequest>)) -> Result<HttpResponse, ApiError> {
    let mut conn = state.database.get_connection()?;
    let registration = Registration::find(data.registration_id, &mut conn)?;

    match registration.state()? {
        RegistrationState::PendingPayment => (),
        RegistrationState::Confirmed(_) | RegistrationState::CheckedIn(_) => {
            return Ok(HttpResponse::UnprocessableEntity()
                .json(json!({"error": "No payment is due for this registration"})));
        }
        RegistrationState::Cancelled(_) => {
            return Ok(HttpResponse::UnprocessableEntity()
                .json(json!({"error": "Registration has been cancelled"})));
        }
    }
    let payer_phone = match &registration.phone {
        Some(phone) => phone.clone(),
        None => {
            return Ok(HttpResponse::UnprocessableEntity()
                .json(json!({"error": "Registration has no phone number for mobile money collection"})));
        }
    };

    let event = registration.event(&mut conn)?;
    let ticket_type = registration.ticket_type(&mut conn)?;
    let details = CollectionDetails {
        payer_phone,
        amount: registration.amount,
        currency: state.config.primary_currency.clone(),
        external_reference: registration.id.to_string(),
        description: format!("{} - {} ticket", event.title, ticket_type.name),
    };

    let processor = state.service_locator.create_payment_processor();
    match processor.request_collection(&details) {
        Ok(result) => {
            if let Some(reference) = &result.tracking_reference {
                registration.set_payment_reference(reference, &mut conn)?;
            }
            jlog!(Info, "gatelist_api::payments", "Payment collection initiated", {
                "registration_id": registration.id,
                "processor": processor.name(),
                "tracking_reference": result.tracking_reference
            });
            Ok(HttpResponse::Ok().json(json!({"success": true, "message": result.message})))
        }
        Err(err) => match &err.rejection_message {
            // A well formed rejection is terminal: cancel the registration
            // and return its inventory unit
            Some(details_message) => {
                jlog!(Warn, "gatelist_api::payments", "Payment initiation rejected", {
                    "registration_id": registration.id,
                    "details": details_message
                });
                registration.fail_payment(&mut conn)?;
                Ok(HttpResponse::BadRequest()
                    .json(json!({"error": "Payment initiation failed", "details": details_message})))
            }
            None => Err(err.into()),
        },
    }
}
