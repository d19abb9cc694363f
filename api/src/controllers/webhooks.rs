use actix_web::web::{Data, Json};
use actix_web::{HttpRequest, HttpResponse};
use gatelist_db::prelude::*;
use log::Level::{Debug, Error, Info, Warn};
use logging::jlog;
use moolre::{MoolreIpnRequest, PaymentOutcome};
use serde_json::json;
use uuid::Uuid;

use crate::communications::smsers;
use crate::errors::ApiError;
use crate::server::AppState;

pub const WEBHOOK_TOKEN_HEADER: &str = "X-Webhook-Token";

/// Receives Moolre's asynchronous payment result. The callback is untrusted,
/// may arrive twice, late, or with an unrecognized status; everything here
/// fails closed and leans on the guarded state transitions for idempotency.
pub async fn moolre(
    (state, request, payload): (Data<AppState>, HttpRequest, Json<MoolreIpnRequest>),
) -> Result<HttpResponse, ApiError> {
    if let Some(expected) = &state.config.moolre_webhook_token {
        let provided = request
            .headers()
            .get(WEBHOOK_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            jlog!(Warn, "gatelist_api::webhooks", "Webhook token mismatch", {});
            return Ok(HttpResponse::Unauthorized().json(json!({"error": "Invalid webhook token"})));
        }
    }

    let payload = payload.into_inner();
    jlog!(Debug, "gatelist_api::webhooks", "Moolre IPN received", {"payload": &payload});

    if payload.echoed_reference().is_none() && payload.processor_transaction_id().is_none() {
        return Ok(HttpResponse::BadRequest().json(json!({"error": "Missing reference or transaction_id"})));
    }

    let mut conn = state.database.get_connection()?;

    // Echoed reference (our registration id) first, stored correlation value
    // second; anything else is a miss and must not guess
    let mut registration: Option<Registration> = None;
    if let Some(echoed) = payload.echoed_reference() {
        if let Ok(id) = echoed.parse::<Uuid>() {
            registration = Registration::find_optional(id, &mut conn)?;
        }
    }
    if registration.is_none() {
        if let Some(transaction_id) = payload.processor_transaction_id() {
            registration = Registration::find_by_payment_reference(transaction_id, &mut conn)?;
        }
    }
    let registration = match registration {
        Some(registration) => registration,
        None => {
            jlog!(Warn, "gatelist_api::webhooks", "No registration matches webhook", {
                "echoed_reference": payload.echoed_reference(),
                "transaction_id": payload.processor_transaction_id()
            });
            return Ok(HttpResponse::NotFound().json(json!({"error": "Registration not found"})));
        }
    };

    let mut outcome = payload.outcome();
    if outcome == PaymentOutcome::Success {
        if let Some(paid_amount) = payload.amount() {
            if (paid_amount - registration.amount as f64).abs() > 0.005 {
                // Acknowledged so the processor stops retrying, but the money
                // does not match the ticket; leave it pending for operators
                jlog!(Error, "gatelist_api::webhooks", "Webhook amount does not match registration", {
                    "registration_id": registration.id,
                    "registration_amount": registration.amount,
                    "webhook_amount": paid_amount
                });
                outcome = PaymentOutcome::Indeterminate;
            }
        }
    }

    let current = match outcome {
        PaymentOutcome::Success => match registration.settle_payment(&mut conn)? {
            ReconcileResult::Applied(confirmed) => {
                jlog!(Info, "gatelist_api::webhooks", "Payment confirmed", {
                    "registration_id": confirmed.id
                });
                let event = confirmed.event(&mut conn)?;
                let ticket_type = confirmed.ticket_type(&mut conn)?;
                smsers::registrations::payment_confirmed(&state.config, &confirmed, &event.title, &ticket_type.name);
                confirmed
            }
            ReconcileResult::AlreadySettled(current) => {
                jlog!(Info, "gatelist_api::webhooks", "Duplicate success callback ignored", {
                    "registration_id": current.id
                });
                current
            }
        },
        PaymentOutcome::Failure => match registration.fail_payment(&mut conn)? {
            ReconcileResult::Applied(cancelled) => {
                jlog!(Info, "gatelist_api::webhooks", "Payment failed, registration cancelled", {
                    "registration_id": cancelled.id
                });
                cancelled
            }
            ReconcileResult::AlreadySettled(current) => {
                jlog!(Info, "gatelist_api::webhooks", "Duplicate failure callback ignored", {
                    "registration_id": current.id
                });
                current
            }
        },
        PaymentOutcome::Indeterminate => {
            jlog!(Warn, "gatelist_api::webhooks", "Indeterminate webhook status, no state change", {
                "registration_id": registration.id,
                "status": payload.raw_status()
            });
            registration
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": current.status,
        "payment_status": current.payment_status
    })))
}
