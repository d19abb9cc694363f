use chrono::Utc;
use gatelist_db::models::Registration;
use moolre::SmsMessage;

use crate::communications;
use crate::config::Config;

/// Sent right after a registration is created: either the free-ticket
/// confirmation or the complete-your-payment prompt.
pub fn registration_created(config: &Config, registration: &Registration, event_title: &str) {
    let phone = match &registration.phone {
        Some(phone) => phone.clone(),
        None => return,
    };
    let pending_payment = registration.payment_status == "pending";
    let message = registration_created_message(
        &registration.name,
        event_title,
        &registration.ticket_id,
        pending_payment,
    );
    communications::dispatch_sms(
        config,
        vec![SmsMessage {
            recipient: phone,
            message,
            reference: Some(format!("registration-{}", registration.id)),
        }],
    );
}

/// Sent when the webhook confirms payment.
pub fn payment_confirmed(
    config: &Config,
    registration: &Registration,
    event_title: &str,
    ticket_type_name: &str,
) {
    let phone = match &registration.phone {
        Some(phone) => phone.clone(),
        None => return,
    };
    let message = payment_confirmed_message(
        &registration.name,
        event_title,
        &registration.ticket_id,
        ticket_type_name,
        registration.amount,
    );
    communications::dispatch_sms(
        config,
        vec![SmsMessage {
            recipient: phone,
            message,
            reference: Some(format!("payment-confirmed-{}-{}", registration.id, Utc::now().timestamp())),
        }],
    );
}

fn registration_created_message(name: &str, event_title: &str, ticket_code: &str, pending_payment: bool) -> String {
    format!(
        "Hi {}, your registration for \"{}\" is {}. Ticket ID: {}. {}",
        name,
        event_title,
        if pending_payment { "pending payment" } else { "confirmed" },
        ticket_code,
        if pending_payment {
            "Please complete payment via the USSD prompt on your phone."
        } else {
            "See you there!"
        }
    )
}

fn payment_confirmed_message(
    name: &str,
    event_title: &str,
    ticket_code: &str,
    ticket_type_name: &str,
    amount: i64,
) -> String {
    format!(
        "Payment confirmed! Hi {}, your registration for \"{}\" is confirmed.\nTicket ID: {}\nTicket Type: {}\nAmount: GH₵{}\nSee you there!",
        name,
        event_title,
        ticket_code,
        ticket_type_name,
        format_ghs(amount)
    )
}

/// The pending-payment reminder used by the event broadcast. An organizer
/// supplied template may reference `{name}`, `{event}`, `{ticket_id}` and
/// `{amount}`.
pub fn pending_payment_reminder_message(
    template: Option<&str>,
    name: &str,
    event_title: &str,
    ticket_code: &str,
    amount: i64,
) -> String {
    match template {
        Some(template) => template
            .replace("{name}", name)
            .replace("{event}", event_title)
            .replace("{ticket_id}", ticket_code)
            .replace("{amount}", &format!("GH₵{}", format_ghs(amount))),
        None => format!(
            "Hi {}, your registration for \"{}\" is pending payment of GH₵{}. Ticket: {}. Please complete payment to confirm your spot.",
            name,
            event_title,
            format_ghs(amount),
            ticket_code
        ),
    }
}

/// Whole-cedi amount with thousands separators, e.g. 12500 -> "12,500".
fn format_ghs(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
