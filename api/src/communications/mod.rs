use std::thread;

use log::Level::{Debug, Error, Info};
use logging::jlog;
use moolre::{SmsMessage, SmsRequest};

use crate::config::Config;

pub mod smsers;

/// Fire-and-forget SMS dispatch. The send happens on its own thread so the
/// calling request never waits on the SMS gateway, and a delivery failure is
/// logged and swallowed: notifications must never fail the state transition
/// that triggered them.
pub fn dispatch_sms(config: &Config, messages: Vec<SmsMessage>) {
    if messages.is_empty() {
        return;
    }
    if config.block_external_comms {
        jlog!(Debug, "gatelist_api::communications", "External communications are blocked, skipping SMS", {
            "messages": messages.len()
        });
        return;
    }

    let client = config.moolre_client();
    let request = SmsRequest::new(config.sms_sender_id.clone(), messages);
    let spawned = thread::Builder::new()
        .name("sms-dispatch".to_string())
        .spawn(move || match client.send_sms(&request) {
            Ok(response) => {
                jlog!(Info, "gatelist_api::communications", "SMS dispatched", {
                    "message": response.message
                });
            }
            Err(err) => {
                jlog!(Error, "gatelist_api::communications", "SMS dispatch failed", {
                    "error": err.to_string()
                });
            }
        });
    if let Err(err) = spawned {
        jlog!(Error, "gatelist_api::communications", "Could not spawn SMS dispatch thread", {
            "error": err.to_string()
        });
    }
}
