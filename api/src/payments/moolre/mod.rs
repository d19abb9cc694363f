use moolre::{CollectionRequest, MoolreClient, MoolreError};

use crate::payments::payment_processor::{CollectionDetails, InitiationResult, PaymentProcessor};
use crate::payments::payment_processor_error::PaymentProcessorError;

pub struct MoolrePaymentProcessor {
    client: MoolreClient,
}

impl MoolrePaymentProcessor {
    pub fn new(client: MoolreClient) -> MoolrePaymentProcessor {
        MoolrePaymentProcessor { client }
    }
}

impl PaymentProcessor for MoolrePaymentProcessor {
    fn name(&self) -> String {
        "Moolre".to_string()
    }

    fn request_collection(&self, details: &CollectionDetails) -> Result<InitiationResult, PaymentProcessorError> {
        let request = CollectionRequest::new(
            details.payer_phone.clone(),
            details.amount,
            details.currency.clone(),
            details.external_reference.clone(),
            details.description.clone(),
        );
        let response = self.client.request_payment(&request)?;
        Ok(InitiationResult {
            tracking_reference: response.tracking_reference(),
            message: response
                .message
                .unwrap_or_else(|| "Payment prompt sent to your phone".to_string()),
        })
    }
}

impl From<MoolreError> for PaymentProcessorError {
    fn from(e: MoolreError) -> Self {
        let rejection_message = match &e {
            MoolreError::ApiRejection { message, .. } => Some(message.clone()),
            _ => None,
        };
        let upstream_violation = matches!(e, MoolreError::UnexpectedResponse(_));
        PaymentProcessorError {
            description: e.to_string(),
            rejection_message,
            upstream_violation,
            cause: Some(Box::new(e)),
        }
    }
}
