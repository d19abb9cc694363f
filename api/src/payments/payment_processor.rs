use crate::payments::PaymentProcessorError;

/// Everything the processor needs to push a mobile-money approval prompt to
/// the payer. `external_reference` is the registration id; the processor
/// echoes it on the asynchronous callback.
pub struct CollectionDetails {
    pub payer_phone: String,
    pub amount: i64,
    pub currency: String,
    pub external_reference: String,
    pub description: String,
}

/// The processor accepted the collection request. The money has NOT moved
/// yet; the result arrives later on the webhook. `tracking_reference` is the
/// processor-side token stored for callback matching.
#[derive(Debug)]
pub struct InitiationResult {
    pub tracking_reference: Option<String>,
    pub message: String,
}

pub trait PaymentProcessor: Send + Sync {
    fn name(&self) -> String;

    fn request_collection(&self, details: &CollectionDetails) -> Result<InitiationResult, PaymentProcessorError>;
}
