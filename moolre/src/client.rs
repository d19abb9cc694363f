use log::Level::Debug;
use logging::jlog;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::MoolreError;

const RESPONSE_SNIPPET_LEN: usize = 200;

/// Thin client over the Moolre open API. Collection requests push a USSD
/// approval prompt to the payer's phone; the actual result arrives later on
/// the IPN webhook, so a successful call here only means "prompt sent".
#[derive(Clone)]
pub struct MoolreClient {
    api_user: String,
    api_key: String,
    api_pubkey: String,
    vas_key: Option<String>,
    base_url: String,
}

impl MoolreClient {
    /// `base_url` is the API root, e.g. `https://api.moolre.com`.
    pub fn new(
        api_user: String,
        api_key: String,
        api_pubkey: String,
        vas_key: Option<String>,
        base_url: String,
    ) -> MoolreClient {
        MoolreClient {
            api_user,
            api_key,
            api_pubkey,
            vas_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn request_payment(&self, request: &CollectionRequest) -> Result<CollectionResponse, MoolreError> {
        jlog!(Debug, "Sending payment collection request to Moolre", {
            "externalref": &request.externalref,
            "amount": request.amount,
            "currency": &request.currency
        });

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&format!("{}/open/transact/payment", self.base_url))
            .header("X-API-USER", self.api_user.as_str())
            .header("X-API-KEY", self.api_key.as_str())
            .header("X-API-PUBKEY", self.api_pubkey.as_str())
            .json(request)
            .send()?;
        let http_status = response.status();
        let body = response.text()?;
        jlog!(Debug, "Response from Moolre", {"status": http_status.as_u16(), "body": &body});

        let envelope: ApiEnvelope<CollectionData> = parse_envelope(&body)?;
        if !http_status.is_success() || envelope.status != 1 {
            return Err(envelope.into_rejection());
        }
        Ok(CollectionResponse {
            message: envelope.message,
            data: envelope.data,
        })
    }

    pub fn send_sms(&self, request: &SmsRequest) -> Result<SmsResponse, MoolreError> {
        let vas_key = self
            .vas_key
            .as_ref()
            .ok_or_else(|| MoolreError::Unconfigured("SMS VAS key is not set".to_string()))?;

        jlog!(Debug, "Sending SMS via Moolre", {
            "senderid": &request.senderid,
            "messages": request.messages.len()
        });

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&format!("{}/open/sms/send", self.base_url))
            .header("X-API-USER", self.api_user.as_str())
            .header("X-API-KEY", self.api_key.as_str())
            .header("X-API-PUBKEY", self.api_pubkey.as_str())
            .header("X-API-VASKEY", vas_key.as_str())
            .json(request)
            .send()?;
        let http_status = response.status();
        let body = response.text()?;
        jlog!(Debug, "SMS response from Moolre", {"status": http_status.as_u16(), "body": &body});

        let envelope: ApiEnvelope<serde_json::Value> = parse_envelope(&body)?;
        if !http_status.is_success() || envelope.status != 1 {
            return Err(envelope.into_rejection());
        }
        Ok(SmsResponse {
            message: envelope.message,
        })
    }
}

fn parse_envelope<T: DeserializeOwned + Default>(body: &str) -> Result<ApiEnvelope<T>, MoolreError> {
    serde_json::from_str(body).map_err(|_| {
        let snippet: String = body.chars().take(RESPONSE_SNIPPET_LEN).collect();
        MoolreError::UnexpectedResponse(snippet)
    })
}

/// Every Moolre endpoint wraps its result in the same envelope; `status` is
/// `1` on acceptance and `0` on rejection.
#[derive(Deserialize)]
struct ApiEnvelope<T> {
    status: i64,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_rejection(self) -> MoolreError {
        MoolreError::ApiRejection {
            code: self.code,
            message: self.message.unwrap_or_else(|| "Unknown error from Moolre".to_string()),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CollectionRequest {
    #[serde(rename = "type")]
    request_type: i32,
    channel: String,
    pub currency: String,
    pub payer: String,
    pub amount: i64,
    pub accountnumber: String,
    pub externalref: String,
    pub reference: String,
}

impl CollectionRequest {
    /// `externalref` is our correlation value (the registration id) and is
    /// echoed back on the IPN; `reference` is the human readable description
    /// shown on the payer's prompt.
    pub fn new(
        payer: String,
        amount: i64,
        currency: String,
        externalref: String,
        reference: String,
    ) -> CollectionRequest {
        CollectionRequest {
            // type 1 / channel 13: mobile money collection
            request_type: 1,
            channel: "13".to_string(),
            currency,
            accountnumber: payer.clone(),
            payer,
            amount,
            externalref,
            reference,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CollectionData {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug)]
pub struct CollectionResponse {
    pub message: Option<String>,
    pub data: Option<CollectionData>,
}

impl CollectionResponse {
    /// The processor-side token used to match the asynchronous callback when
    /// no echoed reference is present.
    pub fn tracking_reference(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        data.reference.clone().or_else(|| data.transaction_id.clone())
    }
}

#[derive(Serialize, Debug)]
pub struct SmsRequest {
    #[serde(rename = "type")]
    request_type: i32,
    pub senderid: String,
    pub messages: Vec<SmsMessage>,
}

impl SmsRequest {
    pub fn new(senderid: String, messages: Vec<SmsMessage>) -> SmsRequest {
        SmsRequest {
            request_type: 1,
            senderid,
            messages,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct SmsMessage {
    pub recipient: String,
    pub message: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug)]
pub struct SmsResponse {
    pub message: Option<String>,
}
