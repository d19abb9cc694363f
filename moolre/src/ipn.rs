use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::outcome::PaymentOutcome;

/// The payload Moolre posts to our webhook once a USSD collection settles.
/// Every field is optional because the processor has shipped several shapes
/// of this document; accessors below encode the observed fallbacks.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MoolreIpnRequest {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub data: Option<IpnData>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct IpnData {
    #[serde(default)]
    pub txstatus: Option<Value>,
    #[serde(default)]
    pub externalref: Option<String>,
    #[serde(default)]
    pub transactionid: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl MoolreIpnRequest {
    /// The raw status value, wherever the processor put it this time.
    pub fn raw_status(&self) -> Option<&Value> {
        self.status
            .as_ref()
            .or_else(|| self.data.as_ref().and_then(|data| data.txstatus.as_ref()))
    }

    pub fn outcome(&self) -> PaymentOutcome {
        PaymentOutcome::from_raw(self.raw_status())
    }

    /// The reference we supplied at initiation, echoed back. This is the
    /// registration's own id.
    pub fn echoed_reference(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.externalref.as_deref())
            .or_else(|| self.reference.as_deref())
    }

    /// Moolre's own transaction identifier, matched against the stored
    /// correlation reference when no echoed reference is present.
    pub fn processor_transaction_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.transactionid.as_deref())
            .or_else(|| self.transaction_id.as_deref())
    }

    /// The settled amount, if the payload carries one. Observed both as a
    /// JSON number and as a numeric string.
    pub fn amount(&self) -> Option<f64> {
        let raw = self.data.as_ref().and_then(|data| data.amount.as_ref())?;
        match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}
