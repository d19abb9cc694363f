//! Client for the Moolre open API: USSD payment collection, SMS delivery and
//! the instant-payment-notification (IPN) payload the processor posts back to
//! us. Only the endpoints this platform uses are covered.

pub use self::client::{
    CollectionData, CollectionRequest, CollectionResponse, MoolreClient, SmsMessage, SmsRequest, SmsResponse,
};
pub use self::error::MoolreError;
pub use self::ipn::{IpnData, MoolreIpnRequest};
pub use self::outcome::PaymentOutcome;

mod client;
mod error;
mod ipn;
mod outcome;
