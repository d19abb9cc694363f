use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum MoolreError {
    /// The API answered with a well formed envelope whose status signals a
    /// rejection. This is a business outcome, not an integration failure.
    ApiRejection { code: Option<String>, message: String },
    /// The HTTP request itself failed (connect, timeout, TLS).
    Http(reqwest::Error),
    /// The API returned something that is not the documented JSON envelope.
    /// Carries the start of the offending body for operator diagnosis.
    UnexpectedResponse(String),
    /// The client is missing a credential required for the requested call.
    Unconfigured(String),
}

impl fmt::Display for MoolreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoolreError::ApiRejection { code, message } => match code {
                Some(code) => write!(f, "Moolre rejected the request ({}): {}", code, message),
                None => write!(f, "Moolre rejected the request: {}", message),
            },
            MoolreError::Http(cause) => write!(f, "Error calling Moolre: {}", cause),
            MoolreError::UnexpectedResponse(body) => {
                write!(f, "Moolre returned an invalid response: {}", body)
            }
            MoolreError::Unconfigured(message) => write!(f, "Moolre client not configured: {}", message),
        }
    }
}

impl Error for MoolreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MoolreError::Http(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MoolreError {
    fn from(cause: reqwest::Error) -> Self {
        MoolreError::Http(cause)
    }
}
