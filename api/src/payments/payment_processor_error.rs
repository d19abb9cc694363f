use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub struct PaymentProcessorError {
    pub description: String,
    /// Set when the processor synchronously rejected the request with a well
    /// formed reason; the registration should be failed and the reason shown
    /// to the caller.
    pub rejection_message: Option<String>,
    /// Set when the processor broke its response contract (non-JSON body,
    /// unexpected shape). Surfaced as a gateway fault, not a rejection.
    pub upstream_violation: bool,
    pub cause: Option<Box<dyn Error + Send + Sync>>,
}

impl fmt::Display for PaymentProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.cause {
            Some(cause) => write!(f, "{} caused by: {}", self.description, cause),
            None => write!(f, "{}", self.description),
        }
    }
}

impl Error for PaymentProcessorError {}
