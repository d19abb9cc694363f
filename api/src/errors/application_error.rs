use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ApplicationErrorType {
    BadRequest,
    Internal,
    ServerConfigError,
    Unprocessable,
}

#[derive(Debug)]
pub struct ApplicationError {
    pub reason: String,
    pub error_type: ApplicationErrorType,
}

impl ApplicationError {
    pub fn new(reason: String) -> ApplicationError {
        ApplicationError {
            reason,
            error_type: ApplicationErrorType::Internal,
        }
    }

    pub fn new_with_type(reason: String, error_type: ApplicationErrorType) -> ApplicationError {
        ApplicationError { reason, error_type }
    }

    pub fn bad_request(reason: &str) -> ApplicationError {
        ApplicationError::new_with_type(reason.to_string(), ApplicationErrorType::BadRequest)
    }

    pub fn unprocessable(reason: &str) -> ApplicationError {
        ApplicationError::new_with_type(reason.to_string(), ApplicationErrorType::Unprocessable)
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.reason)
    }
}

impl Error for ApplicationError {}
