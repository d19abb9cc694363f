use std::error::Error;
use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use gatelist_db::utils::errors::{DatabaseError, EnumParseError, ErrorCode};
use log::{error, warn};
use moolre::MoolreError;
use serde_json::{json, Error as SerdeError};

use crate::errors::{ApplicationError, ApplicationErrorType};
use crate::payments::PaymentProcessorError;

pub trait ConvertToWebError: Debug + Error + ToString {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
    fn to_response(&self) -> HttpResponse;
}

fn internal_error(message: &str) -> HttpResponse {
    status_code_and_message(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn status_code_and_message(code: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(code).json(json!({"error": message.to_string()}))
}

impl ConvertToWebError for DieselError {
    fn to_response(&self) -> HttpResponse {
        error!("Diesel error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for PoolError {
    fn to_response(&self) -> HttpResponse {
        error!("R2D2 error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for SerdeError {
    fn to_response(&self) -> HttpResponse {
        error!("Serde error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for std::io::Error {
    fn to_response(&self) -> HttpResponse {
        error!("IO error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for uuid::Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
    fn to_response(&self) -> HttpResponse {
        status_code_and_message(StatusCode::BAD_REQUEST, "Invalid id")
    }
}

impl ConvertToWebError for EnumParseError {
    fn to_response(&self) -> HttpResponse {
        error!("Enum parse error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for MoolreError {
    fn status_code(&self) -> StatusCode {
        match self {
            MoolreError::ApiRejection { .. } => StatusCode::BAD_REQUEST,
            // The integration is broken, not the business request
            MoolreError::UnexpectedResponse(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn to_response(&self) -> HttpResponse {
        match self {
            MoolreError::ApiRejection { message, .. } => {
                status_code_and_message(StatusCode::BAD_REQUEST, message)
            }
            MoolreError::UnexpectedResponse(_) => {
                error!("Moolre contract violation: {}", self);
                status_code_and_message(
                    StatusCode::BAD_GATEWAY,
                    "The payment gateway returned an invalid response",
                )
            }
            _ => {
                error!("Moolre error: {}", self);
                internal_error("Internal error")
            }
        }
    }
}

impl ConvertToWebError for PaymentProcessorError {
    fn status_code(&self) -> StatusCode {
        if self.rejection_message.is_some() {
            StatusCode::BAD_REQUEST
        } else if self.upstream_violation {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
    fn to_response(&self) -> HttpResponse {
        if let Some(ref details) = self.rejection_message {
            HttpResponse::BadRequest().json(json!({"error": "Payment initiation failed", "details": details}))
        } else if self.upstream_violation {
            error!("Payment processor contract violation: {}", self);
            status_code_and_message(
                StatusCode::BAD_GATEWAY,
                "The payment gateway returned an invalid response",
            )
        } else {
            error!("Payment processor error: {}", self);
            internal_error("Internal error")
        }
    }
}

impl ConvertToWebError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ApplicationErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ApplicationErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApplicationErrorType::ServerConfigError => StatusCode::INTERNAL_SERVER_ERROR,
            ApplicationErrorType::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
    fn to_response(&self) -> HttpResponse {
        warn!("Application error: {}", self);
        let message = match self.error_type {
            ApplicationErrorType::Internal | ApplicationErrorType::ServerConfigError => "Internal error",
            _ => &self.reason,
        };
        status_code_and_message(self.status_code(), message)
    }
}

impl ConvertToWebError for DatabaseError {
    fn status_code(&self) -> StatusCode {
        match self.code {
            1000 | 1100 => StatusCode::BAD_REQUEST,
            2000 => StatusCode::NOT_FOUND,
            3400 => StatusCode::CONFLICT,
            7000 | 7200 | 7500 => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn to_response(&self) -> HttpResponse {
        let message = match self.code {
            1000 => "Invalid input",
            1100 => "Missing input",
            2000 => "No results",
            3000 => "Query error",
            3100 => "Could not insert record",
            3200 => "Could not update record",
            3300 => "Could not delete record",
            3400 => self.cause.as_deref().unwrap_or("Duplicate record exists"),
            4000 => "Connection error",
            7000 => self.cause.as_deref().unwrap_or("Unknown Cause"),
            7200 => match &self.error_code {
                ErrorCode::ValidationError { errors } => {
                    return HttpResponse::UnprocessableEntity()
                        .json(json!({"error": "Validation error".to_string(), "fields": errors}));
                }
                _ => "Validation error",
            },
            7500 => self.cause.as_deref().unwrap_or("Sold out"),
            5000 | 7300 => "Internal error",
            _ => "Unknown error",
        };
        status_code_and_message(self.status_code(), message)
    }
}
