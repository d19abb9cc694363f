use std::error::Error;
use std::fmt;

use actix_web::error::ResponseError;
use actix_web::HttpResponse;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use gatelist_db::utils::errors::{DatabaseError, EnumParseError};
use moolre::MoolreError;
use serde_json::Error as SerdeError;

use crate::errors::{ApplicationError, ConvertToWebError};
use crate::payments::PaymentProcessorError;

#[derive(Debug)]
pub struct ApiError(Box<dyn ConvertToWebError + Send + Sync>);

macro_rules! error_conversion {
    ($e: ty) => {
        impl From<$e> for ApiError {
            fn from(e: $e) -> Self {
                ApiError(Box::new(e))
            }
        }
    };
}

error_conversion!(ApplicationError);
error_conversion!(DatabaseError);
error_conversion!(DieselError);
error_conversion!(EnumParseError);
error_conversion!(MoolreError);
error_conversion!(PaymentProcessorError);
error_conversion!(PoolError);
error_conversion!(SerdeError);
error_conversion!(std::io::Error);
error_conversion!(uuid::Error);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0.to_string())
    }
}

impl Error for ApiError {}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        self.0.to_response()
    }
}

impl ApiError {
    pub fn new(inner: Box<dyn ConvertToWebError + Send + Sync>) -> ApiError {
        ApiError(inner)
    }

    pub fn into_inner(&self) -> &dyn ConvertToWebError {
        self.0.as_ref()
    }
}
