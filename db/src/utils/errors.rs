use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use diesel::result::{ConnectionError, DatabaseErrorKind, Error as DieselError, QueryResult};
use log::Level;
use logging::jlog;
use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorCode {
    InvalidInput,
    MissingInput,
    NoResults,
    QueryError,
    InsertError,
    UpdateError,
    DeleteError,
    DuplicateKeyError,
    ConnectionError,
    InternalError,
    BusinessProcessError,
    ValidationError {
        errors: HashMap<String, Vec<String>>,
    },
    /// An inventory guard stopped a conditional increment. Expected outcome,
    /// also used to abort the surrounding transaction.
    SoldOut,
    ForeignKeyError,
    ParseError,
    Unknown,
}

pub fn get_error_message(code: &ErrorCode) -> (i32, String) {
    use self::ErrorCode::*;
    // In general these try to line up with the HTTP status family they map to
    match code {
        // Input errors - 1000 range
        InvalidInput => (1000, "Invalid input".to_string()),
        MissingInput => (1100, "Missing input".to_string()),
        // No results - 2000 range. The query worked but the wrong number of rows came back
        NoResults => (2000, "No results".to_string()),
        // Query errors - 3000 range
        QueryError => (3000, "Query Error".to_string()),
        InsertError => (3100, "Could not insert record".to_string()),
        UpdateError => (3200, "Could not update record".to_string()),
        DeleteError => (3300, "Could not delete record".to_string()),
        DuplicateKeyError => (3400, "Duplicate key error".to_string()),
        ConnectionError => (4000, "Connection error".to_string()),
        // Internal server error - 5000
        InternalError => (5000, "Internal error".to_string()),
        // Logical/business errors - 7000 range
        BusinessProcessError => (7000, "Business Process error".to_string()),
        ValidationError { errors: _ } => (7200, "Validation failed:".to_string()),
        ForeignKeyError => (
            7300,
            "Could not delete record because there are other entities referencing it".to_string(),
        ),
        ParseError => (7400, "Parse failed:".to_string()),
        SoldOut => (7500, "Sold out".to_string()),
        // Try not to use this error
        Unknown => (10, "Unknown database error".to_string()),
    }
}

#[derive(Debug, PartialEq)]
pub struct EnumParseError {
    pub message: String,
    pub enum_type: String,
    pub value: String,
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\nType: {}\nValue: {}", self.message, self.enum_type, self.value)
    }
}

impl Error for EnumParseError {}

#[derive(Debug, PartialEq)]
pub struct DatabaseError {
    pub code: i32,
    pub message: String,
    pub cause: Option<String>,
    pub error_code: ErrorCode,
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref cause) = self.cause {
            write!(f, "\nCaused by: {}", cause)?;
        }
        Ok(())
    }
}

impl Error for DatabaseError {}

impl Serialize for DatabaseError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DatabaseError", 3)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("cause", &self.cause)?;
        state.end()
    }
}

impl DatabaseError {
    pub fn new(error_code: ErrorCode, cause: Option<String>) -> DatabaseError {
        let (code, message) = get_error_message(&error_code);
        DatabaseError {
            code,
            message,
            cause,
            error_code,
        }
    }

    /// Wraps the error from a diesel result into a DatabaseError
    pub fn wrap<T>(error_code: ErrorCode, message: &str, res: QueryResult<T>) -> Result<T, DatabaseError> {
        match res {
            Ok(val) => Ok(val),
            Err(e) => {
                jlog!(Level::Debug, &format!("PG error: {}", message), {"error": e.to_string()});
                match e {
                    DieselError::NotFound => Err(DatabaseError::new(
                        ErrorCode::NoResults,
                        Some(format!("{}, {}", message, e)),
                    )),
                    DieselError::DatabaseError(kind, _) => match kind {
                        DatabaseErrorKind::UniqueViolation => Err(DatabaseError::new(
                            ErrorCode::DuplicateKeyError,
                            Some(format!("{}, {}", message, e)),
                        )),
                        DatabaseErrorKind::ForeignKeyViolation => Err(DatabaseError::new(
                            ErrorCode::ForeignKeyError,
                            Some(format!("{}, {}", message, e)),
                        )),
                        _ => Err(DatabaseError::new(error_code, Some(format!("{}, {}", message, e)))),
                    },
                    _ => Err(DatabaseError::new(error_code, Some(format!("{}, {}", message, e)))),
                }
            }
        }
    }

    pub fn business_process_error<T>(message: &str) -> Result<T, DatabaseError> {
        Err(DatabaseError::new(
            ErrorCode::BusinessProcessError,
            Some(message.to_string()),
        ))
    }

    pub fn no_results<T>(message: &str) -> Result<T, DatabaseError> {
        Err(DatabaseError::new(ErrorCode::NoResults, Some(message.to_string())))
    }

    pub fn validation_error<T>(errors: HashMap<String, Vec<String>>) -> Result<T, DatabaseError> {
        Err(DatabaseError::new(ErrorCode::ValidationError { errors }, None))
    }

    pub fn sold_out(message: &str) -> DatabaseError {
        DatabaseError::new(ErrorCode::SoldOut, Some(message.to_string()))
    }

    pub fn is_sold_out(&self) -> bool {
        self.error_code == ErrorCode::SoldOut
    }

    pub fn is_duplicate_key(&self) -> bool {
        self.error_code == ErrorCode::DuplicateKeyError
    }
}

impl From<ConnectionError> for DatabaseError {
    fn from(e: ConnectionError) -> Self {
        DatabaseError::new(ErrorCode::ConnectionError, Some(e.to_string()))
    }
}

impl From<EnumParseError> for DatabaseError {
    fn from(e: EnumParseError) -> Self {
        DatabaseError::new(ErrorCode::ParseError, Some(e.to_string()))
    }
}

// Lets `?` escape a diesel transaction closure without losing the reason
impl From<DieselError> for DatabaseError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => DatabaseError::new(ErrorCode::NoResults, Some(e.to_string())),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DatabaseError::new(ErrorCode::DuplicateKeyError, Some(e.to_string()))
            }
            DieselError::RollbackTransaction => {
                DatabaseError::new(ErrorCode::InternalError, Some("Transaction rolled back".to_string()))
            }
            _ => DatabaseError::new(ErrorCode::QueryError, Some(e.to_string())),
        }
    }
}

pub trait ConvertToDatabaseError<U> {
    fn to_db_error(self, code: ErrorCode, message: &str) -> Result<U, DatabaseError>;
}

impl<U> ConvertToDatabaseError<U> for QueryResult<U> {
    fn to_db_error(self, code: ErrorCode, message: &str) -> Result<U, DatabaseError> {
        DatabaseError::wrap(code, message, self)
    }
}
