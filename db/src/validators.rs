use std::collections::HashMap;

use crate::utils::errors::DatabaseError;

/// Accumulator for field-level validation failures, surfaced as a single
/// `ErrorCode::ValidationError` so the web layer can render a `fields` map.
#[derive(Default, Debug)]
pub struct ValidationErrors {
    errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> ValidationErrors {
        ValidationErrors::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.entry(field.to_string()).or_default().push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), DatabaseError> {
        if self.is_empty() {
            Ok(())
        } else {
            DatabaseError::validation_error(self.errors)
        }
    }
}
