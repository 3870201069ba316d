//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` error whose `details`
//! name the offending `field` and a stable `code`, plus an `index` for
//! list entries.

use serde_json::json;

use crate::domain::{
    AccountValidationError, Error, TaskQueryValidationError, TaskValidationError,
};

/// Newtype wrapper for request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_index(self, code: &str, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code,
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code("missing_field")
}

pub(crate) fn null_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be null")).with_code("null_field")
}

pub(crate) fn task_validation_error(error: TaskValidationError) -> Error {
    let builder = ValidationError::new(error.field(), error.to_string());
    match error {
        TaskValidationError::TagLength { index } => builder.with_index(error.code(), index),
        _ => builder.with_code(error.code()),
    }
}

pub(crate) fn query_validation_error(error: TaskQueryValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(error.code())
}

pub(crate) fn account_validation_error(error: AccountValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(error.code())
}
