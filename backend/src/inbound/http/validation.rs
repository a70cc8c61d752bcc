//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every payload problem becomes an `invalid_request` error whose details
//! carry the offending `field` and a machine-readable `code`.

use serde_json::json;

use crate::domain::{
    Error, ItemId, ItemValidationError, LoginValidationError, RegistrationValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidValue,
    EmptyValue,
    TooLong,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::EmptyValue => "empty_value",
            ErrorCode::TooLong => "too_long",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_item_id(value: &str) -> Result<ItemId, Error> {
    ItemId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("id"), value))
}

/// Body, query or path payload that failed to deserialise.
pub(crate) fn malformed_payload_error(field: FieldName, message: impl Into<String>) -> Error {
    ValidationError::new(field.as_str(), message).with_code(ErrorCode::MalformedBody)
}

fn user_code(error: &UserValidationError) -> ErrorCode {
    match error {
        UserValidationError::EmptyId
        | UserValidationError::EmptyUsername
        | UserValidationError::EmptyEmail => ErrorCode::EmptyValue,
        UserValidationError::UsernameTooLong { .. } | UserValidationError::EmailTooLong { .. } => {
            ErrorCode::TooLong
        }
        UserValidationError::InvalidId => ErrorCode::InvalidUuid,
        _ => ErrorCode::InvalidValue,
    }
}

pub(crate) fn registration_error(error: RegistrationValidationError) -> Error {
    let code = match &error {
        RegistrationValidationError::Username(inner) | RegistrationValidationError::Email(inner) => {
            user_code(inner)
        }
        RegistrationValidationError::EmptyPassword => ErrorCode::EmptyValue,
        RegistrationValidationError::PasswordTooLong { .. } => ErrorCode::TooLong,
    };
    ValidationError::new(error.field(), error.to_string()).with_code(code)
}

pub(crate) fn login_error(error: LoginValidationError) -> Error {
    let field = match error {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    ValidationError::new(field, error.to_string()).with_code(ErrorCode::EmptyValue)
}

pub(crate) fn item_error(error: ItemValidationError) -> Error {
    let code = match error {
        ItemValidationError::InvalidId => ErrorCode::InvalidUuid,
        ItemValidationError::EmptyName => ErrorCode::EmptyValue,
        ItemValidationError::NameTooLong { .. } | ItemValidationError::DescriptionTooLong { .. } => {
            ErrorCode::TooLong
        }
        ItemValidationError::InvalidPrice
        | ItemValidationError::NegativeOffset
        | ItemValidationError::LimitOutOfRange { .. } => ErrorCode::InvalidValue,
    };
    ValidationError::new(error.field(), error.to_string()).with_code(code)
}
