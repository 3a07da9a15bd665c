//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID must be a positive integer")]
    InvalidId,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Email cannot be empty")]
    EmptyEmail,
}

/// Validate a user ID
pub fn validate_user_id(id: i64) -> Result<(), UserValidationError> {
    if id <= 0 {
        return Err(UserValidationError::InvalidId);
    }

    Ok(())
}

/// Validate a username
///
/// Whitespace-only input counts as empty.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    Ok(())
}

/// Validate an email address
///
/// Only presence is checked; the column is free-form text.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    Ok(())
}

/// Validate every required field of a user
pub fn validate_user_fields(username: &str, email: &str) -> Result<(), UserValidationError> {
    validate_username(username)?;
    validate_email(email)
}
