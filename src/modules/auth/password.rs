use thiserror::Error;

use crate::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PASSWORD_SPECIAL_CHARS};

/// Reasons a candidate password is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must be at least {} characters long", MIN_PASSWORD_LENGTH)]
    TooShort,
    #[error("password must be at most {} characters long", MAX_PASSWORD_LENGTH)]
    TooLong,
    #[error("password must contain an uppercase letter")]
    NoUppercase,
    #[error("password must contain a lowercase letter")]
    NoLowercase,
    #[error("password must contain a digit")]
    NoNumber,
    #[error("password must contain one of {}", PASSWORD_SPECIAL_CHARS)]
    NoSpecialChar,
}

/// Function to check password strength, reporting the first rule that fails
pub fn check_password(password: &str) -> Result<(), PasswordError> {
    // Length is counted in characters, not bytes
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::NoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordError::NoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::NoNumber);
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(PasswordError::NoSpecialChar);
    }
    Ok(())
}

/// Returns true when the password satisfies every strength rule
pub fn validate_password(password: &str) -> bool {
    check_password(password).is_ok()
}
