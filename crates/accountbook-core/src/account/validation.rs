//! Account validation.

use super::model::{AccountPatch, AccountType};
use super::text::{input_len, trim_input};

/// Maximum login length, in UTF-16 code units.
pub const MAX_LOGIN_LEN: usize = 100;

/// Maximum password length, in UTF-16 code units.
pub const MAX_PASSWORD_LEN: usize = 100;

/// Validation error for account input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Login is missing or blank.
    EmptyLogin,
    /// Login is longer than [`MAX_LOGIN_LEN`].
    LoginTooLong,
    /// Local account without a password.
    EmptyPassword,
    /// Password is longer than [`MAX_PASSWORD_LEN`].
    PasswordTooLong,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyLogin => "Login is required",
            Self::LoginTooLong => "Login must be at most 100 characters",
            Self::EmptyPassword => "Password is required for local accounts",
            Self::PasswordTooLong => "Password must be at most 100 characters",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyLogin | Self::LoginTooLong => "login",
            Self::EmptyPassword | Self::PasswordTooLong => "password",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating an account.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate account fields.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
/// The password is only checked when the type is [`AccountType::Local`];
/// a missing type skips the password rules.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_account(account: &AccountPatch) -> ValidationResult {
    let mut errors = Vec::new();

    match account.login.as_deref() {
        Some(login) if !trim_input(login).is_empty() => {
            if input_len(login) > MAX_LOGIN_LEN {
                errors.push(ValidationError::LoginTooLong);
            }
        }
        _ => errors.push(ValidationError::EmptyLogin),
    }

    if account.account_type == Some(AccountType::Local) {
        match account.password_value() {
            Some(password) if !password.is_empty() => {
                if input_len(password) > MAX_PASSWORD_LEN {
                    errors.push(ValidationError::PasswordTooLong);
                }
            }
            _ => errors.push(ValidationError::EmptyPassword),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Boolean form of [`validate_account`].
#[must_use]
pub fn is_valid(account: &AccountPatch) -> bool {
    validate_account(account).is_ok()
}
