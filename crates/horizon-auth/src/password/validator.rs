//! Password composition policy for new passwords.

use thiserror::Error;

use horizon_core::config::AuthConfig;
use horizon_core::error::AppError;

/// Characters accepted as the required symbol.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()-+";

/// The first policy rule a candidate password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// Length outside the configured bounds.
    #[error("Password must be between {min} and {max} characters")]
    Length {
        /// Minimum length in characters.
        min: usize,
        /// Maximum length in characters.
        max: usize,
    },
    /// No digit.
    #[error("Password must contain at least one digit")]
    MissingDigit,
    /// No lowercase letter.
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    /// No uppercase letter.
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
    /// No symbol from [`PASSWORD_SYMBOLS`].
    #[error("Password must contain at least one special character from !@#$%^&*()-+")]
    MissingSymbol,
}

impl PolicyViolation {
    /// Machine-readable rule identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Length { .. } => "password_length",
            Self::MissingDigit => "password_digit",
            Self::MissingLowercase => "password_lowercase",
            Self::MissingUppercase => "password_uppercase",
            Self::MissingSymbol => "password_symbol",
        }
    }
}

impl From<PolicyViolation> for AppError {
    fn from(violation: PolicyViolation) -> Self {
        AppError::validation(violation.to_string())
            .with_details(serde_json::json!({ "rule": violation.code() }))
    }
}

/// Validates candidate passwords against the composition policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
    /// Maximum password length in characters.
    max_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Checks the rules in order and returns the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), PolicyViolation> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(PolicyViolation::Length {
                min: self.min_length,
                max: self.max_length,
            });
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyViolation::MissingDigit);
        }

        if !password.chars().any(char::is_lowercase) {
            return Err(PolicyViolation::MissingLowercase);
        }

        if !password.chars().any(char::is_uppercase) {
            return Err(PolicyViolation::MissingUppercase);
        }

        if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
            return Err(PolicyViolation::MissingSymbol);
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            )
            .with_details(serde_json::json!({ "rule": "password_reused" })));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::error::ErrorKind;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_policy_examples() {
        let v = validator();
        assert_eq!(
            v.validate("short1!"),
            Err(PolicyViolation::Length { min: 8, max: 24 })
        );
        assert_eq!(
            v.validate("alllowercase1!"),
            Err(PolicyViolation::MissingUppercase)
        );
        assert_eq!(v.validate("NoDigits!ABC"), Err(PolicyViolation::MissingDigit));
        assert_eq!(
            v.validate("NoSymbolsABC123"),
            Err(PolicyViolation::MissingSymbol)
        );
        assert_eq!(v.validate("Valid123!"), Ok(()));
    }

    #[test]
    fn test_rule_order() {
        let v = validator();
        assert_eq!(v.validate("ABCDEFGH1!"), Err(PolicyViolation::MissingLowercase));
        assert_eq!(
            v.validate("abcdefghij"),
            Err(PolicyViolation::MissingDigit)
        );
        assert_eq!(
            v.validate("Aa1!Aa1!Aa1!Aa1!Aa1!Aa1!x"),
            Err(PolicyViolation::Length { min: 8, max: 24 })
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let v = validator();
        assert_eq!(v.validate("Ünïcødé1!"), Ok(()));
    }

    #[test]
    fn test_violation_into_app_error() {
        let err: AppError = PolicyViolation::MissingSymbol.into();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(
            err.details,
            Some(serde_json::json!({ "rule": "password_symbol" }))
        );
    }

    #[test]
    fn test_validate_not_same() {
        let v = validator();
        assert!(v.validate_not_same("Valid123!", "Valid123!").is_err());
        assert!(v.validate_not_same("Valid123!", "Valid124!").is_ok());
    }
}
