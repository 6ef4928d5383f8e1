//! Email and password policy enforcement.

use validator::ValidateEmail;
use zxcvbn::Score;

use showtime_core::config::AuthConfig;
use showtime_core::error::AppError;

const MAX_EMAIL_LENGTH: usize = 254;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

const COMMON_PATTERNS: [&str; 13] = [
    "123456", "password", "qwerty", "abc123", "111111", "000000", "admin", "letmein", "welcome",
    "monkey", "dragon", "master", "sunshine",
];

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Checks that an email address is present, bounded, and well formed.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::invalid_email("Email is required"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::invalid_email("Email is too long"));
    }
    if !email.validate_email() {
        return Err(AppError::invalid_email("Invalid email format"));
    }
    Ok(())
}

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    min_score: Score,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let min_score = match config.password_min_score {
            0 => Score::Zero,
            1 => Score::One,
            2 => Score::Two,
            3 => Score::Three,
            _ => Score::Four,
        };
        Self {
            min_length: config.password_min_length,
            min_score,
        }
    }

    /// Validates a password, reporting the first violation found.
    ///
    /// `user_inputs` are words zxcvbn should treat as guessable, such as
    /// the email's local part.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::weak_password(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::weak_password(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::weak_password(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::weak_password(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            return Err(AppError::weak_password(
                "Password must contain at least one special character",
            ));
        }

        let lowered = password.to_lowercase();
        if COMMON_PATTERNS.iter().any(|p| lowered.contains(p)) {
            return Err(AppError::weak_password(
                "Password contains a common pattern",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < self.min_score {
            return Err(AppError::weak_password(
                "Password is too easy to guess. Please choose a less predictable one.",
            ));
        }

        Ok(())
    }
}
