//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

use showtime_auth::Credentials;

/// Registration body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, max = 256, message = "password is required"))]
    pub password: String,
    /// Optional display name, defaults to the email's local part.
    #[validate(length(max = 64))]
    pub username: Option<String>,
}

impl RegisterRequest {
    /// Email and password as credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Login body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, max = 256, message = "password is required"))]
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}
