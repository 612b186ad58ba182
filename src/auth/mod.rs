pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{user::normalize_email, PublicUser};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_decoy, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// At least 6 characters and at most 72 bytes, the longest input bcrypt
    /// hashes in full.
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > password::MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some(
            format!(
                "password must be at most {} bytes",
                password::MAX_PASSWORD_BYTES
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

/// Represents the payload for a user login request.
///
/// Only presence is checked here; format rules would let a caller tell
/// "malformed" apart from "wrong", so any other mismatch is reported as
/// invalid credentials.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl RegisterRequest {
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

impl LoginRequest {
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Response after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed access token.
    pub token: String,
    /// The authenticated user.
    pub user: PublicUser,
}
