//!
//! # Error Handling
//!
//! This module defines `AppError`, the single error type returned by handlers,
//! stores and the authentication layer.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so any variant returned
//! from a handler or from `AuthMiddleware` becomes an HTTP response with a JSON body
//! of the form `{"error": "<message>"}`. Server-side failures are logged here and
//! reach the client only as a generic message.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError` and `actix_web::error::BlockingError` allow `?` to be used
//! throughout.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to clients for every 500-class failure.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request body is malformed or fails field validation (HTTP 400).
    ValidationError(String),
    /// Registration hit the unique email constraint (HTTP 400).
    /// The client message does not reveal that the address is taken.
    DuplicateEmail,
    /// Unknown email or wrong password (HTTP 401). Both cases share one message.
    InvalidCredentials,
    /// A protected request carried no `Authorization` header (HTTP 401).
    MissingToken,
    /// The token is malformed, badly signed or expired (HTTP 401).
    /// The string holds the verification detail for the server log only.
    InvalidToken(String),
    /// The requested resource does not exist for this subject (HTTP 404).
    NotFound(String),
    /// Password hashing or verification failed (HTTP 500).
    HashingError(String),
    /// Token signing failed or the signing secret is unusable (HTTP 500).
    SigningError(String),
    /// A persistence operation failed (HTTP 500).
    DatabaseError(String),
    /// The process was started with missing or invalid settings (HTTP 500).
    Configuration(String),
}

impl AppError {
    /// The message sent to the client. Never includes internal detail.
    fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::DuplicateEmail => "Could not create user".into(),
            AppError::InvalidCredentials => "Invalid credentials".into(),
            AppError::MissingToken => "Missing authorization token".into(),
            AppError::InvalidToken(_) => "Invalid token".into(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::HashingError(_)
            | AppError::SigningError(_)
            | AppError::DatabaseError(_)
            | AppError::Configuration(_) => INTERNAL_ERROR_MESSAGE.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateEmail => write!(f, "Duplicate Email"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::MissingToken => write!(f, "Missing Token"),
            AppError::InvalidToken(msg) => write!(f, "Invalid Token: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::HashingError(msg) => write!(f, "Hashing Error: {}", msg),
            AppError::SigningError(msg) => write!(f, "Signing Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// 500-class variants are logged with their full detail before the generic
/// response is built.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::MissingToken | AppError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::HashingError(_)
            | AppError::SigningError(_)
            | AppError::DatabaseError(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "error": self.client_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError::DatabaseError`.
///
/// Unique-constraint violations are not special-cased here; the credential
/// store maps them to `DuplicateEmail` where the constraint is known.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::HashingError(error.to_string())
    }
}

/// The blocking pool only fails when it is shut down or the closure panicked.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::HashingError(format!("blocking task failed: {}", error))
    }
}
