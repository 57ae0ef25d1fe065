use serde::{Deserialize, Serialize};

use shared_models::auth::SessionUser;
use shared_models::error::AppError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub first_name: String,
}

impl From<SessionUser> for SessionResponse {
    fn from(user: SessionUser) -> Self {
        let first_name = user.first_name().to_string();
        Self { user, first_name }
    }
}

/// Registration fields that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// What a login needs from the store to verify a password.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub email: String,
    pub password_hash: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please login first")]
    NotSignedIn,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// Form field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AuthError::MissingField { field } => Some(*field),
            AuthError::InvalidEmail | AuthError::EmailAlreadyRegistered => Some("email"),
            AuthError::PasswordMismatch => Some("confirm_password"),
            AuthError::PasswordTooShort { .. } => Some("password"),
            _ => None,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Authentication,
            AuthError::NotSignedIn => AppError::SessionRequired,
            AuthError::PasswordHash(msg) => AppError::Internal(msg),
            AuthError::MissingField { field } => AppError::validation(field, "is required"),
            other => {
                let field = other.field().unwrap_or("form");
                AppError::validation(field, other.to_string())
            }
        }
    }
}
