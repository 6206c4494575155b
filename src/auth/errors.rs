//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Login Errors
    // ==================
    /// Token login is switched off
    #[error("JWT authentication is not enabled. Set ENABLE_JWT=True in .env")]
    Disabled,

    /// Username or password absent from the request
    #[error("Username and password are required")]
    MissingCredentials,

    /// Unknown user or wrong password (generic - don't leak which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ==================
    // Bearer Token Errors
    // ==================
    /// Protected route called without a token
    #[error("Authentication credentials were not provided.")]
    AuthenticationRequired,

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// A refresh token was presented where an access token is needed, or
    /// the reverse
    #[error("Token has wrong type")]
    WrongTokenType,

    // ==================
    // User Management Errors
    // ==================
    /// Username already registered
    #[error("A user with that username already exists.")]
    UsernameTaken,

    /// Username is empty or too long
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::MissingCredentials => 400,
            AuthError::InvalidUsername(_) => 400,
            AuthError::WeakPassword(_) => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::AuthenticationRequired => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::WrongTokenType => 401,

            // 409 Conflict
            AuthError::UsernameTaken => 409,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::StorageError(_) => 500,

            // 501 Not Implemented
            AuthError::Disabled => 501,
        }
    }

    /// Returns whether this error was caused by the client
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
