//! # Users
//!
//! Login accounts and their repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::crypto::{hash_password, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use crate::store::StoreResult;

/// Maximum username length
pub const USERNAME_MAX_LENGTH: usize = 150;

/// User model
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Login name (unique)
    pub username: String,

    /// Optional contact address
    pub email: Option<String>,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, hashing the password
    pub fn new(
        username: &str,
        email: Option<String>,
        password: &str,
        policy: &PasswordPolicy,
    ) -> AuthResult<Self> {
        let username = validate_username(username)?;
        policy.validate(password)?;
        let password_hash = hash_password(password)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email: email.filter(|e| !e.trim().is_empty()),
            password_hash,
            created_at: crate::model::now(),
        })
    }

    /// Verify a password against this user's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }
}

fn validate_username(username: &str) -> AuthResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidUsername("username may not be blank".to_string()));
    }
    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username may have at most {} characters",
            USERNAME_MAX_LENGTH
        )));
    }
    Ok(username.to_string())
}

/// User repository trait
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user. A taken username is a unique violation.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Find a user by login name
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
}
