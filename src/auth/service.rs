//! # Auth Service
//!
//! Login, user creation and bearer-token checks.

use std::sync::Arc;

use tracing::{debug, warn};

use super::crypto::{dummy_password_hash, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use super::jwt::{JwtClaims, JwtManager, TokenPair, TokenType};
use super::user::{User, UserStore};
use crate::store::StoreError;

/// Authentication entry point. Holds no JWT manager when token login is
/// disabled.
pub struct AuthService<U> {
    users: Arc<U>,
    jwt: Option<JwtManager>,
    policy: PasswordPolicy,
}

impl<U> Clone for AuthService<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            jwt: self.jwt.clone(),
            policy: self.policy.clone(),
        }
    }
}

fn storage_error(e: StoreError) -> AuthError {
    match e {
        StoreError::UniqueViolation { .. } => AuthError::UsernameTaken,
        other => AuthError::StorageError(other.to_string()),
    }
}

impl<U: UserStore> AuthService<U> {
    pub fn new(users: Arc<U>, jwt: Option<JwtManager>, policy: PasswordPolicy) -> Self {
        Self { users, jwt, policy }
    }

    pub fn is_enabled(&self) -> bool {
        self.jwt.is_some()
    }

    fn jwt(&self) -> AuthResult<&JwtManager> {
        self.jwt.as_ref().ok_or(AuthError::Disabled)
    }

    /// Exchange credentials for a token pair.
    ///
    /// Unknown users and wrong passwords fail identically, and both run one
    /// Argon2 verification.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> AuthResult<TokenPair> {
        let jwt = self.jwt()?;

        let (username, password) = match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p.to_string()),
            _ => return Err(AuthError::MissingCredentials),
        };

        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(storage_error)?;

        // Argon2 verification blocks for tens of milliseconds.
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => verify_password(&password, &hash),
            None => verify_password(&password, dummy_password_hash()?).map(|_| false),
        })
        .await
        .map_err(|_| AuthError::HashingFailed)??;

        match user {
            Some(user) if verified => jwt.generate_pair(&user),
            Some(_) => {
                warn!(username = %username, "Login with wrong password");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                debug!(username = %username, "Login for unknown user");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Register a login user
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<String>,
        password: &str,
    ) -> AuthResult<User> {
        let user = User::new(username, email, password, &self.policy)?;
        self.users.insert_user(&user).await.map_err(storage_error)?;
        debug!(id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Check an `Authorization` header value. Only access tokens pass.
    pub fn authenticate(&self, authorization: Option<&str>) -> AuthResult<JwtClaims> {
        let jwt = self.jwt()?;
        let header = authorization.ok_or(AuthError::AuthenticationRequired)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedToken)?;

        jwt.validate_token(token, TokenType::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;
    use crate::store::SqlStore;

    async fn service(enabled: bool) -> AuthService<SqlStore> {
        let store = Arc::new(SqlStore::in_memory().await.unwrap());
        let jwt = enabled.then(|| JwtManager::new(JwtConfig::default()));
        AuthService::new(store, jwt, PasswordPolicy::default())
    }

    #[tokio::test]
    async fn test_login_disabled() {
        let service = service(false).await;
        let result = service.login(Some("a"), Some("b")).await;
        assert!(matches!(result, Err(AuthError::Disabled)));
    }

    #[tokio::test]
    async fn test_login_missing_credentials() {
        let service = service(true).await;
        assert!(matches!(
            service.login(Some("admin"), None).await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            service.login(Some(""), Some("pw")).await,
            Err(AuthError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_flow() {
        let service = service(true).await;
        service.create_user("admin", None, "password123").await.unwrap();

        assert!(matches!(
            service.login(Some("admin"), Some("wrong-password")).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(Some("ghost"), Some("password123")).await,
            Err(AuthError::InvalidCredentials)
        ));

        let pair = service.login(Some("admin"), Some("password123")).await.unwrap();
        let header = format!("Bearer {}", pair.access);
        let claims = service.authenticate(Some(&header)).unwrap();
        assert_eq!(claims.username, "admin");

        let refresh_header = format!("Bearer {}", pair.refresh);
        assert!(matches!(
            service.authenticate(Some(&refresh_header)),
            Err(AuthError::WrongTokenType)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_checked_against_dummy_hash() {
        let service = service(true).await;

        assert!(matches!(
            service.login(Some("nobody"), Some("password123")).await,
            Err(AuthError::InvalidCredentials)
        ));
        let dummy = dummy_password_hash().unwrap();
        assert!(!verify_password("password123", dummy).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let service = service(true).await;
        service.create_user("admin", None, "password123").await.unwrap();
        assert!(matches!(
            service.create_user("admin", None, "password456").await,
            Err(AuthError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_requires_header() {
        let service = service(true).await;
        assert!(matches!(
            service.authenticate(None),
            Err(AuthError::AuthenticationRequired)
        ));
        assert!(matches!(
            service.authenticate(Some("Token abc")),
            Err(AuthError::MalformedToken)
        ));
    }
}
