//! # Auth Module
//!
//! Optional token authentication: login users with Argon2id password
//! hashes, HS256 access/refresh tokens, and bearer-token checks for the
//! API routes.

pub mod crypto;
pub mod errors;
pub mod jwt;
pub mod service;
pub mod user;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager, TokenPair, TokenType};
pub use service::AuthService;
pub use user::{User, UserStore};
