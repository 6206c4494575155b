//! # Configuration
//!
//! Assembled once at startup from, in increasing precedence:
//! built-in defaults, an optional JSON file, a `.env` file, and the process
//! environment. The result is validated before anything uses it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::JwtConfig;
use crate::http_server::config::{parse_origins, HttpServerConfig};
use crate::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Placeholder secret; refused in production
pub const INSECURE_SECRET_KEY: &str = "insecure-change-me-in-production";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("{0}")]
    Invalid(String),
}

/// Deployment flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    Structured,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (default: "sqlite://db.sqlite3")
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://db.sqlite3".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token login endpoint enabled
    #[serde(default)]
    pub enable_jwt: bool,

    /// API routes demand a bearer access token
    #[serde(default)]
    pub require_auth: bool,

    /// HS256 signing key
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,

    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

fn default_secret_key() -> String {
    INSECURE_SECRET_KEY.to_string()
}

fn default_access_ttl_minutes() -> i64 {
    60
}

fn default_refresh_ttl_days() -> i64 {
    7
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enable_jwt: false,
            require_auth: false,
            secret_key: default_secret_key(),
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_days: default_refresh_ttl_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Unset means text in development and JSON in production
    #[serde(default)]
    pub format: Option<LogFormat>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,

    /// Reported by `/healthz/`
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Records per list page (default: 20)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_service_name() -> String {
    "catalog-api".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            service_name: default_service_name(),
            server: HttpServerConfig::default(),
            database: DatabaseConfig::default(),
            page_size: default_page_size(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then `path` (if any), then `.env` and
    /// the environment. Validated before returning.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // A missing .env file is normal.
        let _ = dotenvy::dotenv();
        config.apply_env(|key| std::env::var(key).ok())?;

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Absent fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Override fields from environment-style variables
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        if let Some(v) = get("APP_ENV") {
            self.environment = parse_environment(&v)?;
        }
        if let Some(v) = get("SERVICE_NAME") {
            self.service_name = v;
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_number("PORT", &v)?;
        }
        if let Some(v) = get("CORS_ALLOWED_ORIGINS") {
            self.server.cors_origins = parse_origins(&v);
        }
        if let Some(v) = get("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_number("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = get("PAGE_SIZE") {
            self.page_size = parse_number("PAGE_SIZE", &v)?;
        }
        if let Some(v) = get("SECRET_KEY") {
            self.auth.secret_key = v;
        }
        if let Some(v) = get("ENABLE_JWT") {
            self.auth.enable_jwt = parse_bool("ENABLE_JWT", &v)?;
        }
        if let Some(v) = get("REQUIRE_AUTH") {
            self.auth.require_auth = parse_bool("REQUIRE_AUTH", &v)?;
        }
        if let Some(v) = get("JWT_ACCESS_TTL_MIN") {
            self.auth.access_ttl_minutes = parse_number("JWT_ACCESS_TTL_MIN", &v)?;
        }
        if let Some(v) = get("JWT_REFRESH_TTL_DAYS") {
            self.auth.refresh_ttl_days = parse_number("JWT_REFRESH_TTL_DAYS", &v)?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = v.to_lowercase();
        }
        if let Some(v) = get("LOG_FORMAT") {
            self.logging.format = Some(parse_log_format(&v)?);
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database url must not be empty".to_string()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("max_connections must be > 0".to_string()));
        }

        if self.auth.access_ttl_minutes <= 0 || self.auth.refresh_ttl_days <= 0 {
            return Err(ConfigError::Invalid("token lifetimes must be positive".to_string()));
        }

        if self.auth.secret_key.is_empty() {
            return Err(ConfigError::Invalid("SECRET_KEY must not be empty".to_string()));
        }

        if self.is_production() && self.auth.secret_key == INSECURE_SECRET_KEY {
            return Err(ConfigError::Invalid(
                "SECRET_KEY must be set in production".to_string(),
            ));
        }

        if self.auth.require_auth && !self.auth.enable_jwt {
            return Err(ConfigError::Invalid(
                "REQUIRE_AUTH needs ENABLE_JWT".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured format, or the environment's default
    pub fn log_format(&self) -> LogFormat {
        self.logging.format.unwrap_or(match self.environment {
            Environment::Development => LogFormat::Structured,
            Environment::Production => LogFormat::Json,
        })
    }

    /// Token settings derived from the auth section
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.auth.secret_key.clone(),
            access_token_ttl: chrono::Duration::minutes(self.auth.access_ttl_minutes),
            refresh_token_ttl: chrono::Duration::days(self.auth.refresh_ttl_days),
            issuer: self.service_name.clone(),
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_environment(value: &str) -> Result<Environment, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "production" | "prod" => Ok(Environment::Production),
        _ => Err(invalid("APP_ENV", value)),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "structured" | "text" => Ok(LogFormat::Structured),
        "json" => Ok(LogFormat::Json),
        _ => Err(invalid("LOG_FORMAT", value)),
    }
}
