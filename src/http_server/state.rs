//! Shared application state handed to every handler

use std::sync::Arc;

use crate::auth::crypto::PasswordPolicy;
use crate::auth::{AuthService, JwtManager};
use crate::config::Config;
use crate::observability::MetricsRegistry;
use crate::service::CatalogService;
use crate::store::SqlStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub catalog: CatalogService<SqlStore>,
    pub auth: AuthService<SqlStore>,
    pub store: Arc<SqlStore>,
    pub config: Arc<Config>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    /// Wire services over one store. The JWT manager exists only when
    /// token login is enabled.
    pub fn new(store: Arc<SqlStore>, config: Config) -> Self {
        let jwt = config
            .auth
            .enable_jwt
            .then(|| JwtManager::new(config.jwt_config()));

        Self {
            catalog: CatalogService::new(Arc::clone(&store), config.page_size),
            auth: AuthService::new(Arc::clone(&store), jwt, PasswordPolicy::default()),
            store,
            config: Arc::new(config),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
