use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::error::AppError;
use crate::store::{CredentialStore, TaskStore};

/// Everything a request handler may touch, built once at startup and shared
/// read-only between workers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            credentials,
            tasks,
            tokens: Arc::new(tokens),
        }
    }

    /// Wires a single store that backs both credentials and tasks.
    pub fn with_store<S>(store: S, config: &Config) -> Result<Self, AppError>
    where
        S: CredentialStore + TaskStore + 'static,
    {
        let store = Arc::new(store);
        Ok(Self::new(
            store.clone(),
            store,
            TokenService::new(&config.jwt_secret)?,
        ))
    }
}
