// ============================
// crates/secrets-lib/src/lib.rs
// ============================
//! Core library for the secrets web service: session lifecycle,
//! access-control gate and route controller over a pluggable user store.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod router;
pub mod store;
pub mod user;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::oauth::OAuthProviders;
use crate::auth::{AuthService, DefaultAuth, SessionManager};
use crate::config::Settings;
use crate::store::UserStore;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Authentication service (local credentials + find-or-create)
    pub auth: Arc<dyn AuthService>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// OAuth provider clients
    pub oauth: Arc<OAuthProviders>,
    /// Settings manager
    pub settings: Arc<Settings>,
    /// Storage backend
    pub store: Arc<S>,
}

impl<S: UserStore + 'static> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, settings: Settings) -> anyhow::Result<Self> {
        let store = Arc::new(store);
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(
            settings.session_ttl_secs,
        )));
        let auth: Arc<dyn AuthService> =
            Arc::new(DefaultAuth::new(store.clone() as Arc<dyn UserStore>));
        let oauth = Arc::new(OAuthProviders::new(&settings.oauth)?);

        Ok(Self {
            auth,
            sessions,
            oauth,
            settings: Arc::new(settings),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FlatFileUserStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn state_exposes_loaded_settings() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileUserStore::new(temp_dir.path()).unwrap();

        let mut settings = Settings::default();
        settings.session_ttl_secs = 60;
        let state = AppState::new(store, settings).unwrap();

        // the binary reads its bind address back through the state
        assert_eq!(state.settings.bind_addr.port(), 3000);
        assert_eq!(state.settings.session_ttl_secs, 60);
    }
}
