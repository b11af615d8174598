// ============================
// crates/secrets-lib/src/auth/service_impl.rs
// ============================
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthService;
use crate::error::AppError;
use crate::metrics as keys;
use crate::store::UserStore;
use crate::user::{Provider, User};

/// Default authentication service over a user store
pub struct DefaultAuth {
    store: Arc<dyn UserStore>,
}

impl DefaultAuth {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register_local(&self, username: &str, password: &str) -> Result<User, AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "username and password must be non-empty".to_string(),
            ));
        }

        let hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;
        let user = User::local(username, hash);
        self.store.insert(&user).await?;

        counter!(keys::USER_REGISTERED).increment(1);
        Ok(user)
    }

    async fn login_local(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // a user created through a provider callback has no local password
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(hash, password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn find_or_create(
        &self,
        provider: Provider,
        subject: &str,
        display_name: Option<&str>,
    ) -> Result<User, AppError> {
        if subject.is_empty() {
            return Err(AppError::InvalidInput(
                "provider subject id must be non-empty".to_string(),
            ));
        }

        if let Some(mut user) = self.store.find_by_provider(provider, subject).await? {
            // returning users get their provider name refreshed
            if display_name.is_some() && user.display_name.as_deref() != display_name {
                user.display_name = display_name.map(str::to_string);
                self.store.save(&user).await?;
            }
            return Ok(user);
        }

        let mut user = User::from_provider(provider, subject);
        user.display_name = display_name.map(str::to_string);
        self.store.insert(&user).await?;
        Ok(user)
    }
}
