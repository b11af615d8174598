// ============================
// crates/secrets-lib/src/auth/service.rs
// ============================
//! The credential verifier capability the route controller depends on.
use async_trait::async_trait;

use crate::error::AppError;
use crate::user::{Provider, User};

/// Authentication service: local credential verification plus
/// find-or-create for external identity providers.
///
/// Handlers depend on this trait, never on a concrete strategy.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a local credential user. Duplicate usernames are an error.
    async fn register_local(&self, username: &str, password: &str) -> Result<User, AppError>;

    /// Verify a username/password pair against stored credentials.
    ///
    /// Unknown usernames and wrong passwords collapse into the same
    /// invalid-credentials verdict.
    async fn login_local(&self, username: &str, password: &str) -> Result<User, AppError>;

    /// Look up a user by provider subject id, creating a minimal record
    /// when the subject has never been seen. The provider-supplied display
    /// name is stored on the record and refreshed on later callbacks.
    async fn find_or_create(
        &self,
        provider: Provider,
        subject: &str,
        display_name: Option<&str>,
    ) -> Result<User, AppError>;
}
