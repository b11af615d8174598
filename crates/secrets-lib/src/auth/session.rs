// ============================
// crates/secrets-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
//!
//! A session binds an opaque token (carried in a cookie) to a [`Principal`],
//! the minimal authenticated projection of a user. The principal never
//! carries mutable fields like the secret, so nothing in the session layer
//! can go stale when the user record changes.
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use metrics::{counter, gauge};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics as keys;
use crate::user::User;

/// Name of the cookie that carries the session token
pub const SESSION_COOKIE: &str = "secrets_session";

/// Authenticated identity projection stored in a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub display_name: String,
}

struct SessionEntry {
    principal: Principal,
    expires_at: SystemTime,
}

/// Session manager for handling authentication tokens
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager and spawn its cleanup task
    pub fn new(ttl: Duration) -> Self {
        let manager = SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        let manager_clone = manager.clone();
        tokio::spawn(async move {
            manager_clone.cleanup_task().await;
        });

        manager
    }

    /// Establish a session for a fully authenticated user.
    ///
    /// Returns the opaque token to hand back to the client in a cookie.
    pub async fn establish(&self, user: &User) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            principal: Principal {
                user_id: user.id,
                display_name: user.display_name(),
            },
            expires_at: SystemTime::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), entry);

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        token
    }

    /// Restore the principal bound to a token.
    ///
    /// Fails soft: a missing, unknown or expired token is `None`, never an
    /// error.
    pub async fn restore(&self, token: &str) -> Option<Principal> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(token)?;
        if SystemTime::now() < entry.expires_at {
            Some(entry.principal.clone())
        } else {
            None
        }
    }

    /// Invalidate a session. Destroying an unknown token is not an error.
    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            counter!(keys::SESSION_DESTROYED).increment(1);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        }
    }

    /// Cleanup task that runs periodically to remove expired sessions
    async fn cleanup_task(&self) {
        let cleanup_interval = Duration::from_secs(60 * 60); // 1 hour

        loop {
            tokio::time::sleep(cleanup_interval).await;

            let mut sessions = self.sessions.write().await;
            let now = SystemTime::now();
            let before_count = sessions.len();

            sessions.retain(|_, entry| now < entry.expires_at);

            let removed = before_count - sessions.len();
            if removed > 0 {
                counter!(keys::SESSION_EXPIRED).increment(removed as u64);
                gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
            }
        }
    }
}
