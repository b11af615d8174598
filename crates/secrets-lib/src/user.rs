// ============================
// crates/secrets-lib/src/user.rs
// ============================
//! User identity record and supported identity providers.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported external identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::GitHub => "github",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted user record.
///
/// A user is reachable by local username, by a provider id, or both.
/// At least one identity path must exist; the store rejects records
/// with none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub github_id: Option<String>,
    /// Provider-supplied name for users without a local username
    #[serde(default)]
    pub display_name: Option<String>,
    pub secret: Option<String>,
}

impl User {
    /// Create a user with local credentials.
    pub fn local(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: Some(username.into()),
            password_hash: Some(password_hash.into()),
            google_id: None,
            github_id: None,
            display_name: None,
            secret: None,
        }
    }

    /// Create a minimal record for a previously-unseen provider subject.
    pub fn from_provider(provider: Provider, subject: impl Into<String>) -> Self {
        let mut user = Self {
            id: Uuid::new_v4(),
            username: None,
            password_hash: None,
            google_id: None,
            github_id: None,
            display_name: None,
            secret: None,
        };
        user.set_provider_id(provider, subject.into());
        user
    }

    pub fn provider_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google_id.as_deref(),
            Provider::GitHub => self.github_id.as_deref(),
        }
    }

    pub fn set_provider_id(&mut self, provider: Provider, subject: String) {
        match provider {
            Provider::Google => self.google_id = Some(subject),
            Provider::GitHub => self.github_id = Some(subject),
        }
    }

    /// True when the record has at least one identity path.
    pub fn has_identity(&self) -> bool {
        self.username.is_some() || self.google_id.is_some() || self.github_id.is_some()
    }

    /// Name shown for this user in the session principal: the local
    /// username, else the provider-supplied name, else a stable fallback.
    pub fn display_name(&self) -> String {
        if let Some(username) = &self.username {
            return username.clone();
        }
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        format!("user-{}", &self.id.simple().to_string()[..8])
    }
}
