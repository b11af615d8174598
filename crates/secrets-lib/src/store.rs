// ============================
// crates/secrets-lib/src/store.rs
// ============================
//! User store abstraction with flat-file implementation.
//!
//! One JSON document per user under `<root>/users/`. Lookups other than
//! by-id scan the directory; writes overwrite the whole document
//! (last-write-wins, no transactions).
use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs as tokio_fs;
use uuid::Uuid;

use crate::error::AppError;
use crate::user::{Provider, User};

/// Trait for user store backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user; rejects duplicate usernames and provider ids
    async fn insert(&self, user: &User) -> Result<(), AppError>;

    /// Fetch a user by internal id
    async fn get(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Fetch a user by local username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Fetch a user by external provider subject id
    async fn find_by_provider(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<User>, AppError>;

    /// Overwrite an existing user document
    async fn save(&self, user: &User) -> Result<(), AppError>;

    /// All users with a non-empty secret, in store order
    async fn users_with_secrets(&self) -> Result<Vec<User>, AppError>;
}

/// Flat-file implementation of the `UserStore` trait
#[derive(Clone)]
pub struct FlatFileUserStore {
    root: PathBuf,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        Ok(Self { root })
    }

    fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    fn doc_path(&self, id: Uuid) -> PathBuf {
        self.users_dir().join(format!("{id}.json"))
    }

    async fn write_doc(&self, user: &User) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(user)?;
        tokio_fs::write(self.doc_path(user.id), json).await?;
        Ok(())
    }

    /// Read every user document, skipping files that fail to parse.
    async fn scan(&self) -> Result<Vec<User>, AppError> {
        let mut users = Vec::new();
        let mut entries = tokio_fs::read_dir(self.users_dir()).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let content = tokio_fs::read_to_string(&path).await?;
            match serde_json::from_str::<User>(&content) {
                Ok(user) => users.push(user),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable user document");
                },
            }
        }

        Ok(users)
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        if !user.has_identity() {
            return Err(AppError::InvalidInput(
                "user record has no identity path".to_string(),
            ));
        }

        if let Some(username) = &user.username {
            if self.find_by_username(username).await?.is_some() {
                return Err(AppError::DuplicateUsername(username.clone()));
            }
        }

        for provider in [Provider::Google, Provider::GitHub] {
            if let Some(subject) = user.provider_id(provider) {
                if self.find_by_provider(provider, subject).await?.is_some() {
                    return Err(AppError::DuplicateProviderId(format!(
                        "{provider}:{subject}"
                    )));
                }
            }
        }

        self.write_doc(user).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let path = self.doc_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let content = tokio_fs::read_to_string(&path).await?;
        let user: User = serde_json::from_str(&content)?;
        Ok(Some(user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.scan().await?;
        Ok(users
            .into_iter()
            .find(|u| u.username.as_deref() == Some(username)))
    }

    async fn find_by_provider(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.scan().await?;
        Ok(users
            .into_iter()
            .find(|u| u.provider_id(provider) == Some(subject)))
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        self.write_doc(user).await
    }

    async fn users_with_secrets(&self) -> Result<Vec<User>, AppError> {
        let users = self.scan().await?;
        Ok(users
            .into_iter()
            .filter(|u| u.secret.as_deref().is_some_and(|s| !s.is_empty()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FlatFileUserStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileUserStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn insert_and_lookup_by_username() {
        let (store, _temp_dir) = test_store();

        let user = User::local("alice", "hash");
        store.insert(&user).await.unwrap();

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(store.find_by_username("bob").await.unwrap().is_none());
        assert_eq!(store.get(user.id).await.unwrap().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (store, _temp_dir) = test_store();

        store.insert(&User::local("alice", "h1")).await.unwrap();
        let err = store.insert(&User::local("alice", "h2")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername(_)));
    }

    #[tokio::test]
    async fn provider_lookup_is_per_provider() {
        let (store, _temp_dir) = test_store();

        store
            .insert(&User::from_provider(Provider::Google, "g1"))
            .await
            .unwrap();
        store
            .insert(&User::from_provider(Provider::GitHub, "g1"))
            .await
            .unwrap();

        let google = store
            .find_by_provider(Provider::Google, "g1")
            .await
            .unwrap()
            .unwrap();
        let github = store
            .find_by_provider(Provider::GitHub, "g1")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(google.id, github.id);

        let err = store
            .insert(&User::from_provider(Provider::Google, "g1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateProviderId(_)));
    }

    #[tokio::test]
    async fn identityless_record_is_rejected() {
        let (store, _temp_dir) = test_store();

        let mut user = User::local("carol", "hash");
        user.username = None;
        user.password_hash = None;
        let err = store.insert(&user).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn users_with_secrets_skips_empty() {
        let (store, _temp_dir) = test_store();

        let mut with_secret = User::local("alice", "h");
        with_secret.secret = Some("I sing in the shower".to_string());
        store.insert(&with_secret).await.unwrap();

        let mut empty_secret = User::local("bob", "h");
        empty_secret.secret = Some(String::new());
        store.insert(&empty_secret).await.unwrap();

        store.insert(&User::local("carol", "h")).await.unwrap();

        let users = store.users_with_secrets().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn save_overwrites_last_write_wins() {
        let (store, _temp_dir) = test_store();

        let mut user = User::local("alice", "h");
        store.insert(&user).await.unwrap();

        user.secret = Some("S".to_string());
        store.save(&user).await.unwrap();
        user.secret = Some("T".to_string());
        store.save(&user).await.unwrap();

        let found = store.get(user.id).await.unwrap().unwrap();
        assert_eq!(found.secret.as_deref(), Some("T"));
    }
}
