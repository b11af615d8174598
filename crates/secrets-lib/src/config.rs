// ============================
// crates/secrets-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Data directory path
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Session TTL in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// OAuth provider credentials; no defaults, startup fails without them
    pub oauth: OAuthSettings,
}

/// OAuth settings for both supported identity providers
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthSettings {
    pub google: ProviderSettings,
    pub github: ProviderSettings,
}

/// Per-provider OAuth client credentials
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

fn default_bind_addr() -> SocketAddr {
    "127.0.0.1:3000".parse().unwrap()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_ttl_secs() -> u64 {
    60 * 60 * 24 * 7 // 7 days
}

impl Settings {
    /// Load settings from `config/default.toml` (optional) merged with
    /// `SECRETS__`-prefixed environment variables.
    ///
    /// OAuth client credentials have no defaults: loading fails when they
    /// are missing from both sources.
    pub fn load() -> Result<Settings> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("SECRETS").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            session_ttl_secs: default_session_ttl_secs(),
            oauth: OAuthSettings::default(),
        }
    }
}

// Placeholder credentials so tests can assemble a full router without
// real provider registrations.
impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            google: ProviderSettings {
                client_id: "dev-google-client-id".to_string(),
                client_secret: "dev-google-client-secret".to_string(),
                redirect_url: "http://localhost:3000/auth/google/secrets".to_string(),
            },
            github: ProviderSettings {
                client_id: "dev-github-client-id".to_string(),
                client_secret: "dev-github-client-secret".to_string(),
                redirect_url: "http://localhost:3000/auth/github/secrets".to_string(),
            },
        }
    }
}
