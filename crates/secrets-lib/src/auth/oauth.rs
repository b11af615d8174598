// ============================
// crates/secrets-lib/src/auth/oauth.rs
// ============================
//! Identity-provider strategies for Google and GitHub.
//!
//! Both providers run the OAuth2 authorization-code flow with PKCE:
//!
//! 1. [`OAuthClient::begin`] builds the authorization URL, generates a
//!    random CSRF state + PKCE verifier and parks them in an in-memory
//!    pending map with a 10-minute expiry.
//! 2. [`OAuthClient::complete`] consumes the pending state (single use),
//!    exchanges the authorization code for an access token, and resolves
//!    the provider-specific subject id and display name from the user-info
//!    endpoint.
//!
//! The exchange yields a [`ProviderIdentity`]; account creation happens in
//! the auth service via find-or-create.
use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::{OAuthSettings, ProviderSettings};
use crate::error::AppError;
use crate::user::Provider;

/// How long a started authorization may wait for its callback
const PENDING_TTL: Duration = Duration::from_secs(60 * 10);

/// OAuth client type with auth URL and token URL set
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

struct PendingAuth {
    verifier: String,
    expires_at: SystemTime,
}

/// What a completed provider exchange tells us about the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub subject: String,
    pub display_name: Option<String>,
}

/// One configured identity provider
pub struct OAuthClient {
    provider: Provider,
    client: ConfiguredClient,
    pending: RwLock<HashMap<String, PendingAuth>>,
}

/// Both provider clients, built once at startup
pub struct OAuthProviders {
    pub google: OAuthClient,
    pub github: OAuthClient,
}

impl OAuthProviders {
    pub fn new(settings: &OAuthSettings) -> anyhow::Result<Self> {
        Ok(Self {
            google: OAuthClient::new(Provider::Google, &settings.google)?,
            github: OAuthClient::new(Provider::GitHub, &settings.github)?,
        })
    }

    pub fn for_provider(&self, provider: Provider) -> &OAuthClient {
        match provider {
            Provider::Google => &self.google,
            Provider::GitHub => &self.github,
        }
    }
}

impl OAuthClient {
    pub fn new(provider: Provider, settings: &ProviderSettings) -> anyhow::Result<Self> {
        let (auth_url, token_url) = match provider {
            Provider::Google => (
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
            ),
            Provider::GitHub => (
                "https://github.com/login/oauth/authorize",
                "https://github.com/login/oauth/access_token",
            ),
        };

        let client = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(auth_url.to_string())?)
            .set_token_uri(TokenUrl::new(token_url.to_string())?)
            .set_redirect_uri(RedirectUrl::new(settings.redirect_url.clone())?);

        Ok(Self {
            provider,
            client,
            pending: RwLock::new(HashMap::new()),
        })
    }

    fn scopes(&self) -> &'static [&'static str] {
        match self.provider {
            Provider::Google => &["profile"],
            Provider::GitHub => &["user:email"],
        }
    }

    /// Generate the external authorization URL and park the CSRF state.
    pub async fn begin(&self) -> String {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = self.client.authorize_url(CsrfToken::new_random);
        for scope in self.scopes() {
            request = request.add_scope(Scope::new((*scope).to_string()));
        }
        let (auth_url, csrf_state) = request.set_pkce_challenge(pkce_challenge).url();

        let mut pending = self.pending.write().await;
        let now = SystemTime::now();
        pending.retain(|_, entry| now < entry.expires_at);
        pending.insert(
            csrf_state.secret().clone(),
            PendingAuth {
                verifier: pkce_verifier.secret().clone(),
                expires_at: now + PENDING_TTL,
            },
        );

        auth_url.to_string()
    }

    /// Complete the flow: validate state, exchange the code, resolve the
    /// provider identity.
    pub async fn complete(&self, code: &str, state: &str) -> Result<ProviderIdentity, AppError> {
        let verifier = {
            let mut pending = self.pending.write().await;
            let entry = pending
                .remove(state)
                .ok_or_else(|| AppError::OAuth("unknown authorization state".to_string()))?;
            if SystemTime::now() >= entry.expires_at {
                return Err(AppError::OAuth("expired authorization state".to_string()));
            }
            entry.verifier
        };

        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(verifier))
            .request_async(&http_client)
            .await
            .map_err(|e| AppError::OAuth(format!("token exchange failed: {e}")))?;

        self.fetch_identity(token.access_token().secret()).await
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, AppError> {
        let http = reqwest::Client::new();

        match self.provider {
            Provider::Google => {
                #[derive(Deserialize)]
                struct UserInfo {
                    sub: String,
                    name: Option<String>,
                }

                let info: UserInfo = http
                    .get("https://www.googleapis.com/oauth2/v3/userinfo")
                    .bearer_auth(access_token)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(ProviderIdentity {
                    subject: info.sub,
                    display_name: info.name,
                })
            },
            Provider::GitHub => {
                #[derive(Deserialize)]
                struct UserInfo {
                    id: i64,
                    login: String,
                    name: Option<String>,
                }

                let info: UserInfo = http
                    .get("https://api.github.com/user")
                    .bearer_auth(access_token)
                    .header("User-Agent", "secrets-server")
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(ProviderIdentity {
                    subject: info.id.to_string(),
                    display_name: info.name.or(Some(info.login)),
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_providers() -> OAuthProviders {
        OAuthProviders::new(&OAuthSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn begin_builds_google_authorization_url() {
        let providers = test_providers();
        let url = providers.google.begin().await;

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
        assert!(url.contains("client_id=dev-google-client-id"));
        assert!(url.contains("scope=profile"));
        assert!(url.contains("code_challenge="));
        assert!(url.contains("state="));
    }

    #[tokio::test]
    async fn begin_builds_github_authorization_url() {
        let providers = test_providers();
        let url = providers.github.begin().await;

        assert!(url.starts_with("https://github.com/login/oauth/authorize"));
        assert!(url.contains("client_id=dev-github-client-id"));
        // "user:email" is percent-encoded in the query string
        assert!(url.contains("scope=user%3Aemail"));
    }

    #[tokio::test]
    async fn complete_rejects_unknown_state() {
        let providers = test_providers();
        let err = providers
            .google
            .complete("some-code", "never-issued")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OAuth(_)));
        assert!(err.is_expected());
    }

    #[tokio::test]
    async fn complete_rejects_expired_state() {
        let providers = test_providers();
        providers.github.pending.write().await.insert(
            "stale".to_string(),
            PendingAuth {
                verifier: "v".to_string(),
                expires_at: SystemTime::now() - Duration::from_secs(1),
            },
        );

        let err = providers
            .github
            .complete("some-code", "stale")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OAuth(_)));

        // single use: the stale entry is gone either way
        assert!(providers.github.pending.read().await.is_empty());
    }
}
