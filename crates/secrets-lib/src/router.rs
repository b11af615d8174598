// ============================
// crates/secrets-lib/src/router.rs
// ============================
//! Route controller: HTTP surface, access-control gate and redirect flows.
//!
//! Every failure on this surface flattens into a redirect to an
//! anonymous-accessible page; the underlying error is logged inside the
//! request span, never shown to the client. Gate failure (no restorable
//! principal for the request's session cookie) is a normal control-flow
//! branch ending at `/login`.
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use metrics::counter;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::auth::{Principal, SESSION_COOKIE};
use crate::error::AppError;
use crate::metrics as keys;
use crate::store::UserStore;
use crate::user::{Provider, User};
use crate::views;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct CredentialsForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    secret: String,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// Create the application router
pub fn create_router<S: UserStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/secrets", get(secrets_page))
        .route("/submit", get(submit_page).post(submit_secret))
        .route("/logout", get(logout))
        .route("/auth/google", get(google_begin))
        .route("/auth/google/secrets", get(google_callback))
        .route("/auth/github", get(github_begin))
        .route("/auth/github/secrets", get(github_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The access-control gate: true iff the request's session cookie restores
/// to a principal. Read-only, no side effects.
async fn current_principal<S: UserStore>(
    state: &AppState<S>,
    jar: &CookieJar,
) -> Option<Principal> {
    let token = jar.get(SESSION_COOKIE)?;
    state.sessions.restore(token.value()).await
}

/// Bind a fresh session to the client and send it to the secrets view
async fn establish_session<S: UserStore>(
    state: &AppState<S>,
    jar: CookieJar,
    user: &User,
) -> Response {
    let token = state.sessions.establish(user).await;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), Redirect::to("/secrets")).into_response()
}

// --- public pages -----------------------------------------------------

async fn home() -> Html<String> {
    views::home()
}

async fn login_page() -> Html<String> {
    views::login()
}

async fn register_page() -> Html<String> {
    views::register()
}

// --- local credential flows -------------------------------------------

async fn register<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state.auth.register_local(&form.username, &form.password).await {
        Ok(user) => establish_session(&state, jar, &user).await,
        Err(err) if err.is_expected() => {
            tracing::info!(username = %form.username, %err, "registration rejected");
            Redirect::to("/register").into_response()
        },
        Err(err) => {
            tracing::error!(username = %form.username, %err, "registration failed");
            Redirect::to("/register").into_response()
        },
    }
}

async fn login<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state.auth.login_local(&form.username, &form.password).await {
        Ok(user) => {
            counter!(keys::LOGIN_SUCCESS).increment(1);
            establish_session(&state, jar, &user).await
        },
        Err(err) if err.is_expected() => {
            // expected outcome, not an error condition
            counter!(keys::LOGIN_FAILURE).increment(1);
            tracing::debug!(username = %form.username, "login rejected");
            Redirect::to("/login").into_response()
        },
        Err(err) => {
            tracing::error!(username = %form.username, %err, "login failed");
            Redirect::to("/login").into_response()
        },
    }
}

async fn logout<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> Response {
    if let Some(token) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(token.value()).await;
    }
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Redirect::to("/")).into_response()
}

// --- protected content flows ------------------------------------------

async fn secrets_page<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> Response {
    if current_principal(&state, &jar).await.is_none() {
        return Redirect::to("/login").into_response();
    }

    match state.store.users_with_secrets().await {
        Ok(users) => {
            let secrets: Vec<String> = users.into_iter().filter_map(|u| u.secret).collect();
            views::secrets(&secrets).into_response()
        },
        Err(err) => {
            tracing::error!(%err, "failed to read secrets");
            Redirect::to("/").into_response()
        },
    }
}

async fn submit_page<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> Response {
    if current_principal(&state, &jar).await.is_none() {
        return Redirect::to("/login").into_response();
    }
    views::submit().into_response()
}

async fn submit_secret<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Form(form): Form<SubmitForm>,
) -> Response {
    let Some(principal) = current_principal(&state, &jar).await else {
        return Redirect::to("/login").into_response();
    };

    match store_secret(&state, &principal, form.secret).await {
        Ok(()) => {
            counter!(keys::SECRET_SUBMITTED).increment(1);
        },
        Err(err) => {
            tracing::error!(user_id = %principal.user_id, %err, "failed to store secret");
        },
    }

    Redirect::to("/secrets").into_response()
}

/// Read, modify, write: three independent store operations,
/// last-write-wins between concurrent submissions. A session may outlive
/// its user record, in which case the write fails with a not-found error.
async fn store_secret<S: UserStore>(
    state: &AppState<S>,
    principal: &Principal,
    secret: String,
) -> Result<(), AppError> {
    let mut user = state
        .store
        .get(principal.user_id)
        .await?
        .ok_or(AppError::UserNotFound(principal.user_id))?;
    user.secret = Some(secret);
    state.store.save(&user).await
}

// --- OAuth flows ------------------------------------------------------

async fn google_begin<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Redirect {
    Redirect::to(&state.oauth.google.begin().await)
}

async fn github_begin<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Redirect {
    Redirect::to(&state.oauth.github.begin().await)
}

async fn google_callback<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    oauth_callback(&state, jar, Provider::Google, params).await
}

async fn github_callback<S: UserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    oauth_callback(&state, jar, Provider::GitHub, params).await
}

async fn oauth_callback<S: UserStore + 'static>(
    state: &AppState<S>,
    jar: CookieJar,
    provider: Provider,
    params: CallbackQuery,
) -> Response {
    let (Some(code), Some(csrf_state)) = (params.code, params.state) else {
        tracing::warn!(%provider, "callback missing code or state");
        return Redirect::to("/login").into_response();
    };

    let identity = match state
        .oauth
        .for_provider(provider)
        .complete(&code, &csrf_state)
        .await
    {
        Ok(identity) => identity,
        Err(err) if err.is_expected() => {
            tracing::info!(%provider, %err, "provider exchange rejected");
            return Redirect::to("/login").into_response();
        },
        Err(err) => {
            tracing::error!(%provider, %err, "provider exchange failed");
            return Redirect::to("/login").into_response();
        },
    };

    match state
        .auth
        .find_or_create(provider, &identity.subject, identity.display_name.as_deref())
        .await
    {
        Ok(user) => {
            counter!(keys::OAUTH_COMPLETED).increment(1);
            establish_session(state, jar, &user).await
        },
        Err(err) => {
            tracing::error!(%provider, %err, "find-or-create failed");
            Redirect::to("/login").into_response()
        },
    }
}
