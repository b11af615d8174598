// ============================
// crates/secrets-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod oauth;
pub mod password;
mod service;
mod service_impl;
pub mod session;

pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use session::{Principal, SessionManager, SESSION_COOKIE};
