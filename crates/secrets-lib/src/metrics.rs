// ==============
// crates/secrets-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_DESTROYED: &str = "session.destroyed";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const USER_REGISTERED: &str = "user.registered";
pub const OAUTH_COMPLETED: &str = "oauth.completed";
pub const SECRET_SUBMITTED: &str = "secret.submitted";
