//! Request authorization gate.
//!
//! Pure decisions over the session identity and the request path. The
//! middleware in `api::middleware` turns a refusal into a redirect before any
//! handler runs.

use crate::models::Identity;

pub const LOGIN_REQUIRED: &str = "You must be logged in first to view that page.";
pub const ADMIN_REQUIRED: &str = "You do not have access to view that page.";
pub const PRIVATE_PAGE: &str = "You do not have access to that page.";

/// Paths reachable without logging in
const PUBLIC_PATHS: &[&str] = &["/login", "/signup", "/health", "/ready"];

const ADMIN_PREFIX: &str = "/admin";

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Send to `/login`
    LoginRequired,
    /// Send to `/`
    AdminRequired,
}

impl Access {
    /// Where a refused request is sent, with the message to show there
    pub fn refusal(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Access::Granted => None,
            Access::LoginRequired => Some(("/login", LOGIN_REQUIRED)),
            Access::AdminRequired => Some(("/", ADMIN_REQUIRED)),
        }
    }
}

pub fn is_authenticated(identity: Option<&Identity>) -> bool {
    identity.is_some()
}

pub fn is_admin(identity: Option<&Identity>, admin_username: &str) -> bool {
    identity.is_some_and(|user| user.username.eq_ignore_ascii_case(admin_username))
}

/// The admin, or the user whose username appears in the path
pub fn is_self_or_admin(identity: Option<&Identity>, username: &str, admin_username: &str) -> bool {
    is_admin(identity, admin_username)
        || identity.is_some_and(|user| user.username.to_lowercase() == username.to_lowercase())
}

pub fn requires_login(path: &str) -> bool {
    !PUBLIC_PATHS.contains(&path)
}

pub fn requires_admin(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide whether a request may reach its handler
pub fn evaluate(path: &str, identity: Option<&Identity>, admin_username: &str) -> Access {
    if requires_login(path) && !is_authenticated(identity) {
        return Access::LoginRequired;
    }
    if requires_admin(path) && !is_admin(identity, admin_username) {
        return Access::AdminRequired;
    }
    Access::Granted
}
