//! Cookie-keyed server-side sessions.
//!
//! The browser only holds a random session id. The payload ([`SessionData`])
//! lives in a [`SessionStore`]. Handlers never touch the store: they read the
//! request-scoped [`RequestContext`] and describe session changes by attaching
//! a [`SessionUpdate`] to their response, which the session layer applies.

pub mod context;
pub mod layer;
pub mod memory;
pub mod redis;
pub mod store;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identity;

pub use context::{CurrentUser, RequestContext};
pub use layer::{session_layer, FlashRedirect};
pub use memory::MemorySessionStore;
pub use redis::RedisSessionStore;
pub use store::SessionStore;

/// Opaque session identifier stored in the cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-shot messages shown on the next rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
    pub hint: Option<String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn hint(message: impl Into<String>) -> Self {
        Self {
            hint: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_none() && self.error.is_none() && self.hint.is_none()
    }

    /// Messages of `other` replace ours field by field
    pub fn merge(&mut self, other: Flash) {
        if other.success.is_some() {
            self.success = other.success;
        }
        if other.error.is_some() {
            self.error = other.error;
        }
        if other.hint.is_some() {
            self.hint = other.hint;
        }
    }
}

/// Everything kept between two requests of the same visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub identity: Option<Identity>,
    #[serde(default)]
    pub flash: Flash,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && self.flash.is_empty()
    }
}

/// How a handler wants the session to change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityChange {
    /// Log in; the session id is rotated
    SignIn(Identity),
    /// Refresh the stored identity after a profile edit
    Refresh(Identity),
    SignOut,
}

/// Attached to a response's extensions and applied by the session layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub identity: Option<IdentityChange>,
    pub flash: Flash,
}

impl SessionUpdate {
    pub fn flash(flash: Flash) -> Self {
        Self {
            identity: None,
            flash,
        }
    }

    pub fn with_identity(mut self, change: IdentityChange) -> Self {
        self.identity = Some(change);
        self
    }

    /// Apply to `data`; returns true when the session id must be rotated
    pub fn apply(self, data: &mut SessionData) -> bool {
        let rotate = matches!(self.identity, Some(IdentityChange::SignIn(_)));
        match self.identity {
            Some(IdentityChange::SignIn(identity)) | Some(IdentityChange::Refresh(identity)) => {
                data.identity = Some(identity);
            }
            Some(IdentityChange::SignOut) => data.identity = None,
            None => {}
        }
        data.flash.merge(self.flash);
        rotate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(username: &str) -> Identity {
        Identity {
            id: 7,
            username: username.to_string(),
            full_name: "Foo Bar Baz Qux".to_string(),
            account_created_on: Utc::now(),
        }
    }

    #[test]
    fn test_session_id_roundtrip_and_garbage() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("not-a-session"), None);
    }

    #[test]
    fn test_sign_in_rotates_and_sets_identity() {
        let mut data = SessionData::default();
        let update = SessionUpdate::flash(Flash::success("You are now logged in as foo_bar_baz."))
            .with_identity(IdentityChange::SignIn(identity("foo_bar_baz")));

        assert!(update.apply(&mut data));
        assert_eq!(data.identity.as_ref().map(|i| i.username.as_str()), Some("foo_bar_baz"));
        assert_eq!(data.flash.success.as_deref(), Some("You are now logged in as foo_bar_baz."));
    }

    #[test]
    fn test_sign_out_keeps_flash() {
        let mut data = SessionData {
            identity: Some(identity("foo_bar_baz")),
            flash: Flash::default(),
        };
        let rotate = SessionUpdate::flash(Flash::success("You logged out."))
            .with_identity(IdentityChange::SignOut)
            .apply(&mut data);

        assert!(!rotate);
        assert!(data.identity.is_none());
        assert!(!data.is_empty());
    }

    #[test]
    fn test_flash_merge() {
        let mut flash = Flash::error("first");
        flash.merge(Flash::success("done"));
        assert_eq!(flash.error.as_deref(), Some("first"));
        assert_eq!(flash.success.as_deref(), Some("done"));
        flash.merge(Flash::error("second"));
        assert_eq!(flash.error.as_deref(), Some("second"));
    }
}
