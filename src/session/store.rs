//! Session storage backends

use async_trait::async_trait;

use super::{SessionData, SessionId};
use crate::error::AppResult;

/// Storage for session payloads keyed by session id.
///
/// Implementations must drop entries older than the TTL given to `save`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a live session, `None` when unknown or expired
    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>>;

    /// Insert or replace a session
    async fn save(&self, id: &SessionId, data: &SessionData, ttl_seconds: u64) -> AppResult<()>;

    /// Forget a session; unknown ids are ignored
    async fn remove(&self, id: &SessionId) -> AppResult<()>;
}
