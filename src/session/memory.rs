//! In-process session store

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionData, SessionId, SessionStore};
use crate::error::AppResult;

/// Sessions held in a map, lost on restart. Suitable for a single worker and tests.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<SessionId, (SessionData, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                Some((data, expires_at)) if *expires_at > now => return Ok(Some(data.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // expired
        self.entries.write().await.remove(id);
        Ok(None)
    }

    async fn save(&self, id: &SessionId, data: &SessionData, ttl_seconds: u64) -> AppResult<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, at)| *at > Instant::now());
        entries.insert(id.clone(), (data.clone(), expires_at));
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> AppResult<()> {
        self.entries.write().await.remove(id);
        Ok(())
    }
}
