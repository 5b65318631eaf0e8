use crate::domain::{RecordId, SessionInfo, SessionStore};
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Session tokens kept in process memory.
///
/// Expiry is checked on lookup against `SessionInfo::expires_at`; expired
/// entries are dropped when they are next read.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionInfo>>,
}

impl MemorySessionStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionInfo>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    // ---
    async fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }

    async fn create(&self, info: SessionInfo, _ttl: Duration) -> Result<String> {
        // ---
        let token = Uuid::new_v4().to_string();
        self.lock()?.insert(token.clone(), info);
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<Option<SessionInfo>> {
        // ---
        let mut sessions = self.lock()?;
        let Some(info) = sessions.get(token).cloned() else {
            return Ok(None);
        };
        if info.expires_at <= Utc::now().timestamp() {
            sessions.remove(token);
            return Ok(None);
        }
        Ok(Some(info))
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        // ---
        self.lock()?.remove(token);
        Ok(())
    }

    async fn revoke_user(&self, user_id: &RecordId) -> Result<()> {
        // ---
        self.lock()?.retain(|_, info| &info.user_id != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn info(expires_at: i64) -> SessionInfo {
        // ---
        SessionInfo {
            user_id: RecordId::generate(),
            student_id: "IT100".to_string(),
            is_admin: false,
            expires_at,
        }
    }

    #[tokio::test]
    async fn tokens_resolve_until_revoked() {
        // ---
        let store = MemorySessionStore::new();
        let session = info(Utc::now().timestamp() + 60);
        let token = store.create(session.clone(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.validate(&token).await.unwrap(), Some(session));
        assert_eq!(store.validate("unknown").await.unwrap(), None);

        store.revoke(&token).await.unwrap();
        assert_eq!(store.validate(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn revoking_a_user_ends_only_their_tokens() {
        // ---
        let store = MemorySessionStore::new();
        let ttl = Duration::from_secs(60);
        let mine = info(Utc::now().timestamp() + 60);
        let theirs = info(Utc::now().timestamp() + 60);

        let a = store.create(mine.clone(), ttl).await.unwrap();
        let b = store.create(mine.clone(), ttl).await.unwrap();
        let c = store.create(theirs, ttl).await.unwrap();

        store.revoke_user(&mine.user_id).await.unwrap();
        assert_eq!(store.validate(&a).await.unwrap(), None);
        assert_eq!(store.validate(&b).await.unwrap(), None);
        assert!(store.validate(&c).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        // ---
        let store = MemorySessionStore::new();
        let token = store
            .create(info(Utc::now().timestamp() - 1), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.validate(&token).await.unwrap(), None);
    }
}
