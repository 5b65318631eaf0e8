use super::ids::RecordId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// What a bearer token stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    //
    pub user_id: RecordId,
    pub student_id: String,
    pub is_admin: bool,
    /// Unix timestamp (seconds) after which the token is no longer honoured.
    pub expires_at: i64,
}

/// Storage for opaque session tokens.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    // ---
    async fn ping(&self) -> Result<()>;

    /// Persist `info` under a fresh token that expires after `ttl`.
    async fn create(&self, info: SessionInfo, ttl: Duration) -> Result<String>;

    /// Look a token up. Unknown and expired tokens both yield `None`.
    async fn validate(&self, token: &str) -> Result<Option<SessionInfo>>;

    async fn revoke(&self, token: &str) -> Result<()>;

    /// Revoke every token issued to `user_id`.
    async fn revoke_user(&self, user_id: &RecordId) -> Result<()>;
}

pub type SessionStorePtr = Arc<dyn SessionStore>;
