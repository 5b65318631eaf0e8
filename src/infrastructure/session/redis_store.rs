//! Session tokens in Redis.
//!
//! Each token is stored under `session:{token}` as JSON with a Redis TTL, so
//! expired sessions disappear without a sweeper. `user_sessions:{user_id}`
//! indexes the tokens of one user; it may hold tokens that already expired.

use crate::domain::{RecordId, SessionInfo, SessionStore};
use anyhow::{Context, Result};
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use uuid::Uuid;

pub struct RedisSessionStore {
    // ---
    client: Client,
}

impl RedisSessionStore {
    // ---
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn conn(&self) -> Result<MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                err
            })
            .context("redis connection failed")
    }
}

fn key(token: &str) -> String {
    format!("session:{token}")
}

fn user_key(user_id: &RecordId) -> String {
    format!("user_sessions:{user_id}")
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    // ---
    async fn ping(&self) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        let _: String = conn.ping().await?;
        Ok(())
    }

    async fn create(&self, info: SessionInfo, ttl: Duration) -> Result<String> {
        // ---
        let token = Uuid::new_v4().to_string();
        let json = serde_json::to_string(&info).context("failed to serialize session")?;

        let secs = ttl.as_secs().max(1);

        let mut conn = self.conn().await?;
        let _: () = redis::pipe()
            .atomic()
            .set_ex(key(&token), json, secs)
            .ignore()
            .sadd(user_key(&info.user_id), &token)
            .ignore()
            .expire(user_key(&info.user_id), secs as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .context("failed to store session in Redis")?;

        tracing::info!(user_id = %info.user_id, "Created session");
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<Option<SessionInfo>> {
        // ---
        let mut conn = self.conn().await?;
        let Some(json) = conn.get::<_, Option<String>>(key(token)).await? else {
            return Ok(None);
        };

        let info: SessionInfo = serde_json::from_str(&json).context("corrupt session payload")?;
        if info.expires_at <= Utc::now().timestamp() {
            return Ok(None);
        }
        Ok(Some(info))
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key(token)).await?;
        Ok(())
    }

    async fn revoke_user(&self, user_id: &RecordId) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        let tokens: Vec<String> = conn.smembers(user_key(user_id)).await?;

        let mut pipe = redis::pipe();
        for token in &tokens {
            pipe.del(key(token)).ignore();
        }
        pipe.del(user_key(user_id)).ignore();
        let _: () = pipe.query_async(&mut conn).await?;

        tracing::info!(%user_id, revoked = tokens.len(), "Revoked user sessions");
        Ok(())
    }
}
