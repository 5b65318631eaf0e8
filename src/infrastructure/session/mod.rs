//! Session token backends.

mod memory;
mod redis_store;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

use crate::domain::SessionStorePtr;
use std::sync::Arc;

/// Creates a session store that lives in process memory.
pub fn create_memory_session_store() -> SessionStorePtr {
    Arc::new(MemorySessionStore::new())
}

/// Creates a Redis-backed session store. Connections are opened per call.
pub fn create_redis_session_store(url: &str) -> anyhow::Result<SessionStorePtr> {
    // ---
    let client = redis::Client::open(url)?;
    Ok(Arc::new(RedisSessionStore::new(client)))
}
