mod database;
mod memory;
pub mod metrics;
mod session;

// Re-export the factory functions for easy access
pub use database::{connect_with_retry, create_postgres_repository};
pub use memory::create_repository as create_memory_repository;
pub use metrics::{create_noop_metrics, create_prom_metrics};
pub use session::{create_memory_session_store, create_redis_session_store};
