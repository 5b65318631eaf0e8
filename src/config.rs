// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. Missing or malformed required values
//! are deployment errors and stop the process; tuning knobs fall back to
//! defaults.

use anyhow::{bail, Result};
use std::time::Duration;

// ============================================================
// Local macros (config-only)
// ============================================================

/// Reads a required environment variable or fails with a uniform message.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads and parses an optional environment variable, falling back to
/// `$default` when it is missing or unparseable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional environment variable as a string with a default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails because `$key` is missing.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub metrics: MetricsKind,
    /// Admin account ensured at startup, when configured.
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// Intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_env()?,
            session: SessionConfig::from_env(),
            metrics: MetricsKind::from_env(),
            admin: AdminBootstrap::from_env()?,
        })
    }

    /// Ephemeral configuration: memory storage, no-op metrics, no admin.
    pub fn in_memory() -> Self {
        // ---
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::Memory,
            session: SessionConfig::default(),
            metrics: MetricsKind::Noop,
            admin: None,
        }
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
    pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address to listen on.
        pub bind_addr: String,

        /// Browser origins allowed to call the API with credentials.
        pub cors_origins: Vec<String>,
    }

    impl ServerConfig {
        pub fn from_env() -> Self {
            // ---
            let bind_addr = optional_env!("PORTAL_BIND_ADDR", DEFAULT_BIND_ADDR);
            let origins = optional_env!("PORTAL_CORS_ORIGINS", DEFAULT_CORS_ORIGINS);

            Self {
                bind_addr,
                cors_origins: split_origins(&origins),
            }
        }
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind_addr: DEFAULT_BIND_ADDR.to_string(),
                cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            }
        }
    }

    fn split_origins(list: &str) -> Vec<String> {
        // ---
        list.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}
pub use server::ServerConfig;

// ============================================================
// Storage configuration
// ============================================================

/// Where records and sessions live.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Process memory; everything is lost on restart.
    Memory,
    /// PostgreSQL for records, Redis for sessions.
    Postgres {
        database: DatabaseConfig,
        redis: RedisConfig,
    },
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        // ---
        match optional_env!("PORTAL_STORAGE", "postgres").as_str() {
            "memory" => Ok(StorageConfig::Memory),
            "postgres" => Ok(StorageConfig::Postgres {
                database: DatabaseConfig::from_env()?,
                redis: RedisConfig::from_env()?,
            }),
            other => bail!("PORTAL_STORAGE must be \"postgres\" or \"memory\", got {other:?}"),
        }
    }
}

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;

    /// PostgreSQL connection settings.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Connection attempts before startup gives up. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a pooled connection. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Connections kept open even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Upper bound on concurrently open connections. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("PORTAL_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("PORTAL_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("PORTAL_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("PORTAL_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use database::DatabaseConfig;

// ============================================================
// Redis configuration
// ============================================================

mod redis {
    // ---
    use super::*;

    /// Redis holds session tokens.
    #[derive(Debug, Clone)]
    pub struct RedisConfig {
        /// Redis connection string.
        pub url: String,
    }

    impl RedisConfig {
        pub fn from_env() -> Result<Self> {
            // ---
            Ok(Self {
                url: required_env!("PORTAL_REDIS_URL"),
            })
        }
    }
}
pub use redis::RedisConfig;

// ============================================================
// Sessions, metrics and bootstrap admin
// ============================================================

/// Thirty days.
const DEFAULT_SESSION_TTL_SECS: u64 = 2_592_000;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a bearer token stays valid after login.
    pub ttl: Duration,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        // ---
        let secs = optional_env_parse!("PORTAL_SESSION_TTL_SEC", u64, DEFAULT_SESSION_TTL_SECS);
        Self {
            ttl: Duration::from_secs(secs),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsKind {
    Noop,
    Prometheus,
}

impl MetricsKind {
    /// `prom` selects Prometheus; anything else, or nothing, is no-op.
    pub fn from_env() -> Self {
        // ---
        match optional_env!("PORTAL_METRICS_TYPE", "noop").as_str() {
            "prom" => MetricsKind::Prometheus,
            _ => MetricsKind::Noop,
        }
    }
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub student_id: String,
    pub password: String,
}

impl AdminBootstrap {
    /// Both variables or neither; setting only one is a configuration error.
    pub fn from_env() -> Result<Option<Self>> {
        // ---
        let student_id = std::env::var("PORTAL_ADMIN_STUDENT_ID").ok();
        let password = std::env::var("PORTAL_ADMIN_PASSWORD").ok();

        match (student_id, password) {
            (None, None) => Ok(None),
            (Some(student_id), Some(password)) => Ok(Some(Self {
                student_id,
                password,
            })),
            _ => bail!("PORTAL_ADMIN_STUDENT_ID and PORTAL_ADMIN_PASSWORD must be set together"),
        }
    }
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("student_id", &self.student_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use anyhow::Result;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PORTAL_BIND_ADDR",
        "PORTAL_CORS_ORIGINS",
        "PORTAL_STORAGE",
        "DATABASE_URL",
        "PORTAL_DB_RETRY_COUNT",
        "PORTAL_DB_ACQUIRE_TIMEOUT_SEC",
        "PORTAL_DB_MIN_CONNECTIONS",
        "PORTAL_DB_MAX_CONNECTIONS",
        "PORTAL_REDIS_URL",
        "PORTAL_SESSION_TTL_SEC",
        "PORTAL_METRICS_TYPE",
        "PORTAL_ADMIN_STUDENT_ID",
        "PORTAL_ADMIN_PASSWORD",
    ];

    fn clear_env() {
        // ---
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn missing_database_url_fails() {
        // ---
        clear_env();
        assert_missing_config!(DatabaseConfig::from_env(), "DATABASE_URL");
    }

    #[test]
    #[serial]
    fn postgres_storage_needs_redis() {
        // ---
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");
        assert_missing_config!(StorageConfig::from_env(), "PORTAL_REDIS_URL");
    }

    #[test]
    #[serial]
    fn database_defaults_applied() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");

        let cfg = DatabaseConfig::from_env()?;
        assert_eq!(cfg.database_url, "postgres://test");
        assert_eq!(cfg.retry_count, 50);
        assert_eq!(cfg.acquire_timeout.as_secs(), 30);
        assert_eq!(cfg.min_connections, 2);
        assert_eq!(cfg.max_connections, 15);

        Ok(())
    }

    #[test]
    #[serial]
    fn database_overrides_defaults() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("PORTAL_DB_RETRY_COUNT", "3");
        std::env::set_var("PORTAL_DB_ACQUIRE_TIMEOUT_SEC", "5");
        std::env::set_var("PORTAL_DB_MIN_CONNECTIONS", "10");
        std::env::set_var("PORTAL_DB_MAX_CONNECTIONS", "not-a-number");

        let cfg = DatabaseConfig::from_env()?;
        assert_eq!(cfg.retry_count, 3);
        assert_eq!(cfg.acquire_timeout.as_secs(), 5);
        assert_eq!(cfg.min_connections, 10);
        assert_eq!(cfg.max_connections, 15, "unparseable values fall back");

        Ok(())
    }

    #[test]
    #[serial]
    fn memory_storage_needs_nothing_else() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("PORTAL_STORAGE", "memory");

        let cfg = AppConfig::from_env()?;
        assert!(matches!(cfg.storage, StorageConfig::Memory));
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:5000");
        assert_eq!(
            cfg.server.cors_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
        assert_eq!(cfg.session.ttl, Duration::from_secs(2_592_000));
        assert_eq!(cfg.metrics, MetricsKind::Noop);
        assert!(cfg.admin.is_none());

        Ok(())
    }

    #[test]
    #[serial]
    fn unknown_storage_is_rejected() {
        // ---
        clear_env();
        std::env::set_var("PORTAL_STORAGE", "sqlite");
        assert!(AppConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn full_postgres_config() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("PORTAL_REDIS_URL", "redis://localhost");
        std::env::set_var("PORTAL_CORS_ORIGINS", "https://portal.example, ");
        std::env::set_var("PORTAL_METRICS_TYPE", "prom");
        std::env::set_var("PORTAL_SESSION_TTL_SEC", "60");
        std::env::set_var("PORTAL_ADMIN_STUDENT_ID", "ADMIN01");
        std::env::set_var("PORTAL_ADMIN_PASSWORD", "change-me");

        let cfg = AppConfig::from_env()?;
        match &cfg.storage {
            StorageConfig::Postgres { redis, .. } => assert_eq!(redis.url, "redis://localhost"),
            StorageConfig::Memory => panic!("expected postgres storage"),
        }
        assert_eq!(cfg.server.cors_origins, vec!["https://portal.example"]);
        assert_eq!(cfg.metrics, MetricsKind::Prometheus);
        assert_eq!(cfg.session.ttl.as_secs(), 60);

        let admin = cfg.admin.expect("admin bootstrap configured");
        assert_eq!(admin.student_id, "ADMIN01");
        assert!(!format!("{admin:?}").contains("change-me"));

        clear_env();
        Ok(())
    }

    #[test]
    #[serial]
    fn half_configured_admin_is_an_error() {
        // ---
        clear_env();
        std::env::set_var("PORTAL_ADMIN_STUDENT_ID", "ADMIN01");
        assert!(AdminBootstrap::from_env().is_err());
        clear_env();
    }
}
