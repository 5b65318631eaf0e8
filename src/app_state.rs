//! Application state management.
//!
//! `AppState` is the dependency container handed to every Axum handler via
//! the `State` extractor. Heavy resources sit behind `Arc`, so cloning per
//! request is cheap.

use crate::domain::{MetricsPtr, RepositoryPtr, SessionStorePtr};
use std::time::Duration;

/// Shared application state passed to all Axum handlers.
///
/// Handlers depend on the `Repository` and `SessionStore` traits, never on a
/// concrete backend. The state is built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Metrics implementation (Prometheus or no-op).
    metrics: MetricsPtr,

    /// Persistent storage for users, timetables, attendance and tasks.
    repository: RepositoryPtr,

    /// Bearer token storage (Redis or in-memory).
    sessions: SessionStorePtr,

    /// Lifetime of newly issued session tokens.
    session_ttl: Duration,
}

impl AppState {
    // ---

    pub fn new(
        metrics: MetricsPtr,
        repository: RepositoryPtr,
        sessions: SessionStorePtr,
        session_ttl: Duration,
    ) -> Self {
        // ---
        AppState {
            metrics,
            repository,
            sessions,
            session_ttl,
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the repository implementation.
    pub(crate) fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }

    /// Get a reference to the session store.
    pub(crate) fn sessions(&self) -> &SessionStorePtr {
        // ---
        &self.sessions
    }

    pub(crate) fn session_ttl(&self) -> Duration {
        // ---
        self.session_ttl
    }
}
