#[macro_use]
mod text_enum;

pub mod accounts;
pub mod analytics;
pub mod assignment;
pub mod attendance;
pub mod clock;
mod error;
mod ids;
mod metrics;
mod repository;
mod session_store;
pub mod task;
pub mod tasks;
pub mod timetable;
pub mod user;

pub use error::{CoreError, CoreResult};
pub use ids::{RecordId, StudentRef};

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Storage abstractions implemented under `infrastructure`
pub use repository::{DuplicateStudentId, Repository, RepositoryPtr};
pub use session_store::{SessionInfo, SessionStore, SessionStorePtr};
