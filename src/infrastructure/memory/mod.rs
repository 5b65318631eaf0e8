mod repository;

pub use repository::MemoryRepository;

use crate::domain::RepositoryPtr;
use std::sync::Arc;

/// Creates an empty in-process repository.
pub fn create_repository() -> RepositoryPtr {
    Arc::new(MemoryRepository::new())
}
