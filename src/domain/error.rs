/// Failure taxonomy for every domain operation.
///
/// Absence of a record, malformed input, access denial and store failure are
/// kept apart so the HTTP layer can map each one to its own status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Field validator: rejects strings that are empty after trimming.
pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    // ---
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
