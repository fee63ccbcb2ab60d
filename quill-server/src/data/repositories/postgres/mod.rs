use tracing::error;

use crate::domain::error::DomainError;

pub(crate) mod like_repository;
pub(crate) mod paragraph_repository;
pub(crate) mod post_repository;
pub(crate) mod topic_repository;
pub(crate) mod user_repository;

/// Fallback mapping for driver errors no repository gives a domain meaning to.
pub(crate) fn storage_error(err: sqlx::Error) -> DomainError {
    error!(error = %err, "database operation failed");
    DomainError::Storage(err.to_string())
}

/// Foreign-key violations mean the referenced row is gone.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503"))
}
