use thiserror::Error;

/// Errors from the credential and resource stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// Postgres unique_violation
    const UNIQUE_VIOLATION: &'static str = "23505";

    /// Map a unique-constraint failure to `Conflict`, anything else passes through
    pub fn from_insert(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(Self::UNIQUE_VIOLATION) {
                return StoreError::Conflict(conflict_message.to_string());
            }
        }
        StoreError::Sqlx(err)
    }
}
