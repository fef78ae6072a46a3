use sea_orm::{DbErr, SqlErr};

/// Stable error-kind marker handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    NoContent,
    InvalidInput,
    AlreadyExists,
    QueryFailed,
    Configuration,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No content: {0}")]
    NoContent(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Query failed: {0}")]
    QueryFailed(#[source] DbErr),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoContent(_) => ErrorKind::NoContent,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::QueryFailed(_) => ErrorKind::QueryFailed,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                tracing::debug!(error = %msg, "Unique constraint violation");
                Self::AlreadyExists(msg)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                tracing::debug!(error = %msg, "Foreign key violation");
                Self::NotFound(msg)
            }
            _ => {
                tracing::error!("Database error: {err:?}");
                Self::QueryFailed(err)
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
