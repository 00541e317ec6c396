use thiserror::Error;

/// Domain failure kinds. Every operation in this crate fails with one of
/// these; the HTTP boundary maps kinds to status codes.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed, missing, or illegal-state input.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The caller is not the owner or participant of the resource.
    #[error("{0}")]
    Forbidden(String),

    /// An overlap or duplicate pending swap was detected.
    #[error("{0}")]
    Conflict(String),

    /// Storage or transaction failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    /// Stable machine-readable kind, independent of the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::NotFound(_) => "not_found",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::Conflict(_) => "conflict",
            DomainError::Internal(_) => "internal",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
