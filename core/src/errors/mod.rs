//! Domain-specific error types and error handling.

mod types;


pub use types::{CodeError, FailureKind, NotifyError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Code(#[from] CodeError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Coarse classification used by callers to decide what to surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input, surfaced verbatim
    Input,
    /// Cooldown or attempt limits tripped
    AbusePrevention,
    /// Notifier or network failure
    Transport,
    /// Stored state has an unexpected shape
    DataCorruption,
    /// Backing store or internal failure
    System,
}

impl DomainError {
    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Input,
            DomainError::Storage { .. } | DomainError::Internal { .. } => ErrorKind::System,
            DomainError::Code(CodeError::SendTooMany | CodeError::VerifyTooMany) => {
                ErrorKind::AbusePrevention
            }
            DomainError::Code(CodeError::NotFound) => ErrorKind::Input,
            DomainError::Code(CodeError::DataCorruption { .. }) => ErrorKind::DataCorruption,
            DomainError::Notify(NotifyError::InvalidRecipient { .. }) => ErrorKind::Input,
            DomainError::Notify(_) => ErrorKind::Transport,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
