//! Core error type shared by every subsystem.
//!
//! Mirrors the error kinds a caller of the control plane needs to
//! distinguish: validation problems, missing resources, conflicts, and the
//! handful of conditions that can legitimately arise from snapshot decoding
//! or notifier transport failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("snapshot environment_id mismatch: expected {expected}, got {found}")]
    Mismatch { expected: String, found: String },

    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("duplicate molecule id: {0}")]
    DuplicateId(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("transient error: {0}")]
    Transient(String),
}

impl CoreError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether this error is worth retrying (notifier transport errors only).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
