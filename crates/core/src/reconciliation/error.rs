//! Reconciliation error types.

use thiserror::Error;

use balanza_shared::types::ExceptionId;

/// Errors from the exception log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconciliationError {
    /// No exception with this id.
    #[error("Exception not found: {0}")]
    ExceptionNotFound(ExceptionId),

    /// The exception has already been closed.
    #[error("Exception already resolved: {0}")]
    AlreadyResolved(ExceptionId),

    /// A writer panicked while holding the ledger lock.
    #[error("Ledger state lock poisoned")]
    Poisoned,
}

impl ReconciliationError {
    /// Stable error code for logs and API payloads.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ExceptionNotFound(_) => "EXCEPTION_NOT_FOUND",
            Self::AlreadyResolved(_) => "EXCEPTION_ALREADY_RESOLVED",
            Self::Poisoned => "POISONED",
        }
    }
}
