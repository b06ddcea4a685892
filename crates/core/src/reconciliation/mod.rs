//! Reconciliation: integrity checks and the exception log.
//!
//! The checks sweep both books for breaks (missing balance records,
//! balances that disagree with their history, control accounts that
//! disagree with their detail totals) and file what they find as
//! exceptions. Exceptions live until someone resolves them with a note.

pub mod checks;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod checks_props;

pub use checks::run_integrity_checks;
pub use error::ReconciliationError;
pub use service::ExceptionLog;
pub use types::{Exception, ExceptionKind, ExceptionSeverity, ExceptionStatus, Resolution};
