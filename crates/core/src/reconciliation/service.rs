//! Exception log: recording and resolving reconciliation findings.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;

use balanza_shared::types::ExceptionId;

use super::error::ReconciliationError;
use super::types::{Exception, ExceptionKind, ExceptionSeverity, ExceptionStatus, Resolution};

/// Append-only store of reconciliation exceptions.
///
/// Findings stay in the log after resolution; closing one attaches a
/// [`Resolution`] instead of removing it.
#[derive(Debug, Clone, Default)]
pub struct ExceptionLog {
    exceptions: HashMap<ExceptionId, Exception>,
    /// Detection order, for stable listings.
    order: Vec<ExceptionId>,
}

impl ExceptionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new open exception.
    pub fn create_exception(
        &mut self,
        kind: ExceptionKind,
        severity: ExceptionSeverity,
        account: impl Into<String>,
        description: impl Into<String>,
        amount: Option<Decimal>,
    ) -> &Exception {
        let exception = Exception {
            id: ExceptionId::new(),
            kind,
            severity,
            account: account.into(),
            description: description.into(),
            amount,
            status: ExceptionStatus::Open,
            detected_at: Utc::now(),
            resolution: None,
        };

        self.order.push(exception.id);
        self.exceptions.entry(exception.id).or_insert(exception)
    }

    /// Closes an open exception with a resolution note.
    ///
    /// # Errors
    ///
    /// Returns `ExceptionNotFound` for unknown ids and `AlreadyResolved`
    /// if the exception was closed before.
    pub fn resolve_exception(
        &mut self,
        id: ExceptionId,
        text: impl Into<String>,
        resolved_by: &str,
    ) -> Result<&Exception, ReconciliationError> {
        let exception = self
            .exceptions
            .get_mut(&id)
            .ok_or(ReconciliationError::ExceptionNotFound(id))?;
        if exception.status == ExceptionStatus::Resolved {
            return Err(ReconciliationError::AlreadyResolved(id));
        }

        exception.status = ExceptionStatus::Resolved;
        exception.resolution = Some(Resolution {
            text: text.into(),
            resolved_by: resolved_by.to_string(),
            resolved_at: Utc::now(),
        });
        Ok(exception)
    }

    /// Looks up an exception by id.
    ///
    /// # Errors
    ///
    /// Returns `ExceptionNotFound` for unknown ids.
    pub fn exception(&self, id: ExceptionId) -> Result<&Exception, ReconciliationError> {
        self.exceptions
            .get(&id)
            .ok_or(ReconciliationError::ExceptionNotFound(id))
    }

    /// All exceptions in detection order.
    #[must_use]
    pub fn exceptions(&self) -> Vec<&Exception> {
        self.order
            .iter()
            .filter_map(|id| self.exceptions.get(id))
            .collect()
    }

    /// Exceptions recorded against one account, in detection order.
    #[must_use]
    pub fn exceptions_for_account(&self, account: &str) -> Vec<&Exception> {
        self.exceptions()
            .into_iter()
            .filter(|e| e.account == account)
            .collect()
    }

    /// Exceptions still awaiting resolution, in detection order.
    #[must_use]
    pub fn open_exceptions(&self) -> Vec<&Exception> {
        self.exceptions()
            .into_iter()
            .filter(|e| e.is_open())
            .collect()
    }
}
