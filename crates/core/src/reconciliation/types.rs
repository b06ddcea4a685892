//! Exception types for reconciliation findings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use balanza_shared::types::ExceptionId;

/// What kind of break an exception records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    /// A stored sub-ledger balance disagrees with its recomputed history.
    BalanceVariance,
    /// A control account disagrees with the sum of its detail balances.
    ReconciliationFailure,
    /// A detail account has no balance record at all.
    MissingBalance,
    /// Raised by hand for anything the checks cannot see.
    ManualReview,
}

/// How urgently an exception needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionSeverity {
    /// Data is missing or structurally broken.
    Critical,
    /// Books disagree; amounts are wrong somewhere.
    High,
    /// Worth a look during the next close.
    Medium,
    /// Informational.
    Low,
}

/// Lifecycle of an exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionStatus {
    /// Unresolved.
    Open,
    /// Investigated and closed with a note.
    Resolved,
}

/// How an exception was closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// What was done about it.
    pub text: String,
    /// Who closed it.
    pub resolved_by: String,
    /// When it was closed.
    pub resolved_at: DateTime<Utc>,
}

/// One reconciliation finding.
///
/// Exceptions are append-only: resolving one records a [`Resolution`]
/// rather than deleting it, so the close leaves a trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    /// Unique identifier.
    pub id: ExceptionId,
    /// What kind of break this is.
    pub kind: ExceptionKind,
    /// How urgent it is.
    pub severity: ExceptionSeverity,
    /// The account the break was found on (control or detail code).
    pub account: String,
    /// Human-readable description of the break.
    pub description: String,
    /// The discrepancy amount, where one applies.
    pub amount: Option<Decimal>,
    /// Open or resolved.
    pub status: ExceptionStatus,
    /// When the break was detected.
    pub detected_at: DateTime<Utc>,
    /// Present once the exception is closed.
    pub resolution: Option<Resolution>,
}

impl Exception {
    /// Whether the exception still needs attention.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ExceptionStatus::Open
    }
}
