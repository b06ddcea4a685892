//! Domain types for sub-ledger accounts and transactions.
//!
//! Sub-ledger detail accounts roll up to a GL control account. Their
//! transactions carry signed amounts (debit positive, credit negative) so
//! that a plain sum over non-reversed history reproduces the live balance.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use balanza_shared::types::{PostingId, SubLedgerTransactionId};

use crate::ledger::Direction;

/// What a sub-ledger detail account represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubLedgerKind {
    /// Accounts receivable detail (rolls up to an AR control account).
    Customer,
    /// Accounts payable detail (rolls up to an AP control account).
    Vendor,
    /// Loan principal and interest detail.
    Loan,
    /// Deposit or escrow detail.
    Deposit,
    /// Anything else tracked at detail level.
    Other,
}

/// Business meaning of a sub-ledger transaction.
///
/// The kind fixes which side of the control account the transaction hits;
/// only `Adjustment` and `Reversal` take their side from the sign of the
/// input amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A billing that increases what the counterparty owes.
    Invoice,
    /// A receipt that reduces the outstanding balance.
    Payment,
    /// A credit issued to the counterparty.
    CreditMemo,
    /// A charge added to the counterparty.
    DebitMemo,
    /// Accrued interest.
    Interest,
    /// A service or processing fee.
    Fee,
    /// A late or contractual penalty.
    Penalty,
    /// Money returned to the counterparty.
    Refund,
    /// A signed correction; direction follows the amount's sign.
    Adjustment,
    /// The offsetting half of a reversal pair.
    Reversal,
}

impl TransactionKind {
    /// Resolves the posting direction for this kind.
    ///
    /// `amount` only matters for `Adjustment` and `Reversal`, where the
    /// caller's sign picks the side. A non-negative amount debits.
    #[must_use]
    pub fn direction_for(self, amount: Decimal) -> Direction {
        match self {
            Self::Invoice | Self::DebitMemo | Self::Interest | Self::Fee | Self::Penalty => {
                Direction::Debit
            }
            Self::Payment | Self::CreditMemo | Self::Refund => Direction::Credit,
            Self::Adjustment | Self::Reversal => {
                if amount >= Decimal::ZERO {
                    Direction::Debit
                } else {
                    Direction::Credit
                }
            }
        }
    }
}

/// A detail account under a GL control account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubLedgerAccount {
    /// Caller-assigned unique code, e.g. `CUST-0001`.
    pub code: String,
    /// The GL control account this detail account rolls up to.
    pub gl_account: String,
    /// Human-readable name.
    pub name: String,
    /// What this detail account represents.
    pub kind: SubLedgerKind,
    /// Mirror of the balance record's current balance.
    pub balance: Decimal,
    /// Inactive accounts reject new transactions.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account last changed.
    pub updated_at: DateTime<Utc>,
}

impl SubLedgerAccount {
    /// Creates an active detail account with zero balance.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        gl_account: impl Into<String>,
        kind: SubLedgerKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            code: code.into(),
            gl_account: gl_account.into(),
            name: name.into(),
            kind,
            balance: Decimal::ZERO,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One append-only entry in a transaction's change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Who made the change.
    pub changed_by: String,
    /// When the change happened.
    pub changed_at: DateTime<Utc>,
    /// What changed.
    pub description: String,
}

/// Audit trail carried by every sub-ledger transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditInfo {
    /// Who created the transaction.
    pub created_by: String,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
    /// Bumped on every recorded change.
    pub version: u32,
    /// Append-only change log.
    pub changes: Vec<ChangeRecord>,
}

impl AuditInfo {
    /// Fresh audit info at version 1 with an empty change log.
    #[must_use]
    pub fn new(created_by: impl Into<String>) -> Self {
        Self {
            created_by: created_by.into(),
            created_at: Utc::now(),
            version: 1,
            changes: Vec::new(),
        }
    }

    /// Appends a change record and bumps the version.
    pub fn record_change(&mut self, changed_by: &str, description: impl Into<String>) {
        self.version += 1;
        self.changes.push(ChangeRecord {
            changed_by: changed_by.to_string(),
            changed_at: Utc::now(),
            description: description.into(),
        });
    }
}

/// A detail-level movement on a sub-ledger account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubLedgerTransaction {
    /// Unique transaction id.
    pub id: SubLedgerTransactionId,
    /// The detail account this transaction belongs to.
    pub subledger_account: String,
    /// The GL control account, denormalized from the detail account.
    pub gl_account: String,
    /// Business date.
    pub date: NaiveDate,
    /// Signed amount: debit positive, credit negative.
    pub amount: Decimal,
    /// Business meaning, which fixed the sign.
    pub kind: TransactionKind,
    /// Free-text description.
    pub description: String,
    /// True for both members of a reversal pair.
    pub is_reversed: bool,
    /// For a reversal, the transaction it backs out.
    pub reversal_of: Option<SubLedgerTransactionId>,
    /// For a reversed original, the reversal that backed it out.
    pub reversed_by: Option<SubLedgerTransactionId>,
    /// The GL posting tied to this transaction, either supplied by the
    /// caller or synthesized against the control account.
    pub posting_id: Option<PostingId>,
    /// Set when a reconciliation run matched this transaction.
    pub is_reconciled: bool,
    /// Creation and change audit trail.
    pub audit: AuditInfo,
}

/// Input for creating a sub-ledger transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Target detail account code.
    pub subledger_account: String,
    /// Business date.
    pub date: NaiveDate,
    /// Amount; magnitude for directional kinds, signed for
    /// `Adjustment`/`Reversal`.
    pub amount: Decimal,
    /// Business meaning.
    pub kind: TransactionKind,
    /// Free-text description.
    pub description: String,
    /// Who is recording the transaction.
    pub created_by: String,
    /// Approver identity, required above the control account's threshold.
    pub approved_by: Option<String>,
    /// An external GL posting to link instead of synthesizing one.
    pub posting_id: Option<PostingId>,
}

/// Outcome of a reconciliation attempt for a (control, detail) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    /// The detail balance agrees with the control side.
    Matched,
    /// The sides disagree; the attempt is recorded without matching.
    Unmatched,
}

/// A reconciliation attempt submitted for a (control, detail) pair.
#[derive(Debug, Clone)]
pub struct ReconciliationInfo {
    /// Whether the sides agreed.
    pub status: ReconciliationStatus,
    /// Who performed the reconciliation.
    pub reconciled_by: String,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Approval threshold for one GL control account.
///
/// A transaction whose absolute amount reaches `min_amount` must carry an
/// approver identity or it is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    /// The control account the policy guards.
    pub gl_account: String,
    /// Inclusive threshold that triggers the approval requirement.
    pub min_amount: Decimal,
}
