//! Error types for sub-ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;

use balanza_shared::types::SubLedgerTransactionId;

use crate::ledger::LedgerError;

/// Errors that can occur during sub-ledger operations.
#[derive(Debug, Error)]
pub enum SubLedgerError {
    // ========== Account Errors ==========
    /// The GL control account does not exist in the chart.
    #[error("GL control account not found: {0}")]
    GlAccountNotFound(String),

    /// Detail account code collision on creation.
    #[error("Sub-ledger account already exists: {0}")]
    DuplicateSubLedgerAccount(String),

    /// Detail account not found.
    #[error("Sub-ledger account not found: {0}")]
    SubLedgerAccountNotFound(String),

    /// Inactive accounts reject new transactions.
    #[error("Sub-ledger account is inactive: {0}")]
    AccountInactive(String),

    /// Deactivation requires a zero balance.
    #[error("Sub-ledger account {code} has a nonzero balance: {balance}")]
    BalanceNotZero {
        /// The detail account code.
        code: String,
        /// Its current balance.
        balance: Decimal,
    },

    // ========== Transaction Errors ==========
    /// Transaction amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// The amount reached the control account's approval threshold
    /// without an approver identity.
    #[error(
        "Transaction of {amount} on control account {gl_account} requires approval (threshold {threshold})"
    )]
    ApprovalRequired {
        /// The control account whose policy fired.
        gl_account: String,
        /// Absolute transaction amount.
        amount: Decimal,
        /// The policy threshold that was reached.
        threshold: Decimal,
    },

    /// Sub-ledger transaction not found.
    #[error("Sub-ledger transaction not found: {0}")]
    TransactionNotFound(SubLedgerTransactionId),

    /// Transaction has already been reversed; reversal is terminal.
    #[error("Sub-ledger transaction already reversed: {0}")]
    AlreadyReversed(SubLedgerTransactionId),

    // ========== Balance Errors ==========
    /// No balance record exists for the (control, detail) pair.
    #[error("No balance record for control account {gl_account} and sub-ledger account {subledger_account}")]
    BalanceNotFound {
        /// The GL control account code.
        gl_account: String,
        /// The detail account code.
        subledger_account: String,
    },

    // ========== Ledger Errors ==========
    /// A GL-side failure surfaced through a sub-ledger operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SubLedgerError {
    /// Returns a stable machine-readable code for collaborator surfaces.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::GlAccountNotFound(_) => "GL_ACCOUNT_NOT_FOUND",
            Self::DuplicateSubLedgerAccount(_) => "DUPLICATE_SUBLEDGER_ACCOUNT",
            Self::SubLedgerAccountNotFound(_) => "SUBLEDGER_ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::BalanceNotZero { .. } => "BALANCE_NOT_ZERO",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::ApprovalRequired { .. } => "APPROVAL_REQUIRED",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::BalanceNotFound { .. } => "BALANCE_NOT_FOUND",
            Self::Ledger(inner) => inner.error_code(),
        }
    }
}
