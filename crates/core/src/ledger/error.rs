//! Error types for chart of accounts and journal operations.

use balanza_shared::types::EntryId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal entry must have at least 2 postings.
    #[error("Journal entry must have at least 2 postings")]
    InsufficientPostings,

    /// Debits and credits differ beyond the balance tolerance.
    #[error("Journal entry is not balanced. Debits: {debits}, Credits: {credits}")]
    UnbalancedEntry {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Posting amount cannot be zero.
    #[error("Posting amount cannot be zero")]
    ZeroAmount,

    /// Posting amount cannot be negative.
    #[error("Posting amount cannot be negative")]
    NegativeAmount,

    /// Entry must carry both a debit and a credit side.
    #[error("Journal entry must have both debit and credit postings")]
    SingleSided,

    // ========== Account Errors ==========
    /// Account code collision on creation.
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    /// Account not found. Accounts are never auto-created.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // ========== Entry State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Entry has already been posted; posting is one-way.
    #[error("Journal entry already posted: {0}")]
    AlreadyPosted(EntryId),

    /// Entry must be posted before it can be reversed.
    #[error("Journal entry is not posted: {0}")]
    EntryNotPosted(EntryId),

    /// Entry has already been reversed; reversal is terminal.
    #[error("Journal entry already reversed: {0}")]
    AlreadyReversed(EntryId),

    // ========== Engine Errors ==========
    /// A writer panicked while holding the ledger lock.
    #[error("Ledger state lock poisoned")]
    Poisoned,
}

impl LedgerError {
    /// Returns a stable machine-readable code for collaborator surfaces.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientPostings => "INSUFFICIENT_POSTINGS",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::SingleSided => "SINGLE_SIDED",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::EntryNotPosted(_) => "ENTRY_NOT_POSTED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::Poisoned => "POISONED",
        }
    }
}
