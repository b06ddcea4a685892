//! Domain types for the chart of accounts and journal engine.
//!
//! This module defines the core types for recording financial postings:
//! GL accounts, posting legs, journal entries, and the derived totals
//! used for balance validation and trial balance reporting.

use balanza_shared::types::{EntryId, PostingId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::within_tolerance;

/// Account classification in the chart of accounts.
///
/// The classification determines the sign convention for balance updates:
/// Asset and Expense accounts are debit-normal, Liability, Equity, and
/// Revenue accounts are credit-normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, equipment).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns true for accounts whose balance grows with debits.
    #[must_use]
    pub fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }
}

/// Posting direction: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Debit leg.
    Debit,
    /// Credit leg.
    Credit,
}

impl Direction {
    /// Returns the opposite direction, used when composing reversals.
    #[must_use]
    pub fn swapped(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Journal entry status.
///
/// Entries move `Draft -> Posted` exactly once. `Reversed` is terminal and
/// is reached only through an explicit reversal that records a new,
/// sign-swapped entry; the original's postings are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is recorded but has not touched any account balance.
    Draft,
    /// Entry has been applied to account balances (immutable).
    Posted,
    /// Entry has been offset by a reversal entry (immutable).
    Reversed,
}

impl EntryStatus {
    /// Returns true if the entry can still be posted.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry's postings are frozen.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }
}

/// A GL control account.
///
/// Created once per code with a zero balance; the balance and posting
/// history mutate only through posting application, never directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Caller-assigned chart code, e.g. `101000`.
    pub code: String,
    /// Human-readable account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Current signed balance per the account's sign convention.
    pub balance: Decimal,
    /// Applied postings, in application order (append-only).
    pub postings: Vec<Posting>,
}

impl Account {
    /// Creates an account with zero balance and empty posting history.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            balance: Decimal::ZERO,
            postings: Vec::new(),
        }
    }
}

/// One debit or credit leg applied against a single account.
///
/// Immutable once created; owned by exactly one journal entry, except for
/// the one-sided control-account postings the sub-ledger synthesizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    /// Unique posting identifier.
    pub id: PostingId,
    /// Target account code.
    pub account_code: String,
    /// Posting amount (always positive; the direction carries the sign).
    pub amount: Decimal,
    /// Debit or credit.
    pub direction: Direction,
    /// When the posting was applied.
    pub applied_at: DateTime<Utc>,
    /// Sub-ledger account this posting synchronizes with, if any.
    pub subledger_account: Option<String>,
}

/// Input for a single posting leg when creating a journal entry.
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// Target account code.
    pub account_code: String,
    /// Posting amount (must be positive).
    pub amount: Decimal,
    /// Debit or credit.
    pub direction: Direction,
    /// Optional sub-ledger account linkage.
    pub subledger_account: Option<String>,
}

impl PostingInput {
    /// Convenience constructor for a plain GL posting.
    #[must_use]
    pub fn new(account_code: impl Into<String>, amount: Decimal, direction: Direction) -> Self {
        Self {
            account_code: account_code.into(),
            amount,
            direction,
            subledger_account: None,
        }
    }
}

/// Input for creating a new journal entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// Business date of the entry.
    pub date: NaiveDate,
    /// Description of the accounting event.
    pub description: String,
    /// Optional external reference (invoice number, batch id, ...).
    pub reference: Option<String>,
    /// The posting legs (must have at least 2).
    pub postings: Vec<PostingInput>,
}

/// A balanced set of postings recorded as one atomic accounting event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry identifier.
    pub id: EntryId,
    /// Business date of the entry.
    pub date: NaiveDate,
    /// Description of the accounting event.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// The posting legs, exclusively owned by this entry.
    pub postings: Vec<Posting>,
    /// Lifecycle status.
    pub status: EntryStatus,
}

impl JournalEntry {
    /// Sums this entry's postings into debit and credit totals.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for posting in &self.postings {
            match posting.direction {
                Direction::Debit => debits += posting.amount,
                Direction::Credit => credits += posting.amount,
            }
        }
        EntryTotals::new(debits, credits)
    }
}

/// Debit and credit totals for a posting set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
    /// Whether the totals agree within the balance tolerance.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debits: Decimal, credits: Decimal) -> Self {
        Self {
            debits,
            credits,
            is_balanced: within_tolerance(debits - credits),
        }
    }

    /// Returns the signed difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debits - self.credits
    }
}

/// One account's line in a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Sum of debit postings applied to the account.
    pub debits: Decimal,
    /// Sum of credit postings applied to the account.
    pub credits: Decimal,
    /// Current signed balance.
    pub balance: Decimal,
}

/// Trial balance over the whole chart of accounts.
///
/// Verifies that total applied debits equal total applied credits. One-sided
/// control postings synthesized by the sub-ledger appear on the control side
/// only, so books running sub-ledgers balance once the offsetting detail
/// entries are journaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Per-account rows, in chart code order.
    pub rows: Vec<TrialBalanceRow>,
    /// Grand total of debit postings.
    pub total_debits: Decimal,
    /// Grand total of credit postings.
    pub total_credits: Decimal,
    /// Whether the grand totals agree exactly.
    pub is_balanced: bool,
}
