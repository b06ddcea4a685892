//! Double-entry bookkeeping logic.
//!
//! This module implements the general ledger:
//! - Chart of accounts and the normal-balance sign rule
//! - Journal entries (debits and credits) with a one-way lifecycle
//! - Balance calculations and the balance tolerance
//! - Posting validation
//! - Trial balance reporting
//! - Error types for ledger operations

pub mod balance;
pub mod chart;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{balance_change, balance_tolerance, within_tolerance};
pub use chart::ChartOfAccounts;
pub use error::LedgerError;
pub use service::GeneralLedger;
pub use types::{
    Account, AccountType, CreateEntryInput, Direction, EntryStatus, EntryTotals, JournalEntry,
    Posting, PostingInput, TrialBalance, TrialBalanceRow,
};
pub use validation::validate_postings;
