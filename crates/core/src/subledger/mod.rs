//! Sub-ledger accounting: detail books under GL control accounts.
//!
//! Customers, vendors, loans, and other detail accounts each roll up to
//! one control account in the chart. This module owns the detail side:
//! accounts, signed transactions with audit trails, per-pair balance
//! records, reconciliation flags, and aging reports. Keeping the detail
//! total equal to the control balance is the reconciliation module's
//! check, not an assumption.

pub mod aging;
pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use aging::{generate_aging, AgingBucket, AgingReport, AgingSlice};
pub use balance::{recomputed_balance, SubLedgerBalance};
pub use error::SubLedgerError;
pub use service::SubLedgerBook;
pub use types::{
    ApprovalPolicy, AuditInfo, ChangeRecord, CreateTransactionInput, ReconciliationInfo,
    ReconciliationStatus, SubLedgerAccount, SubLedgerKind, SubLedgerTransaction, TransactionKind,
};
