//! Core bookkeeping logic for Balanza.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, invariants, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Chart of accounts and the double-entry journal
//! - `subledger` - Detail accounts, transactions, balances, and aging
//! - `reconciliation` - Integrity checks and the exception lifecycle
//! - `engine` - The per-process ledger context object

pub mod engine;
pub mod ledger;
pub mod reconciliation;
pub mod subledger;

pub use engine::LedgerEngine;
