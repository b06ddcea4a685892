//! Journal engine for draft entries, posting, and reversal.
//!
//! This module owns the general ledger state: the chart of accounts plus
//! the journal of entries. All balance mutations flow through posting, and
//! posting validates everything before touching the first account.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use balanza_shared::types::{EntryId, PostingId};

use super::chart::ChartOfAccounts;
use super::error::LedgerError;
use super::types::{
    Account, AccountType, CreateEntryInput, EntryStatus, JournalEntry, Posting, TrialBalance,
};
use super::validation::validate_postings;

/// The general ledger: chart of accounts plus the journal.
///
/// Entries move through a one-way lifecycle. `create_entry` stores a
/// validated draft without touching any account, `post_entry` applies the
/// draft's legs atomically, and `reverse_entry` backs a posted entry out
/// with a fresh sign-swapped entry rather than editing history.
#[derive(Debug, Clone, Default)]
pub struct GeneralLedger {
    chart: ChartOfAccounts,
    entries: HashMap<EntryId, JournalEntry>,
    /// Entry ids in creation order, for stable journal listings.
    order: Vec<EntryId>,
}

impl GeneralLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the chart of accounts.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Mutable chart access for control-account synchronization.
    pub(crate) fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        &mut self.chart
    }

    // ==================== Accounts ====================

    /// Creates a GL account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the code is already taken.
    pub fn create_account(
        &mut self,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> Result<&Account, LedgerError> {
        self.chart.create_account(code, name, account_type)
    }

    /// Looks up a GL account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub fn get_account(&self, code: &str) -> Result<&Account, LedgerError> {
        self.chart.get(code)
    }

    /// All accounts in chart code order.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<&Account> {
        self.chart.list()
    }

    /// Accounts of one classification, in creation order.
    #[must_use]
    pub fn accounts_by_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.chart.by_type(account_type)
    }

    /// Computes a trial balance over the whole chart.
    #[must_use]
    pub fn trial_balance(&self) -> TrialBalance {
        self.chart.trial_balance()
    }

    // ==================== Journal ====================

    /// Creates a draft journal entry.
    ///
    /// The posting set is validated for shape and balance here, but account
    /// existence is deliberately not checked until posting. Drafts touch no
    /// account state.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the postings are malformed or the
    /// entry does not balance within tolerance.
    pub fn create_entry(&mut self, input: CreateEntryInput) -> Result<&JournalEntry, LedgerError> {
        validate_postings(&input.postings)?;

        let id = EntryId::new();
        let now = Utc::now();
        let postings = input
            .postings
            .into_iter()
            .map(|p| Posting {
                id: PostingId::new(),
                account_code: p.account_code,
                amount: p.amount,
                direction: p.direction,
                applied_at: now,
                subledger_account: p.subledger_account,
            })
            .collect();

        let entry = JournalEntry {
            id,
            date: input.date,
            description: input.description,
            reference: input.reference,
            postings,
            status: EntryStatus::Draft,
        };

        self.order.push(id);
        Ok(self.entries.entry(id).or_insert(entry))
    }

    /// Looks up a journal entry by id.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for unknown ids.
    pub fn get_entry(&self, id: EntryId) -> Result<&JournalEntry, LedgerError> {
        self.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))
    }

    /// All journal entries in creation order.
    #[must_use]
    pub fn journal(&self) -> Vec<&JournalEntry> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .collect()
    }

    /// Number of journal entries, drafts included.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Posts a draft entry, applying every leg to its account.
    ///
    /// Validation is all-or-nothing: the entry's balance and every target
    /// account are checked before the first balance mutation, so a failed
    /// post leaves the ledger exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `AlreadyPosted`, or `AlreadyReversed` for
    /// lifecycle violations, `UnbalancedEntry` if the stored totals drifted,
    /// and `AccountNotFound` if any leg targets a missing account.
    pub fn post_entry(&mut self, id: EntryId) -> Result<&JournalEntry, LedgerError> {
        let postings = {
            let entry = self.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))?;
            match entry.status {
                EntryStatus::Draft => {}
                EntryStatus::Posted => return Err(LedgerError::AlreadyPosted(id)),
                EntryStatus::Reversed => return Err(LedgerError::AlreadyReversed(id)),
            }

            let totals = entry.totals();
            if !totals.is_balanced {
                return Err(LedgerError::UnbalancedEntry {
                    debits: totals.debits,
                    credits: totals.credits,
                });
            }

            for posting in &entry.postings {
                if !self.chart.contains(&posting.account_code) {
                    return Err(LedgerError::AccountNotFound(posting.account_code.clone()));
                }
            }

            entry.postings.clone()
        };

        for posting in postings {
            self.chart.apply_posting(posting)?;
        }

        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        entry.status = EntryStatus::Posted;
        Ok(entry)
    }

    /// Reverses a posted entry with a new sign-swapped entry.
    ///
    /// The reversal entry is posted immediately and the original becomes
    /// `Reversed`, a terminal state. History is never rewritten; the pair
    /// nets every touched account back to its prior balance.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for unknown ids, `EntryNotPosted` for
    /// drafts, and `AlreadyReversed` if the entry was reversed before.
    pub fn reverse_entry(
        &mut self,
        id: EntryId,
        date: NaiveDate,
        reason: &str,
    ) -> Result<&JournalEntry, LedgerError> {
        let reversal_postings = {
            let original = self.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))?;
            match original.status {
                EntryStatus::Posted => {}
                EntryStatus::Draft => return Err(LedgerError::EntryNotPosted(id)),
                EntryStatus::Reversed => return Err(LedgerError::AlreadyReversed(id)),
            }

            let now = Utc::now();
            original
                .postings
                .iter()
                .map(|p| Posting {
                    id: PostingId::new(),
                    account_code: p.account_code.clone(),
                    amount: p.amount,
                    direction: p.direction.swapped(),
                    applied_at: now,
                    subledger_account: p.subledger_account.clone(),
                })
                .collect::<Vec<Posting>>()
        };

        for posting in reversal_postings.clone() {
            self.chart.apply_posting(posting)?;
        }

        let reversal = JournalEntry {
            id: EntryId::new(),
            date,
            description: format!("Reversal of entry {id}. Reason: {reason}"),
            reference: Some(id.to_string()),
            postings: reversal_postings,
            status: EntryStatus::Posted,
        };
        let reversal_id = reversal.id;

        if let Some(original) = self.entries.get_mut(&id) {
            original.status = EntryStatus::Reversed;
        }

        self.order.push(reversal_id);
        Ok(self.entries.entry(reversal_id).or_insert(reversal))
    }
}
