//! Sub-ledger book: detail accounts, transactions, and balance records.
//!
//! The book owns all detail-side state. Cross-checks against the GL chart
//! (control account existence, synthesized postings) are the engine's job;
//! the book fails closed on everything it owns.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use balanza_shared::types::{PostingId, SubLedgerTransactionId};

use super::aging::{generate_aging, AgingReport};
use super::balance::SubLedgerBalance;
use super::error::SubLedgerError;
use super::types::{
    ApprovalPolicy, AuditInfo, CreateTransactionInput, ReconciliationInfo, ReconciliationStatus,
    SubLedgerAccount, SubLedgerKind, SubLedgerTransaction, TransactionKind,
};
use crate::ledger::Direction;

/// All sub-ledger state for one engine.
///
/// Detail accounts are keyed by code; transactions by id with a per-account
/// index in creation order; balance records by (control, detail) pair.
#[derive(Debug, Clone, Default)]
pub struct SubLedgerBook {
    accounts: BTreeMap<String, SubLedgerAccount>,
    /// Secondary index: control account -> detail codes, in creation order.
    by_gl: HashMap<String, Vec<String>>,
    transactions: HashMap<SubLedgerTransactionId, SubLedgerTransaction>,
    /// Secondary index: detail code -> transaction ids, in creation order.
    by_account: HashMap<String, Vec<SubLedgerTransactionId>>,
    balances: HashMap<(String, String), SubLedgerBalance>,
    /// Approval thresholds keyed by control account.
    approval_policies: HashMap<String, Decimal>,
}

impl SubLedgerBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accounts ====================

    /// Creates a detail account with a zeroed balance record.
    ///
    /// The caller verifies the control account exists in the chart first;
    /// the book only owns detail-side invariants.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSubLedgerAccount` if the code is already taken.
    pub fn create_account(
        &mut self,
        code: &str,
        name: &str,
        gl_account: &str,
        kind: SubLedgerKind,
    ) -> Result<&SubLedgerAccount, SubLedgerError> {
        if self.accounts.contains_key(code) {
            return Err(SubLedgerError::DuplicateSubLedgerAccount(code.to_string()));
        }

        self.by_gl
            .entry(gl_account.to_string())
            .or_default()
            .push(code.to_string());
        self.balances.insert(
            (gl_account.to_string(), code.to_string()),
            SubLedgerBalance::new(),
        );

        let account = self
            .accounts
            .entry(code.to_string())
            .or_insert_with(|| SubLedgerAccount::new(code, name, gl_account, kind));
        Ok(account)
    }

    /// Looks up a detail account by code.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes.
    pub fn account(&self, code: &str) -> Result<&SubLedgerAccount, SubLedgerError> {
        self.accounts
            .get(code)
            .ok_or_else(|| SubLedgerError::SubLedgerAccountNotFound(code.to_string()))
    }

    /// All detail accounts in code order.
    #[must_use]
    pub fn accounts(&self) -> Vec<&SubLedgerAccount> {
        self.accounts.values().collect()
    }

    /// Detail accounts rolling up to one control account, in creation order.
    #[must_use]
    pub fn accounts_for_gl(&self, gl_account: &str) -> Vec<&SubLedgerAccount> {
        self.by_gl
            .get(gl_account)
            .into_iter()
            .flatten()
            .filter_map(|code| self.accounts.get(code))
            .collect()
    }

    /// Deactivates a detail account so it rejects new transactions.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes and
    /// `BalanceNotZero` while any balance remains.
    pub fn deactivate_account(&mut self, code: &str) -> Result<&SubLedgerAccount, SubLedgerError> {
        let balance = {
            let account = self
                .accounts
                .get(code)
                .ok_or_else(|| SubLedgerError::SubLedgerAccountNotFound(code.to_string()))?;
            account.balance
        };
        if !balance.is_zero() {
            return Err(SubLedgerError::BalanceNotZero {
                code: code.to_string(),
                balance,
            });
        }

        let account = self
            .accounts
            .get_mut(code)
            .ok_or_else(|| SubLedgerError::SubLedgerAccountNotFound(code.to_string()))?;
        account.is_active = false;
        account.updated_at = Utc::now();
        Ok(account)
    }

    // ==================== Approval policies ====================

    /// Registers (or replaces) the approval threshold for a control account.
    pub fn register_approval_policy(&mut self, policy: ApprovalPolicy) {
        self.approval_policies
            .insert(policy.gl_account, policy.min_amount);
    }

    /// The approval threshold guarding a control account, if any.
    #[must_use]
    pub fn approval_threshold(&self, gl_account: &str) -> Option<Decimal> {
        self.approval_policies.get(gl_account).copied()
    }

    // ==================== Transactions ====================

    /// Records a detail transaction and applies it to the balance record.
    ///
    /// The stored amount is signed by the resolved direction: debit
    /// positive, credit negative. The account mirror and the period
    /// accumulators update together; any prior reconciliation match is
    /// invalidated. GL-side posting is the caller's follow-up step.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound`, `AccountInactive`, `ZeroAmount`,
    /// `ApprovalRequired` when the control account's threshold is reached
    /// without an approver, or `BalanceNotFound` if the balance record is
    /// missing.
    pub fn create_transaction(
        &mut self,
        input: CreateTransactionInput,
    ) -> Result<SubLedgerTransaction, SubLedgerError> {
        let (gl_account, code) = {
            let account = self.accounts.get(&input.subledger_account).ok_or_else(|| {
                SubLedgerError::SubLedgerAccountNotFound(input.subledger_account.clone())
            })?;
            if !account.is_active {
                return Err(SubLedgerError::AccountInactive(account.code.clone()));
            }
            (account.gl_account.clone(), account.code.clone())
        };

        if input.amount.is_zero() {
            return Err(SubLedgerError::ZeroAmount);
        }

        if let Some(threshold) = self.approval_policies.get(&gl_account).copied() {
            if input.amount.abs() >= threshold && input.approved_by.is_none() {
                return Err(SubLedgerError::ApprovalRequired {
                    gl_account,
                    amount: input.amount.abs(),
                    threshold,
                });
            }
        }

        // Direction comes from the kind; the sign of the stored amount
        // comes from the direction.
        let direction = input.kind.direction_for(input.amount);
        let signed = match direction {
            Direction::Debit => input.amount.abs(),
            Direction::Credit => -input.amount.abs(),
        };

        let balance = self
            .balances
            .get_mut(&(gl_account.clone(), code.clone()))
            .ok_or_else(|| SubLedgerError::BalanceNotFound {
                gl_account: gl_account.clone(),
                subledger_account: code.clone(),
            })?;
        balance.apply(signed);
        let current = balance.current_balance;

        self.mirror_account(&code, current);

        let tx = SubLedgerTransaction {
            id: SubLedgerTransactionId::new(),
            subledger_account: code.clone(),
            gl_account,
            date: input.date,
            amount: signed,
            kind: input.kind,
            description: input.description,
            is_reversed: false,
            reversal_of: None,
            reversed_by: None,
            posting_id: input.posting_id,
            is_reconciled: false,
            audit: AuditInfo::new(input.created_by),
        };

        self.by_account.entry(code).or_default().push(tx.id);
        let stored = self.transactions.entry(tx.id).or_insert(tx);
        Ok(stored.clone())
    }

    /// Links a synthesized GL posting to a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for unknown ids.
    pub fn link_posting(
        &mut self,
        id: SubLedgerTransactionId,
        posting_id: PostingId,
    ) -> Result<SubLedgerTransaction, SubLedgerError> {
        let tx = self
            .transactions
            .get_mut(&id)
            .ok_or(SubLedgerError::TransactionNotFound(id))?;
        tx.posting_id = Some(posting_id);
        Ok(tx.clone())
    }

    /// Reverses a transaction with a new sign-negated `Reversal` pair.
    ///
    /// Both members of the pair carry `is_reversed`, so non-reversed
    /// history keeps summing to the live balance. The original gets an
    /// audit change record; the new transaction is returned for the caller
    /// to post against the GL.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for unknown ids, `AlreadyReversed`
    /// for either member of an existing pair, and `BalanceNotFound` if the
    /// balance record is missing.
    pub fn reverse_transaction(
        &mut self,
        id: SubLedgerTransactionId,
        reason: &str,
        reversed_by: &str,
    ) -> Result<SubLedgerTransaction, SubLedgerError> {
        let (code, gl_account, amount) = {
            let original = self
                .transactions
                .get(&id)
                .ok_or(SubLedgerError::TransactionNotFound(id))?;
            if original.is_reversed {
                return Err(SubLedgerError::AlreadyReversed(id));
            }
            (
                original.subledger_account.clone(),
                original.gl_account.clone(),
                original.amount,
            )
        };

        let balance = self
            .balances
            .get_mut(&(gl_account.clone(), code.clone()))
            .ok_or_else(|| SubLedgerError::BalanceNotFound {
                gl_account: gl_account.clone(),
                subledger_account: code.clone(),
            })?;
        balance.apply(-amount);
        let current = balance.current_balance;

        self.mirror_account(&code, current);

        let reversal_id = SubLedgerTransactionId::new();
        if let Some(original) = self.transactions.get_mut(&id) {
            original.is_reversed = true;
            original.reversed_by = Some(reversal_id);
            original.audit.record_change(
                reversed_by,
                format!("Reversed by transaction {reversal_id}. Reason: {reason}"),
            );
        }

        let reversal = SubLedgerTransaction {
            id: reversal_id,
            subledger_account: code.clone(),
            gl_account,
            date: Utc::now().date_naive(),
            amount: -amount,
            kind: TransactionKind::Reversal,
            description: format!("Reversal of transaction {id}. Reason: {reason}"),
            is_reversed: true,
            reversal_of: Some(id),
            reversed_by: None,
            posting_id: None,
            is_reconciled: false,
            audit: AuditInfo::new(reversed_by),
        };

        self.by_account.entry(code).or_default().push(reversal_id);
        let stored = self.transactions.entry(reversal_id).or_insert(reversal);
        Ok(stored.clone())
    }

    /// Looks up a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for unknown ids.
    pub fn transaction(
        &self,
        id: SubLedgerTransactionId,
    ) -> Result<&SubLedgerTransaction, SubLedgerError> {
        self.transactions
            .get(&id)
            .ok_or(SubLedgerError::TransactionNotFound(id))
    }

    /// A detail account's transactions in creation order.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes.
    pub fn transactions_for_account(
        &self,
        code: &str,
    ) -> Result<Vec<&SubLedgerTransaction>, SubLedgerError> {
        self.account(code)?;
        Ok(self.history(code).collect())
    }

    // ==================== Balances & reports ====================

    /// The balance record for a (control, detail) pair.
    ///
    /// # Errors
    ///
    /// Returns `BalanceNotFound` for unknown pairs.
    pub fn balance(
        &self,
        gl_account: &str,
        subledger_account: &str,
    ) -> Result<&SubLedgerBalance, SubLedgerError> {
        self.balances
            .get(&(gl_account.to_string(), subledger_account.to_string()))
            .ok_or_else(|| SubLedgerError::BalanceNotFound {
                gl_account: gl_account.to_string(),
                subledger_account: subledger_account.to_string(),
            })
    }

    /// Applies a reconciliation attempt to a (control, detail) pair.
    ///
    /// A `Matched` attempt sets the balance flag, stamps the time, and
    /// propagates the tag to transactions not yet marked. An `Unmatched`
    /// attempt only records when it happened.
    ///
    /// # Errors
    ///
    /// Returns `BalanceNotFound` for unknown pairs.
    pub fn reconcile(
        &mut self,
        gl_account: &str,
        subledger_account: &str,
        info: &ReconciliationInfo,
    ) -> Result<SubLedgerBalance, SubLedgerError> {
        let balance = self
            .balances
            .get_mut(&(gl_account.to_string(), subledger_account.to_string()))
            .ok_or_else(|| SubLedgerError::BalanceNotFound {
                gl_account: gl_account.to_string(),
                subledger_account: subledger_account.to_string(),
            })?;

        let now = Utc::now();
        match info.status {
            ReconciliationStatus::Matched => {
                balance.mark_reconciled(now);
                let snapshot = balance.clone();

                let note = match &info.note {
                    Some(note) => format!("Marked reconciled: {note}"),
                    None => "Marked reconciled".to_string(),
                };
                if let Some(ids) = self.by_account.get(subledger_account) {
                    for id in ids {
                        if let Some(tx) = self.transactions.get_mut(id) {
                            if !tx.is_reconciled {
                                tx.is_reconciled = true;
                                tx.audit.record_change(&info.reconciled_by, note.clone());
                            }
                        }
                    }
                }
                Ok(snapshot)
            }
            ReconciliationStatus::Unmatched => {
                balance.record_attempt(now);
                Ok(balance.clone())
            }
        }
    }

    /// Builds an aging report for one detail account.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes.
    pub fn aging(&self, code: &str, as_of: NaiveDate) -> Result<AgingReport, SubLedgerError> {
        self.account(code)?;
        Ok(generate_aging(code, as_of, self.history(code)))
    }

    /// Transaction history for a detail code, ignoring unknown codes.
    pub(crate) fn history(&self, code: &str) -> impl Iterator<Item = &SubLedgerTransaction> {
        self.by_account
            .get(code)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.transactions.get(id))
    }

    /// Balance record lookup for integrity checks.
    pub(crate) fn balance_record(
        &self,
        gl_account: &str,
        subledger_account: &str,
    ) -> Option<&SubLedgerBalance> {
        self.balances
            .get(&(gl_account.to_string(), subledger_account.to_string()))
    }

    fn mirror_account(&mut self, code: &str, current: Decimal) {
        if let Some(account) = self.accounts.get_mut(code) {
            account.balance = current;
            account.updated_at = Utc::now();
        }
    }
}
