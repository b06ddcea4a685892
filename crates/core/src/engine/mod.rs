//! Engine facade: one lock around the whole ledger state.
//!
//! [`LedgerEngine`] is the only entry point callers see. It guards the
//! general ledger, the sub-ledger book, and the exception log behind a
//! single `RwLock`, so every operation observes both books at a
//! consistent point. Reads share the lock; mutations take it exclusively
//! and either complete or leave no trace. All methods hand back owned
//! snapshots rather than references into the guarded state.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use balanza_shared::types::{EntryId, ExceptionId, PostingId, SubLedgerTransactionId};

use crate::ledger::{
    Account, AccountType, CreateEntryInput, Direction, GeneralLedger, JournalEntry, LedgerError,
    Posting, TrialBalance,
};
use crate::reconciliation::{
    run_integrity_checks, Exception, ExceptionKind, ExceptionLog, ExceptionSeverity,
    ReconciliationError,
};
use crate::subledger::{
    AgingReport, ApprovalPolicy, CreateTransactionInput, ReconciliationInfo, SubLedgerAccount,
    SubLedgerBalance, SubLedgerBook, SubLedgerError, SubLedgerKind, SubLedgerTransaction,
};


/// Everything the engine guards.
#[derive(Debug, Default)]
struct LedgerState {
    general: GeneralLedger,
    book: SubLedgerBook,
    exceptions: ExceptionLog,
}

/// Thread-safe double-entry ledger with sub-ledger reconciliation.
///
/// Share it as `Arc<LedgerEngine>`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct LedgerEngine {
    inner: RwLock<LedgerState>,
}

impl LedgerEngine {
    /// Creates an engine with empty books.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::Poisoned)
    }

    /// One-sided control account posting for a sub-ledger transaction.
    ///
    /// Sub-ledger activity hits the control account directly, without a
    /// journal entry. The detail and control sides always move together
    /// under the same write guard.
    fn control_posting(tx: &SubLedgerTransaction) -> Posting {
        let direction = if tx.amount >= Decimal::ZERO {
            Direction::Debit
        } else {
            Direction::Credit
        };
        Posting {
            id: PostingId::new(),
            account_code: tx.gl_account.clone(),
            amount: tx.amount.abs(),
            direction,
            applied_at: Utc::now(),
            subledger_account: Some(tx.subledger_account.clone()),
        }
    }

    // ==================== General ledger ====================

    /// Adds an account to the chart.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the code is taken.
    pub fn create_gl_account(
        &self,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> Result<Account, LedgerError> {
        let mut state = self.write()?;
        let account = state.general.create_account(code, name, account_type)?.clone();
        info!(code = %account.code, account_type = ?account.account_type, "GL account created");
        Ok(account)
    }

    /// Looks up a chart account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub fn gl_account(&self, code: &str) -> Result<Account, LedgerError> {
        Ok(self.read()?.general.get_account(code)?.clone())
    }

    /// All chart accounts in code order.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn gl_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self
            .read()?
            .general
            .list_accounts()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Chart accounts of one type, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn gl_accounts_by_type(
        &self,
        account_type: AccountType,
    ) -> Result<Vec<Account>, LedgerError> {
        Ok(self
            .read()?
            .general
            .accounts_by_type(account_type)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Snapshot trial balance over the whole chart.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn trial_balance(&self) -> Result<TrialBalance, LedgerError> {
        Ok(self.read()?.general.trial_balance())
    }

    /// Drafts a journal entry after shape and balance validation.
    ///
    /// # Errors
    ///
    /// Returns the validation error that rejected the postings.
    pub fn create_entry(&self, input: CreateEntryInput) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write()?;
        let entry = state.general.create_entry(input)?.clone();
        info!(entry_id = %entry.id, postings = entry.postings.len(), "Journal entry drafted");
        Ok(entry)
    }

    /// Looks up a journal entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for unknown ids.
    pub fn entry(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        Ok(self.read()?.general.get_entry(id)?.clone())
    }

    /// The full journal in creation order.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn journal(&self) -> Result<Vec<JournalEntry>, LedgerError> {
        Ok(self.read()?.general.journal().into_iter().cloned().collect())
    }

    /// Posts a draft entry to the chart.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPosted`, `AlreadyReversed`, `UnbalancedEntry`, or
    /// `AccountNotFound`; a failed post applies nothing.
    pub fn post_entry(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write()?;
        let entry = state.general.post_entry(id)?.clone();
        info!(entry_id = %entry.id, "Journal entry posted");
        Ok(entry)
    }

    /// Reverses a posted entry with a new sign-swapped entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotPosted`, or `AlreadyReversed`.
    pub fn reverse_entry(
        &self,
        id: EntryId,
        date: NaiveDate,
        reason: &str,
    ) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write()?;
        let reversal = state.general.reverse_entry(id, date, reason)?.clone();
        info!(entry_id = %id, reversal_id = %reversal.id, "Journal entry reversed");
        Ok(reversal)
    }

    // ==================== Sub-ledger ====================

    /// Opens a detail account under an existing control account.
    ///
    /// # Errors
    ///
    /// Returns `GlAccountNotFound` if the control account is not in the
    /// chart, or `DuplicateSubLedgerAccount` if the code is taken.
    pub fn create_subledger_account(
        &self,
        code: &str,
        name: &str,
        gl_account: &str,
        kind: SubLedgerKind,
    ) -> Result<SubLedgerAccount, SubLedgerError> {
        let mut state = self.write()?;
        if !state.general.chart().contains(gl_account) {
            return Err(SubLedgerError::GlAccountNotFound(gl_account.to_string()));
        }

        let account = state.book.create_account(code, name, gl_account, kind)?.clone();
        info!(
            code = %account.code,
            gl_account = %account.gl_account,
            kind = ?account.kind,
            "Sub-ledger account created"
        );
        Ok(account)
    }

    /// Looks up a detail account.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes.
    pub fn subledger_account(&self, code: &str) -> Result<SubLedgerAccount, SubLedgerError> {
        Ok(self.read()?.book.account(code)?.clone())
    }

    /// All detail accounts in code order.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn subledger_accounts(&self) -> Result<Vec<SubLedgerAccount>, SubLedgerError> {
        Ok(self.read()?.book.accounts().into_iter().cloned().collect())
    }

    /// Detail accounts rolling up to one control account.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn subledger_accounts_for_gl(
        &self,
        gl_account: &str,
    ) -> Result<Vec<SubLedgerAccount>, SubLedgerError> {
        Ok(self
            .read()?
            .book
            .accounts_for_gl(gl_account)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Deactivates a zero-balance detail account.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` or `BalanceNotZero`.
    pub fn deactivate_subledger_account(
        &self,
        code: &str,
    ) -> Result<SubLedgerAccount, SubLedgerError> {
        let mut state = self.write()?;
        let account = state.book.deactivate_account(code)?.clone();
        info!(code = %account.code, "Sub-ledger account deactivated");
        Ok(account)
    }

    /// Registers (or replaces) an approval threshold for a control account.
    ///
    /// Policies may be loaded before the chart is seeded; one naming an
    /// absent control account simply never fires.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn register_approval_policy(&self, policy: ApprovalPolicy) -> Result<(), SubLedgerError> {
        let mut state = self.write()?;
        info!(
            gl_account = %policy.gl_account,
            min_amount = %policy.min_amount,
            "Approval policy registered"
        );
        state.book.register_approval_policy(policy);
        Ok(())
    }

    /// The approval threshold guarding a control account, if any.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn approval_threshold(&self, gl_account: &str) -> Result<Option<Decimal>, SubLedgerError> {
        Ok(self.read()?.book.approval_threshold(gl_account))
    }

    /// Records a detail transaction and posts its control side.
    ///
    /// The detail book mutates first, then the synthesized posting hits
    /// the control account, then the posting id is linked back, all under
    /// one write guard. Inputs that already carry an external posting id
    /// skip the synthesis; their control side was posted elsewhere.
    ///
    /// # Errors
    ///
    /// Returns the book's validation errors, or `GlAccountNotFound` if
    /// the control account has left the chart.
    pub fn create_subledger_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<SubLedgerTransaction, SubLedgerError> {
        let mut state = self.write()?;

        let gl_account = state.book.account(&input.subledger_account)?.gl_account.clone();
        if !state.general.chart().contains(&gl_account) {
            return Err(SubLedgerError::GlAccountNotFound(gl_account));
        }

        let tx = state.book.create_transaction(input)?;
        if tx.posting_id.is_some() {
            info!(
                transaction_id = %tx.id,
                subledger_account = %tx.subledger_account,
                gl_account = %tx.gl_account,
                amount = %tx.amount,
                "Sub-ledger transaction recorded against an external posting"
            );
            return Ok(tx);
        }

        let posting = Self::control_posting(&tx);
        let posting_id = posting.id;
        let control_balance = state.general.chart_mut().apply_posting(posting)?;
        let linked = state.book.link_posting(tx.id, posting_id)?;

        info!(
            transaction_id = %linked.id,
            subledger_account = %linked.subledger_account,
            gl_account = %linked.gl_account,
            amount = %linked.amount,
            control_balance = %control_balance,
            "Sub-ledger transaction recorded"
        );
        Ok(linked)
    }

    /// Reverses a detail transaction and posts the offsetting control side.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `AlreadyReversed`, or
    /// `GlAccountNotFound` if the control account has left the chart.
    pub fn reverse_subledger_transaction(
        &self,
        id: SubLedgerTransactionId,
        reason: &str,
        reversed_by: &str,
    ) -> Result<SubLedgerTransaction, SubLedgerError> {
        let mut state = self.write()?;

        let gl_account = state.book.transaction(id)?.gl_account.clone();
        if !state.general.chart().contains(&gl_account) {
            return Err(SubLedgerError::GlAccountNotFound(gl_account));
        }

        let reversal = state.book.reverse_transaction(id, reason, reversed_by)?;
        let posting = Self::control_posting(&reversal);
        let posting_id = posting.id;
        let control_balance = state.general.chart_mut().apply_posting(posting)?;
        let linked = state.book.link_posting(reversal.id, posting_id)?;

        info!(
            transaction_id = %id,
            reversal_id = %linked.id,
            control_balance = %control_balance,
            "Sub-ledger transaction reversed"
        );
        Ok(linked)
    }

    /// Looks up a detail transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for unknown ids.
    pub fn subledger_transaction(
        &self,
        id: SubLedgerTransactionId,
    ) -> Result<SubLedgerTransaction, SubLedgerError> {
        Ok(self.read()?.book.transaction(id)?.clone())
    }

    /// A detail account's transactions in creation order.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes.
    pub fn subledger_transactions(
        &self,
        code: &str,
    ) -> Result<Vec<SubLedgerTransaction>, SubLedgerError> {
        Ok(self
            .read()?
            .book
            .transactions_for_account(code)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// The balance record for a (control, detail) pair.
    ///
    /// # Errors
    ///
    /// Returns `BalanceNotFound` for unknown pairs.
    pub fn subledger_balance(
        &self,
        gl_account: &str,
        subledger_account: &str,
    ) -> Result<SubLedgerBalance, SubLedgerError> {
        Ok(self.read()?.book.balance(gl_account, subledger_account)?.clone())
    }

    /// Applies a reconciliation attempt to a (control, detail) pair.
    ///
    /// # Errors
    ///
    /// Returns `BalanceNotFound` for unknown pairs.
    pub fn reconcile_subledger_account(
        &self,
        gl_account: &str,
        subledger_account: &str,
        info: &ReconciliationInfo,
    ) -> Result<SubLedgerBalance, SubLedgerError> {
        let mut state = self.write()?;
        let balance = state.book.reconcile(gl_account, subledger_account, info)?;
        info!(
            gl_account = %gl_account,
            subledger_account = %subledger_account,
            status = ?info.status,
            "Reconciliation attempt recorded"
        );
        Ok(balance)
    }

    /// Builds an aging report for one detail account.
    ///
    /// # Errors
    ///
    /// Returns `SubLedgerAccountNotFound` for unknown codes.
    pub fn aging_report(
        &self,
        code: &str,
        as_of: NaiveDate,
    ) -> Result<AgingReport, SubLedgerError> {
        self.read()?.book.aging(code, as_of)
    }

    // ==================== Reconciliation ====================

    /// Sweeps both books and files an exception for every break.
    ///
    /// Returns the newly created exceptions; a clean pass returns an
    /// empty vec.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn validate_integrity(&self) -> Result<Vec<Exception>, ReconciliationError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| ReconciliationError::Poisoned)?;
        let LedgerState {
            general,
            book,
            exceptions,
        } = &mut *state;

        let found = run_integrity_checks(general.chart(), book, exceptions);
        if found.is_empty() {
            debug!("Integrity checks passed");
        } else {
            warn!(findings = found.len(), "Integrity checks raised exceptions");
        }
        Ok(found)
    }

    /// Files an exception by hand, outside the automated sweeps.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn create_exception(
        &self,
        kind: ExceptionKind,
        severity: ExceptionSeverity,
        account: &str,
        description: &str,
        amount: Option<Decimal>,
    ) -> Result<Exception, ReconciliationError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| ReconciliationError::Poisoned)?;
        let exception = state
            .exceptions
            .create_exception(kind, severity, account, description, amount)
            .clone();
        warn!(
            exception_id = %exception.id,
            kind = ?exception.kind,
            severity = ?exception.severity,
            account = %exception.account,
            "Exception filed"
        );
        Ok(exception)
    }

    /// Closes an open exception with a resolution note.
    ///
    /// # Errors
    ///
    /// Returns `ExceptionNotFound` or `AlreadyResolved`.
    pub fn resolve_exception(
        &self,
        id: ExceptionId,
        text: &str,
        resolved_by: &str,
    ) -> Result<Exception, ReconciliationError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| ReconciliationError::Poisoned)?;
        let exception = state.exceptions.resolve_exception(id, text, resolved_by)?.clone();
        info!(exception_id = %id, resolved_by = %resolved_by, "Exception resolved");
        Ok(exception)
    }

    /// Exceptions in detection order, optionally filtered to one account.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn exceptions(&self, account: Option<&str>) -> Result<Vec<Exception>, ReconciliationError> {
        let state = self
            .inner
            .read()
            .map_err(|_| ReconciliationError::Poisoned)?;
        let list = match account {
            Some(account) => state.exceptions.exceptions_for_account(account),
            None => state.exceptions.exceptions(),
        };
        Ok(list.into_iter().cloned().collect())
    }

    /// Exceptions still awaiting resolution.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a writer panicked while holding the lock.
    pub fn open_exceptions(&self) -> Result<Vec<Exception>, ReconciliationError> {
        let state = self
            .inner
            .read()
            .map_err(|_| ReconciliationError::Poisoned)?;
        Ok(state
            .exceptions
            .open_exceptions()
            .into_iter()
            .cloned()
            .collect())
    }
}
