//! In-memory chart of accounts with secondary indexes.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use super::balance::balance_change;
use super::error::LedgerError;
use super::types::{Account, AccountType, Direction, Posting, TrialBalance, TrialBalanceRow};

/// The catalog of GL control accounts.
///
/// Accounts are created once and never deleted; balances and posting
/// histories mutate only through [`ChartOfAccounts::apply_posting`], which
/// the journal engine and the sub-ledger's control-posting synchronization
/// share. Lookups never auto-create accounts.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    /// Accounts by code. Ordered map so listings come out in chart order.
    accounts: BTreeMap<String, Account>,
    /// Secondary index: account type -> codes, in creation order.
    by_type: HashMap<AccountType, Vec<String>>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a GL account with zero balance and empty posting history.
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
        if self.accounts.contains_key(code) {
            return Err(LedgerError::DuplicateAccount(code.to_string()));
        }

        self.by_type
            .entry(account_type)
            .or_default()
            .push(code.to_string());

        let account = self
            .accounts
            .entry(code.to_string())
            .or_insert_with(|| Account::new(code, name, account_type));
        Ok(account)
    }

    /// Looks up an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub fn get(&self, code: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
    }

    /// Returns true if an account with this code exists.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.accounts.contains_key(code)
    }

    /// All accounts in chart code order.
    #[must_use]
    pub fn list(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    /// Accounts of one classification, in creation order.
    #[must_use]
    pub fn by_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.by_type
            .get(&account_type)
            .into_iter()
            .flatten()
            .filter_map(|code| self.accounts.get(code))
            .collect()
    }

    /// Applies one posting leg to its target account.
    ///
    /// This is the single mutation path for account balances: the sign rule
    /// is applied and the posting is appended to the account history.
    /// Returns the account's new balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes; the chart fails closed
    /// and never seeds accounts on demand.
    pub(crate) fn apply_posting(&mut self, posting: Posting) -> Result<Decimal, LedgerError> {
        let account = self
            .accounts
            .get_mut(&posting.account_code)
            .ok_or_else(|| LedgerError::AccountNotFound(posting.account_code.clone()))?;

        account.balance += balance_change(account.account_type, posting.direction, posting.amount);
        account.postings.push(posting);
        Ok(account.balance)
    }

    /// Computes a trial balance over the whole chart.
    ///
    /// Rows are emitted in chart code order; totals compare the applied
    /// debit and credit sums exactly.
    #[must_use]
    pub fn trial_balance(&self) -> TrialBalance {
        let mut rows = Vec::with_capacity(self.accounts.len());
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;

        for account in self.accounts.values() {
            let mut debits = Decimal::ZERO;
            let mut credits = Decimal::ZERO;
            for posting in &account.postings {
                match posting.direction {
                    Direction::Debit => debits += posting.amount,
                    Direction::Credit => credits += posting.amount,
                }
            }
            total_debits += debits;
            total_credits += credits;
            rows.push(TrialBalanceRow {
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type,
                debits,
                credits,
                balance: account.balance,
            });
        }

        TrialBalance {
            rows,
            total_debits,
            total_credits,
            is_balanced: total_debits == total_credits,
        }
    }
}
