//! Sub-ledger balance records.
//!
//! One record exists per (control account, detail account) pair and is the
//! sole owner of current truth; `SubLedgerAccount::balance` mirrors it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::SubLedgerTransaction;

/// Running balance for one (control account, detail account) pair.
///
/// `beginning_balance` is the balance carried into the open period and
/// stays fixed until a period close rolls it forward; the period
/// accumulators track activity since then, so
/// `current_balance == beginning_balance + period_net` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubLedgerBalance {
    /// Live balance including all applied activity.
    pub current_balance: Decimal,
    /// Balance at the start of the open period.
    pub beginning_balance: Decimal,
    /// Sum of debit-side (positive) amounts this period.
    pub period_debits: Decimal,
    /// Sum of credit-side magnitudes this period.
    pub period_credits: Decimal,
    /// `period_debits - period_credits`.
    pub period_net: Decimal,
    /// Number of transactions applied.
    pub transaction_count: u64,
    /// Cleared whenever new activity arrives.
    pub is_reconciled: bool,
    /// Last reconciliation attempt, matched or not.
    pub reconciled_at: Option<DateTime<Utc>>,
}

impl SubLedgerBalance {
    /// A zeroed record for a freshly created detail account.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_balance: Decimal::ZERO,
            beginning_balance: Decimal::ZERO,
            period_debits: Decimal::ZERO,
            period_credits: Decimal::ZERO,
            period_net: Decimal::ZERO,
            transaction_count: 0,
            is_reconciled: false,
            reconciled_at: None,
        }
    }

    /// Applies one signed transaction amount.
    ///
    /// Positive amounts accumulate as period debits, negative ones as
    /// period credits. New activity always invalidates a prior match.
    pub fn apply(&mut self, amount: Decimal) {
        self.current_balance += amount;
        if amount >= Decimal::ZERO {
            self.period_debits += amount;
        } else {
            self.period_credits += -amount;
        }
        self.period_net = self.period_debits - self.period_credits;
        self.transaction_count += 1;
        self.is_reconciled = false;
        self.reconciled_at = None;
    }

    /// Records a successful match.
    pub fn mark_reconciled(&mut self, at: DateTime<Utc>) {
        self.is_reconciled = true;
        self.reconciled_at = Some(at);
    }

    /// Records a failed attempt without setting the flag.
    pub fn record_attempt(&mut self, at: DateTime<Utc>) {
        self.reconciled_at = Some(at);
    }
}

impl Default for SubLedgerBalance {
    fn default() -> Self {
        Self::new()
    }
}

/// Recomputes a detail account's balance from non-reversed history.
///
/// Reversal pairs are flagged on both sides, so excluding `is_reversed`
/// transactions reproduces the live balance exactly.
#[must_use]
pub fn recomputed_balance<'a, I>(transactions: I) -> Decimal
where
    I: IntoIterator<Item = &'a SubLedgerTransaction>,
{
    transactions
        .into_iter()
        .filter(|tx| !tx.is_reversed)
        .map(|tx| tx.amount)
        .sum()
}
