//! Aging analysis for outstanding sub-ledger activity.
//!
//! Buckets non-reversed transactions by how many days old they are
//! relative to a reference date. Reversal pairs cancel out and are left
//! out entirely, so the buckets describe genuinely outstanding activity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::SubLedgerTransaction;

/// Age bucket boundaries, inclusive at 30, 60, and 90 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet aged: dated on, or in the future of, the reference date.
    Current,
    /// 1 through 30 days old.
    Days1To30,
    /// 31 through 60 days old.
    Days31To60,
    /// 61 through 90 days old.
    Days61To90,
    /// Strictly more than 90 days old.
    Over90,
}

impl AgingBucket {
    /// Buckets an age in days. Non-positive ages are `Current`.
    #[must_use]
    pub fn for_age(days: i64) -> Self {
        match days {
            d if d <= 0 => Self::Current,
            d if d <= 30 => Self::Days1To30,
            d if d <= 60 => Self::Days31To60,
            d if d <= 90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    /// Display label for reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Days1To30 => "1-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Over90 => "90+",
        }
    }
}

/// Aggregates for one age bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingSlice {
    /// Signed sum of bucketed amounts.
    pub total: Decimal,
    /// Number of bucketed transactions.
    pub count: usize,
    /// Business date of the oldest bucketed transaction.
    pub oldest: Option<NaiveDate>,
}

impl AgingSlice {
    fn absorb(&mut self, tx: &SubLedgerTransaction) {
        self.total += tx.amount;
        self.count += 1;
        self.oldest = match self.oldest {
            Some(existing) if existing <= tx.date => Some(existing),
            _ => Some(tx.date),
        };
    }
}

/// Aging breakdown for one detail account as of a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingReport {
    /// The detail account analyzed.
    pub subledger_account: String,
    /// Reference date ages were measured against.
    pub as_of: NaiveDate,
    /// Not yet aged.
    pub current: AgingSlice,
    /// 1 through 30 days old.
    pub days_1_to_30: AgingSlice,
    /// 31 through 60 days old.
    pub days_31_to_60: AgingSlice,
    /// 61 through 90 days old.
    pub days_61_to_90: AgingSlice,
    /// More than 90 days old.
    pub over_90: AgingSlice,
    /// Signed sum across all buckets.
    pub total_outstanding: Decimal,
    /// Count across all buckets.
    pub transaction_count: usize,
}

impl AgingReport {
    /// An empty report for an account with no outstanding activity.
    #[must_use]
    pub fn empty(subledger_account: impl Into<String>, as_of: NaiveDate) -> Self {
        Self {
            subledger_account: subledger_account.into(),
            as_of,
            current: AgingSlice::default(),
            days_1_to_30: AgingSlice::default(),
            days_31_to_60: AgingSlice::default(),
            days_61_to_90: AgingSlice::default(),
            over_90: AgingSlice::default(),
            total_outstanding: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    /// The slice for one bucket.
    #[must_use]
    pub fn slice(&self, bucket: AgingBucket) -> &AgingSlice {
        match bucket {
            AgingBucket::Current => &self.current,
            AgingBucket::Days1To30 => &self.days_1_to_30,
            AgingBucket::Days31To60 => &self.days_31_to_60,
            AgingBucket::Days61To90 => &self.days_61_to_90,
            AgingBucket::Over90 => &self.over_90,
        }
    }

    fn slice_mut(&mut self, bucket: AgingBucket) -> &mut AgingSlice {
        match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days1To30 => &mut self.days_1_to_30,
            AgingBucket::Days31To60 => &mut self.days_31_to_60,
            AgingBucket::Days61To90 => &mut self.days_61_to_90,
            AgingBucket::Over90 => &mut self.over_90,
        }
    }
}

/// Builds an aging report over a detail account's transaction history.
///
/// Pure function of its inputs: reversed transactions are skipped, every
/// other transaction lands in exactly one bucket, and the report totals
/// equal the sums across buckets.
#[must_use]
pub fn generate_aging<'a, I>(
    subledger_account: &str,
    as_of: NaiveDate,
    transactions: I,
) -> AgingReport
where
    I: IntoIterator<Item = &'a SubLedgerTransaction>,
{
    let mut report = AgingReport::empty(subledger_account, as_of);

    for tx in transactions {
        if tx.is_reversed {
            continue;
        }
        let age_days = (as_of - tx.date).num_days();
        report.slice_mut(AgingBucket::for_age(age_days)).absorb(tx);
        report.total_outstanding += tx.amount;
        report.transaction_count += 1;
    }

    report
}
