//! Business rule validation for journal entries.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{Direction, EntryTotals, PostingInput};

/// Validates a posting set before an entry is created.
///
/// Checks, in order:
/// 1. At least 2 postings
/// 2. Every amount positive and non-zero
/// 3. Both a debit and a credit side present
/// 4. Debit and credit totals within the balance tolerance
///
/// Returns the computed totals so callers do not sum twice.
///
/// # Errors
///
/// Returns a `LedgerError` naming the first violated rule.
pub fn validate_postings(postings: &[PostingInput]) -> Result<EntryTotals, LedgerError> {
    if postings.len() < 2 {
        return Err(LedgerError::InsufficientPostings);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for posting in postings {
        if posting.amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if posting.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match posting.direction {
            Direction::Debit => {
                debits += posting.amount;
                has_debit = true;
            }
            Direction::Credit => {
                credits += posting.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    let totals = EntryTotals::new(debits, credits);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry { debits, credits });
    }

    Ok(totals)
}
