//! Sign conventions and balance arithmetic for GL accounts.

use rust_decimal::Decimal;

use super::types::{AccountType, Direction};

/// Tolerance inside which a posting set counts as balanced.
///
/// Debits and credits may differ by strictly less than a tenth of a cent.
/// Arithmetic itself is exact decimal, so the tolerance only absorbs
/// sub-cent differences in caller-supplied amounts, never rounding drift.
#[must_use]
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 3)
}

/// Returns true when `difference` lies strictly inside the balance tolerance.
#[must_use]
pub fn within_tolerance(difference: Decimal) -> bool {
    difference.abs() < balance_tolerance()
}

/// Calculates the signed balance change a posting applies to an account.
///
/// - Asset/Expense (debit-normal): balance += debit - credit
/// - Liability/Equity/Revenue (credit-normal): balance += credit - debit
#[must_use]
pub fn balance_change(account_type: AccountType, direction: Direction, amount: Decimal) -> Decimal {
    let (debit, credit) = match direction {
        Direction::Debit => (amount, Decimal::ZERO),
        Direction::Credit => (Decimal::ZERO, amount),
    };

    if account_type.is_debit_normal() {
        debit - credit
    } else {
        credit - debit
    }
}
