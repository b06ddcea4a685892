//! Property-based tests for the sub-ledger book.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::ledger::Direction;
use crate::subledger::balance::recomputed_balance;
use crate::subledger::error::SubLedgerError;
use crate::subledger::service::SubLedgerBook;
use crate::subledger::types::{
    ApprovalPolicy, CreateTransactionInput, SubLedgerKind, TransactionKind,
};

/// Strategy for positive amounts in cents (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy over every transaction kind.
fn any_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Invoice),
        Just(TransactionKind::Payment),
        Just(TransactionKind::CreditMemo),
        Just(TransactionKind::DebitMemo),
        Just(TransactionKind::Adjustment),
        Just(TransactionKind::Refund),
        Just(TransactionKind::Interest),
        Just(TransactionKind::Fee),
        Just(TransactionKind::Penalty),
        Just(TransactionKind::Reversal),
    ]
}

/// Strategy over kinds that always post to the debit side.
fn debit_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Invoice),
        Just(TransactionKind::DebitMemo),
        Just(TransactionKind::Interest),
        Just(TransactionKind::Fee),
        Just(TransactionKind::Penalty),
    ]
}

/// Strategy over kinds that always post to the credit side.
fn credit_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Payment),
        Just(TransactionKind::CreditMemo),
        Just(TransactionKind::Refund),
    ]
}

fn fresh_book() -> SubLedgerBook {
    let mut book = SubLedgerBook::new();
    book.create_account("CUST-0001", "Acme Corp", "120000", SubLedgerKind::Customer)
        .unwrap();
    book
}

fn make_input(kind: TransactionKind, amount: Decimal) -> CreateTransactionInput {
    CreateTransactionInput {
        subledger_account: "CUST-0001".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        amount,
        kind,
        description: "Generated transaction".to_string(),
        created_by: "prop".to_string(),
        approved_by: None,
        posting_id: None,
    }
}

fn signed_for(kind: TransactionKind, amount: Decimal) -> Decimal {
    match kind.direction_for(amount) {
        Direction::Debit => amount.abs(),
        Direction::Credit => -amount.abs(),
    }
}

// ===== Property 5: Sub-Ledger Bookkeeping =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 5.1: balance equals the signed transaction sum
    ///
    /// *For any* sequence of transactions, the live balance SHALL equal
    /// the sum of the stored signed amounts, and the detail account SHALL
    /// mirror it.
    #[test]
    fn prop_balance_is_signed_sum(
        entries in prop::collection::vec((any_kind(), positive_amount()), 1..20)
    ) {
        let mut book = fresh_book();
        let mut expected = Decimal::ZERO;

        for (kind, amount) in entries {
            let tx = book.create_transaction(make_input(kind, amount)).unwrap();
            expected += tx.amount;
        }

        let balance = book.balance("120000", "CUST-0001").unwrap();
        prop_assert_eq!(
            balance.current_balance, expected,
            "stored balance diverged from the signed sum"
        );
        prop_assert_eq!(book.account("CUST-0001").unwrap().balance, expected);
    }

    /// Property 5.2: directional kinds fix the stored sign
    ///
    /// *For any* positive amount, debit-side kinds SHALL store it
    /// positive and credit-side kinds SHALL store it negative.
    #[test]
    fn prop_direction_fixes_sign(
        kind_d in debit_kind(),
        kind_c in credit_kind(),
        amount in positive_amount(),
    ) {
        let mut book = fresh_book();

        let debit = book.create_transaction(make_input(kind_d, amount)).unwrap();
        prop_assert_eq!(debit.amount, amount, "debit-side kind must store positive");

        let credit = book.create_transaction(make_input(kind_c, amount)).unwrap();
        prop_assert_eq!(credit.amount, -amount, "credit-side kind must store negative");

        // Feeding a negated amount changes nothing for directional kinds.
        let debit_neg = book.create_transaction(make_input(kind_d, -amount)).unwrap();
        prop_assert_eq!(debit_neg.amount, amount);
    }

    /// Property 5.3: reversal restores the balance and flags the pair
    ///
    /// *For any* transaction, reversing it SHALL return the balance to
    /// its prior value, mark both members reversed, and keep the
    /// non-reversed recomputation equal to the stored balance.
    #[test]
    fn prop_reversal_restores(
        kind in any_kind(),
        amount in positive_amount(),
        keep in prop::collection::vec((any_kind(), positive_amount()), 0..5),
    ) {
        let mut book = fresh_book();
        let mut surviving = Decimal::ZERO;
        for (k, a) in keep {
            surviving += book.create_transaction(make_input(k, a)).unwrap().amount;
        }

        let target = book.create_transaction(make_input(kind, amount)).unwrap();
        let reversal = book
            .reverse_transaction(target.id, "Generated reversal", "prop")
            .unwrap();

        prop_assert_eq!(reversal.amount, -target.amount);
        prop_assert!(reversal.is_reversed);
        prop_assert!(book.transaction(target.id).unwrap().is_reversed);

        let balance = book.balance("120000", "CUST-0001").unwrap();
        prop_assert_eq!(
            balance.current_balance, surviving,
            "reversal must restore the pre-transaction balance"
        );

        let history = book.transactions_for_account("CUST-0001").unwrap();
        prop_assert_eq!(
            recomputed_balance(history.into_iter()),
            balance.current_balance,
            "non-reversed history must recompute to the stored balance"
        );
    }

    /// Property 5.4: period accumulators stay consistent
    ///
    /// *For any* sequence of transactions, period_net SHALL equal
    /// period_debits - period_credits and the balance identity SHALL hold.
    #[test]
    fn prop_period_identity(
        entries in prop::collection::vec((any_kind(), positive_amount()), 1..20)
    ) {
        let mut book = fresh_book();
        for (kind, amount) in entries {
            book.create_transaction(make_input(kind, amount)).unwrap();

            let balance = book.balance("120000", "CUST-0001").unwrap();
            prop_assert_eq!(
                balance.period_net,
                balance.period_debits - balance.period_credits
            );
            prop_assert_eq!(
                balance.current_balance,
                balance.beginning_balance + balance.period_net
            );
        }
    }

    /// Property 5.5: the approval gate is airtight
    ///
    /// *For any* amount at or above the threshold, an unapproved
    /// transaction SHALL be rejected without side effects, and the same
    /// amount with an approver SHALL succeed.
    #[test]
    fn prop_approval_gate(
        kind in any_kind(),
        above in (0i64..=100_000).prop_map(|cents| dec!(500) + Decimal::new(cents, 2)),
    ) {
        let mut book = fresh_book();
        book.register_approval_policy(ApprovalPolicy {
            gl_account: "120000".to_string(),
            min_amount: dec!(500),
        });

        let rejected = book.create_transaction(make_input(kind, above));
        prop_assert!(
            matches!(rejected, Err(SubLedgerError::ApprovalRequired { .. })),
            "unapproved amount at threshold must be rejected, got {:?}",
            rejected
        );
        prop_assert_eq!(
            book.balance("120000", "CUST-0001").unwrap().transaction_count,
            0,
            "rejected transaction must leave no trace"
        );

        let mut approved = make_input(kind, above);
        approved.approved_by = Some("prop-approver".to_string());
        prop_assert!(book.create_transaction(approved).is_ok());

        let expected = signed_for(kind, above);
        prop_assert_eq!(
            book.balance("120000", "CUST-0001").unwrap().current_balance,
            expected
        );
    }
}
