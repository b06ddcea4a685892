//! Property-based tests for the integrity checks.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use balanza_shared::types::PostingId;

use crate::ledger::{AccountType, ChartOfAccounts, Direction, Posting};
use crate::reconciliation::checks::run_integrity_checks;
use crate::reconciliation::service::ExceptionLog;
use crate::reconciliation::types::ExceptionKind;
use crate::subledger::{CreateTransactionInput, SubLedgerBook, SubLedgerKind, TransactionKind};

/// Strategy for positive amounts in cents (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy over kinds on both sides of the detail book.
fn any_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Invoice),
        Just(TransactionKind::Payment),
        Just(TransactionKind::CreditMemo),
        Just(TransactionKind::Fee),
    ]
}

fn mirror_posting(signed: Decimal) -> Posting {
    let direction = if signed >= Decimal::ZERO {
        Direction::Debit
    } else {
        Direction::Credit
    };
    Posting {
        id: PostingId::new(),
        account_code: "120000".to_string(),
        amount: signed.abs(),
        direction,
        applied_at: Utc::now(),
        subledger_account: Some("CUST-0001".to_string()),
    }
}

/// Builds a chart and book where every detail transaction is mirrored
/// onto the control account.
fn mirrored_books(entries: &[(TransactionKind, Decimal)]) -> (ChartOfAccounts, SubLedgerBook) {
    let mut chart = ChartOfAccounts::new();
    chart
        .create_account("120000", "Accounts Receivable", AccountType::Asset)
        .unwrap();

    let mut book = SubLedgerBook::new();
    book.create_account("CUST-0001", "Acme Corp", "120000", SubLedgerKind::Customer)
        .unwrap();

    for (kind, amount) in entries {
        let tx = book
            .create_transaction(CreateTransactionInput {
                subledger_account: "CUST-0001".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                amount: *amount,
                kind: *kind,
                description: "Generated transaction".to_string(),
                created_by: "prop".to_string(),
                approved_by: None,
                posting_id: None,
            })
            .unwrap();
        chart.apply_posting(mirror_posting(tx.amount)).unwrap();
    }

    (chart, book)
}

// ===== Property 7: Integrity Checks =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 7.1: mirrored books never raise findings
    ///
    /// *For any* activity posted identically to both sides, the integrity
    /// sweep SHALL find nothing.
    #[test]
    fn prop_mirrored_books_are_clean(
        entries in prop::collection::vec((any_kind(), positive_amount()), 0..15)
    ) {
        let (chart, book) = mirrored_books(&entries);
        let mut log = ExceptionLog::new();

        let found = run_integrity_checks(&chart, &book, &mut log);
        prop_assert!(found.is_empty(), "clean books raised {:?}", found);
        prop_assert!(log.exceptions().is_empty());
    }

    /// Property 7.2: a control-side perturbation raises exactly one finding
    ///
    /// *For any* mirrored history and any drift of at least one cent
    /// applied only to the control account, the sweep SHALL raise exactly
    /// one reconciliation failure carrying the drift.
    #[test]
    fn prop_perturbation_is_caught(
        entries in prop::collection::vec((any_kind(), positive_amount()), 0..15),
        drift_cents in prop_oneof![-1_000_000i64..=-1, 1i64..=1_000_000],
    ) {
        let (mut chart, book) = mirrored_books(&entries);
        let drift = Decimal::new(drift_cents, 2);
        chart.apply_posting(mirror_posting(drift)).unwrap();

        let mut log = ExceptionLog::new();
        let found = run_integrity_checks(&chart, &book, &mut log);

        prop_assert_eq!(found.len(), 1, "expected exactly one finding");
        prop_assert_eq!(found[0].kind, ExceptionKind::ReconciliationFailure);
        prop_assert_eq!(found[0].account.as_str(), "120000");
        prop_assert_eq!(found[0].amount, Some(drift));
    }
}
