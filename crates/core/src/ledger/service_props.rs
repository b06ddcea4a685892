//! Property-based tests for journal posting and reversal semantics.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::service::GeneralLedger;
use super::types::{AccountType, CreateEntryInput, Direction, EntryStatus, PostingInput};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a debit-normal account type.
fn debit_normal_type() -> impl Strategy<Value = AccountType> {
    prop_oneof![Just(AccountType::Asset), Just(AccountType::Expense)]
}

/// Strategy to generate a credit-normal account type.
fn credit_normal_type() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Revenue),
    ]
}

/// Helper to build a ledger with one debit-normal and one credit-normal account.
fn ledger_with_pair(debit_type: AccountType, credit_type: AccountType) -> GeneralLedger {
    let mut ledger = GeneralLedger::new();
    ledger
        .create_account("100000", "Debit Normal", debit_type)
        .unwrap();
    ledger
        .create_account("200000", "Credit Normal", credit_type)
        .unwrap();
    ledger
}

/// Helper to build a two-leg entry debiting `100000` and crediting `200000`.
fn pair_entry(amount: Decimal) -> CreateEntryInput {
    CreateEntryInput {
        date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        description: "Generated entry".to_string(),
        reference: None,
        postings: vec![
            PostingInput::new("100000", amount, Direction::Debit),
            PostingInput::new("200000", amount, Direction::Credit),
        ],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 3: Posting and Reversal Semantics
    // =========================================================================

    /// Property 3.1: Posting applies the normal-balance sign rule.
    ///
    /// *For any* positive amount and any pairing of a debit-normal with a
    /// credit-normal account, posting a balanced entry SHALL increase both
    /// balances by the amount.
    #[test]
    fn prop_posting_applies_sign_rule(
        amount in positive_amount(),
        debit_type in debit_normal_type(),
        credit_type in credit_normal_type(),
    ) {
        let mut ledger = ledger_with_pair(debit_type, credit_type);
        let id = ledger.create_entry(pair_entry(amount)).unwrap().id;
        ledger.post_entry(id).unwrap();

        prop_assert_eq!(ledger.get_account("100000").unwrap().balance, amount);
        prop_assert_eq!(ledger.get_account("200000").unwrap().balance, amount);
        prop_assert!(ledger.trial_balance().is_balanced);
    }

    /// Property 3.2: Posting is one-way.
    ///
    /// *For any* posted entry, a second post SHALL fail with `AlreadyPosted`
    /// and SHALL NOT change any balance.
    #[test]
    fn prop_repost_fails_without_side_effects(
        amount in positive_amount(),
    ) {
        let mut ledger = ledger_with_pair(AccountType::Asset, AccountType::Revenue);
        let id = ledger.create_entry(pair_entry(amount)).unwrap().id;
        ledger.post_entry(id).unwrap();

        let result = ledger.post_entry(id);
        prop_assert!(matches!(result, Err(LedgerError::AlreadyPosted(_))));
        prop_assert_eq!(ledger.get_account("100000").unwrap().balance, amount);
        prop_assert_eq!(ledger.get_account("200000").unwrap().balance, amount);
    }

    /// Property 3.3: A failed post leaves no trace.
    ///
    /// *For any* entry with one leg against a missing account, posting SHALL
    /// fail and every existing account SHALL keep its balance and history.
    #[test]
    fn prop_failed_post_leaves_no_trace(
        amount in positive_amount(),
    ) {
        let mut ledger = ledger_with_pair(AccountType::Asset, AccountType::Revenue);
        let input = CreateEntryInput {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            description: "Entry against missing account".to_string(),
            reference: None,
            postings: vec![
                PostingInput::new("100000", amount, Direction::Debit),
                PostingInput::new("999999", amount, Direction::Credit),
            ],
        };
        let id = ledger.create_entry(input).unwrap().id;

        let result = ledger.post_entry(id);
        prop_assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));

        let untouched = ledger.get_account("100000").unwrap();
        prop_assert_eq!(untouched.balance, Decimal::ZERO);
        prop_assert!(untouched.postings.is_empty());
        prop_assert_eq!(ledger.get_entry(id).unwrap().status, EntryStatus::Draft);
    }

    /// Property 3.4: Reversal restores prior balances.
    ///
    /// *For any* posted entry, reversing it SHALL return every touched
    /// account to its balance before the post, while both entries stay in
    /// the journal and the trial balance stays balanced.
    #[test]
    fn prop_reversal_restores_balances(
        amount in positive_amount(),
        debit_type in debit_normal_type(),
        credit_type in credit_normal_type(),
    ) {
        let mut ledger = ledger_with_pair(debit_type, credit_type);
        let id = ledger.create_entry(pair_entry(amount)).unwrap().id;
        ledger.post_entry(id).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        ledger.reverse_entry(id, date, "Generated reversal").unwrap();

        prop_assert_eq!(ledger.get_account("100000").unwrap().balance, Decimal::ZERO);
        prop_assert_eq!(ledger.get_account("200000").unwrap().balance, Decimal::ZERO);
        prop_assert_eq!(ledger.entry_count(), 2);

        let tb = ledger.trial_balance();
        prop_assert!(tb.is_balanced);
        prop_assert_eq!(tb.total_debits, amount + amount);
    }

    /// Property 3.5: The trial balance survives arbitrary posting batches.
    ///
    /// *For any* sequence of balanced entries, posting them all SHALL leave
    /// total debits equal to total credits across the chart.
    #[test]
    fn prop_trial_balance_always_balances(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let mut ledger = ledger_with_pair(AccountType::Asset, AccountType::Revenue);

        let mut expected_total = Decimal::ZERO;
        for amount in amounts {
            let id = ledger.create_entry(pair_entry(amount)).unwrap().id;
            ledger.post_entry(id).unwrap();
            expected_total += amount;
        }

        let tb = ledger.trial_balance();
        prop_assert!(tb.is_balanced);
        prop_assert_eq!(tb.total_debits, expected_total);
        prop_assert_eq!(tb.total_credits, expected_total);
    }

    /// Property 3.6: Unbalanced entries never enter the journal.
    ///
    /// *For any* imbalance of at least 0.01, entry creation SHALL fail and
    /// the journal SHALL stay empty.
    #[test]
    fn prop_unbalanced_entry_never_stored(
        amount in positive_amount(),
        offset_cents in 1i64..100_000i64,
    ) {
        let mut ledger = ledger_with_pair(AccountType::Asset, AccountType::Revenue);
        let input = CreateEntryInput {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            description: "Lopsided entry".to_string(),
            reference: None,
            postings: vec![
                PostingInput::new("100000", amount, Direction::Debit),
                PostingInput::new(
                    "200000",
                    amount + Decimal::new(offset_cents, 2),
                    Direction::Credit,
                ),
            ],
        };

        let result = ledger.create_entry(input);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedEntry { .. })),
            "expected UnbalancedEntry error",
        );
        prop_assert_eq!(ledger.entry_count(), 0);
    }
}
