//! Property-based tests for journal posting validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{Direction, PostingInput};
use super::validation::validate_postings;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Generate amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Strategy to generate a posting direction.
fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Debit), Just(Direction::Credit)]
}

/// Helper to create a posting input for testing.
fn make_posting(direction: Direction, amount: Decimal) -> PostingInput {
    PostingInput::new("101000", amount, direction)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 2: Posting Validation Rules
    // =========================================================================

    /// Property 2.1: Zero amount postings are rejected.
    ///
    /// *For any* posting set containing an amount = 0 leg, validation SHALL
    /// reject it before any balance math runs.
    #[test]
    fn prop_zero_amount_rejected(
        direction in direction_strategy(),
        other_amount in positive_amount(),
    ) {
        let postings = vec![
            make_posting(direction, Decimal::ZERO),
            make_posting(direction.swapped(), other_amount),
        ];

        let result = validate_postings(&postings);
        prop_assert!(
            matches!(result, Err(LedgerError::ZeroAmount)),
            "Zero amount should be rejected, got: {:?}",
            result
        );
    }

    /// Property 2.2: Negative amount postings are rejected.
    ///
    /// *For any* posting set containing an amount < 0 leg, validation SHALL
    /// reject it. Direction carries the sign; amounts are magnitudes.
    #[test]
    fn prop_negative_amount_rejected(
        direction in direction_strategy(),
        neg_amount in negative_amount(),
        other_amount in positive_amount(),
    ) {
        let postings = vec![
            make_posting(direction, neg_amount),
            make_posting(direction.swapped(), other_amount),
        ];

        let result = validate_postings(&postings);
        prop_assert!(
            matches!(result, Err(LedgerError::NegativeAmount)),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// Property 2.3: Fewer than two postings are rejected.
    ///
    /// *For any* posting set with 0 or 1 legs, validation SHALL reject it
    /// because double-entry requires at least one debit and one credit.
    #[test]
    fn prop_insufficient_postings_rejected(
        direction in direction_strategy(),
        amount in positive_amount(),
        include_one in any::<bool>(),
    ) {
        let postings = if include_one {
            vec![make_posting(direction, amount)]
        } else {
            vec![]
        };

        let result = validate_postings(&postings);
        prop_assert!(
            matches!(result, Err(LedgerError::InsufficientPostings)),
            "Short posting set should be rejected, got: {:?}",
            result
        );
    }

    /// Property 2.4: Single-sided posting sets are rejected.
    ///
    /// *For any* posting set where every leg shares one direction, validation
    /// SHALL reject it even when the totals sit inside the balance tolerance.
    #[test]
    fn prop_single_sided_rejected(
        direction in direction_strategy(),
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let postings = vec![
            make_posting(direction, amount1),
            make_posting(direction, amount2),
        ];

        let result = validate_postings(&postings);
        prop_assert!(
            matches!(result, Err(LedgerError::SingleSided)),
            "Single-sided set should be rejected, got: {:?}",
            result
        );
    }

    /// Property 2.5: Balanced posting sets are accepted.
    ///
    /// *For any* pair of opposite legs with the same positive amount,
    /// validation SHALL accept the set and report matching totals.
    #[test]
    fn prop_balanced_pair_accepted(
        amount in positive_amount(),
    ) {
        let postings = vec![
            make_posting(Direction::Debit, amount),
            make_posting(Direction::Credit, amount),
        ];

        let totals = validate_postings(&postings);
        prop_assert!(totals.is_ok(), "Balanced pair should be accepted, got: {:?}", totals);

        let totals = totals.unwrap();
        prop_assert_eq!(totals.debits, amount);
        prop_assert_eq!(totals.credits, amount);
        prop_assert!(totals.is_balanced);
    }

    /// Property 2.6: Multi-leg balanced posting sets are accepted.
    ///
    /// *For any* split of a total across several debit legs matched by one
    /// credit leg, validation SHALL accept the set.
    #[test]
    fn prop_multi_leg_balanced_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let postings = vec![
            make_posting(Direction::Debit, amount1),
            make_posting(Direction::Debit, amount2),
            make_posting(Direction::Credit, amount1 + amount2),
        ];

        let result = validate_postings(&postings);
        prop_assert!(
            result.is_ok(),
            "Multi-leg balanced set should be accepted, got: {:?}",
            result
        );
    }

    /// Property 2.7: Imbalances at or above the tolerance are rejected.
    ///
    /// *For any* pair of opposite legs whose totals differ by at least 0.01,
    /// validation SHALL reject the set and echo both totals in the error.
    #[test]
    fn prop_imbalance_rejected(
        amount in positive_amount(),
        offset_cents in 1i64..100_000i64,
    ) {
        let drift = Decimal::new(offset_cents, 2);
        let postings = vec![
            make_posting(Direction::Debit, amount),
            make_posting(Direction::Credit, amount + drift),
        ];

        let result = validate_postings(&postings);
        prop_assert!(
            matches!(
                &result,
                Err(LedgerError::UnbalancedEntry { debits, credits })
                    if *debits == amount && *credits == amount + drift
            ),
            "Imbalanced set should be rejected, got: {:?}",
            result
        );
    }

    /// Property 2.8: Drift strictly below the tolerance is accepted.
    ///
    /// *For any* pair whose totals differ by less than 0.001, validation
    /// SHALL treat the set as balanced. Rounding residue under the tolerance
    /// must not block posting.
    #[test]
    fn prop_sub_tolerance_drift_accepted(
        amount in positive_amount(),
        residue in 1i64..10i64,
    ) {
        // residue/10000 spans 0.0001 through 0.0009, all below 0.001.
        let drift = Decimal::new(residue, 4);
        let postings = vec![
            make_posting(Direction::Debit, amount),
            make_posting(Direction::Credit, amount + drift),
        ];

        let result = validate_postings(&postings);
        prop_assert!(
            result.is_ok(),
            "Sub-tolerance drift should be accepted, got: {:?}",
            result
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Specific example: a drift of exactly 0.001 is outside the tolerance.
    #[test]
    fn test_exact_tolerance_rejected() {
        let postings = vec![
            make_posting(Direction::Debit, Decimal::new(100_001, 3)),
            make_posting(Direction::Credit, Decimal::new(100_000, 3)),
        ];
        assert!(matches!(
            validate_postings(&postings),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    /// Specific example: minimum valid entry (2 postings).
    #[test]
    fn test_minimum_valid_entry() {
        let postings = vec![
            make_posting(Direction::Debit, Decimal::new(100, 2)),
            make_posting(Direction::Credit, Decimal::new(100, 2)),
        ];
        assert!(validate_postings(&postings).is_ok());
    }
}
