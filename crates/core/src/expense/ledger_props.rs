//! Property-based tests for ledger submissions.
//!
//! - Cap rejection leaves the prior ledger unchanged
//! - The regular stream is the concatenation of submissions in order
//! - The stored total always equals the sum of the entries

use chrono::{DateTime, Duration, TimeZone, Utc};
use hrledger_shared::types::{EmployeeRef, LedgerYear};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::ExpenseError;
use super::ledger::{ExpenseLedger, apply_submission};
use super::policy::LedgerPolicy;
use super::types::{ExpenseSubmission, LedgerKey, NewExpense, NewRangeBucket};

/// Strategy to generate positive amounts (0.01 to 5,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn key() -> LedgerKey {
    LedgerKey::new(EmployeeRef::from("emp-prop"), LedgerYear::new(2024))
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn regular(amounts: &[Decimal]) -> ExpenseSubmission {
    ExpenseSubmission {
        regular: amounts
            .iter()
            .map(|amount| NewExpense::new(*amount, base_time()))
            .collect(),
        ranges: vec![],
    }
}

/// Strategy to generate a submission mixing regular entries and buckets.
fn submission() -> impl Strategy<Value = ExpenseSubmission> {
    (
        prop::collection::vec(positive_amount(), 0..4),
        prop::collection::vec(
            (
                prop_oneof![Just("A"), Just("B"), Just("C")],
                prop::collection::vec(positive_amount(), 1..3),
            ),
            0..3,
        ),
    )
        .prop_map(|(regular_amounts, buckets)| ExpenseSubmission {
            ranges: buckets
                .into_iter()
                .map(|(name, amounts)| NewRangeBucket {
                    name: name.to_string(),
                    expenses: amounts
                        .into_iter()
                        .map(|amount| NewExpense::new(amount, base_time()))
                        .collect(),
                })
                .collect(),
            ..regular(&regular_amounts)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A submission that would push the total over the cap is rejected and
    /// the ledger it was applied to is unchanged.
    #[test]
    fn prop_cap_rejection_leaves_prior_state(
        first in prop::collection::vec(positive_amount(), 1..4),
        cap_cents in 1i64..2_000_000i64,
        overflow in positive_amount(),
    ) {
        let cap = Decimal::new(cap_cents, 2);
        let policy = LedgerPolicy::with_cap(cap);

        let Ok(prior) = apply_submission(None, key(), &regular(&first), &policy, None, base_time())
        else {
            // First submission already over the cap; nothing to compare.
            return Ok(());
        };
        let snapshot = prior.clone();

        let headroom = policy.remaining(prior.total_expense);
        let result = apply_submission(
            Some(prior),
            key(),
            &regular(&[headroom + overflow]),
            &policy,
            None,
            base_time() + Duration::days(1),
        );

        let is_cap_error = matches!(result, Err(ExpenseError::CapExceeded { .. }));
        prop_assert!(is_cap_error);
        prop_assert!(snapshot.total_expense <= cap);
        prop_assert_eq!(snapshot.computed_total(), snapshot.total_expense);
    }

    /// Regular entries end up in submission order across submissions.
    #[test]
    fn prop_regular_merge_is_concatenation(
        batches in prop::collection::vec(prop::collection::vec(positive_amount(), 0..4), 1..5),
    ) {
        let policy = LedgerPolicy::with_cap(Decimal::MAX);
        let mut ledger: Option<ExpenseLedger> = None;

        for (day, batch) in batches.iter().enumerate() {
            let recorded_at = base_time() + Duration::days(i64::try_from(day).unwrap());
            ledger = Some(
                apply_submission(ledger, key(), &regular(batch), &policy, None, recorded_at)
                    .unwrap(),
            );
        }

        let ledger = ledger.unwrap();
        let stored: Vec<Decimal> = ledger.regular_expenses.iter().map(|e| e.amount).collect();
        let expected: Vec<Decimal> = batches.concat();
        prop_assert_eq!(stored, expected);
    }

    /// The stored total matches the entries after any sequence of merges,
    /// and bucket names stay unique.
    #[test]
    fn prop_total_matches_entries(
        submissions in prop::collection::vec(submission(), 1..5),
    ) {
        let policy = LedgerPolicy::with_cap(Decimal::MAX);
        let mut ledger = ExpenseLedger::new(key());

        for submission in &submissions {
            ledger = apply_submission(Some(ledger), key(), submission, &policy, None, base_time())
                .unwrap();
        }

        prop_assert_eq!(ledger.total_expense, ledger.computed_total());
        let mut names: Vec<&str> = ledger.range_expenses.iter().map(|b| b.name.as_str()).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), before);
    }
}
