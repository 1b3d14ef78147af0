//! Expense ledger aggregate.
//!
//! All mutation happens on an owned value; callers persist the result in a
//! single store call, so a rejected or abandoned write never leaves a
//! half-merged ledger behind.

use chrono::{DateTime, Utc};
use hrledger_shared::types::{EmployeeRef, LedgerId, LedgerYear};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExpenseError;
use super::policy::LedgerPolicy;
use super::types::{
    EnrichedBucket, EnrichedLedger, EnrichedRegular, Expense, ExpenseKind, ExpenseSubmission,
    LedgerKey, NewExpense, RangeBucket,
};
use crate::ranges::RangeConfig;

/// One employee's EPF expenses for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLedger {
    /// Ledger ID.
    pub id: LedgerId,
    /// Owning employee. Never changes after creation.
    pub employee_ref: EmployeeRef,
    /// Calendar year.
    pub year: LedgerYear,
    /// Regular expenses in append order.
    pub regular_expenses: Vec<Expense>,
    /// Range buckets, one per distinct name.
    pub range_expenses: Vec<RangeBucket>,
    /// Sum of every amount in both streams.
    pub total_expense: Decimal,
    /// Optimistic-concurrency token; 0 until first stored.
    pub version: u64,
}

impl ExpenseLedger {
    /// Creates an empty, unsaved ledger for `key`.
    #[must_use]
    pub fn new(key: LedgerKey) -> Self {
        Self {
            id: LedgerId::new(),
            employee_ref: key.employee_ref,
            year: key.year,
            regular_expenses: Vec::new(),
            range_expenses: Vec::new(),
            total_expense: Decimal::ZERO,
            version: 0,
        }
    }

    /// The ledger's natural key.
    #[must_use]
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.employee_ref.clone(), self.year)
    }

    /// Every expense in both streams.
    pub fn expenses(&self) -> impl Iterator<Item = &Expense> {
        self.regular_expenses
            .iter()
            .chain(self.range_expenses.iter().flat_map(|b| b.expenses.iter()))
    }

    /// Sum of the regular stream.
    #[must_use]
    pub fn regular_total(&self) -> Decimal {
        sum(&self.regular_expenses)
    }

    /// Total recomputed from the entries, ignoring the stored field.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.expenses().map(|e| e.amount).sum()
    }

    /// Looks up a bucket by exact name.
    #[must_use]
    pub fn bucket(&self, name: &str) -> Option<&RangeBucket> {
        self.range_expenses.iter().find(|b| b.name == name)
    }

    /// Appends a submission: regular entries at the end, range entries into
    /// the bucket with the same name (created when missing).
    ///
    /// Does not validate or enforce the cap; see [`apply_submission`].
    pub fn merge(&mut self, submission: &ExpenseSubmission, recorded_at: DateTime<Utc>) {
        let stamp = |expense: &NewExpense| Expense {
            amount: expense.amount,
            expensed_at: expense.expensed_at,
            created_at: recorded_at,
        };

        self.regular_expenses.extend(submission.regular.iter().map(stamp));

        for incoming in &submission.ranges {
            let entries = incoming.expenses.iter().map(stamp);
            match self
                .range_expenses
                .iter_mut()
                .find(|b| b.name == incoming.name)
            {
                Some(bucket) => bucket.expenses.extend(entries),
                None => self.range_expenses.push(RangeBucket {
                    name: incoming.name.clone(),
                    expenses: entries.collect(),
                }),
            }
        }

        self.recompute_total();
    }

    /// Removes the first entry recorded at exactly `created_at`.
    ///
    /// A bucket emptied by the removal is kept.
    ///
    /// # Errors
    ///
    /// `MissingRangeName` for a range removal without a name,
    /// `BucketNotFound` or `ExpenseNotFound` when nothing matches.
    pub fn remove_expense(
        &mut self,
        kind: ExpenseKind,
        created_at: DateTime<Utc>,
        range_name: Option<&str>,
    ) -> Result<Expense, ExpenseError> {
        let entries = match kind {
            ExpenseKind::Regular => &mut self.regular_expenses,
            ExpenseKind::Range => {
                let name = range_name.ok_or(ExpenseError::MissingRangeName)?;
                let bucket = self
                    .range_expenses
                    .iter_mut()
                    .find(|b| b.name == name)
                    .ok_or_else(|| ExpenseError::BucketNotFound(name.to_string()))?;
                &mut bucket.expenses
            }
        };

        let position = entries
            .iter()
            .position(|e| e.created_at == created_at)
            .ok_or(ExpenseError::ExpenseNotFound { kind, created_at })?;
        let removed = entries.remove(position);

        self.recompute_total();
        Ok(removed)
    }

    /// Builds the read-side view with totals computed from the entries.
    #[must_use]
    pub fn enrich(&self) -> EnrichedLedger {
        let regular_expense = self.regular_total();
        let range_expenses: Vec<EnrichedBucket> = self
            .range_expenses
            .iter()
            .map(|bucket| EnrichedBucket {
                name: bucket.name.clone(),
                expense: sum(&bucket.expenses),
                expenses: bucket.expenses.clone(),
            })
            .collect();
        let range_total: Decimal = range_expenses.iter().map(|b| b.expense).sum();

        EnrichedLedger {
            id: self.id,
            employee_ref: self.employee_ref.clone(),
            year: self.year,
            expense: regular_expense + range_total,
            regular_expenses: EnrichedRegular {
                expense: regular_expense,
                items: self.regular_expenses.clone(),
            },
            range_expenses,
        }
    }

    fn recompute_total(&mut self) {
        self.total_expense = self.computed_total();
    }
}

fn sum(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Checks a submission before it touches any ledger.
///
/// Amounts must be positive. Bucket names must be non-blank and, when a
/// range configuration exists, must name one of its ranges.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_submission(
    submission: &ExpenseSubmission,
    ranges: Option<&RangeConfig>,
) -> Result<(), ExpenseError> {
    let amounts = submission
        .regular
        .iter()
        .chain(submission.ranges.iter().flat_map(|b| b.expenses.iter()))
        .map(|e| e.amount);
    for amount in amounts {
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::InvalidAmount(amount));
        }
    }

    for bucket in &submission.ranges {
        if bucket.name.trim().is_empty() {
            return Err(ExpenseError::EmptyRangeName);
        }
        if let Some(config) = ranges {
            if config.find(&bucket.name).is_none() {
                return Err(ExpenseError::UnknownRange(bucket.name.clone()));
            }
        }
    }

    Ok(())
}

/// Produces the ledger that results from applying `submission`.
///
/// Starts from `existing` or a fresh ledger for `key`, merges, recomputes
/// the total, and enforces the cap. The input ledger is consumed; on error
/// the caller's persisted state is untouched because nothing was saved.
///
/// # Errors
///
/// Validation errors from [`validate_submission`] or `CapExceeded`.
pub fn apply_submission(
    existing: Option<ExpenseLedger>,
    key: LedgerKey,
    submission: &ExpenseSubmission,
    policy: &LedgerPolicy,
    ranges: Option<&RangeConfig>,
    recorded_at: DateTime<Utc>,
) -> Result<ExpenseLedger, ExpenseError> {
    validate_submission(submission, ranges)?;

    let mut ledger = existing.unwrap_or_else(|| ExpenseLedger::new(key));
    ledger.merge(submission, recorded_at);
    policy.check_total(ledger.total_expense)?;

    Ok(ledger)
}
