//! Expense ledger data types.

use chrono::{DateTime, Utc};
use hrledger_shared::types::{EmployeeRef, LedgerId, LedgerYear};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which stream of a ledger an expense belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    /// Not associated with any range.
    Regular,
    /// Filed under a named range bucket.
    Range,
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => f.write_str("regular"),
            Self::Range => f.write_str("range"),
        }
    }
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Positive amount.
    pub amount: Decimal,
    /// When the expense was incurred.
    pub expensed_at: DateTime<Utc>,
    /// When the ledger recorded it. Used to address the entry for deletion.
    pub created_at: DateTime<Utc>,
}

/// A named bucket of range expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBucket {
    /// Range name the bucket is filed under.
    pub name: String,
    /// Entries in append order.
    pub expenses: Vec<Expense>,
}

/// An expense as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    /// Amount, must be positive.
    pub amount: Decimal,
    /// When the expense was incurred.
    pub expensed_at: DateTime<Utc>,
}

impl NewExpense {
    /// Creates a submitted expense.
    #[must_use]
    pub const fn new(amount: Decimal, expensed_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            expensed_at,
        }
    }
}

/// A range bucket as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRangeBucket {
    /// Range name.
    pub name: String,
    /// Expenses to file under it.
    pub expenses: Vec<NewExpense>,
}

/// One submission of new expenses for an `(employee, year)` ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSubmission {
    /// Regular expenses, appended in order.
    #[serde(default)]
    pub regular: Vec<NewExpense>,
    /// Range buckets, merged by name.
    #[serde(default)]
    pub ranges: Vec<NewRangeBucket>,
}

impl ExpenseSubmission {
    /// Whether the submission carries no expenses at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.ranges.iter().all(|bucket| bucket.expenses.is_empty())
    }

    /// Sum of every submitted amount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        let regular: Decimal = self.regular.iter().map(|e| e.amount).sum();
        let ranges: Decimal = self
            .ranges
            .iter()
            .flat_map(|bucket| bucket.expenses.iter())
            .map(|e| e.amount)
            .sum();
        regular + ranges
    }
}

/// Natural key of a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerKey {
    /// Owning employee.
    pub employee_ref: EmployeeRef,
    /// Calendar year.
    pub year: LedgerYear,
}

impl LedgerKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(employee_ref: EmployeeRef, year: LedgerYear) -> Self {
        Self { employee_ref, year }
    }
}

/// Filter for listing ledgers. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Restrict to one employee.
    pub employee_ref: Option<EmployeeRef>,
    /// Restrict to one calendar year.
    pub year: Option<LedgerYear>,
}

impl LedgerFilter {
    /// Whether `key` satisfies the filter.
    #[must_use]
    pub fn matches(&self, key: &LedgerKey) -> bool {
        self.employee_ref
            .as_ref()
            .is_none_or(|employee| *employee == key.employee_ref)
            && self.year.is_none_or(|year| year == key.year)
    }
}

/// Regular stream with its subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRegular {
    /// Subtotal of the regular stream.
    pub expense: Decimal,
    /// Entries in append order.
    pub items: Vec<Expense>,
}

/// Range bucket with its subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedBucket {
    /// Range name.
    pub name: String,
    /// Subtotal of the bucket.
    pub expense: Decimal,
    /// Entries in append order.
    pub expenses: Vec<Expense>,
}

/// A ledger with totals computed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedLedger {
    /// Ledger ID.
    pub id: LedgerId,
    /// Owning employee.
    pub employee_ref: EmployeeRef,
    /// Calendar year.
    pub year: LedgerYear,
    /// Grand total across both streams.
    pub expense: Decimal,
    /// Regular stream.
    pub regular_expenses: EnrichedRegular,
    /// Range buckets.
    pub range_expenses: Vec<EnrichedBucket>,
}
