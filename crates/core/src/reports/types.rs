//! Report data types.

use hrledger_shared::types::LedgerYear;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Calendar month, serialized by its three-letter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonthName {
    /// January.
    Jan,
    /// February.
    Feb,
    /// March.
    Mar,
    /// April.
    Apr,
    /// May.
    May,
    /// June.
    Jun,
    /// July.
    Jul,
    /// August.
    Aug,
    /// September.
    Sep,
    /// October.
    Oct,
    /// November.
    Nov,
    /// December.
    Dec,
}

impl MonthName {
    /// Every month in calendar order.
    pub const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    /// Month for a 1-based month number.
    #[must_use]
    pub fn from_number(month: u32) -> Option<Self> {
        let index = usize::try_from(month.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Zero-based position in the calendar.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for MonthName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Sum of expenses filed under one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyContribution {
    /// Month name.
    pub month: MonthName,
    /// Total amount.
    pub amount: Decimal,
}

/// Sign of a year-over-year change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Spending grew or stayed flat.
    Positive,
    /// Spending shrank.
    Negative,
}

/// Totals for a year and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOverYearDelta {
    /// Year the delta is computed for.
    pub year: LedgerYear,
    /// Total of all ledgers in `year`.
    pub total_this_year: Decimal,
    /// Total of all ledgers in the previous year.
    pub total_last_year: Decimal,
    /// Percentage change, 1 dp. `None` when last year's total is zero.
    pub change: Option<Decimal>,
    /// Sign of `change`. `None` exactly when `change` is.
    pub direction: Option<Direction>,
}

/// One bucket's share of a year's expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeShare {
    /// Bucket name.
    pub name: String,
    /// Whether the name matches a configured range.
    pub configured: bool,
    /// Total filed under the bucket.
    pub amount: Decimal,
    /// Share of the year's total, 2 dp.
    pub share_percent: Decimal,
}

/// A year's expenses broken down by stream and range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBreakdown {
    /// Year covered.
    pub year: LedgerYear,
    /// Grand total for the year.
    pub total: Decimal,
    /// Regular stream total.
    pub regular: Decimal,
    /// Regular stream share of the total, 2 dp.
    pub regular_share_percent: Decimal,
    /// Buckets in configured range order, then unconfigured names.
    pub ranges: Vec<RangeShare>,
}

/// Summary shown on the EPF dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Current calendar year.
    pub year: LedgerYear,
    /// Current year vs. the previous one.
    pub year_over_year: YearOverYearDelta,
    /// Rolling 12-month contributions, `Jan..Dec`.
    pub monthly: Vec<MonthlyContribution>,
    /// Employees with a ledger in the current year.
    pub active_employees: usize,
    /// Mean share of the cap used by current-year ledgers, 2 dp.
    pub average_cap_utilisation: Decimal,
}
