//! Report generation service.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use hrledger_shared::types::LedgerYear;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{
    DashboardSummary, Direction, MonthName, MonthlyContribution, RangeBreakdown, RangeShare,
    YearOverYearDelta,
};
use crate::expense::{ExpenseLedger, LedgerPolicy};
use crate::ranges::RangeConfig;

/// Service for deriving EPF reports from ledgers.
pub struct ReportService;

impl ReportService {
    /// Sums every expense incurred between the first day of the month 11
    /// months before `now` and `now` itself, both inclusive.
    ///
    /// Buckets are keyed by month name only, so the same calendar month in two
    /// different years of the window lands in one bucket. Always returns 12
    /// entries in `Jan..Dec` order.
    #[must_use]
    pub fn monthly_contribution(
        ledgers: &[ExpenseLedger],
        now: DateTime<Utc>,
    ) -> Vec<MonthlyContribution> {
        let window_start = Self::window_start(now);
        let mut totals = [Decimal::ZERO; 12];

        for expense in ledgers.iter().flat_map(ExpenseLedger::expenses) {
            if expense.expensed_at < window_start || expense.expensed_at > now {
                continue;
            }
            if let Some(month) = MonthName::from_number(expense.expensed_at.month()) {
                totals[month.index()] += expense.amount;
            }
        }

        MonthName::ALL
            .iter()
            .zip(totals)
            .map(|(month, amount)| MonthlyContribution {
                month: *month,
                amount,
            })
            .collect()
    }

    /// First instant of the rolling 12-month window ending at `now`.
    #[must_use]
    pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
            .and_then(|first| first.checked_sub_months(Months::new(11)))
            .and_then(|start| start.and_hms_opt(0, 0, 0))
            .map_or(DateTime::<Utc>::MIN_UTC, |start| start.and_utc())
    }

    /// Compares the total of `current_year` with the year before.
    ///
    /// When last year's total is zero there is no meaningful percentage, so
    /// both `change` and `direction` are `None`.
    #[must_use]
    pub fn year_over_year_delta(
        ledgers: &[ExpenseLedger],
        current_year: LedgerYear,
    ) -> YearOverYearDelta {
        let total_this_year = Self::year_total(ledgers, current_year);
        let total_last_year = Self::year_total(ledgers, current_year.previous());

        let change = (!total_last_year.is_zero()).then(|| {
            ((total_this_year - total_last_year) / total_last_year * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        });
        let direction = change.map(|change| {
            if change >= Decimal::ZERO {
                Direction::Positive
            } else {
                Direction::Negative
            }
        });

        YearOverYearDelta {
            year: current_year,
            total_this_year,
            total_last_year,
            change,
            direction,
        }
    }

    /// Breaks one year's expenses down by stream and range bucket.
    ///
    /// Buckets follow the configured range order; names no longer in the
    /// configuration (renamed or removed ranges) follow alphabetically.
    #[must_use]
    pub fn range_breakdown(
        ledgers: &[ExpenseLedger],
        year: LedgerYear,
        config: Option<&RangeConfig>,
    ) -> RangeBreakdown {
        let mut regular = Decimal::ZERO;
        let mut buckets: BTreeMap<&str, Decimal> = BTreeMap::new();

        for ledger in ledgers.iter().filter(|l| l.year == year) {
            regular += ledger.regular_total();
            for bucket in &ledger.range_expenses {
                let amount: Decimal = bucket.expenses.iter().map(|e| e.amount).sum();
                *buckets.entry(bucket.name.as_str()).or_default() += amount;
            }
        }

        let total = regular + buckets.values().copied().sum::<Decimal>();

        let mut ranges: Vec<RangeShare> = buckets
            .into_iter()
            .map(|(name, amount)| RangeShare {
                name: name.to_string(),
                configured: config.is_some_and(|c| c.find(name).is_some()),
                amount,
                share_percent: Self::share(amount, total),
            })
            .collect();
        // BTreeMap iteration is already alphabetical; a stable sort keeps it
        // as the tiebreak among unconfigured names.
        ranges.sort_by_key(|share| {
            config
                .and_then(|c| c.position(&share.name))
                .unwrap_or(usize::MAX)
        });

        RangeBreakdown {
            year,
            total,
            regular,
            regular_share_percent: Self::share(regular, total),
            ranges,
        }
    }

    /// Builds the dashboard summary for the year containing `now`.
    #[must_use]
    pub fn dashboard(
        ledgers: &[ExpenseLedger],
        now: DateTime<Utc>,
        policy: &LedgerPolicy,
    ) -> DashboardSummary {
        let year = LedgerYear::from_datetime(now);
        let current: Vec<&ExpenseLedger> = ledgers.iter().filter(|l| l.year == year).collect();

        let active_employees = current
            .iter()
            .map(|l| &l.employee_ref)
            .collect::<BTreeSet<_>>()
            .len();

        let average_cap_utilisation = if current.is_empty() {
            Decimal::ZERO
        } else {
            let sum: Decimal = current
                .iter()
                .map(|l| policy.utilisation_percent(l.computed_total()))
                .sum();
            (sum / Decimal::from(current.len())).round_dp(2)
        };

        DashboardSummary {
            year,
            year_over_year: Self::year_over_year_delta(ledgers, year),
            monthly: Self::monthly_contribution(ledgers, now),
            active_employees,
            average_cap_utilisation,
        }
    }

    fn year_total(ledgers: &[ExpenseLedger], year: LedgerYear) -> Decimal {
        ledgers
            .iter()
            .filter(|l| l.year == year)
            .map(ExpenseLedger::computed_total)
            .sum()
    }

    fn share(amount: Decimal, total: Decimal) -> Decimal {
        if total.is_zero() {
            return Decimal::ZERO;
        }
        (amount / total * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
