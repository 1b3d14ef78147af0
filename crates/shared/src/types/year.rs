//! Calendar-year anchor used to key expense ledgers.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar year, anchored at January 1st 00:00 UTC.
///
/// A ledger year covers the half-open interval `[Jan 1, Jan 1 of next year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerYear(i32);

impl LedgerYear {
    /// Creates a ledger year from a calendar year number.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// Normalizes a timestamp to the calendar year it falls in (UTC).
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.year())
    }

    /// Returns the calendar year number.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns the year immediately before this one.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// January 1st 00:00 UTC of this year.
    #[must_use]
    pub fn start(self) -> DateTime<Utc> {
        jan_first(self.0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// January 1st 00:00 UTC of the following year (exclusive bound).
    #[must_use]
    pub fn end(self) -> DateTime<Utc> {
        self.0
            .checked_add(1)
            .and_then(jan_first)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether `at` falls within `[start, end)`.
    #[must_use]
    pub fn contains(self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at < self.end()
    }
}

fn jan_first(year: i32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

impl std::fmt::Display for LedgerYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
