//! Ledger business rules that vary per deployment.

use hrledger_shared::config::LedgerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExpenseError;

/// Aggregate cap used when a deployment does not configure one.
pub const DEFAULT_EXPENSE_CAP: Decimal = Decimal::from_parts(15_000, 0, 0, false, 0);

/// Rules applied to every ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    /// Maximum total a single ledger may reach (inclusive).
    pub expense_cap: Decimal,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            expense_cap: DEFAULT_EXPENSE_CAP,
        }
    }
}

impl LedgerPolicy {
    /// Creates a policy with the given cap.
    #[must_use]
    pub const fn with_cap(expense_cap: Decimal) -> Self {
        Self { expense_cap }
    }

    /// Builds the policy from the `ledger` configuration section.
    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::with_cap(config.expense_cap)
    }

    /// Checks a prospective ledger total against the cap.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::CapExceeded` when `total` is above the cap.
    pub fn check_total(&self, total: Decimal) -> Result<(), ExpenseError> {
        if total > self.expense_cap {
            return Err(ExpenseError::CapExceeded {
                attempted: total,
                cap: self.expense_cap,
            });
        }
        Ok(())
    }

    /// Remaining headroom under the cap, never negative.
    #[must_use]
    pub fn remaining(&self, total: Decimal) -> Decimal {
        (self.expense_cap - total).max(Decimal::ZERO)
    }

    /// Share of the cap consumed, as a percentage rounded to 2 dp.
    #[must_use]
    pub fn utilisation_percent(&self, total: Decimal) -> Decimal {
        if self.expense_cap.is_zero() {
            return Decimal::ZERO;
        }
        (total / self.expense_cap * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
