//! Per-employee, per-year EPF expense ledgers.
//!
//! This module implements:
//! - Ledger aggregates with a regular stream and named range buckets
//! - Pure submission merging with cap enforcement
//! - Read-side enrichment (grand total and subtotals)
//! - The ledger service, which serializes writers per `(employee, year)`

pub mod error;
pub mod ledger;
pub mod lock;
pub mod policy;
pub mod service;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use crate::store::LedgerStore;
pub use error::ExpenseError;
pub use ledger::{ExpenseLedger, apply_submission};
pub use lock::{KeyGuard, KeyedLocks};
pub use policy::LedgerPolicy;
pub use service::ExpenseLedgerService;
pub use types::{
    EnrichedBucket, EnrichedLedger, EnrichedRegular, Expense, ExpenseKind, ExpenseSubmission,
    LedgerFilter, LedgerKey, NewExpense, NewRangeBucket, RangeBucket,
};
