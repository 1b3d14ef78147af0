//! Persistence ports.
//!
//! The core never talks to a database directly. Adapters (SeaORM, the
//! embedded in-memory store) implement these traits and are assumed atomic
//! per document, not across documents.

use async_trait::async_trait;
use hrledger_shared::types::{ConfigKey, EmployeeRef, LedgerId};
use thiserror::Error;

use crate::expense::{ExpenseLedger, LedgerFilter, LedgerKey};
use crate::ranges::RangeConfig;

/// Errors surfaced by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The stored version no longer matches the one the write was based on.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Any other backend failure, propagated unchanged.
    #[error("{0}")]
    Storage(String),
}

/// Storage of per-employee, per-year expense ledgers.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Finds the ledger for an `(employee, year)` pair.
    async fn find_by_key(&self, key: &LedgerKey) -> Result<Option<ExpenseLedger>, StoreError>;

    /// Finds a ledger by ID.
    async fn find_by_id(&self, id: LedgerId) -> Result<Option<ExpenseLedger>, StoreError>;

    /// Lists ledgers matching `filter`, in no particular order.
    async fn list(&self, filter: &LedgerFilter) -> Result<Vec<ExpenseLedger>, StoreError>;

    /// Persists `ledger`.
    ///
    /// `expected_version` is `None` for a ledger that must not exist yet and
    /// `Some(v)` for one whose stored version must still be `v`. Returns the
    /// stored ledger with its version advanced.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConcurrentModification`] when the precondition fails.
    async fn save(
        &self,
        ledger: ExpenseLedger,
        expected_version: Option<u64>,
    ) -> Result<ExpenseLedger, StoreError>;

    /// Deletes every ledger owned by `employee_ref`, returning how many went.
    async fn delete_for_employee(&self, employee_ref: &EmployeeRef) -> Result<u64, StoreError>;
}

/// Storage of keyed range configurations (upsert semantics).
#[async_trait]
pub trait RangeConfigStore: Send + Sync {
    /// Reads the configuration stored under `key`.
    async fn get_config(&self, key: &ConfigKey) -> Result<Option<RangeConfig>, StoreError>;

    /// Creates or replaces the configuration stored under `key`.
    async fn save_config(
        &self,
        key: &ConfigKey,
        config: RangeConfig,
    ) -> Result<RangeConfig, StoreError>;
}
