//! Implementations of the core persistence ports.
//!
//! The SeaORM stores keep each ledger and range configuration as a JSON
//! document next to the columns needed for lookups. The in-memory store is
//! for embedded use and tests.

pub mod ledger;
pub mod memory;
pub mod range_config;

pub use ledger::SeaOrmLedgerStore;
pub use memory::InMemoryStore;
pub use range_config::SeaOrmRangeConfigStore;

use hrledger_core::store::StoreError;

/// Wraps a backend failure so it reaches the caller unchanged.
pub(crate) fn storage_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::Storage(err.to_string())
}
