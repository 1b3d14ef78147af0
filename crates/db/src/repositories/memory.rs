//! Embedded in-memory store.
//!
//! Implements both persistence ports over `DashMap`s. Each check-and-write
//! happens under the map's shard lock for the ledger key, so the version
//! check behaves like the SQL stores' conditional update.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use hrledger_core::expense::{ExpenseLedger, LedgerFilter, LedgerKey};
use hrledger_core::ranges::RangeConfig;
use hrledger_core::store::{LedgerStore, RangeConfigStore, StoreError};
use hrledger_shared::types::{ConfigKey, EmployeeRef, LedgerId};

/// Ledgers and range configurations held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    ledgers: DashMap<LedgerKey, ExpenseLedger>,
    configs: DashMap<ConfigKey, RangeConfig>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored ledgers.
    #[must_use]
    pub fn ledger_count(&self) -> usize {
        self.ledgers.len()
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn find_by_key(&self, key: &LedgerKey) -> Result<Option<ExpenseLedger>, StoreError> {
        Ok(self.ledgers.get(key).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: LedgerId) -> Result<Option<ExpenseLedger>, StoreError> {
        Ok(self
            .ledgers
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self, filter: &LedgerFilter) -> Result<Vec<ExpenseLedger>, StoreError> {
        Ok(self
            .ledgers
            .iter()
            .filter(|entry| filter.matches(entry.key()))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn save(
        &self,
        mut ledger: ExpenseLedger,
        expected_version: Option<u64>,
    ) -> Result<ExpenseLedger, StoreError> {
        match (self.ledgers.entry(ledger.key()), expected_version) {
            (Entry::Vacant(slot), None) => {
                ledger.version = 1;
                slot.insert(ledger.clone());
            }
            (Entry::Occupied(mut slot), Some(current))
                if slot.get().id == ledger.id && slot.get().version == current =>
            {
                ledger.version = current.saturating_add(1);
                slot.insert(ledger.clone());
            }
            _ => return Err(StoreError::ConcurrentModification),
        }
        Ok(ledger)
    }

    async fn delete_for_employee(&self, employee_ref: &EmployeeRef) -> Result<u64, StoreError> {
        let mut deleted = 0u64;
        self.ledgers.retain(|key, _| {
            let keep = &key.employee_ref != employee_ref;
            if !keep {
                deleted += 1;
            }
            keep
        });
        Ok(deleted)
    }
}

#[async_trait]
impl RangeConfigStore for InMemoryStore {
    async fn get_config(&self, key: &ConfigKey) -> Result<Option<RangeConfig>, StoreError> {
        Ok(self.configs.get(key).map(|entry| entry.value().clone()))
    }

    async fn save_config(
        &self,
        key: &ConfigKey,
        config: RangeConfig,
    ) -> Result<RangeConfig, StoreError> {
        self.configs.insert(key.clone(), config.clone());
        Ok(config)
    }
}
