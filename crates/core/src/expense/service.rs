//! Expense ledger service.
//!
//! Orchestrates the read-merge-write cycle against the persistence ports.
//! Writers for the same employee are serialized in-process, which covers
//! every `(employee, year)` ledger and the employee cascade. The store
//! re-checks the ledger version at write time so writers in other processes
//! cannot silently overwrite each other.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hrledger_shared::config::LedgerConfig;
use hrledger_shared::types::{ConfigKey, EmployeeRef, LedgerId, LedgerYear};
use tracing::{debug, info, warn};

use super::error::ExpenseError;
use super::ledger::{ExpenseLedger, apply_submission};
use super::lock::KeyedLocks;
use super::policy::LedgerPolicy;
use super::types::{EnrichedLedger, ExpenseKind, ExpenseSubmission, LedgerFilter, LedgerKey};
use crate::store::{LedgerStore, RangeConfigStore};

/// Ledger service for EPF expense submissions and deletions.
pub struct ExpenseLedgerService<L, C> {
    ledgers: Arc<L>,
    configs: Arc<C>,
    config_key: ConfigKey,
    policy: LedgerPolicy,
    locks: KeyedLocks<EmployeeRef>,
}

impl<L: LedgerStore, C: RangeConfigStore> ExpenseLedgerService<L, C> {
    /// Creates a service over the given stores.
    #[must_use]
    pub fn new(
        ledgers: Arc<L>,
        configs: Arc<C>,
        config_key: ConfigKey,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            ledgers,
            configs,
            config_key,
            policy,
            locks: KeyedLocks::new(),
        }
    }

    /// Creates a service from the `ledger` configuration section.
    #[must_use]
    pub fn from_config(ledgers: Arc<L>, configs: Arc<C>, config: &LedgerConfig) -> Self {
        Self::new(
            ledgers,
            configs,
            ConfigKey::new(config.deployment_key.clone()),
            LedgerPolicy::from_config(config),
        )
    }

    /// The policy applied to writes.
    #[must_use]
    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Number of employees with a write in progress or queued.
    #[must_use]
    pub fn active_writers(&self) -> usize {
        self.locks.len()
    }

    /// Adds a submission to the employee's ledger for the year containing `at`.
    ///
    /// 1. Normalizes `at` to its calendar year and loads the ledger, if any
    /// 2. Validates the submission (amounts, bucket names vs. configured ranges)
    /// 3. Appends regular entries and merges buckets by name
    /// 4. Recomputes the total and rejects the whole submission above the cap
    /// 5. Persists with a version check
    ///
    /// # Errors
    ///
    /// Validation errors, `CapExceeded`, `ConcurrentModification`, or
    /// `Storage`. Nothing is persisted on error.
    pub async fn upsert(
        &self,
        employee_ref: &EmployeeRef,
        at: DateTime<Utc>,
        submission: &ExpenseSubmission,
    ) -> Result<ExpenseLedger, ExpenseError> {
        let key = LedgerKey::new(employee_ref.clone(), LedgerYear::from_datetime(at));
        let _guard = self.locks.acquire(employee_ref).await;

        let ranges = self.configs.get_config(&self.config_key).await?;
        let existing = self.ledgers.find_by_key(&key).await?;
        let expected_version = existing.as_ref().map(|ledger| ledger.version);

        let updated = apply_submission(
            existing,
            key.clone(),
            submission,
            &self.policy,
            ranges.as_ref(),
            Utc::now(),
        )
        .inspect_err(|err| {
            if let ExpenseError::CapExceeded { attempted, cap } = err {
                warn!(
                    employee = %key.employee_ref,
                    year = %key.year,
                    %attempted,
                    %cap,
                    "Expense submission rejected: cap exceeded"
                );
            }
        })?;

        let saved = self
            .ledgers
            .save(updated, expected_version)
            .await
            .inspect_err(|err| {
                warn!(
                    employee = %key.employee_ref,
                    year = %key.year,
                    error = %err,
                    "Ledger save failed"
                );
            })?;

        info!(
            ledger_id = %saved.id,
            employee = %saved.employee_ref,
            year = %saved.year,
            total = %saved.total_expense,
            version = saved.version,
            "Expense submission recorded"
        );
        Ok(saved)
    }

    /// Deletes one expense entry, addressed by stream, creation time, and
    /// (for range entries) bucket name.
    ///
    /// # Errors
    ///
    /// `LedgerNotFound`, `MissingRangeName`, `BucketNotFound`,
    /// `ExpenseNotFound`, `ConcurrentModification`, or `Storage`.
    pub async fn delete_expense(
        &self,
        ledger_id: LedgerId,
        kind: ExpenseKind,
        created_at: DateTime<Utc>,
        range_name: Option<&str>,
    ) -> Result<ExpenseLedger, ExpenseError> {
        if kind == ExpenseKind::Range && range_name.is_none() {
            return Err(ExpenseError::MissingRangeName);
        }

        let owner = self.require(ledger_id).await?.employee_ref;
        let _guard = self.locks.acquire(&owner).await;

        // Re-read under the lock so the removal applies to the latest version.
        let mut ledger = self.require(ledger_id).await?;
        let expected_version = ledger.version;
        let removed = ledger.remove_expense(kind, created_at, range_name)?;

        let saved = self.ledgers.save(ledger, Some(expected_version)).await?;

        info!(
            ledger_id = %saved.id,
            %kind,
            amount = %removed.amount,
            total = %saved.total_expense,
            "Expense deleted"
        );
        Ok(saved)
    }

    /// Returns a ledger by ID.
    ///
    /// # Errors
    ///
    /// `LedgerNotFound` or `Storage`.
    pub async fn require(&self, ledger_id: LedgerId) -> Result<ExpenseLedger, ExpenseError> {
        self.ledgers
            .find_by_id(ledger_id)
            .await?
            .ok_or(ExpenseError::LedgerNotFound(ledger_id))
    }

    /// Lists raw ledgers matching `filter`, sorted by year then employee.
    ///
    /// # Errors
    ///
    /// `Storage`.
    pub async fn list(&self, filter: &LedgerFilter) -> Result<Vec<ExpenseLedger>, ExpenseError> {
        let mut ledgers = self.ledgers.list(filter).await?;
        ledgers.sort_by(|a, b| {
            a.year
                .cmp(&b.year)
                .then_with(|| a.employee_ref.cmp(&b.employee_ref))
        });
        debug!(count = ledgers.len(), ?filter, "Ledgers listed");
        Ok(ledgers)
    }

    /// Lists ledgers matching `filter` with totals computed at read time,
    /// sorted ascending by year.
    ///
    /// # Errors
    ///
    /// `Storage`.
    pub async fn list_for_query(
        &self,
        filter: &LedgerFilter,
    ) -> Result<Vec<EnrichedLedger>, ExpenseError> {
        Ok(self
            .list(filter)
            .await?
            .iter()
            .map(ExpenseLedger::enrich)
            .collect())
    }

    /// Removes every ledger of a deleted employee.
    ///
    /// Waits for in-flight writes for the employee to finish first, so a
    /// submission already running cannot recreate a ledger after the
    /// cascade. Submissions started after this returns are not blocked;
    /// callers stop those by removing the employee.
    ///
    /// # Errors
    ///
    /// `Storage`.
    pub async fn delete_for_employee(
        &self,
        employee_ref: &EmployeeRef,
    ) -> Result<u64, ExpenseError> {
        let _guard = self.locks.acquire(employee_ref).await;
        let deleted = self.ledgers.delete_for_employee(employee_ref).await?;
        info!(employee = %employee_ref, deleted, "Employee ledgers deleted");
        Ok(deleted)
    }
}
