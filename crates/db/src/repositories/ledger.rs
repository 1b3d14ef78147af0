//! `SeaORM`-backed expense ledger store.

use async_trait::async_trait;
use chrono::Utc;
use hrledger_core::expense::{ExpenseLedger, LedgerFilter, LedgerKey};
use hrledger_core::store::{LedgerStore, StoreError};
use hrledger_shared::types::{EmployeeRef, LedgerId};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};
use tracing::debug;

use super::storage_error;
use crate::entities::expense_ledgers;

/// Ledger store over a `SeaORM` connection.
///
/// Writes are single statements guarded by the `version` column: inserts rely
/// on the unique `(employee_ref, year)` index, updates on
/// `WHERE id = ? AND version = ?`.
#[derive(Debug, Clone)]
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    /// Creates a new ledger store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn from_model(model: expense_ledgers::Model) -> Result<ExpenseLedger, StoreError> {
    let mut ledger: ExpenseLedger =
        serde_json::from_str(&model.document).map_err(storage_error)?;
    // The column is authoritative for the version.
    ledger.version = u64::try_from(model.version).map_err(storage_error)?;
    Ok(ledger)
}

fn column_version(version: u64) -> Result<i64, StoreError> {
    i64::try_from(version).map_err(storage_error)
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn find_by_key(&self, key: &LedgerKey) -> Result<Option<ExpenseLedger>, StoreError> {
        expense_ledgers::Entity::find()
            .filter(expense_ledgers::Column::EmployeeRef.eq(key.employee_ref.as_str()))
            .filter(expense_ledgers::Column::Year.eq(key.year.value()))
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .map(from_model)
            .transpose()
    }

    async fn find_by_id(&self, id: LedgerId) -> Result<Option<ExpenseLedger>, StoreError> {
        expense_ledgers::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .map(from_model)
            .transpose()
    }

    async fn list(&self, filter: &LedgerFilter) -> Result<Vec<ExpenseLedger>, StoreError> {
        let mut query = expense_ledgers::Entity::find();
        if let Some(employee_ref) = &filter.employee_ref {
            query = query.filter(expense_ledgers::Column::EmployeeRef.eq(employee_ref.as_str()));
        }
        if let Some(year) = filter.year {
            query = query.filter(expense_ledgers::Column::Year.eq(year.value()));
        }

        query
            .order_by_asc(expense_ledgers::Column::Year)
            .order_by_asc(expense_ledgers::Column::EmployeeRef)
            .all(&self.db)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(from_model)
            .collect()
    }

    async fn save(
        &self,
        mut ledger: ExpenseLedger,
        expected_version: Option<u64>,
    ) -> Result<ExpenseLedger, StoreError> {
        let next_version = expected_version.map_or(1, |current| current.saturating_add(1));
        ledger.version = next_version;
        let document = serde_json::to_string(&ledger).map_err(storage_error)?;
        let now = Utc::now();

        match expected_version {
            None => {
                let model = expense_ledgers::ActiveModel {
                    id: Set(ledger.id.to_string()),
                    employee_ref: Set(ledger.employee_ref.as_str().to_string()),
                    year: Set(ledger.year.value()),
                    version: Set(column_version(next_version)?),
                    document: Set(document),
                    updated_at: Set(now),
                };

                expense_ledgers::Entity::insert(model)
                    .exec_without_returning(&self.db)
                    .await
                    .map_err(|err| match err.sql_err() {
                        // Another writer created the (employee, year) ledger first.
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            StoreError::ConcurrentModification
                        }
                        _ => storage_error(err),
                    })?;
            }
            Some(current) => {
                let result = expense_ledgers::Entity::update_many()
                    .col_expr(
                        expense_ledgers::Column::Version,
                        Expr::value(column_version(next_version)?),
                    )
                    .col_expr(expense_ledgers::Column::Document, Expr::value(document))
                    .col_expr(expense_ledgers::Column::UpdatedAt, Expr::value(now))
                    .filter(expense_ledgers::Column::Id.eq(ledger.id.to_string()))
                    .filter(expense_ledgers::Column::Version.eq(column_version(current)?))
                    .exec(&self.db)
                    .await
                    .map_err(storage_error)?;

                if result.rows_affected == 0 {
                    return Err(StoreError::ConcurrentModification);
                }
            }
        }

        debug!(
            ledger_id = %ledger.id,
            version = ledger.version,
            "Ledger document stored"
        );
        Ok(ledger)
    }

    async fn delete_for_employee(&self, employee_ref: &EmployeeRef) -> Result<u64, StoreError> {
        let result = expense_ledgers::Entity::delete_many()
            .filter(expense_ledgers::Column::EmployeeRef.eq(employee_ref.as_str()))
            .exec(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected)
    }
}
