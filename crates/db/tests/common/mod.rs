//! Shared fixtures for the db integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hrledger_core::expense::{
    ExpenseLedgerService, ExpenseSubmission, LedgerPolicy, NewExpense, NewRangeBucket,
};
use hrledger_core::ranges::{RangeConfig, RangeInput, validate_and_normalize};
use hrledger_db::migration::{Migrator, MigratorTrait};
use hrledger_db::{InMemoryStore, connect_with};
use hrledger_shared::config::DatabaseConfig;
use hrledger_shared::types::ConfigKey;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn regular(amounts: &[Decimal], expensed_at: DateTime<Utc>) -> ExpenseSubmission {
    ExpenseSubmission {
        regular: amounts
            .iter()
            .map(|amount| NewExpense::new(*amount, expensed_at))
            .collect(),
        ranges: vec![],
    }
}

pub fn bucket(name: &str, amounts: &[Decimal], expensed_at: DateTime<Utc>) -> ExpenseSubmission {
    ExpenseSubmission {
        regular: vec![],
        ranges: vec![NewRangeBucket {
            name: name.to_string(),
            expenses: amounts
                .iter()
                .map(|amount| NewExpense::new(*amount, expensed_at))
                .collect(),
        }],
    }
}

/// Two ranges, `Low` up to 10 000 and `High` up to 30 000, under 50 000.
pub fn sample_config() -> RangeConfig {
    let ranges = vec![RangeInput::new("Low", 10_000), RangeInput::new("High", 30_000)];
    validate_and_normalize(dec!(50000), Some(ranges.as_slice())).unwrap()
}

pub fn memory_service() -> (
    Arc<InMemoryStore>,
    ExpenseLedgerService<InMemoryStore, InMemoryStore>,
) {
    let store = Arc::new(InMemoryStore::new());
    let service = ExpenseLedgerService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        ConfigKey::default(),
        LedgerPolicy::default(),
    );
    (store, service)
}

/// Fresh, migrated in-memory SQLite database.
///
/// A single pooled connection keeps every query on the same database.
pub async fn sqlite() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = connect_with(&config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}
