//! SeaORM stores against an in-memory SQLite database.

mod common;

use std::sync::Arc;

use hrledger_core::expense::{
    ExpenseError, ExpenseLedger, ExpenseLedgerService, LedgerFilter, LedgerKey, LedgerPolicy,
};
use hrledger_core::ranges::{ClassificationReason, RangeConfigService, RangeInput};
use hrledger_core::store::{LedgerStore, RangeConfigStore, StoreError};
use hrledger_db::{SeaOrmLedgerStore, SeaOrmRangeConfigStore};
use hrledger_shared::types::{ConfigKey, EmployeeRef, LedgerYear};
use rust_decimal_macros::dec;

use common::{at, bucket, regular, sample_config, sqlite};

fn key(employee: &str, year: i32) -> LedgerKey {
    LedgerKey::new(EmployeeRef::from(employee), LedgerYear::new(year))
}

#[tokio::test]
async fn test_ledger_round_trips_through_document() {
    let store = SeaOrmLedgerStore::new(sqlite().await);
    let mut ledger = ExpenseLedger::new(key("emp1", 2024));
    ledger.merge(&bucket("Low", &[dec!(12.50)], at(2024, 3, 1)), at(2024, 3, 2));

    let saved = store.save(ledger.clone(), None).await.unwrap();
    assert_eq!(saved.version, 1);

    let by_key = store.find_by_key(&key("emp1", 2024)).await.unwrap().unwrap();
    let by_id = store.find_by_id(ledger.id).await.unwrap().unwrap();
    assert_eq!(by_key, saved);
    assert_eq!(by_id, saved);
    assert_eq!(by_key.total_expense, dec!(12.50));
    assert!(store.find_by_key(&key("emp1", 2023)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stale_version_is_rejected() {
    let store = SeaOrmLedgerStore::new(sqlite().await);
    let ledger = ExpenseLedger::new(key("emp1", 2024));

    let v1 = store.save(ledger, None).await.unwrap();
    let v2 = store.save(v1.clone(), Some(1)).await.unwrap();
    assert_eq!(v2.version, 2);

    let stale = store.save(v1, Some(1)).await;
    assert_eq!(stale, Err(StoreError::ConcurrentModification));
}

#[tokio::test]
async fn test_duplicate_key_insert_is_a_conflict() {
    let store = SeaOrmLedgerStore::new(sqlite().await);

    store
        .save(ExpenseLedger::new(key("emp1", 2024)), None)
        .await
        .unwrap();
    let second = store
        .save(ExpenseLedger::new(key("emp1", 2024)), None)
        .await;

    assert_eq!(second, Err(StoreError::ConcurrentModification));
}

#[tokio::test]
async fn test_list_filters_and_cascade_delete() {
    let store = SeaOrmLedgerStore::new(sqlite().await);
    for (employee, year) in [("emp1", 2023), ("emp1", 2024), ("emp2", 2024)] {
        store
            .save(ExpenseLedger::new(key(employee, year)), None)
            .await
            .unwrap();
    }

    let in_2024 = store
        .list(&LedgerFilter {
            employee_ref: None,
            year: Some(LedgerYear::new(2024)),
        })
        .await
        .unwrap();
    assert_eq!(in_2024.len(), 2);

    let deleted = store
        .delete_for_employee(&EmployeeRef::from("emp1"))
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(store.list(&LedgerFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_range_config_upsert() {
    let store = SeaOrmRangeConfigStore::new(sqlite().await);
    let key = ConfigKey::default();
    assert!(store.get_config(&key).await.unwrap().is_none());

    store.save_config(&key, sample_config()).await.unwrap();
    let mut replaced = sample_config();
    replaced.ranges.clear();
    store.save_config(&key, replaced.clone()).await.unwrap();

    assert_eq!(store.get_config(&key).await.unwrap(), Some(replaced));
    assert!(
        store
            .get_config(&ConfigKey::new("other"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_services_over_sqlite() {
    let db = sqlite().await;
    let ledgers = Arc::new(SeaOrmLedgerStore::new(db.clone()));
    let configs = Arc::new(SeaOrmRangeConfigStore::new(db));

    let ranges = RangeConfigService::new(Arc::clone(&configs), ConfigKey::default());
    let inputs = vec![RangeInput::new("Low", 10_000), RangeInput::new("High", 30_000)];
    ranges
        .update(dec!(50000), Some(inputs.as_slice()))
        .await
        .unwrap();
    assert_eq!(
        ranges.classify(25_000).await.unwrap().range_name.as_deref(),
        Some("High")
    );

    let service = ExpenseLedgerService::new(
        ledgers,
        configs,
        ConfigKey::default(),
        LedgerPolicy::default(),
    );
    let emp = EmployeeRef::from("emp1");
    let first = service
        .upsert(&emp, at(2024, 3, 1), &regular(&[dec!(5000)], at(2024, 3, 1)))
        .await
        .unwrap();
    let rejected = service
        .upsert(&emp, at(2024, 6, 1), &regular(&[dec!(11000)], at(2024, 6, 1)))
        .await;
    assert!(matches!(rejected, Err(ExpenseError::CapExceeded { .. })));

    let stored = service.require(first.id).await.unwrap();
    assert_eq!(stored.total_expense, dec!(5000));
    assert_eq!(stored.version, 1);

    let unknown = service
        .upsert(&emp, at(2024, 6, 2), &bucket("Mid", &[dec!(1)], at(2024, 6, 2)))
        .await;
    assert_eq!(unknown, Err(ExpenseError::UnknownRange("Mid".into())));

    let missing = ranges.classify(60_000).await.unwrap();
    assert_eq!(missing.reason, ClassificationReason::ExceedsMaximum);
}
