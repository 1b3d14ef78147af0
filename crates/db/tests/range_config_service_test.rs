//! Range configuration service tests against the embedded store.

use std::sync::Arc;

use hrledger_core::ranges::{
    ClassificationReason, RangeConfigError, RangeConfigService, RangeInput, RangeValidationError,
    UNASSIGNED_RANGE,
};
use hrledger_db::InMemoryStore;
use hrledger_shared::config::LedgerConfig;
use hrledger_shared::types::ConfigKey;
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::json;

fn service() -> RangeConfigService<InMemoryStore> {
    RangeConfigService::new(Arc::new(InMemoryStore::new()), ConfigKey::default())
}

fn scenario_a() -> Vec<RangeInput> {
    vec![RangeInput::new("A", 10_000), RangeInput::new("B", 30_000)]
}

#[rstest]
#[case(25_000, true, Some("B"), ClassificationReason::Matched)]
#[case(10_000, true, Some("A"), ClassificationReason::Matched)]
#[case(40_000, true, Some(UNASSIGNED_RANGE), ClassificationReason::Unassigned)]
#[case(60_000, false, None, ClassificationReason::ExceedsMaximum)]
#[case(0, false, None, ClassificationReason::NonPositive)]
#[tokio::test]
async fn test_classify_against_stored_config(
    #[case] identifier: i64,
    #[case] valid: bool,
    #[case] range_name: Option<&str>,
    #[case] reason: ClassificationReason,
) {
    let service = service();
    service
        .update(dec!(50000), Some(scenario_a().as_slice()))
        .await
        .unwrap();

    let result = service.classify(identifier).await.unwrap();

    assert_eq!(result.valid, valid);
    assert_eq!(result.range_name.as_deref(), range_name);
    assert_eq!(result.reason, reason);
}

#[tokio::test]
async fn test_missing_config() {
    let service = service();

    assert_eq!(
        service.classify(1).await.unwrap().reason,
        ClassificationReason::ConfigMissing
    );
    assert!(matches!(
        service.require().await,
        Err(RangeConfigError::NotFound(key)) if key == "default"
    ));
    assert!(matches!(
        service.check_epf_number(1).await,
        Err(RangeConfigError::Validation(RangeValidationError::EpfNumberRejected { .. }))
    ));
}

#[tokio::test]
async fn test_update_replaces_and_clears() {
    let service = service();
    service
        .update(dec!(50000), Some(scenario_a().as_slice()))
        .await
        .unwrap();

    let cleared = service.update(dec!(40000), None).await.unwrap();
    assert!(cleared.ranges.is_empty());
    assert_eq!(cleared.max_epf, dec!(40000));

    let result = service.classify(39_999).await.unwrap();
    assert!(result.valid);
    assert_eq!(result.reason, ClassificationReason::NoRangesConfigured);
}

#[tokio::test]
async fn test_invalid_update_keeps_previous_config() {
    let service = service();
    let original = service
        .update(dec!(50000), Some(scenario_a().as_slice()))
        .await
        .unwrap();

    let overlapping = vec![RangeInput::new("x", 100), RangeInput::new("y", 100)];
    let err = service
        .update(dec!(50000), Some(overlapping.as_slice()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RangeConfigError::Validation(RangeValidationError::OverlappingRanges { .. })
    ));
    assert_eq!(service.require().await.unwrap(), original);
}

#[tokio::test]
async fn test_configured_icon_and_key() {
    let store = Arc::new(InMemoryStore::new());
    let config = LedgerConfig {
        default_icon: "medkit".to_string(),
        deployment_key: "clinic".to_string(),
        ..LedgerConfig::default()
    };
    let service = RangeConfigService::from_config(Arc::clone(&store), &config);

    let inputs = vec![RangeInput {
        icon: Some(json!("  ")),
        ..RangeInput::new("A", 10)
    }];
    let saved = service
        .update(dec!(100), Some(inputs.as_slice()))
        .await
        .unwrap();

    assert_eq!(service.key().as_str(), "clinic");
    assert_eq!(saved.ranges[0].icon, "medkit");
    assert!(
        RangeConfigService::new(store, ConfigKey::default())
            .get()
            .await
            .unwrap()
            .is_none()
    );
}
