//! Keyed range configuration service.

use std::sync::Arc;

use hrledger_shared::config::LedgerConfig;
use hrledger_shared::types::ConfigKey;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::classifier::{Classification, check_epf_number, classify};
use super::error::RangeConfigError;
use super::types::{DEFAULT_RANGE_ICON, RangeConfig, RangeInput};
use super::validation::validate_and_normalize_with_icon;
use crate::store::RangeConfigStore;

/// Reads, replaces, and classifies against one deployment's range config.
pub struct RangeConfigService<S> {
    store: Arc<S>,
    key: ConfigKey,
    default_icon: String,
}

impl<S: RangeConfigStore> RangeConfigService<S> {
    /// Creates a service for `key` with the built-in default icon.
    #[must_use]
    pub fn new(store: Arc<S>, key: ConfigKey) -> Self {
        Self {
            store,
            key,
            default_icon: DEFAULT_RANGE_ICON.to_string(),
        }
    }

    /// Creates a service from the `ledger` configuration section.
    #[must_use]
    pub fn from_config(store: Arc<S>, config: &LedgerConfig) -> Self {
        Self {
            store,
            key: ConfigKey::new(config.deployment_key.clone()),
            default_icon: config.default_icon.clone(),
        }
    }

    /// The deployment key this service operates on.
    #[must_use]
    pub fn key(&self) -> &ConfigKey {
        &self.key
    }

    /// Returns the current configuration, if any.
    pub async fn get(&self) -> Result<Option<RangeConfig>, RangeConfigError> {
        Ok(self.store.get_config(&self.key).await?)
    }

    /// Returns the current configuration or `NotFound`.
    pub async fn require(&self) -> Result<RangeConfig, RangeConfigError> {
        self.get()
            .await?
            .ok_or_else(|| RangeConfigError::NotFound(self.key.to_string()))
    }

    /// Validates and atomically replaces the configuration.
    ///
    /// `None` or an empty list clears the ranges while keeping `max_epf`.
    pub async fn update(
        &self,
        max_epf: Decimal,
        ranges: Option<&[RangeInput]>,
    ) -> Result<RangeConfig, RangeConfigError> {
        let config = validate_and_normalize_with_icon(max_epf, ranges, &self.default_icon)?;
        let saved = self.store.save_config(&self.key, config).await?;

        info!(
            key = %self.key,
            max_epf = %saved.max_epf,
            ranges = saved.ranges.len(),
            "Range configuration updated"
        );
        Ok(saved)
    }

    /// Classifies `identifier` against the stored configuration.
    pub async fn classify(&self, identifier: i64) -> Result<Classification, RangeConfigError> {
        let config = self.get().await?;
        let result = classify(identifier, config.as_ref());
        debug!(identifier, valid = result.valid, reason = %result.reason, "EPF number classified");
        Ok(result)
    }

    /// Validates an EPF number for a new or updated employee.
    pub async fn check_epf_number(
        &self,
        identifier: i64,
    ) -> Result<Classification, RangeConfigError> {
        let config = self.get().await?;
        Ok(check_epf_number(identifier, config.as_ref())?)
    }
}
