//! `SeaORM`-backed range configuration store.

use async_trait::async_trait;
use chrono::Utc;
use hrledger_core::ranges::RangeConfig;
use hrledger_core::store::{RangeConfigStore, StoreError};
use hrledger_shared::types::ConfigKey;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use super::storage_error;
use crate::entities::range_configs;

/// Range configuration store over a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SeaOrmRangeConfigStore {
    db: DatabaseConnection,
}

impl SeaOrmRangeConfigStore {
    /// Creates a new range configuration store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RangeConfigStore for SeaOrmRangeConfigStore {
    async fn get_config(&self, key: &ConfigKey) -> Result<Option<RangeConfig>, StoreError> {
        range_configs::Entity::find_by_id(key.as_str().to_string())
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .map(|model| serde_json::from_str(&model.document).map_err(storage_error))
            .transpose()
    }

    async fn save_config(
        &self,
        key: &ConfigKey,
        config: RangeConfig,
    ) -> Result<RangeConfig, StoreError> {
        let model = range_configs::ActiveModel {
            config_key: Set(key.as_str().to_string()),
            document: Set(serde_json::to_string(&config).map_err(storage_error)?),
            updated_at: Set(Utc::now()),
        };

        range_configs::Entity::insert(model)
            .on_conflict(
                OnConflict::column(range_configs::Column::ConfigKey)
                    .update_columns([
                        range_configs::Column::Document,
                        range_configs::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(config)
    }
}
