//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Expense ledger rules.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://hrledger.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Expense ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Aggregate ceiling for a single employee's yearly ledger.
    #[serde(default = "default_expense_cap")]
    pub expense_cap: Decimal,
    /// Icon assigned to ranges submitted without one.
    #[serde(default = "default_icon")]
    pub default_icon: String,
    /// Key of the range configuration this deployment reads and writes.
    #[serde(default = "default_deployment_key")]
    pub deployment_key: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            expense_cap: default_expense_cap(),
            default_icon: default_icon(),
            deployment_key: default_deployment_key(),
        }
    }
}

fn default_expense_cap() -> Decimal {
    Decimal::from(15_000)
}

fn default_icon() -> String {
    "default-icon".to_string()
}

fn default_deployment_key() -> String {
    crate::types::ConfigKey::DEFAULT.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "hrledger=debug,sea_orm=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or
    /// `ledger.expense_cap` is not positive.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HRLEDGER").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        if app.ledger.expense_cap <= Decimal::ZERO {
            return Err(config::ConfigError::Message(format!(
                "ledger.expense_cap must be positive, got {}",
                app.ledger.expense_cap
            )));
        }
        Ok(app)
    }
}
