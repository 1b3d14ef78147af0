//! Database seeder for HRLedger development and testing.
//!
//! Runs pending migrations, stores a demo range configuration, files demo
//! EPF expenses for a handful of employees across the current and previous
//! year, then logs the dashboard and range breakdown.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use hrledger_core::expense::{
    ExpenseLedgerService, ExpenseSubmission, LedgerFilter, NewExpense, NewRangeBucket,
};
use hrledger_core::ranges::{RangeConfigService, RangeInput, UNASSIGNED_RANGE};
use hrledger_core::reports::ReportService;
use hrledger_db::migration::{Migrator, MigratorTrait};
use hrledger_db::{SeaOrmLedgerStore, SeaOrmRangeConfigStore, connect_with};
use hrledger_shared::AppConfig;
use hrledger_shared::telemetry::init_tracing;
use hrledger_shared::types::{EmployeeRef, LedgerYear};
use rust_decimal::Decimal;
use tracing::info;

type Ledgers = ExpenseLedgerService<SeaOrmLedgerStore, SeaOrmRangeConfigStore>;
type Ranges = RangeConfigService<SeaOrmRangeConfigStore>;

/// Demo employees and their EPF numbers.
const EMPLOYEES: [(&str, i64); 4] = [
    ("EMP-0001", 4_500),
    ("EMP-0002", 18_250),
    ("EMP-0003", 39_900),
    ("EMP-0004", 47_000),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.log.filter);

    info!("Connecting to database...");
    let db = connect_with(&config.database).await?;
    Migrator::up(&db, None).await?;

    let ledger_store = Arc::new(SeaOrmLedgerStore::new(db.clone()));
    let config_store = Arc::new(SeaOrmRangeConfigStore::new(db));
    let ranges = RangeConfigService::from_config(Arc::clone(&config_store), &config.ledger);
    let ledgers = ExpenseLedgerService::from_config(ledger_store, config_store, &config.ledger);

    info!("Seeding range configuration...");
    seed_ranges(&ranges).await?;

    info!("Seeding expense ledgers...");
    let now = Utc::now();
    seed_ledgers(&ledgers, &ranges, now).await?;

    log_reports(&ledgers, &ranges, now).await?;

    info!("Seeding complete!");
    Ok(())
}

/// Stores the demo configuration unless one already exists.
async fn seed_ranges(ranges: &Ranges) -> anyhow::Result<()> {
    if ranges.get().await?.is_some() {
        info!(key = %ranges.key(), "Range configuration already exists, skipping...");
        return Ok(());
    }

    let inputs = vec![
        RangeInput {
            description: Some("Junior staff".to_string()),
            ..RangeInput::new("Tier 1", 10_000)
        },
        RangeInput {
            description: Some("Senior staff".to_string()),
            icon: Some(serde_json::Value::from("stethoscope")),
            ..RangeInput::new("Tier 2", 25_000)
        },
        RangeInput::new("Tier 3", 40_000),
    ];
    ranges
        .update(Decimal::from(50_000), Some(inputs.as_slice()))
        .await?;
    Ok(())
}

/// Files a year of demo expenses per employee, for this year and last.
///
/// Employees whose EPF number falls in a configured range also get entries in
/// that range's bucket. Years that already have a ledger are skipped.
async fn seed_ledgers(
    ledgers: &Ledgers,
    ranges: &Ranges,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let this_year = LedgerYear::from_datetime(now);

    for (index, (employee, epf_number)) in (1_i64..).zip(EMPLOYEES) {
        let employee_ref = EmployeeRef::from(employee);
        let classification = ranges.check_epf_number(epf_number).await?;

        for year in [this_year.previous(), this_year] {
            let existing = ledgers
                .list(&LedgerFilter {
                    employee_ref: Some(employee_ref.clone()),
                    year: Some(year),
                })
                .await?;
            if !existing.is_empty() {
                info!(employee, %year, "Ledger already exists, skipping...");
                continue;
            }

            // Last year is fully in the past; this year stops at `now`.
            let anchor = if year == this_year {
                now
            } else {
                year.end() - Duration::days(1)
            };
            let regular = (0..3)
                .map(|month| {
                    NewExpense::new(
                        Decimal::new(index * 45_000 + month * 12_550, 2),
                        clamp_to_year(anchor - Duration::days(month * 40), year),
                    )
                })
                .collect();
            let buckets = classification
                .range_name
                .iter()
                .filter(|name| is_bucket_name(name))
                .map(|name| NewRangeBucket {
                    name: name.clone(),
                    expenses: vec![NewExpense::new(
                        Decimal::new(index * 30_000, 2),
                        clamp_to_year(anchor - Duration::days(10), year),
                    )],
                })
                .collect();

            let ledger = ledgers
                .upsert(
                    &employee_ref,
                    year.start(),
                    &ExpenseSubmission {
                        regular,
                        ranges: buckets,
                    },
                )
                .await?;
            info!(
                employee,
                %year,
                total = %ledger.total_expense,
                range = classification.range_name.as_deref().unwrap_or("-"),
                "Seeded ledger"
            );
        }
    }

    Ok(())
}

/// The catch-all label is a classification outcome, not a bucket.
fn is_bucket_name(name: &str) -> bool {
    name != UNASSIGNED_RANGE
}

fn clamp_to_year(at: DateTime<Utc>, year: LedgerYear) -> DateTime<Utc> {
    if at.year() == year.value() {
        at
    } else {
        year.start()
    }
}

/// Logs the dashboard summary and this year's range breakdown.
async fn log_reports(
    ledgers: &Ledgers,
    ranges: &Ranges,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let all = ledgers.list(&LedgerFilter::default()).await?;
    let config = ranges.get().await?;

    let dashboard = ReportService::dashboard(&all, now, ledgers.policy());
    info!(
        year = %dashboard.year,
        total_this_year = %dashboard.year_over_year.total_this_year,
        total_last_year = %dashboard.year_over_year.total_last_year,
        change = ?dashboard.year_over_year.change,
        active_employees = dashboard.active_employees,
        average_cap_utilisation = %dashboard.average_cap_utilisation,
        "Dashboard"
    );
    info!(monthly = %serde_json::to_string(&dashboard.monthly)?, "Monthly contributions");

    let breakdown = ReportService::range_breakdown(&all, dashboard.year, config.as_ref());
    info!(breakdown = %serde_json::to_string(&breakdown)?, "Range breakdown");

    Ok(())
}
