//! EPF ledger and range configuration tables.
//!
//! Plain SQL that runs unchanged on PostgreSQL and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in UP_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS expense_ledgers;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS range_configs;")
            .await?;
        Ok(())
    }
}

const UP_SQL: [&str; 4] = [
    r"
CREATE TABLE expense_ledgers (
    id VARCHAR(36) PRIMARY KEY,
    employee_ref VARCHAR(64) NOT NULL,
    year INTEGER NOT NULL,
    version BIGINT NOT NULL CHECK (version > 0),
    document TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);",
    // One ledger per employee per calendar year
    r"
CREATE UNIQUE INDEX idx_expense_ledgers_employee_year
    ON expense_ledgers(employee_ref, year);",
    r"
CREATE INDEX idx_expense_ledgers_year ON expense_ledgers(year);",
    r"
CREATE TABLE range_configs (
    config_key VARCHAR(64) PRIMARY KEY,
    document TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);",
];
