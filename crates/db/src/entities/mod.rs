//! `SeaORM` entities.
//!
//! Ledgers and range configurations are stored as JSON documents. Only the
//! columns needed for lookups and the optimistic version are broken out.

pub mod expense_ledgers;
pub mod range_configs;
