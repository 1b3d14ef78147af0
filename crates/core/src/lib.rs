//! Core business logic for HRLedger's EPF medical-allowance scheme.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the async ports in [`store`].
//!
//! # Modules
//!
//! - `ranges` - Range configuration validation and EPF number classification
//! - `expense` - Per-employee yearly expense ledgers with an aggregate cap
//! - `reports` - Monthly, year-over-year, and per-range statistics
//! - `store` - Persistence ports implemented by the db crate

pub mod expense;
pub mod ranges;
pub mod reports;
pub mod store;

pub use store::{LedgerStore, RangeConfigStore, StoreError};
