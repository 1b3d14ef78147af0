//! Common types used across the application.

pub mod id;
pub mod year;

pub use id::*;
pub use year::LedgerYear;
