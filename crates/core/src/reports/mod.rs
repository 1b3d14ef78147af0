//! EPF reporting.
//!
//! Pure derivations over fetched ledgers:
//! - Monthly contributions over a rolling 12-month window
//! - Year-over-year totals and percentage change
//! - Per-range breakdown of a year's expenses
//! - Dashboard summary composing the above

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
