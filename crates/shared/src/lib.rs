//! Shared types, errors, and configuration for HRLedger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs and opaque keys for entity references
//! - The calendar-year anchor used by expense ledgers
//! - Application-wide error types
//! - Configuration management
//! - Tracing bootstrap for binaries

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
