//! Expense ledger error types.

use chrono::{DateTime, Utc};
use hrledger_shared::AppError;
use hrledger_shared::types::LedgerId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::ExpenseKind;
use crate::store::StoreError;

/// Errors that can occur during expense ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    // ========== Validation Errors ==========
    /// Expense amount is zero or negative.
    #[error("Expense amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// A submitted range bucket has an empty name.
    #[error("Range bucket name cannot be empty")]
    EmptyRangeName,

    /// A submitted range bucket does not name a configured range.
    #[error("Unknown range: {0}")]
    UnknownRange(String),

    /// Deleting a range expense requires the bucket name.
    #[error("Range name is required to delete a range expense")]
    MissingRangeName,

    // ========== Business Rule Errors ==========
    /// The write would push the ledger total above the cap.
    #[error("Total expense {attempted} would exceed the cap of {cap}")]
    CapExceeded {
        /// Total the ledger would have reached.
        attempted: Decimal,
        /// Configured cap.
        cap: Decimal,
    },

    // ========== Not Found Errors ==========
    /// Ledger not found.
    #[error("Expense ledger not found: {0}")]
    LedgerNotFound(LedgerId),

    /// Range bucket not found in the ledger.
    #[error("Range bucket not found: {0}")]
    BucketNotFound(String),

    /// No entry matched the deletion key.
    #[error("No {kind} expense recorded at {created_at}")]
    ExpenseNotFound {
        /// Stream searched.
        kind: ExpenseKind,
        /// Creation timestamp searched for.
        created_at: DateTime<Utc>,
    },

    // ========== Concurrency Errors ==========
    /// The ledger changed between read and write.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Storage Errors ==========
    /// Storage failure, propagated unchanged.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for ExpenseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConcurrentModification => Self::ConcurrentModification,
            StoreError::Storage(message) => Self::Storage(message),
        }
    }
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::EmptyRangeName => "EMPTY_RANGE_NAME",
            Self::UnknownRange(_) => "UNKNOWN_RANGE",
            Self::MissingRangeName => "MISSING_RANGE_NAME",
            Self::CapExceeded { .. } => "CAP_EXCEEDED",
            Self::LedgerNotFound(_) => "LEDGER_NOT_FOUND",
            Self::BucketNotFound(_) => "BUCKET_NOT_FOUND",
            Self::ExpenseNotFound { .. } => "EXPENSE_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount(_)
            | Self::EmptyRangeName
            | Self::UnknownRange(_)
            | Self::MissingRangeName => 400,

            // 422 Unprocessable - business rule violations
            Self::CapExceeded { .. } => 422,

            // 404 Not Found
            Self::LedgerNotFound(_) | Self::BucketNotFound(_) | Self::ExpenseNotFound { .. } => {
                404
            }

            // 409 Conflict - concurrency errors
            Self::ConcurrentModification => 409,

            // 500 Internal Server Error
            Self::Storage(_) => 500,
        }
    }

    /// Whether the caller can fix the request and resubmit.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => Self::Database(message),
        }
    }
}
