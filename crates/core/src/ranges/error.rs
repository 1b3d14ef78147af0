//! Range configuration error types.

use hrledger_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::classifier::ClassificationReason;
use crate::store::StoreError;

/// Errors raised while validating a range configuration or an EPF number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeValidationError {
    /// The system maximum is not a positive number.
    #[error("Maximum EPF must be a positive number, got {0}")]
    InvalidMaxEpf(Decimal),

    /// A range name is empty after trimming.
    #[error("Range at position {position} has an empty name")]
    EmptyRangeName {
        /// Zero-based position in the submitted list.
        position: usize,
    },

    /// A range bound could not be read as an integer.
    #[error("Range '{name}' has a non-numeric max value")]
    InvalidMaxValue {
        /// Range name.
        name: String,
    },

    /// A range bound is zero or negative.
    #[error("Range '{name}' max value must be positive, got {max_value}")]
    NonPositiveMaxValue {
        /// Range name.
        name: String,
        /// Submitted bound.
        max_value: i64,
    },

    /// A range bound is above the system maximum.
    #[error("Range '{name}' max value ({max_value}) exceeds maximum EPF ({max_epf})")]
    RangeExceedsMaxEpf {
        /// Range name.
        name: String,
        /// Submitted bound.
        max_value: i64,
        /// System maximum.
        max_epf: Decimal,
    },

    /// Two ranges share a name (case-insensitive, trimmed).
    #[error("Duplicate range name: {0}")]
    DuplicateRangeName(String),

    /// Two adjacent ranges do not have strictly increasing bounds.
    #[error("Ranges '{lower}' and '{upper}' overlap at max value {max_value}")]
    OverlappingRanges {
        /// Range with the lower (or equal) bound.
        lower: String,
        /// Range that follows it.
        upper: String,
        /// Boundary of `lower`.
        max_value: i64,
    },

    /// An EPF number was rejected by classification.
    #[error("EPF number {identifier} rejected: {reason}")]
    EpfNumberRejected {
        /// Submitted identifier.
        identifier: i64,
        /// Why classification failed.
        reason: ClassificationReason,
    },
}

impl RangeValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMaxEpf(_) => "INVALID_MAX_EPF",
            Self::EmptyRangeName { .. } => "EMPTY_RANGE_NAME",
            Self::InvalidMaxValue { .. } => "INVALID_MAX_VALUE",
            Self::NonPositiveMaxValue { .. } => "NON_POSITIVE_MAX_VALUE",
            Self::RangeExceedsMaxEpf { .. } => "RANGE_EXCEEDS_MAX_EPF",
            Self::DuplicateRangeName(_) => "DUPLICATE_RANGE_NAME",
            Self::OverlappingRanges { .. } => "OVERLAPPING_RANGES",
            Self::EpfNumberRejected { .. } => "EPF_NUMBER_REJECTED",
        }
    }
}

/// Errors from the range configuration service.
#[derive(Debug, Error)]
pub enum RangeConfigError {
    /// Submitted configuration is invalid.
    #[error(transparent)]
    Validation(#[from] RangeValidationError),

    /// No configuration stored under the deployment key.
    #[error("Range configuration not found: {0}")]
    NotFound(String),

    /// Storage failure, propagated unchanged.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RangeConfigError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::NotFound(_) => "RANGE_CONFIG_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Storage(StoreError::ConcurrentModification) => 409,
            Self::Storage(StoreError::Storage(_)) => 500,
        }
    }
}

impl From<RangeValidationError> for AppError {
    fn from(err: RangeValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RangeConfigError> for AppError {
    fn from(err: RangeConfigError) -> Self {
        match err {
            RangeConfigError::Validation(inner) => inner.into(),
            RangeConfigError::NotFound(_) => Self::NotFound(err.to_string()),
            RangeConfigError::Storage(StoreError::ConcurrentModification) => {
                Self::Conflict(err.to_string())
            }
            RangeConfigError::Storage(StoreError::Storage(_)) => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes_and_status() {
        let err = RangeConfigError::from(RangeValidationError::DuplicateRangeName("A".into()));
        assert_eq!(err.error_code(), "DUPLICATE_RANGE_NAME");
        assert_eq!(err.http_status_code(), 400);

        let err = RangeConfigError::Storage(StoreError::Storage("down".into()));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_exceeds_message_names_range_and_values() {
        let err = RangeValidationError::RangeExceedsMaxEpf {
            name: "Senior".into(),
            max_value: 60_000,
            max_epf: dec!(50000),
        };
        assert_eq!(
            err.to_string(),
            "Range 'Senior' max value (60000) exceeds maximum EPF (50000)"
        );
    }

    #[test]
    fn test_converts_into_app_error() {
        let app: AppError = RangeConfigError::NotFound("default".into()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = RangeValidationError::InvalidMaxEpf(dec!(0)).into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
