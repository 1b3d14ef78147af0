//! EPF range configuration.
//!
//! This module implements:
//! - Validation and normalization of the range set against the system maximum
//! - Classification of EPF numbers into configured ranges
//! - The keyed configuration service used by administrative callers

pub mod classifier;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod classifier_props;
#[cfg(test)]
mod validation_props;

pub use crate::store::RangeConfigStore;
pub use classifier::{Classification, ClassificationReason, check_epf_number, classify};
pub use error::{RangeConfigError, RangeValidationError};
pub use service::RangeConfigService;
pub use types::{DEFAULT_RANGE_ICON, Range, RangeConfig, RangeInput, UNASSIGNED_RANGE};
pub use validation::{validate_and_normalize, validate_and_normalize_with_icon};
