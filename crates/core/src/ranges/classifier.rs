//! Classification of EPF numbers into configured ranges.
//!
//! Classification never fails exceptionally: "not in any range" is a normal
//! business outcome and is reported through [`ClassificationReason`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::RangeValidationError;
use super::types::{RangeConfig, UNASSIGNED_RANGE};

/// Why a classification produced its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    /// Identifier falls within a configured range.
    Matched,
    /// Identifier is above every range boundary but within the system maximum.
    Unassigned,
    /// No ranges configured; identifier is valid against the maximum only.
    NoRangesConfigured,
    /// No range configuration exists.
    ConfigMissing,
    /// Identifier is above the system maximum.
    ExceedsMaximum,
    /// Identifier is zero or negative.
    NonPositive,
}

impl std::fmt::Display for ClassificationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Matched => "matched a configured range",
            Self::Unassigned => "above all configured ranges",
            Self::NoRangesConfigured => "no ranges configured",
            Self::ConfigMissing => "range configuration missing",
            Self::ExceedsMaximum => "exceeds maximum EPF",
            Self::NonPositive => "must be positive",
        };
        f.write_str(text)
    }
}

/// Result of classifying an EPF number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the identifier is acceptable.
    pub valid: bool,
    /// Matched range name, [`UNASSIGNED_RANGE`], or `None`.
    pub range_name: Option<String>,
    /// Outcome detail.
    pub reason: ClassificationReason,
}

impl Classification {
    fn valid(range_name: Option<String>, reason: ClassificationReason) -> Self {
        Self {
            valid: true,
            range_name,
            reason,
        }
    }

    fn invalid(reason: ClassificationReason) -> Self {
        Self {
            valid: false,
            range_name: None,
            reason,
        }
    }
}

/// Determines which configured range `identifier` belongs to.
#[must_use]
pub fn classify(identifier: i64, config: Option<&RangeConfig>) -> Classification {
    let Some(config) = config else {
        return Classification::invalid(ClassificationReason::ConfigMissing);
    };

    if Decimal::from(identifier) > config.max_epf {
        return Classification::invalid(ClassificationReason::ExceedsMaximum);
    }

    if identifier <= 0 {
        return Classification::invalid(ClassificationReason::NonPositive);
    }

    if config.ranges.is_empty() {
        return Classification::valid(None, ClassificationReason::NoRangesConfigured);
    }

    // Stored configs are already sorted; re-sorting keeps hand-built ones correct.
    let mut ordered: Vec<_> = config.ranges.iter().collect();
    ordered.sort_by_key(|range| range.max_value);

    match ordered.iter().find(|range| range.max_value >= identifier) {
        Some(range) => {
            Classification::valid(Some(range.name.clone()), ClassificationReason::Matched)
        }
        None => Classification::valid(
            Some(UNASSIGNED_RANGE.to_string()),
            ClassificationReason::Unassigned,
        ),
    }
}

/// Validates an EPF number about to be assigned to an employee.
///
/// # Errors
///
/// Returns [`RangeValidationError::EpfNumberRejected`] when classification
/// reports the identifier as invalid.
pub fn check_epf_number(
    identifier: i64,
    config: Option<&RangeConfig>,
) -> Result<Classification, RangeValidationError> {
    let classification = classify(identifier, config);
    if classification.valid {
        Ok(classification)
    } else {
        Err(RangeValidationError::EpfNumberRejected {
            identifier,
            reason: classification.reason,
        })
    }
}
