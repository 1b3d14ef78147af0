//! Range configuration data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Icon given to a range submitted without a usable one.
pub const DEFAULT_RANGE_ICON: &str = "default-icon";

/// Name reported for identifiers above every configured range boundary.
pub const UNASSIGNED_RANGE: &str = "Unassigned";

/// A named bucket with an inclusive upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Display name, trimmed and unique (case-insensitive) within a config.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Inclusive upper bound.
    pub max_value: i64,
    /// Icon identifier.
    pub icon: String,
}

/// A validated range configuration.
///
/// `ranges` is sorted ascending by `max_value` with strictly increasing
/// boundaries, every boundary `<= max_epf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// System-wide EPF ceiling.
    pub max_epf: Decimal,
    /// Ordered ranges. Empty means "explicitly cleared".
    pub ranges: Vec<Range>,
}

impl RangeConfig {
    /// Looks up a range by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Range> {
        self.ranges.iter().find(|range| range.name == name)
    }

    /// Position of a range in boundary order, by exact name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.ranges.iter().position(|range| range.name == name)
    }
}

/// Unvalidated range as submitted by an administrator.
///
/// `max_value` and `icon` arrive loosely typed (form fields, JSON bodies),
/// so they are kept as raw JSON values until validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeInput {
    /// Range name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Upper bound, a number or a numeric string.
    #[serde(default)]
    pub max_value: Value,
    /// Icon, defaulted when blank or not a string.
    #[serde(default)]
    pub icon: Option<Value>,
}

impl RangeInput {
    /// Convenience constructor for a range with an integer bound.
    #[must_use]
    pub fn new(name: impl Into<String>, max_value: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            max_value: Value::from(max_value),
            icon: None,
        }
    }
}
