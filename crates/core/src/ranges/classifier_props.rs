//! Property-based tests for EPF number classification.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::classifier::{ClassificationReason, classify};
use super::types::{RangeConfig, RangeInput, UNASSIGNED_RANGE};
use super::validation::validate_and_normalize;

/// Strategy to generate a valid configuration with strictly increasing bounds.
fn valid_config() -> impl Strategy<Value = RangeConfig> {
    (100i64..100_000i64, prop::collection::btree_set(1i64..100_000i64, 0..6)).prop_filter_map(
        "bounds must not exceed the maximum",
        |(max, bounds)| {
            let ranges: Vec<RangeInput> = bounds
                .into_iter()
                .filter(|bound| *bound <= max)
                .enumerate()
                .map(|(i, bound)| RangeInput::new(format!("Band {i}"), bound))
                .collect();
            validate_and_normalize(Decimal::from(max), Some(ranges.as_slice())).ok()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every identifier in `(0, max_epf]` is valid, with a range name unless
    /// no ranges are configured.
    #[test]
    fn prop_classification_total_within_maximum(
        config in valid_config(),
        seed in any::<u32>(),
    ) {
        let max = config.max_epf.to_i64().unwrap_or(i64::MAX);
        let identifier = i64::from(seed) % max + 1;

        let result = classify(identifier, Some(&config));

        prop_assert!(result.valid);
        if config.ranges.is_empty() {
            prop_assert_eq!(result.reason, ClassificationReason::NoRangesConfigured);
        } else if let Some(range) = config.ranges.iter().find(|r| r.max_value >= identifier) {
            prop_assert_eq!(result.range_name.as_deref(), Some(range.name.as_str()));
        } else {
            prop_assert_eq!(result.range_name.as_deref(), Some(UNASSIGNED_RANGE));
        }
    }

    /// Every identifier above `max_epf` is rejected.
    #[test]
    fn prop_above_maximum_rejected(
        config in valid_config(),
        excess in 1i64..1_000_000i64,
    ) {
        let max = config.max_epf.to_i64().unwrap_or(i64::MAX);

        let result = classify(max + excess, Some(&config));

        prop_assert!(!result.valid);
        prop_assert_eq!(result.reason, ClassificationReason::ExceedsMaximum);
    }
}
