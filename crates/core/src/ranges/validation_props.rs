//! Property-based tests for range validation.
//!
//! - Ranges above the system maximum are always rejected
//! - Accepted configurations are strictly ascending

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::RangeValidationError;
use super::types::RangeInput;
use super::validation::validate_and_normalize;

/// Strategy to generate a system maximum (1 to 1,000,000).
fn max_epf() -> impl Strategy<Value = i64> {
    1i64..1_000_000i64
}

/// Strategy to generate a list of distinct-name range inputs with arbitrary bounds.
fn range_inputs(max: i64) -> impl Strategy<Value = Vec<RangeInput>> {
    prop::collection::vec(1i64..=max, 0..8).prop_map(|bounds| {
        bounds
            .into_iter()
            .enumerate()
            .map(|(i, bound)| RangeInput::new(format!("Range {i}"), bound))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any range whose bound is above the maximum makes the whole set invalid.
    #[test]
    fn prop_range_above_max_rejected(
        max in max_epf(),
        excess in 1i64..1_000i64,
        position in 0usize..4,
    ) {
        let mut ranges: Vec<RangeInput> = (0..4i64)
            .map(|i| RangeInput::new(format!("R{i}"), (i + 1).min(max)))
            .collect();
        ranges[position] = RangeInput::new("Too high", max + excess);

        let result = validate_and_normalize(Decimal::from(max), Some(ranges.as_slice()));

        prop_assert!(
            matches!(result, Err(RangeValidationError::RangeExceedsMaxEpf { .. })),
            "expected RangeExceedsMaxEpf, got {:?}",
            result
        );
    }

    /// Accepted configurations are sorted with strictly increasing bounds.
    #[test]
    fn prop_normalized_ranges_strictly_ascending(
        (max, ranges) in max_epf().prop_flat_map(|max| (Just(max), range_inputs(max))),
    ) {
        match validate_and_normalize(Decimal::from(max), Some(ranges.as_slice())) {
            Ok(config) => {
                prop_assert_eq!(config.ranges.len(), ranges.len());
                for pair in config.ranges.windows(2) {
                    prop_assert!(pair[0].max_value < pair[1].max_value);
                }
                for range in &config.ranges {
                    prop_assert!(Decimal::from(range.max_value) <= config.max_epf);
                }
            }
            Err(err) => {
                // The only way a well-formed list fails is a shared boundary.
                let mut bounds: Vec<i64> = ranges
                    .iter()
                    .map(|r| r.max_value.as_i64().unwrap_or_default())
                    .collect();
                bounds.sort_unstable();
                bounds.dedup();
                prop_assert!(bounds.len() < ranges.len());
                let is_overlap = matches!(err, RangeValidationError::OverlappingRanges { .. });
                prop_assert!(is_overlap);
            }
        }
    }

    /// Input order never changes the normalized result.
    #[test]
    fn prop_normalization_ignores_input_order(
        (max, ranges) in max_epf().prop_flat_map(|max| (Just(max), range_inputs(max))),
    ) {
        let mut reversed = ranges.clone();
        reversed.reverse();

        let forward = validate_and_normalize(Decimal::from(max), Some(ranges.as_slice()));
        let backward = validate_and_normalize(Decimal::from(max), Some(reversed.as_slice()));

        if let (Ok(forward), Ok(backward)) = (forward, backward) {
            prop_assert_eq!(forward, backward);
        }
    }
}
