//! Validation and normalization of range configurations.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde_json::Value;

use super::error::RangeValidationError;
use super::types::{DEFAULT_RANGE_ICON, Range, RangeConfig, RangeInput};

/// Validates a submitted range set against `max_epf` and returns the
/// normalized configuration, using [`DEFAULT_RANGE_ICON`] for missing icons.
///
/// A missing or empty `ranges` list yields a configuration with no ranges.
///
/// # Errors
///
/// Returns the first [`RangeValidationError`] found.
pub fn validate_and_normalize(
    max_epf: Decimal,
    ranges: Option<&[RangeInput]>,
) -> Result<RangeConfig, RangeValidationError> {
    validate_and_normalize_with_icon(max_epf, ranges, DEFAULT_RANGE_ICON)
}

/// Same as [`validate_and_normalize`] with a deployment-specific default icon.
///
/// Checks run in order: system maximum, then each range's shape and bound,
/// then duplicate names, then boundary ordering.
///
/// # Errors
///
/// Returns the first [`RangeValidationError`] found.
pub fn validate_and_normalize_with_icon(
    max_epf: Decimal,
    ranges: Option<&[RangeInput]>,
    default_icon: &str,
) -> Result<RangeConfig, RangeValidationError> {
    if max_epf <= Decimal::ZERO {
        return Err(RangeValidationError::InvalidMaxEpf(max_epf));
    }

    let inputs = ranges.unwrap_or_default();
    let mut normalized = Vec::with_capacity(inputs.len());

    for (position, input) in inputs.iter().enumerate() {
        normalized.push(normalize_range(position, input, max_epf, default_icon)?);
    }

    let mut seen = HashSet::with_capacity(normalized.len());
    for range in &normalized {
        if !seen.insert(range.name.to_lowercase()) {
            return Err(RangeValidationError::DuplicateRangeName(range.name.clone()));
        }
    }

    normalized.sort_by_key(|range| range.max_value);
    for pair in normalized.windows(2) {
        if pair[0].max_value >= pair[1].max_value {
            return Err(RangeValidationError::OverlappingRanges {
                lower: pair[0].name.clone(),
                upper: pair[1].name.clone(),
                max_value: pair[0].max_value,
            });
        }
    }

    Ok(RangeConfig {
        max_epf,
        ranges: normalized,
    })
}

fn normalize_range(
    position: usize,
    input: &RangeInput,
    max_epf: Decimal,
    default_icon: &str,
) -> Result<Range, RangeValidationError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(RangeValidationError::EmptyRangeName { position });
    }

    let max_value =
        parse_integer(&input.max_value).ok_or_else(|| RangeValidationError::InvalidMaxValue {
            name: name.to_string(),
        })?;

    if max_value <= 0 {
        return Err(RangeValidationError::NonPositiveMaxValue {
            name: name.to_string(),
            max_value,
        });
    }

    if Decimal::from(max_value) > max_epf {
        return Err(RangeValidationError::RangeExceedsMaxEpf {
            name: name.to_string(),
            max_value,
            max_epf,
        });
    }

    let icon = match &input.icon {
        Some(Value::String(icon)) if !icon.trim().is_empty() => icon.clone(),
        _ => default_icon.to_string(),
    };

    Ok(Range {
        name: name.to_string(),
        description: input.description.clone(),
        max_value,
        icon,
    })
}

/// Reads an integer the way a lenient form parser does: numbers are
/// truncated toward zero, strings contribute their leading signed digits.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .and_then(Decimal::from_f64)
                .and_then(|decimal| decimal.trunc().to_i64())
        }),
        Value::String(text) => parse_leading_digits(text),
        _ => None,
    }
}

fn parse_leading_digits(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = unsigned[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
