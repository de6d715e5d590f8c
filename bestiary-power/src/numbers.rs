//! Numeric helpers centralizing the guarded integer arithmetic used by the
//! estimators.

use num_traits::cast::cast;

use crate::constants::MAX_DEPTH;

/// Multiply then divide, skipping the division when the divisor is zero.
#[must_use]
pub fn scale(value: i64, numerator: i64, denominator: i64) -> i64 {
    let product = value.saturating_mul(numerator);
    if denominator == 0 {
        return product;
    }
    product / denominator
}

/// Divide when the divisor is positive, otherwise return the value untouched.
#[must_use]
pub fn divide_if_positive(value: i64, divisor: Option<i64>) -> i64 {
    match divisor {
        Some(divisor) if divisor > 0 => value / divisor,
        _ => value,
    }
}

/// Clamp an `i64` into the `u8` range.
#[must_use]
pub fn saturate_u8(value: i64) -> u8 {
    cast::<i64, u8>(value.clamp(0, i64::from(u8::MAX))).unwrap_or(u8::MAX)
}

/// Map a level onto a valid per-depth slot.
#[must_use]
pub fn depth_index(level: u8) -> usize {
    usize::from(level).min(MAX_DEPTH - 1)
}

/// Round to two significant figures using bracketed increments: the nearest
/// 10 below 1000, the nearest 100 below 10000, and so on up to the nearest
/// 100000. Values of 100 or less and values of ten million or more pass
/// through unchanged.
#[must_use]
pub fn round_two_figures(value: i64) -> i64 {
    if value <= 100 {
        return value;
    }
    let mut ceiling = 1_000;
    let mut step = 10;
    while step <= 100_000 {
        if value < ceiling {
            return (value + step / 2) / step * step;
        }
        ceiling *= 10;
        step *= 10;
    }
    value
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}
