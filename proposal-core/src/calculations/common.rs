//! Common numeric helpers shared by every pipeline step.
//!
//! Rounding here mirrors the profit-summary spreadsheet: `ROUND` is half-up
//! (away from zero at the midpoint), never banker's rounding, and material
//! quantities are always rounded up so nothing is under-ordered.
//!
//! Arithmetic on caller-supplied figures saturates at the `Decimal` range
//! rather than panicking, so an absurd entry yields absurd totals instead of
//! aborting a batch.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance under which two values count as unchanged.
pub const CHANGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Rounds `value` to `digits` decimal places using half-up rounding, matching
/// the spreadsheet `ROUND` function.
///
/// Decimal rounding cannot fail; a `digits` value finer than the value's own
/// scale returns the input unchanged.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::common::excel_round;
///
/// assert_eq!(excel_round(dec!(9.5), 0), dec!(10));
/// assert_eq!(excel_round(dec!(10.5), 0), dec!(11)); // not banker's 10
/// assert_eq!(excel_round(dec!(0.125), 2), dec!(0.13));
/// assert_eq!(excel_round(dec!(-2.5), 0), dec!(-3)); // away from zero
/// ```
pub fn excel_round(
    value: Decimal,
    digits: u32,
) -> Decimal {
    value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole number, half-up.
pub fn round_whole(value: Decimal) -> Decimal {
    excel_round(value, 0)
}

/// Rounds a material quantity up to the next whole unit.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::common::ceil_units;
///
/// assert_eq!(ceil_units(dec!(4.7)), dec!(5));
/// assert_eq!(ceil_units(dec!(5)), dec!(5));
/// ```
pub fn ceil_units(value: Decimal) -> Decimal {
    value.ceil()
}

/// Returns `true` for a missing or zero entry.
pub fn is_blank(value: Option<Decimal>) -> bool {
    value.is_none_or(|v| v.is_zero())
}

/// Compares two values within [`CHANGE_TOLERANCE`].
pub fn almost_equal(
    a: Decimal,
    b: Decimal,
) -> bool {
    a.saturating_sub(b).abs() <= CHANGE_TOLERANCE
}

/// Divides, yielding zero instead of failing on a zero divisor or overflow.
pub fn safe_div(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Adds every value, saturating at the `Decimal` range.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}
