//! Price and quantity utilities.
//!
//! ## Overview
//!
//! Prices and quantities are exact decimals ([`rust_decimal::Decimal`]).
//! Price discovery needs exact halving (midpoints of two observed prices) and
//! a total order over prices, both of which `Decimal` provides without the
//! rounding drift of floating point.
//!
//! Receipts are SSZ-encoded and carry prices as `u64` scaled by 10^8, so this
//! module also keeps the fixed-point conversions used for that encoding.
//!
//! ## Examples
//!
//! ```
//! use call_auction::types::price::{midpoint, snap_to_tick, to_fixed};
//! use rust_decimal::Decimal;
//!
//! let mid = midpoint(Decimal::from(1), Decimal::from(10));
//! assert_eq!(mid.map(|m| m.to_string()), Some("5.5".to_string()));
//!
//! // 52.5 snaps to the even tick
//! let snapped = snap_to_tick(Decimal::new(525, 1), Decimal::ONE);
//! assert_eq!(snapped, Some(Decimal::from(52)));
//!
//! assert_eq!(to_fixed("50000.12345678"), Some(5_000_012_345_678));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Price in quote units per one unit of the traded asset.
pub type Price = Decimal;

/// Quantity in units of the traded asset.
pub type Quantity = Decimal;

/// Scaling factor for fixed-point encoding: 10^8
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Parsing and arithmetic
// ============================================================================

/// Parse a decimal string into a price.
///
/// Negative values are rejected; prices are non-negative.
///
/// ```
/// use call_auction::types::price::parse_price;
///
/// assert_eq!(parse_price("52.5").map(|p| p.to_string()), Some("52.5".to_string()));
/// assert_eq!(parse_price("-1"), None);
/// assert_eq!(parse_price("abc"), None);
/// ```
pub fn parse_price(s: &str) -> Option<Price> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    if decimal.is_sign_negative() && !decimal.is_zero() {
        return None;
    }
    Some(decimal)
}

/// Arithmetic mean of two prices.
///
/// Computed as `lo + (hi - lo) / 2`, so two non-negative prices never
/// overflow. Returns `None` if the spread itself is out of range.
#[inline]
pub fn midpoint(a: Price, b: Price) -> Option<Price> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let half_spread = hi.checked_sub(lo)? / Decimal::TWO;
    Some(lo.checked_add(half_spread)?.normalize())
}

/// Round `value` to the nearest multiple of `tick`, halves going to the even
/// multiple.
///
/// `tick` must be positive; callers validate it through
/// [`AuctionConfig`](crate::engine::AuctionConfig). Returns `None` if
/// `value / tick` overflows.
pub fn snap_to_tick(value: Price, tick: Price) -> Option<Price> {
    let steps = value
        .checked_div(tick)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    Some(steps.checked_mul(tick)?.normalize())
}

/// Sum of `values`, or `None` on overflow.
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
}

// ============================================================================
// Fixed-point conversion (receipt encoding)
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if parsing fails or the value is negative or out of range.
///
/// ```
/// use call_auction::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64, rounding past 8 decimal places.
///
/// Returns `None` if the value is negative or out of range.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a human-readable string (trimmed trailing zeros)
///
/// ```
/// use call_auction::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(550_000_000), "5.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{}", decimal.normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("10"), Some(dec!(10)));
        assert_eq!(parse_price(" 52.25 "), Some(dec!(52.25)));
        assert_eq!(parse_price("0"), Some(dec!(0)));
        assert_eq!(parse_price("-0.5"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint(dec!(1), dec!(10)), Some(dec!(5.5)));
        assert_eq!(midpoint(dec!(10), dec!(1)), Some(dec!(5.5)));
        assert_eq!(midpoint(dec!(4), dec!(6)), Some(dec!(5)));
        assert_eq!(midpoint(dec!(7), dec!(7)), Some(dec!(7)));
        assert_eq!(midpoint(dec!(0.01), dec!(0.02)), Some(dec!(0.015)));
    }

    #[test]
    fn test_midpoint_near_max() {
        let high = Decimal::MAX;
        let low = Decimal::MAX - dec!(10);
        assert_eq!(midpoint(low, high), Some(Decimal::MAX - dec!(5)));
        assert_eq!(midpoint(Decimal::MIN, Decimal::MAX), None);
    }

    #[test]
    fn test_snap_to_tick_overflow() {
        assert_eq!(snap_to_tick(dec!(10), Decimal::new(1, 28)), None);
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec!(1), dec!(2.5)]), Some(dec!(3.5)));
        assert_eq!(checked_sum(Vec::new()), Some(dec!(0)));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }

    #[test]
    fn test_snap_to_tick_bankers_rounding() {
        assert_eq!(snap_to_tick(dec!(52.5), dec!(1)), Some(dec!(52)));
        assert_eq!(snap_to_tick(dec!(5.5), dec!(1)), Some(dec!(6)));
        assert_eq!(snap_to_tick(dec!(5.4), dec!(1)), Some(dec!(5)));
        assert_eq!(snap_to_tick(dec!(5.6), dec!(1)), Some(dec!(6)));
    }

    #[test]
    fn test_snap_to_fractional_tick() {
        assert_eq!(snap_to_tick(dec!(52.5), dec!(0.5)), Some(dec!(52.5)));
        assert_eq!(snap_to_tick(dec!(10.25), dec!(0.5)), Some(dec!(10)));
        assert_eq!(snap_to_tick(dec!(10.75), dec!(0.5)), Some(dec!(11)));
        assert_eq!(snap_to_tick(dec!(103), dec!(5)), Some(dec!(105)));
    }

    #[test]
    fn test_fixed_conversion() {
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed("0.5"), Some(50_000_000));
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(decimal_to_fixed(dec!(5.5)), Some(550_000_000));
        assert_eq!(fixed_to_decimal(550_000_000), dec!(5.5));
        assert_eq!(from_fixed_trimmed(5_200_000_000), "52");
    }
}
