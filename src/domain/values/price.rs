//! Price rounding shared by the sizing and risk-level calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Default number of decimal places for an equity price increment.
pub const DEFAULT_PRICE_DECIMALS: u32 = 2;

/// Round a price to the instrument's minimum increment.
pub fn round_price(price: Decimal, decimals: u32) -> Decimal {
    price.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Fractional distance between two prices, relative to `base`.
///
/// Returns `None` when `base` is not positive or the ratio overflows.
pub fn fractional_distance(from: Decimal, base: Decimal) -> Option<Decimal> {
    if base <= Decimal::ZERO {
        return None;
    }
    from.checked_sub(base)?.checked_div(base).map(|d| d.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_price_midpoint_goes_away_from_zero() {
        assert_eq!(round_price(dec!(46.555), 2), dec!(46.56));
        assert_eq!(round_price(dec!(46.554), 2), dec!(46.55));
        assert_eq!(round_price(dec!(0.12345), 4), dec!(0.1235));
    }

    #[test]
    fn test_fractional_distance() {
        assert_eq!(fractional_distance(dec!(98), dec!(100)), Some(dec!(0.02)));
        assert_eq!(fractional_distance(dec!(102), dec!(100)), Some(dec!(0.02)));
        assert_eq!(fractional_distance(dec!(1), dec!(0)), None);
        assert_eq!(fractional_distance(Decimal::MAX, Decimal::new(1, 20)), None);
    }
}
