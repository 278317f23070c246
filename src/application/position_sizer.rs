//! Whole-share position sizing from a fixed per-trade budget.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Live price unusable for sizing. A data-quality failure, not a skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("live price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("budget {0} over the live price does not fit in a share count")]
    Overflow(Decimal),
}

/// `floor(budget / price)`. Zero means the budget cannot buy a single share.
pub fn size_position(budget: Decimal, live_price: Decimal) -> Result<u64, SizingError> {
    if live_price <= Decimal::ZERO {
        return Err(SizingError::NonPositivePrice(live_price));
    }
    if budget <= Decimal::ZERO {
        return Ok(0);
    }
    let shares = budget
        .checked_div(live_price)
        .ok_or(SizingError::Overflow(budget))?
        .floor();
    shares.to_u64().ok_or(SizingError::Overflow(shares))
}
