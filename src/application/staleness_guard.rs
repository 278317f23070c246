//! Detects picks whose forecast move already happened before submission.
//!
//! Buy picks are stale when `live >= target`; Sell picks when `live <= target`.

use rust_decimal::Decimal;

use crate::domain::values::trade_action::TradeAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Fresh,
    AlreadyMoved,
}

pub fn check_staleness(action: TradeAction, live_price: Decimal, target_price: Decimal) -> Staleness {
    let moved = match action {
        TradeAction::Buy => live_price >= target_price,
        TradeAction::Sell => live_price <= target_price,
    };
    if moved {
        Staleness::AlreadyMoved
    } else {
        Staleness::Fresh
    }
}
