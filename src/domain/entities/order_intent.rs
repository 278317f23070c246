use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::values::order_type::TradeOrderType;
use crate::domain::values::trade_action::TradeAction;

/// Exit leg attached to the entry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitLeg {
    TakeProfit { price: Decimal },
    /// Trailing distance as a fraction of price (0 to 1).
    TrailingStop { trail_fraction: Decimal },
}

/// A fully priced order, built per pick and dropped after submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderIntent {
    pub client_order_id: String,
    pub symbol: String,
    pub side: TradeAction,
    pub quantity: u64,
    pub entry_price: Decimal,
    pub stop_loss_price: Decimal,
    pub exit: ExitLeg,
}

impl OrderIntent {
    pub fn order_type(&self) -> TradeOrderType {
        match self.exit {
            ExitLeg::TakeProfit { .. } => TradeOrderType::Bracket,
            ExitLeg::TrailingStop { .. } => TradeOrderType::TrailingStop,
        }
    }

    pub fn notional(&self) -> Decimal {
        self.entry_price * Decimal::from(self.quantity)
    }
}
