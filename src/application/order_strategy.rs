//! Order-shape selection. Chosen once per batch from config; never from pick content.

use crate::application::risk_prices::RiskLevels;
use crate::domain::entities::order_intent::{ExitLeg, OrderIntent};
use crate::domain::entities::trade_pick::TradePick;
use crate::domain::values::execution_config::ExecutionConfig;
use crate::domain::values::order_type::TradeOrderType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTypeStrategy {
    order_type: TradeOrderType,
}

impl OrderTypeStrategy {
    pub fn new(order_type: TradeOrderType) -> Self {
        Self { order_type }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.trade_order_type)
    }

    pub fn order_type(&self) -> TradeOrderType {
        self.order_type
    }

    /// Build the intent for a sized, non-stale pick.
    pub fn build_intent(&self, pick: &TradePick, quantity: u64, levels: &RiskLevels) -> OrderIntent {
        let exit = match self.order_type {
            TradeOrderType::Bracket => ExitLeg::TakeProfit {
                price: levels.take_profit_price,
            },
            TradeOrderType::TrailingStop => ExitLeg::TrailingStop {
                trail_fraction: levels.stop_distance,
            },
        };

        OrderIntent {
            client_order_id: uuid::Uuid::new_v4().to_string(),
            symbol: pick.symbol.clone(),
            side: pick.action,
            quantity,
            entry_price: levels.live_price,
            stop_loss_price: levels.stop_loss_price,
            exit,
        }
    }
}
