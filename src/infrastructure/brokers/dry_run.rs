use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use rust_decimal::Decimal;

use crate::domain::ports::brokerage::{
    BracketOrderRequest, BrokerError, Brokerage, TrailingStopOrderRequest,
};

/// Reads from the wrapped brokerage, but never submits.
///
/// Every would-be order is recorded and answered with a synthetic `dry-` id.
pub struct DryRunBrokerage {
    inner: Arc<dyn Brokerage>,
    recorded: Mutex<Vec<String>>,
}

impl DryRunBrokerage {
    pub fn new(inner: Arc<dyn Brokerage>) -> Self {
        Self {
            inner,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Client order ids of the orders that would have been sent.
    pub fn recorded(&self) -> Vec<String> {
        self.recorded
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn record(&self, client_order_id: &str) -> String {
        if let Ok(mut r) = self.recorded.lock() {
            r.push(client_order_id.to_string());
        }
        format!("dry-{}", uuid::Uuid::new_v4())
    }
}

#[async_trait]
impl Brokerage for DryRunBrokerage {
    fn name(&self) -> &str {
        "dry_run"
    }

    async fn latest_price(&self, symbol: &str) -> Result<Decimal, BrokerError> {
        self.inner.latest_price(symbol).await
    }

    async fn submit_bracket_order(&self, order: &BracketOrderRequest) -> Result<String, BrokerError> {
        info!(
            "[DRY RUN] {} bracket {} x{} tp {} sl {}",
            order.symbol, order.side, order.quantity, order.take_profit_price, order.stop_loss_price
        );
        Ok(self.record(&order.client_order_id))
    }

    async fn submit_trailing_stop_order(
        &self,
        order: &TrailingStopOrderRequest,
    ) -> Result<String, BrokerError> {
        info!(
            "[DRY RUN] {} trailing stop {} x{} trail {}",
            order.symbol, order.side, order.quantity, order.trail_fraction
        );
        Ok(self.record(&order.client_order_id))
    }

    async fn open_position(&self, symbol: &str) -> Result<Option<Decimal>, BrokerError> {
        self.inner.open_position(symbol).await
    }

    async fn filled_orders_since(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, BrokerError> {
        self.inner.filled_orders_since(symbol, since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::trade_action::TradeAction;
    use rust_decimal_macros::dec;

    struct FixedPrice;

    #[async_trait]
    impl Brokerage for FixedPrice {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn latest_price(&self, _symbol: &str) -> Result<Decimal, BrokerError> {
            Ok(dec!(46.51))
        }

        async fn submit_bracket_order(&self, _order: &BracketOrderRequest) -> Result<String, BrokerError> {
            Err(BrokerError::Transport("must not be called".into()))
        }

        async fn submit_trailing_stop_order(
            &self,
            _order: &TrailingStopOrderRequest,
        ) -> Result<String, BrokerError> {
            Err(BrokerError::Transport("must not be called".into()))
        }
    }

    #[tokio::test]
    async fn test_reads_delegate_and_submits_are_recorded() {
        let broker = DryRunBrokerage::new(Arc::new(FixedPrice));
        assert_eq!(broker.latest_price("LYFT").await, Ok(dec!(46.51)));
        assert_eq!(broker.open_position("LYFT").await, Ok(None));

        let id = broker
            .submit_bracket_order(&BracketOrderRequest {
                client_order_id: "c-1".into(),
                symbol: "LYFT".into(),
                side: TradeAction::Buy,
                quantity: 21,
                entry_price: dec!(46.51),
                take_profit_price: dec!(47.90),
                stop_loss_price: dec!(45.58),
            })
            .await
            .unwrap();
        assert!(id.starts_with("dry-"));

        broker
            .submit_trailing_stop_order(&TrailingStopOrderRequest {
                client_order_id: "c-2".into(),
                symbol: "AAPL".into(),
                side: TradeAction::Sell,
                quantity: 3,
                entry_price: dec!(120),
                trail_fraction: dec!(0.02),
            })
            .await
            .unwrap();
        assert_eq!(broker.recorded(), vec!["c-1", "c-2"]);
    }
}
