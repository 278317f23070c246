//! Brokerage port: live prices and order submission.
//!
//! [`BrokerError`] separates business rejections (the brokerage understood the
//! order and refused it) from transport and authentication failures, which is
//! what lets the submitter turn the former into skips and the latter into
//! per-symbol failures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::values::trade_action::TradeAction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The brokerage refused the request on business grounds.
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Parameters of a three-legged bracket order.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketOrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub side: TradeAction,
    pub quantity: u64,
    pub entry_price: Decimal,
    pub take_profit_price: Decimal,
    pub stop_loss_price: Decimal,
}

/// Parameters of an entry order protected by a trailing stop.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingStopOrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub side: TradeAction,
    pub quantity: u64,
    pub entry_price: Decimal,
    /// Trailing distance as a fraction of price (0 to 1).
    pub trail_fraction: Decimal,
}

#[async_trait]
pub trait Brokerage: Send + Sync {
    /// Name of this brokerage for logging.
    fn name(&self) -> &str;

    async fn latest_price(&self, symbol: &str) -> Result<Decimal, BrokerError>;

    /// Submit a bracket order, returning the brokerage order id.
    async fn submit_bracket_order(&self, order: &BracketOrderRequest) -> Result<String, BrokerError>;

    /// Submit a trailing-stop order, returning the brokerage order id.
    async fn submit_trailing_stop_order(
        &self,
        order: &TrailingStopOrderRequest,
    ) -> Result<String, BrokerError>;

    /// Signed quantity currently held, if any. Fractional holdings are kept as-is.
    async fn open_position(&self, _symbol: &str) -> Result<Option<Decimal>, BrokerError> {
        Ok(None)
    }

    /// Number of orders for `symbol` filled since `since`.
    async fn filled_orders_since(
        &self,
        _symbol: &str,
        _since: DateTime<Utc>,
    ) -> Result<usize, BrokerError> {
        Ok(0)
    }
}
